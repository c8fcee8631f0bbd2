//! TCP server for game sessions
//!
//! Every connection gets its own [`Session`] (and so its own engine); no
//! state is shared between connections. Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::protocol::{extract_seq_best_effort, ErrorCode, ServerMessage};
use crate::session::Session;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Longest accepted request line, in bytes
    pub max_line_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_line_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Read `BLOCKDOKU_HOST`, `BLOCKDOKU_PORT` and `BLOCKDOKU_MAX_LINE`;
    /// unset or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("BLOCKDOKU_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = lookup("BLOCKDOKU_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_line_bytes = lookup("BLOCKDOKU_MAX_LINE")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.max_line_bytes);

        Self {
            host,
            port,
            max_line_bytes,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Start the TCP server.
///
/// `ready_tx` receives the bound address once the listener is up (useful
/// with port 0).
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    info!(%bound, "session server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let config = Arc::new(config);
    let mut client_id_counter = 0u32;

    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter = client_id_counter.wrapping_add(1);
        let client_id = client_id_counter;
        info!(client_id, %addr, "client connected");

        let config = Arc::clone(&config);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, config).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Serve one connection until EOF or an oversized line
async fn handle_client(
    socket: TcpStream,
    client_id: u32,
    config: Arc<ServerConfig>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let mut session = Session::new(client_id);

    let mut line: Vec<u8> = Vec::with_capacity(1024);
    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    let limit = config.max_line_bytes as u64 + 1;

    loop {
        line.clear();
        let bytes_read = (&mut reader).take(limit).read_until(b'\n', &mut line).await?;
        if bytes_read == 0 {
            break;
        }

        if bytes_read as u64 >= limit && line.last() != Some(&b'\n') {
            warn!(client_id, max = config.max_line_bytes, "request line too long");
            let reply = ServerMessage::error(
                0,
                ErrorCode::LineTooLong,
                format!("lines are limited to {} bytes", config.max_line_bytes),
            );
            write_message(&mut writer, &mut buf, &reply).await?;
            break;
        }

        let reply = match std::str::from_utf8(&line) {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                session.handle_line(trimmed)
            }
            Err(e) => {
                let seq = extract_seq_best_effort(&String::from_utf8_lossy(&line)).unwrap_or(0);
                debug!(client_id, seq, "request is not UTF-8");
                ServerMessage::error(
                    seq,
                    ErrorCode::InvalidJson,
                    format!("request is not valid UTF-8: {}", e),
                )
            }
        };
        debug!(client_id, seq = reply.seq(), "reply");
        write_message(&mut writer, &mut buf, &reply).await?;
    }

    Ok(())
}

async fn write_message<W>(writer: &mut W, buf: &mut Vec<u8>, msg: &ServerMessage) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    buf.clear();
    serde_json::to_writer(&mut *buf, msg)?;
    buf.push(b'\n');
    writer.write_all(buf).await?;
    writer.flush().await?;
    Ok(())
}
