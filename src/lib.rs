//! Blockdoku (workspace facade crate).
//!
//! Re-exports the member crates as `blockdoku::{core,engine,adapter,types}`;
//! the implementation lives in dedicated crates under `crates/`.

pub use blockdoku_adapter as adapter;
pub use blockdoku_core as core;
pub use blockdoku_engine as engine;
pub use blockdoku_types as types;

/// Install the `tracing` subscriber used by the binaries.
///
/// Honors `RUST_LOG`; defaults to `info`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
