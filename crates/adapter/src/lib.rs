//! Adapter - JSON game sessions over TCP, plus save files
//!
//! # Protocol Overview
//!
//! Line-delimited JSON over TCP. Each connection owns an independent game;
//! nothing is shared between connections.
//!
//! 1. **Connection**: client connects (default: 127.0.0.1:7878)
//! 2. **Requests**: one JSON object per line, tagged by `type`, with a
//!    strictly increasing `seq`
//! 3. **Replies**: exactly one reply per request, echoing `seq`
//!
//! ## Client -> Server
//!
//! - **new_game**: optional `difficulty`, `hints`, `seed`
//! - **place**: `block` (pool index), `row`, `col`, optional `rotation` in degrees
//! - **hint**, **state**, **check_game_over**, **save**
//! - **load**: a `game` previously returned by `save`
//!
//! ## Server -> Client
//!
//! - **placed**: points, cleared lines and the new state
//! - **hint**, **state**, **game_over**, **saved**, **loaded**
//! - **error**: `code` and `message`; the session keeps running
//!
//! # Environment Variables
//!
//! - `BLOCKDOKU_HOST`: bind address (default: "127.0.0.1")
//! - `BLOCKDOKU_PORT`: port number (default: 7878)
//! - `BLOCKDOKU_MAX_LINE`: longest accepted request line in bytes (default: 65536)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"new_game","seq":1,"difficulty":"normal","seed":42}
//! Server -> Client: {"type":"state","seq":1,"ts":1700000000000,"state":{...}}
//! Client -> Server: {"type":"place","seq":2,"block":0,"row":4,"col":4}
//! Server -> Client: {"type":"placed","seq":2,"ts":1700000000001,"points_gained":8,...}
//! Client -> Server: {"type":"place","seq":3,"block":0,"row":4,"col":4}
//! Server -> Client: {"type":"error","seq":3,"ts":1700000000002,"code":"collision","message":"Collision detected"}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"state","seq":1}
//! ```

pub mod persist;
pub mod protocol;
pub mod server;
pub mod session;

pub use blockdoku_core as core;
pub use blockdoku_engine as engine;
pub use blockdoku_types as types;

// Re-export protocol types for convenience
pub use persist::{load_from_path, save_to_path, validate_saved, PersistError};
pub use protocol::*;
pub use server::*;
pub use session::Session;
