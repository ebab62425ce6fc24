//! Purpose: Library crate behind the `baxus-dump` binary.
//! Exports: `config`, `dump`, `error`, `render`, `transport`.
//! Role: One-shot fetch of the BAXUS listings search endpoint into a JSON file.
//! Invariants: Network, filesystem and endpoint are injected through `DumpConfig`/`Transport`.
pub mod config;
pub mod dump;
pub mod error;
pub mod render;
pub mod transport;

pub use config::{DumpConfig, ListingsQuery, WriteMode};
pub use dump::{DumpOutcome, fetch_and_dump};
pub use error::{Error, ErrorKind, to_exit_code};
pub use transport::{HttpResponse, Transport, UreqTransport};
