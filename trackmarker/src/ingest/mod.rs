//! Fix ingestion.
//!
//! ```text
//! FixFeed (stdin | TCP + ReconnectState) ──lines──► mpsc ──► run_ingest ──► TrainStateStore::upsert
//! ```
//!
//! Malformed lines and invalid fixes are logged and dropped; only losing the
//! feed for good ends ingestion.

pub mod backoff;
mod error;
mod feed;
pub mod message;
mod pipeline;

pub use backoff::{ReconnectPolicy, ReconnectState};
pub use error::IngestError;
pub use feed::{FixFeed, TcpFeed};
pub use message::{parse_line, parse_message, FixMessage};
pub use pipeline::{process_line, run_ingest, IngestStats, LineOutcome};
