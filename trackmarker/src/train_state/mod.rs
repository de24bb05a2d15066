//! Live train state: raw fixes in, enriched per-vehicle records out.
//!
//! ```text
//! RawFix ──► TrainStateStore::upsert ──► matching::{project, next_stop, heading, eta}
//!                    │
//!                    ├──► EnrichedRecord (stored, keyed by vehicle id)
//!                    └──► StateEvent::Updated ──► subscribers
//!
//! sweeper tick ──► TrainStateStore::evict ──► StateEvent::Evicted (if any)
//! ```

mod clock;
mod fix;
mod record;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fix::{parse_timestamp, FixError, RawFix};
pub use record::{EnrichedRecord, NextStop};
pub use store::{StateEvent, TrainStateStore, DEFAULT_EVENT_CAPACITY};
