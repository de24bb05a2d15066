//! Sequential fix processing: feed lines in, store upserts out.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::message::parse_line;
use crate::train_state::TrainStateStore;

/// Outcome of one feed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// A fix was matched and stored.
    Applied,
    /// Not a fix (status message, foreign namespace, blank line).
    Ignored,
    /// Malformed line or invalid fix; logged and dropped.
    Rejected,
}

/// Counters for a finished ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub applied: u64,
    pub ignored: u64,
    pub rejected: u64,
}

impl IngestStats {
    fn record(&mut self, outcome: LineOutcome) {
        match outcome {
            LineOutcome::Applied => self.applied += 1,
            LineOutcome::Ignored => self.ignored += 1,
            LineOutcome::Rejected => self.rejected += 1,
        }
    }
}

/// Decode one line and apply it to the store.
pub fn process_line(store: &TrainStateStore, line: &str, namespace: &str) -> LineOutcome {
    let message = match parse_line(line, namespace) {
        Ok(Some(message)) => message,
        Ok(None) => return LineOutcome::Ignored,
        Err(e) => {
            tracing::warn!(error = %e, "Dropping feed line");
            return LineOutcome::Rejected;
        }
    };

    match store.upsert(&message.vehicle_id, &message.fix) {
        Ok(record) => {
            tracing::info!(
                vehicle = %message.vehicle_id,
                track = %record.trackname,
                trackmarker = record.trackmarker,
                speed = record.speed,
                "Train position updated"
            );
            LineOutcome::Applied
        }
        Err(e) => {
            tracing::warn!(vehicle = %message.vehicle_id, error = %e, "Dropping fix");
            LineOutcome::Rejected
        }
    }
}

/// Consume lines in arrival order until the channel closes or `cancel` fires.
///
/// A single consumer keeps fixes for each vehicle in order.
pub async fn run_ingest(
    mut lines: mpsc::Receiver<String>,
    store: Arc<TrainStateStore>,
    namespace: String,
    cancel: CancellationToken,
) -> IngestStats {
    let mut stats = IngestStats::default();
    tracing::info!(namespace = %namespace, "Ingest started");

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            line = lines.recv() => {
                let Some(line) = line else { break };
                stats.record(process_line(&store, &line, &namespace));
            }
        }
    }

    tracing::info!(
        applied = stats.applied,
        ignored = stats.ignored,
        rejected = stats.rejected,
        "Ingest stopped"
    );
    stats
}
