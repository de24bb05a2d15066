//! Live per-vehicle state.
//!
//! The store owns the latest [`EnrichedRecord`] for every vehicle. Fixes are
//! matched against the shared network on upsert; stale vehicles are removed by
//! a periodic sweep calling [`TrainStateStore::evict`]. Every change is
//! announced on a broadcast channel so the persistence sink can rewrite its
//! files without polling.
//!
//! # Concurrency
//!
//! One `RwLock` guards the whole map and every operation holds it for its full
//! duration, so an upsert never observes a half-applied eviction. Fixes for a
//! single vehicle must be applied in arrival order by the caller.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::clock::Clock;
use super::fix::{FixError, RawFix};
use super::record::{EnrichedRecord, NextStop};
use crate::matching::{self, PriorFix};
use crate::network::TrackNetwork;

/// Default capacity of the state event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// A change to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    /// A vehicle's record was created or replaced.
    Updated { vehicle: String },
    /// Stale vehicles were removed.
    Evicted { vehicles: Vec<String> },
}

struct Entry {
    record: EnrichedRecord,
    last_update: DateTime<Utc>,
}

/// Keyed store of the latest state for every vehicle.
pub struct TrainStateStore {
    network: Arc<TrackNetwork>,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<String, Entry>>,
    events: broadcast::Sender<StateEvent>,
}

impl TrainStateStore {
    /// Create an empty store matching against `network`.
    pub fn new(network: Arc<TrackNetwork>, clock: Arc<dyn Clock>) -> Self {
        Self::with_event_capacity(network, clock, DEFAULT_EVENT_CAPACITY)
    }

    /// Create with a custom event channel capacity.
    pub fn with_event_capacity(
        network: Arc<TrackNetwork>,
        clock: Arc<dyn Clock>,
        capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            network,
            clock,
            entries: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// The network fixes are matched against.
    pub fn network(&self) -> &Arc<TrackNetwork> {
        &self.network
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }

    /// Match a fix onto the network and store it as the vehicle's latest state.
    ///
    /// Heading continuity uses the vehicle's previous record, if any. The ETA
    /// is measured from the clock's current time, not the fix timestamp.
    ///
    /// # Errors
    ///
    /// Non-finite coordinates or speed, or a network without points. The
    /// store is unchanged on error. An unparseable timestamp is replaced by
    /// the clock's current time.
    pub fn upsert(&self, vehicle_id: &str, fix: &RawFix) -> Result<EnrichedRecord, FixError> {
        let position = fix.position()?;
        let speed = fix.speed_kmh()?;

        let mut entries = self.entries.write();
        let now = self.clock.now();
        let timestamp = fix.timestamp_or(now);

        let projection = matching::project(&self.network, &position).ok_or(FixError::EmptyNetwork)?;
        let trackmarker = projection.trackmarker;

        let prior = entries.get(vehicle_id).map(|entry| PriorFix {
            position: entry.record.position(),
            heading: entry.record.dir,
        });
        let dir = matching::estimate_heading(prior.as_ref(), &position, self.network.scale());

        let next_stop = matching::next_stop(&self.network, trackmarker).map(|stop| {
            let eta = matching::estimate_arrival(now, trackmarker, stop.trackmarker, speed);
            NextStop::new(stop, eta)
        });

        let record = EnrichedRecord {
            lat: fix.lat,
            lon: fix.lon,
            speed,
            sat: fix.sat,
            timestamp,
            trackmarker,
            trackname: projection.track_name.to_string(),
            dir,
            next_stop,
        };

        tracing::debug!(
            vehicle = vehicle_id,
            track = %record.trackname,
            trackmarker,
            closest = projection.closest.trackmarker,
            second = projection.second.map(|p| p.trackmarker),
            dir,
            "Fix matched"
        );

        entries.insert(
            vehicle_id.to_string(),
            Entry {
                record: record.clone(),
                last_update: now,
            },
        );

        // No subscribers is fine
        let _ = self.events.send(StateEvent::Updated {
            vehicle: vehicle_id.to_string(),
        });

        Ok(record)
    }

    /// Remove every vehicle not updated within `max_age` of `now`.
    ///
    /// Returns the removed ids in sorted order. An event is broadcast only
    /// when something was removed, so repeating a call with the same `now`
    /// is silent.
    pub fn evict(&self, now: DateTime<Utc>, max_age: Duration) -> Vec<String> {
        // An age beyond chrono's range can never be exceeded
        let Ok(max_age) = chrono::Duration::from_std(max_age) else {
            return Vec::new();
        };

        let mut entries = self.entries.write();
        let mut removed: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| now - entry.last_update > max_age)
            .map(|(id, _)| id.clone())
            .collect();

        if removed.is_empty() {
            return removed;
        }

        for id in &removed {
            entries.remove(id);
        }
        removed.sort();

        tracing::info!(vehicles = ?removed, "Dropped vehicles without recent fixes");
        let _ = self.events.send(StateEvent::Evicted {
            vehicles: removed.clone(),
        });

        removed
    }

    /// Owned copy of all records keyed by vehicle id.
    pub fn snapshot(&self) -> BTreeMap<String, EnrichedRecord> {
        self.entries
            .read()
            .iter()
            .map(|(id, entry)| (id.clone(), entry.record.clone()))
            .collect()
    }

    /// The latest record for one vehicle.
    pub fn get(&self, vehicle_id: &str) -> Option<EnrichedRecord> {
        self.entries
            .read()
            .get(vehicle_id)
            .map(|entry| entry.record.clone())
    }

    /// Number of tracked vehicles.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when no vehicle is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl std::fmt::Debug for TrainStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainStateStore")
            .field("vehicles", &self.len())
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::test_support::main_line;
    use crate::train_state::ManualClock;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 27, 12, 0, 0).unwrap()
    }

    fn store() -> (TrainStateStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let store = TrainStateStore::new(Arc::new(main_line()), clock.clone());
        (store, clock)
    }

    #[test]
    fn test_first_fix_is_enriched() {
        let (store, _) = store();
        let record = store.upsert("demo", &RawFix::new(0.0015, 0.0, 36.0)).unwrap();

        assert_eq!(record.trackmarker, 166);
        assert_eq!(record.trackname, "Main");
        assert_eq!(record.dir, 0);
        assert_eq!(record.timestamp, start());

        let stop = record.next_stop.unwrap();
        assert_eq!(stop.name, "Nord");
        assert_eq!(stop.trackmarker, 111);
        assert_eq!(
            stop.eta.unwrap() - start(),
            chrono::Duration::milliseconds(5500)
        );
    }

    #[test]
    fn test_fix_timestamp_is_kept() {
        let (store, _) = store();
        let fix = RawFix::new(0.0, 0.0, 0.0).with_timestamp("2024-12-27T11:59:58Z");
        let record = store.upsert("demo", &fix).unwrap();
        assert_eq!(record.timestamp, start() - chrono::Duration::seconds(2));
        assert!(record.next_stop.unwrap().eta.is_none());
    }

    #[test]
    fn test_fix_timestamp_offset_is_published() {
        let (store, _) = store();
        let fix = RawFix::new(0.0, 0.0, 0.0).with_timestamp("2024-12-27T13:00:00+01:00");
        let record = store.upsert("demo", &fix).unwrap();

        assert_eq!(record.timestamp, start());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["timestamp"], "2024-12-27T13:00:00+01:00");
    }

    #[test]
    fn test_unparseable_timestamp_uses_clock() {
        let (store, clock) = store();
        clock.advance(chrono::Duration::seconds(30));

        let fix = RawFix::new(0.002, 0.0, 10.0).with_timestamp("not a time");
        let record = store.upsert("demo", &fix).unwrap();

        assert_eq!(record.timestamp, start() + chrono::Duration::seconds(30));
        assert_eq!(record.trackmarker, 222);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_heading_follows_prior_record() {
        let (store, _) = store();
        store.upsert("demo", &RawFix::new(0.0, 0.0, 10.0)).unwrap();

        let moved = store.upsert("demo", &RawFix::new(0.001, 0.0, 10.0)).unwrap();
        assert_eq!(moved.dir, 0);

        let east = store.upsert("demo", &RawFix::new(0.001, 0.001, 10.0)).unwrap();
        assert_eq!(east.dir, 90);

        // ~1 m of jitter keeps the heading
        let jitter = store.upsert("demo", &RawFix::new(0.00101, 0.001, 10.0)).unwrap();
        assert_eq!(jitter.dir, 90);
    }

    #[test]
    fn test_vehicles_do_not_share_heading() {
        let (store, _) = store();
        store.upsert("a", &RawFix::new(0.0, 0.0, 10.0)).unwrap();
        let b = store.upsert("b", &RawFix::new(0.0, 0.001, 10.0)).unwrap();
        assert_eq!(b.dir, 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_invalid_fix_leaves_store_unchanged() {
        let (store, _) = store();
        store.upsert("demo", &RawFix::new(0.0, 0.0, 10.0)).unwrap();

        assert!(store.upsert("demo", &RawFix::new(f64::NAN, 0.0, 1.0)).is_err());
        assert!(store.upsert("demo", &RawFix::new(0.002, 0.0, f64::INFINITY)).is_err());

        assert_eq!(store.get("demo").unwrap().lat, 0.0);
    }

    #[test]
    fn test_empty_network_rejects_fix() {
        let network = TrackNetwork::build(
            Vec::new(),
            &HashMap::new(),
            crate::coord::LocalScale::default(),
        )
        .unwrap();
        let store = TrainStateStore::new(Arc::new(network), Arc::new(ManualClock::new(start())));
        assert!(matches!(
            store.upsert("demo", &RawFix::new(0.0, 0.0, 1.0)),
            Err(FixError::EmptyNetwork)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_evict_exact_and_idempotent() {
        let (store, clock) = store();
        store.upsert("old", &RawFix::new(0.0, 0.0, 0.0)).unwrap();
        clock.advance(chrono::Duration::minutes(10));
        store.upsert("fresh", &RawFix::new(0.002, 0.0, 0.0)).unwrap();

        let now = start() + chrono::Duration::minutes(11);
        let max_age = Duration::from_secs(600);

        assert_eq!(store.evict(now, max_age), vec!["old".to_string()]);
        assert!(store.evict(now, max_age).is_empty());
        assert!(store.get("fresh").is_some());
        assert!(store.get("old").is_none());
    }

    #[test]
    fn test_entry_at_exact_max_age_survives() {
        let (store, _) = store();
        store.upsert("demo", &RawFix::new(0.0, 0.0, 0.0)).unwrap();
        let now = start() + chrono::Duration::seconds(600);
        assert!(store.evict(now, Duration::from_secs(600)).is_empty());
    }

    #[test]
    fn test_events_are_broadcast() {
        let (store, clock) = store();
        let mut events = store.subscribe();

        store.upsert("demo", &RawFix::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(
            events.try_recv().unwrap(),
            StateEvent::Updated {
                vehicle: "demo".to_string()
            }
        );

        // Nothing stale: no event
        store.evict(clock.now(), Duration::from_secs(600));
        assert!(events.try_recv().is_err());

        clock.advance(chrono::Duration::hours(1));
        store.evict(clock.now(), Duration::from_secs(600));
        assert_eq!(
            events.try_recv().unwrap(),
            StateEvent::Evicted {
                vehicles: vec!["demo".to_string()]
            }
        );
    }

    #[test]
    fn test_snapshot_is_sorted_copy() {
        let (store, _) = store();
        store.upsert("zug2", &RawFix::new(0.0, 0.0, 0.0)).unwrap();
        store.upsert("zug1", &RawFix::new(0.002, 0.0, 0.0)).unwrap();

        let snapshot = store.snapshot();
        let ids: Vec<&String> = snapshot.keys().collect();
        assert_eq!(ids, ["zug1", "zug2"]);

        store.evict(start() + chrono::Duration::hours(1), Duration::from_secs(1));
        assert_eq!(snapshot.len(), 2);
        assert!(store.is_empty());
    }
}
