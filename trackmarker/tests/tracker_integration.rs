//! Integration tests for the live tracking pipeline.
//!
//! These tests verify the complete flow including:
//! - GPX file → network → fix feed → store → published train files
//! - Feed reconnection after the peer closes the connection
//! - Staleness eviction driven by a manual clock
//!
//! Run with: `cargo test --test tracker_integration`

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use trackmarker::app::{AppConfig, TrackerApp};
use trackmarker::coord::LocalScale;
use trackmarker::ingest::{run_ingest, FixFeed, ReconnectPolicy, TcpFeed};
use trackmarker::network::TrackNetwork;
use trackmarker::output::{spawn_state_sink, spawn_sweeper, TrainOutputPaths};
use trackmarker::train_state::{ManualClock, RawFix, StateEvent, TrainStateStore};

// ============================================================================
// Helper Functions
// ============================================================================

/// Track "Main" running north from (0, 0) with a stop 111 m in.
const MAIN_LINE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="tests" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Main</name>
    <trkseg>
      <trkpt lat="0.000" lon="0.0"></trkpt>
      <trkpt lat="0.001" lon="0.0"><name>Hp 6011 Nord</name></trkpt>
      <trkpt lat="0.002" lon="0.0"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

/// A fix halfway between the second and third point, at 36 km/h.
const MIDPOINT_FIX: &str = r#"c3toc/train/demo/pos {"lat": 0.0015, "lon": 0.0, "speed": 36.0}"#;

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 27, 18, 0, 0).unwrap()
}

fn load_main_line(dir: &Path) -> Arc<TrackNetwork> {
    let path = dir.join("trainlines.gpx");
    std::fs::write(&path, MAIN_LINE_GPX).unwrap();
    Arc::new(TrackNetwork::load_gpx(&path, &HashMap::new(), LocalScale::default()).unwrap())
}

fn output_paths(dir: &Path) -> TrainOutputPaths {
    TrainOutputPaths {
        json: dir.join("webroot/trains.json"),
        geojson: dir.join("webroot/trains.geojson"),
    }
}

fn fast_policy(max_attempts: u32) -> ReconnectPolicy {
    ReconnectPolicy {
        first_delay: Duration::from_millis(10),
        multiplier: 2,
        max_delay: Duration::from_millis(40),
        max_attempts,
    }
}

/// Poll `condition` every 10 ms for up to five seconds.
async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ============================================================================
// Integration Tests
// ============================================================================

/// A fix arriving over TCP is matched and published.
///
/// 1. Tracker connects to the feed
/// 2. Feed sends one position, one status and one foreign-namespace line
/// 3. The store holds the enriched record (trackmarker 166, wraps to the 111 m stop)
/// 4. Shutdown leaves both train files with the final state
#[tokio::test]
async fn test_tcp_feed_to_published_files() {
    let temp = tempfile::tempdir().unwrap();
    let network = load_main_line(temp.path());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    let config = AppConfig {
        feed: FixFeed::Tcp(TcpFeed::with_policy(address, fast_policy(3))),
        namespace: "c3toc".to_string(),
        max_age: Duration::from_secs(600),
        sweep_interval: Duration::from_secs(1),
        outputs: output_paths(temp.path()),
        line_channel_capacity: 16,
    };
    let clock = Arc::new(ManualClock::new(start_time()));
    let app = TrackerApp::start_with_clock(config, network, clock.clone())
        .await
        .unwrap();

    let (mut socket, _) = listener.accept().await.unwrap();
    let lines = format!(
        "{}\nc3toc/train/demo/status {{\"alive\": true}}\nother/train/x/pos {{}}\n",
        MIDPOINT_FIX
    );
    socket.write_all(lines.as_bytes()).await.unwrap();

    let store = Arc::clone(app.store());
    wait_until(|| store.get("demo").is_some()).await;

    let record = store.get("demo").unwrap();
    assert_eq!(record.trackname, "Main");
    assert_eq!(record.trackmarker, 166);
    assert_eq!(record.dir, 0, "first fix has no prior heading");
    assert_eq!(record.timestamp, start_time());

    let next = record.next_stop.as_ref().unwrap();
    assert_eq!(next.name, "Nord");
    assert_eq!(next.trackmarker, 111);
    assert_eq!(
        next.eta,
        Some(start_time() + chrono::Duration::milliseconds(5500))
    );

    let stats = app.shutdown().await.unwrap();
    drop(socket);
    assert_eq!(stats.applied, 1);

    let paths = output_paths(temp.path());
    let trains = read_json(&paths.json);
    assert_eq!(trains["trains"]["demo"]["trackmarker"], 166);
    assert_eq!(trains["trains"]["demo"]["next_stop"]["name"], "Nord");

    let geojson = read_json(&paths.geojson);
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["properties"]["name"], "demo");
}

/// The feed reconnects after the peer hangs up and keeps delivering lines.
#[tokio::test]
async fn test_feed_reconnects_after_peer_closes() {
    let temp = tempfile::tempdir().unwrap();
    let network = load_main_line(temp.path());
    let store = Arc::new(TrainStateStore::new(
        network,
        Arc::new(ManualClock::new(start_time())),
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel(16);
    let feed = FixFeed::Tcp(TcpFeed::with_policy(address, fast_policy(5))).spawn(tx, cancel.clone());
    let ingest = tokio::spawn(run_ingest(
        rx,
        Arc::clone(&store),
        "c3toc".to_string(),
        cancel.clone(),
    ));

    // First connection delivers one vehicle, then closes
    let (mut first, _) = listener.accept().await.unwrap();
    first
        .write_all(b"c3toc/train/a/pos {\"lat\": 0.0005, \"lon\": 0.0, \"speed\": 10}\n")
        .await
        .unwrap();
    drop(first);

    // Second connection after backoff delivers another
    let (mut second, _) = listener.accept().await.unwrap();
    second
        .write_all(b"c3toc/train/b/pos {\"lat\": 0.0015, \"lon\": 0.0, \"speed\": 10}\n")
        .await
        .unwrap();

    wait_until(|| store.len() == 2).await;
    assert_eq!(store.get("a").unwrap().trackmarker, 55);
    assert_eq!(store.get("b").unwrap().trackmarker, 166);

    cancel.cancel();
    feed.await.unwrap().unwrap();
    let stats = ingest.await.unwrap();
    assert_eq!(stats.applied, 2);
}

/// The sweeper drops a vehicle only once it is strictly older than max age.
#[tokio::test]
async fn test_sweeper_evicts_with_manual_clock() {
    let temp = tempfile::tempdir().unwrap();
    let network = load_main_line(temp.path());
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = Arc::new(TrainStateStore::new(network, clock.clone()));
    let mut events = store.subscribe();

    store.upsert("demo", &RawFix::new(0.0015, 0.0, 36.0)).unwrap();

    let cancel = CancellationToken::new();
    let sweeper = spawn_sweeper(
        Arc::clone(&store),
        Duration::from_secs(600),
        Duration::from_millis(10),
        cancel.clone(),
    );

    clock.advance(chrono::Duration::seconds(600));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.len(), 1, "an entry exactly max_age old survives");

    clock.advance(chrono::Duration::seconds(1));
    wait_until(|| store.is_empty()).await;

    assert!(matches!(
        events.recv().await.unwrap(),
        StateEvent::Updated { vehicle } if vehicle == "demo"
    ));
    assert_eq!(
        events.recv().await.unwrap(),
        StateEvent::Evicted {
            vehicles: vec!["demo".to_string()]
        }
    );

    cancel.cancel();
    sweeper.await.unwrap();
}

/// The sink rewrites the train files after updates and evictions.
#[tokio::test]
async fn test_sink_follows_store_changes() {
    let temp = tempfile::tempdir().unwrap();
    let network = load_main_line(temp.path());
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = Arc::new(TrainStateStore::new(network, clock.clone()));
    let paths = output_paths(temp.path());

    let cancel = CancellationToken::new();
    let sink = spawn_state_sink(Arc::clone(&store), paths.clone(), cancel.clone());

    // Initial write creates the files with no trains
    wait_until(|| paths.json.exists() && paths.geojson.exists()).await;
    assert_eq!(read_json(&paths.json)["trains"], serde_json::json!({}));

    store.upsert("demo", &RawFix::new(0.0015, 0.0, 36.0)).unwrap();
    wait_until(|| read_json(&paths.json)["trains"].get("demo").is_some()).await;

    clock.advance(chrono::Duration::seconds(601));
    store.evict(store.now(), Duration::from_secs(600));
    wait_until(|| read_json(&paths.json)["trains"].get("demo").is_none()).await;

    let geojson = read_json(&paths.geojson);
    assert_eq!(geojson["features"].as_array().unwrap().len(), 0);

    cancel.cancel();
    sink.await.unwrap();
}
