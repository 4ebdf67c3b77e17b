
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mock_source::{ScriptedSource, asks, fetch_error, stars};
use tokio::sync::watch;
use watcher::{
    config::CollectionConfig, error::RefreshError, history::HISTORY_LEN, presence::LogPresence,
    refresh::RefreshTask, state::WatchState,
};

fn alpha() -> CollectionConfig {
    CollectionConfig::new("alpha")
        .with_refresh_interval(60)
        .with_trait_query(true)
}

fn task_for(cfg: CollectionConfig, source: Arc<ScriptedSource>) -> (RefreshTask, WatchState) {
    let state = WatchState::new(std::slice::from_ref(&cfg));
    let task = RefreshTask::new(cfg, source, Arc::new(LogPresence), state.clone());
    (task, state)
}

#[tokio::test]
async fn alpha_scenario_success_failure_success() {
    let first = asks(&[("background", "blue", vec![100])]);
    let third = asks(&[("background", "blue", vec![80]), ("background", "red", vec![120])]);

    let source = Arc::new(ScriptedSource::new().script(
        "alpha",
        vec![Ok(first.clone()), Err(fetch_error()), Ok(third.clone())],
    ));
    let (task, state) = task_for(alpha(), source.clone());

    // fetch #1
    let before = Utc::now();
    let outcome = task.run_iteration().await.unwrap();
    let after = Utc::now();

    assert_eq!(outcome.floor, stars(100));
    assert_eq!(
        state.floor_history("alpha").await.unwrap().values(),
        vec![stars(100), 0.0, 0.0, 0.0, 0.0]
    );
    assert_eq!(state.ask_snapshot("alpha").await, Some(first.clone()));
    let first_update = state.last_updated("alpha").await.unwrap();
    assert!(before <= first_update && first_update <= after);

    // fetch #2 fails: nothing moves
    let err = task.run_iteration().await.unwrap_err();
    assert!(matches!(err, RefreshError::Fetch(_)));
    assert_eq!(
        state.floor_history("alpha").await.unwrap().values(),
        vec![stars(100), 0.0, 0.0, 0.0, 0.0]
    );
    assert_eq!(state.ask_snapshot("alpha").await, Some(first));
    assert_eq!(state.last_updated("alpha").await, Some(first_update));

    // fetch #3
    let outcome = task.run_iteration().await.unwrap();
    assert_eq!(outcome.floor, stars(80));
    assert_eq!(
        state.floor_history("alpha").await.unwrap().values(),
        vec![stars(80), stars(100), 0.0, 0.0, 0.0]
    );
    assert_eq!(state.ask_snapshot("alpha").await, Some(third));
    assert!(state.last_updated("alpha").await.unwrap() >= first_update);

    // strict flag is forwarded to the source
    assert!(source.calls().iter().all(|c| c.strict));
}

#[tokio::test]
async fn history_holds_last_five_floors_newest_first() {
    let results = (1..=7u128)
        .map(|i| Ok(asks(&[("eyes", "laser", vec![i * 1_000_000])])))
        .collect();
    let source = Arc::new(ScriptedSource::new().script("alpha", results));
    let (task, state) = task_for(alpha(), source);

    for n in 1..=7u128 {
        task.refresh_once().await.unwrap();

        let values = state.floor_history("alpha").await.unwrap().values();
        assert_eq!(values.len(), HISTORY_LEN);

        let kept = (n as usize).min(HISTORY_LEN);
        let expected: Vec<f64> = (0..HISTORY_LEN)
            .map(|i| if i < kept { (n - i as u128) as f64 } else { 0.0 })
            .collect();
        assert_eq!(values, expected);
    }
}

#[tokio::test]
async fn no_listings_leaves_state_unchanged() {
    let source = Arc::new(ScriptedSource::new().script(
        "alpha",
        vec![
            Ok(asks(&[("background", "blue", vec![5_000_000])])),
            Ok(asks(&[("background", "blue", vec![])])),
        ],
    ));
    let (task, state) = task_for(alpha(), source);

    task.refresh_once().await.unwrap();
    let history = state.floor_history("alpha").await.unwrap();
    let snapshot = state.ask_snapshot("alpha").await;
    let updated = state.last_updated("alpha").await;

    let err = task.refresh_once().await.unwrap_err();

    assert_eq!(err.kind(), "no_listings");
    assert_eq!(state.floor_history("alpha").await.unwrap(), history);
    assert_eq!(state.ask_snapshot("alpha").await, snapshot);
    assert_eq!(state.last_updated("alpha").await, updated);
}

#[tokio::test]
async fn retention_disabled_never_stores_snapshot() {
    let cfg = CollectionConfig::new("beta").with_refresh_interval(60);
    let results = (0..8).map(|_| Ok(asks(&[("hat", "red", vec![42])]))).collect();
    let source = Arc::new(ScriptedSource::new().script("beta", results));
    let (task, state) = task_for(cfg, source);

    for _ in 0..8 {
        task.refresh_once().await.unwrap();
    }

    assert!(state.ask_snapshot("beta").await.is_none());
    assert!(state.ask_snapshots().await.is_empty());
    assert_eq!(state.floor_history("beta").await.unwrap().latest(), stars(42));
}

#[tokio::test(start_paused = true)]
async fn loop_sleeps_interval_and_survives_errors() {
    let source = Arc::new(ScriptedSource::new().script(
        "alpha",
        vec![
            Err(fetch_error()),
            Ok(asks(&[("background", "blue", vec![100])])),
            Err(fetch_error()),
            Ok(asks(&[("background", "blue", vec![90])])),
        ],
    ));
    let (task, state) = task_for(alpha(), source.clone());
    let (tx, rx) = watch::channel(false);

    let start = tokio::time::Instant::now();
    let handle = tokio::spawn(task.run(rx));

    // passes at t = 0, 60, 120, 180
    tokio::time::sleep(Duration::from_secs(200)).await;

    let offsets: Vec<u64> = source
        .calls()
        .iter()
        .map(|c| (c.at - start).as_secs())
        .collect();
    assert_eq!(offsets, vec![0, 60, 120, 180]);

    assert_eq!(
        state.floor_history("alpha").await.unwrap().values(),
        vec![stars(90), stars(100), 0.0, 0.0, 0.0]
    );

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop did not stop on shutdown")
        .unwrap();

    assert_eq!(source.calls().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn dropped_shutdown_sender_stops_loop() {
    let source = Arc::new(ScriptedSource::new());
    let (task, _state) = task_for(alpha(), source.clone());
    let (tx, rx) = watch::channel(false);

    let handle = tokio::spawn(task.run(rx));
    tokio::time::sleep(Duration::from_secs(1)).await;
    drop(tx);

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("loop did not stop after sender dropped")
        .unwrap();
    assert_eq!(source.calls().len(), 1);
}
