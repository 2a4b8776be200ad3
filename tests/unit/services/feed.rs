//! Unit tests for the data-feed worker seam

use std::sync::Arc;
use tickplot::services::{spawn_feed, MarketDataProvider, SyntheticProvider};

#[test]
fn test_synthetic_provider_is_deterministic() {
    let provider = SyntheticProvider::new(100.0);
    let a = tokio_test::block_on(provider.fetch_series("DEMO", 50)).unwrap();
    let b = tokio_test::block_on(provider.fetch_series("DEMO", 50)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 50);
    assert_eq!(a.symbol, "DEMO");
}

#[test]
fn test_synthetic_timestamps_are_non_decreasing() {
    let provider = SyntheticProvider::new(50.0);
    let series = tokio_test::block_on(provider.fetch_series("DEMO", 120)).unwrap();
    assert!(series
        .candles
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn test_spawned_feed_hands_series_back_on_channel() {
    let provider = Arc::new(SyntheticProvider::new(100.0));
    let mut rx = spawn_feed(provider, "DEMO".to_string(), 30);
    let series = rx.recv().await.expect("worker should deliver one series");
    assert_eq!(series.len(), 30);
}
