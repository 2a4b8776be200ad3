//! Market data acquisition seam.
//!
//! Acquisition runs on a worker task and hands its result back onto the
//! single-threaded composition loop through a channel; the loop is the
//! only caller of `set_time_series`. Chart state is never mutated from
//! the worker directly.

use crate::models::{BarSeries, Candle};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// Source of bar series for a symbol
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch_series(&self, symbol: &str, limit: usize) -> Result<BarSeries, FeedError>;
}

/// Deterministic synthetic bars for demos and tests
pub struct SyntheticProvider {
    pub base_price: f64,
}

impl SyntheticProvider {
    pub fn new(base_price: f64) -> Self {
        Self { base_price }
    }
}

#[async_trait]
impl MarketDataProvider for SyntheticProvider {
    async fn fetch_series(&self, symbol: &str, limit: usize) -> Result<BarSeries, FeedError> {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| FeedError::Unavailable("bad epoch".to_string()))?;
        let candles = (0..limit)
            .map(|i| {
                let drift = i as f64 * 0.25;
                let wave = (i as f64 / 8.0).sin() * 2.0;
                let close = self.base_price + drift + wave;
                Candle::new(
                    close - 0.4,
                    close + 0.6,
                    close - 0.8,
                    close,
                    1_000.0 + (i as f64 * 3.0),
                    start + Duration::minutes(i as i64),
                )
            })
            .collect();
        Ok(BarSeries::new(symbol, candles))
    }
}

/// Spawn a one-shot fetch on a worker task; the returned receiver is
/// drained on the composition loop.
pub fn spawn_feed(
    provider: Arc<dyn MarketDataProvider>,
    symbol: String,
    limit: usize,
) -> UnboundedReceiver<BarSeries> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        match provider.fetch_series(&symbol, limit).await {
            Ok(series) => {
                info!(symbol = %symbol, bars = series.len(), "series fetched");
                if tx.send(series).is_err() {
                    warn!(symbol = %symbol, "feed consumer dropped before hand-off");
                }
            }
            Err(err) => warn!(symbol = %symbol, reason = %err, "series fetch failed"),
        }
    });
    rx
}
