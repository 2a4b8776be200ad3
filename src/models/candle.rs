//! OHLCV bars and the read-only time-series collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}

/// Ordered sequence of bars with monotonically non-decreasing timestamps.
///
/// Supplied by external data acquisition; the engine only ever reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: String,
    pub candles: Vec<Candle>,
}

impl BarSeries {
    /// Timestamp ordering is the supplier's contract, checked in debug builds only.
    pub fn new(symbol: impl Into<String>, candles: Vec<Candle>) -> Self {
        debug_assert!(
            candles.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
            "bar timestamps must be non-decreasing"
        );
        Self {
            symbol: symbol.into(),
            candles,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Close prices in bar order
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// Volumes in bar order
    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    /// First and last timestamp, `None` for an empty series
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.candles.first(), self.candles.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }

    /// Index of the bar at or immediately before `time`, `None` when `time`
    /// falls outside the series domain.
    pub fn index_at(&self, time: DateTime<Utc>) -> Option<usize> {
        let (first, last) = self.time_range()?;
        if time < first || time > last {
            return None;
        }
        match self
            .candles
            .binary_search_by(|c| c.timestamp.cmp(&time))
        {
            Ok(i) => Some(i),
            Err(i) => Some(i - 1),
        }
    }
}
