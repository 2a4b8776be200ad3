//! Crosshair readout synchronized across panes.

use crate::chart::axis::ChartArea;
use crate::chart::composer::ChartComposer;
use crate::models::BarSeries;
use chrono::{DateTime, Utc};

/// Value readout for one pointer position
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    /// Timestamp of the bar the pointer snapped to
    pub time: DateTime<Utc>,
    pub bar_index: usize,
    /// Close of the main pane's primary dataset at that bar
    pub value: f64,
}

/// Computes value readouts for pointer positions.
///
/// The X readout goes through the axis of pane index 0; the Y readout
/// comes from the main pane's primary dataset only, so sub-panes never
/// influence it. Stateless apart from a one-entry cache keyed on the
/// composer revision, the chart area and the pointer, which makes the
/// readout correct immediately after any layout change or resize.
#[derive(Debug, Default)]
pub struct CrosshairSync {
    cached: Option<(u64, ChartArea, (f64, f64), Readout)>,
}

impl CrosshairSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Readout for `pointer` in chart-area coordinates.
    ///
    /// Out-of-domain positions yield `None`, never extrapolated or stale
    /// data. Works with a price-only main pane: the primary dataset is
    /// the bar series itself, independent of any indicator slots.
    pub fn readout(
        &mut self,
        composer: &ChartComposer,
        series: &BarSeries,
        area: &ChartArea,
        pointer: (f64, f64),
    ) -> Option<Readout> {
        let revision = composer.revision();
        if let Some((rev, cached_area, at, readout)) = &self.cached {
            if *rev == revision && *cached_area == *area && *at == pointer {
                return Some(readout.clone());
            }
        }
        let time = match composer.time_axis().borrow().to_domain(pointer.0, area) {
            Some(time) => time,
            None => {
                self.cached = None;
                return None;
            }
        };
        let Some(bar_index) = series.index_at(time) else {
            self.cached = None;
            return None;
        };
        let bar = &series.candles[bar_index];
        let readout = Readout {
            time: bar.timestamp,
            bar_index,
            value: bar.close,
        };
        self.cached = Some((revision, *area, pointer, readout.clone()));
        Some(readout)
    }
}
