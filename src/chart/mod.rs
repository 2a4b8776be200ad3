//! Chart composition: active-indicator registry, pane layout, crosshair.

pub mod axis;
pub mod composer;
pub mod crosshair;
pub mod indicator_box;

pub use axis::{ChartArea, SharedTimeAxis, TimeAxis};
pub use composer::{AxisHost, ChartComposer, DatasetSlot, LayoutSnapshot, SubPane};
pub use crosshair::{CrosshairSync, Readout};
pub use indicator_box::{Diff, IndicatorBox};

use crate::indicators::{IndicatorError, IndicatorRegistry};
use crate::models::{BarSeries, IndicatorKey};
use crate::store::ParameterStore;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Composition root wiring box, composer and crosshair together.
///
/// Owns the diff channel between the indicator box and the composer and
/// pumps it on the single-threaded loop. UI adapters go through this
/// type; they never reach into the composer's pane list directly.
pub struct ChartSession {
    indicators: IndicatorBox,
    composer: ChartComposer,
    crosshair: CrosshairSync,
    diffs: UnboundedReceiver<Diff>,
}

impl ChartSession {
    pub fn new(store: Arc<ParameterStore>, registry: IndicatorRegistry, series: BarSeries) -> Self {
        let time_range = series.time_range();
        let mut indicators = IndicatorBox::new(store, registry, series);
        let diffs = indicators.subscribe();
        let mut composer = ChartComposer::new();
        composer.set_time_domain(time_range);
        Self {
            indicators,
            composer,
            crosshair: CrosshairSync::new(),
            diffs,
        }
    }

    /// The active-indicator collection; mutations queue diffs until the
    /// next [`pump`](Self::pump)
    pub fn indicators(&mut self) -> &mut IndicatorBox {
        &mut self.indicators
    }

    pub fn composer(&self) -> &ChartComposer {
        &self.composer
    }

    pub fn layout(&self) -> LayoutSnapshot {
        self.composer.layout()
    }

    /// Drain pending diffs into the composer
    pub fn pump(&mut self) {
        while let Ok(diff) = self.diffs.try_recv() {
            let indicators = &self.indicators;
            self.composer
                .apply(&diff, &|key| indicators.get(key).cloned());
        }
    }

    /// Replace the series, reload what survives, and recompose.
    ///
    /// This is the hand-off point for series produced on a worker: the
    /// caller receives the new series on the loop and passes it in here.
    pub fn set_time_series(&mut self, series: BarSeries) -> Vec<(IndicatorKey, IndicatorError)> {
        let time_range = series.time_range();
        let errors = self.indicators.set_time_series(series);
        self.composer.set_time_domain(time_range);
        self.pump();
        errors
    }

    /// Crosshair readout against the current layout and primary series
    pub fn readout(&mut self, area: &ChartArea, pointer: (f64, f64)) -> Option<Readout> {
        self.crosshair
            .readout(&self.composer, self.indicators.series(), area, pointer)
    }
}
