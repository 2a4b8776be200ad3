//! The derived, rebuildable chart indicator value object.

use crate::models::{Category, IndicatorKey, MarkerShape, SeriesColor, StrokeStyle};

/// How a composer should render an indicator's datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    Line,
    MultiLine,
    Bars,
}

/// One named numeric sub-series with its style
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub name: String,
    /// One sample per bar of the series the indicator was built from;
    /// leading unfilled values are NaN, never omitted.
    pub samples: Vec<f64>,
    pub color: SeriesColor,
    pub shape: MarkerShape,
    pub stroke: StrokeStyle,
}

/// Immutable-once-built indicator value.
///
/// Not persisted: it is a cache produced from an instance configuration
/// plus the current bar series, and is replaced wholesale on any
/// parameter or series change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartIndicator {
    pub key: IndicatorKey,
    /// `true`: own stacked plot area; `false`: overlay on the price pane
    pub subpane: bool,
    pub category: Category,
    pub renderer: RendererKind,
    pub series: Vec<IndicatorSeries>,
}

impl ChartIndicator {
    pub fn series_names(&self) -> Vec<String> {
        self.series.iter().map(|s| s.name.clone()).collect()
    }
}
