pub mod builders;
pub mod chart_indicator;
pub mod error;
pub mod registry;

pub use chart_indicator::{ChartIndicator, IndicatorSeries, RendererKind};
pub use error::IndicatorError;
pub use registry::{BuilderFn, IndicatorBody, IndicatorRegistry};
