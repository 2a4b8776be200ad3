pub mod candle;
pub mod key;
pub mod params;
pub mod style;

pub use candle::{BarSeries, Candle};
pub use key::IndicatorKey;
pub use params::{
    Category, ChartPlacement, ParamKind, ParamValue, ParameterDescriptor, ResolvedParams,
};
pub use style::{MarkerShape, SeriesColor, StrokeStyle};
