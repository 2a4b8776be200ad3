//! Name-dispatched indicator constructor table.
//!
//! Adding an indicator type is a data-level change: register another
//! constructor function under its type identifier. Constructors are pure
//! and deterministic; they read already-decoded parameters and never
//! touch the configuration document.

use crate::indicators::builders;
use crate::indicators::chart_indicator::{ChartIndicator, IndicatorSeries, RendererKind};
use crate::indicators::error::IndicatorError;
use crate::models::{BarSeries, Category, IndicatorKey, ResolvedParams};
use std::collections::HashMap;

/// What a constructor produces; the registry attaches key and category
#[derive(Debug, Clone)]
pub struct IndicatorBody {
    pub subpane: bool,
    pub renderer: RendererKind,
    pub series: Vec<IndicatorSeries>,
}

/// Pure constructor: `(bar series, resolved parameters) -> body`
pub type BuilderFn = fn(&BarSeries, &ResolvedParams) -> Result<IndicatorBody, IndicatorError>;

/// Registry mapping stable type identifiers to constructor functions
pub struct IndicatorRegistry {
    builders: HashMap<String, BuilderFn>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Registry pre-loaded with the built-in indicator types
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("EMAIndicator", builders::build_ema);
        registry.register("SMAIndicator", builders::build_sma);
        registry.register("RSIIndicator", builders::build_rsi);
        registry.register("MACDIndicator", builders::build_macd);
        registry.register("BollingerBands", builders::build_bollinger);
        registry.register("VolumeBars", builders::build_volume);
        registry
    }

    pub fn register(&mut self, type_id: impl Into<String>, builder: BuilderFn) {
        self.builders.insert(type_id.into(), builder);
    }

    pub fn is_registered(&self, type_id: &str) -> bool {
        self.builders.contains_key(type_id)
    }

    pub fn registered_types(&self) -> Vec<&str> {
        self.builders.keys().map(String::as_str).collect()
    }

    /// Dispatch to the constructor for `key.type_id` and wrap the result
    /// into a [`ChartIndicator`].
    pub fn build(
        &self,
        key: IndicatorKey,
        category: Category,
        series: &BarSeries,
        params: &ResolvedParams,
    ) -> Result<ChartIndicator, IndicatorError> {
        let builder = self
            .builders
            .get(&key.type_id)
            .ok_or_else(|| IndicatorError::UnknownType(key.type_id.clone()))?;
        let body = builder(series, params)?;
        Ok(ChartIndicator {
            key,
            subpane: body.subpane,
            category,
            renderer: body.renderer,
            series: body.series,
        })
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
