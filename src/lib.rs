//! Dynamic chart composition engine for financial time series.
//!
//! The crate couples a persistent indicator configuration document to a
//! live multi-pane chart layout: parameters are edited and persisted by
//! [`store::ParameterStore`], turned into typed [`indicators::ChartIndicator`]
//! values by the [`indicators::IndicatorRegistry`] factory, tracked as an
//! observable keyed collection by [`chart::IndicatorBox`], and projected
//! into a pane layout by [`chart::ChartComposer`] with a synchronized
//! crosshair readout from [`chart::CrosshairSync`].

pub mod chart;
pub mod config;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;
