//! Indicator build and configuration errors.

use crate::models::IndicatorKey;
use crate::store::StoreError;
use thiserror::Error;

/// Errors raised while resolving or building one indicator.
///
/// All variants are recoverable at the indicator granularity: the affected
/// indicator is not built, the rest of the chart proceeds.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// No constructor registered for the type identifier
    #[error("unknown indicator type: {0}")]
    UnknownType(String),

    /// A descriptor's raw text failed to decode for its declared kind
    #[error("invalid value {raw:?} for parameter {name:?}")]
    InvalidParameterValue { name: String, raw: String },

    /// A constructor required a parameter the instance does not carry
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// Key absent from the document and from the runtime backup
    #[error("indicator not configured: {0}")]
    NotConfigured(IndicatorKey),

    #[error(transparent)]
    Store(#[from] StoreError),
}
