//! Identity of one configured indicator instance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one configured instance of an indicator type.
///
/// Equality and hashing cover both fields; two keys with the same type
/// but different instance ids are distinct entities, which is what makes
/// duplication work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorKey {
    /// Stable indicator-type identifier, e.g. `EMAIndicator`
    pub type_id: String,
    /// Instance id, unique within one type
    pub instance_id: u32,
}

impl IndicatorKey {
    pub fn new(type_id: impl Into<String>, instance_id: u32) -> Self {
        Self {
            type_id: type_id.into(),
            instance_id,
        }
    }
}

impl fmt::Display for IndicatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_id, self.instance_id)
    }
}
