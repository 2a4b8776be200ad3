//! Parameter descriptors and typed decoding.
//!
//! Parameter values are always stored as text in the configuration
//! document and lazily decoded to their typed form by kind. Decoding is
//! total for a well-formed document; a malformed value is a
//! configuration error surfaced as [`IndicatorError::InvalidParameterValue`],
//! never a panic.

use crate::indicators::IndicatorError;
use crate::models::style::{MarkerShape, SeriesColor, StrokeStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where an indicator is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartPlacement {
    /// Drawn on the main price pane, sharing its value axis
    Overlay,
    /// Drawn in its own stacked plot area, sharing only the time axis
    Subpane,
}

/// Indicator category tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Trend,
    Momentum,
    Volatility,
    Volume,
    Default,
    Other(String),
}

impl Category {
    /// Case-insensitive parse; unrecognized names are preserved as `Other`
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "trend" => Self::Trend,
            "momentum" => Self::Momentum,
            "volatility" => Self::Volatility,
            "volume" => Self::Volume,
            "default" | "" => Self::Default,
            _ => Self::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trend => write!(f, "trend"),
            Self::Momentum => write!(f, "momentum"),
            Self::Volatility => write!(f, "volatility"),
            Self::Volume => write!(f, "volume"),
            Self::Default => write!(f, "default"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Declared kind of a parameter, driving how its raw text is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Color,
    Shape,
    Stroke,
    Integer,
    Double,
    Boolean,
    String,
    ChartPlacement,
    Category,
}

/// One named parameter as persisted in the document: raw text plus kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub kind: ParamKind,
    pub value: String,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, kind: ParamKind, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
        }
    }

    /// Decode the raw text per the declared kind
    pub fn decode(&self) -> Result<ParamValue, IndicatorError> {
        let invalid = || IndicatorError::InvalidParameterValue {
            name: self.name.clone(),
            raw: self.value.clone(),
        };
        let raw = self.value.trim();
        match self.kind {
            ParamKind::Color => SeriesColor::parse(raw)
                .map(ParamValue::Color)
                .ok_or_else(invalid),
            ParamKind::Shape => MarkerShape::parse(raw)
                .map(ParamValue::Shape)
                .ok_or_else(invalid),
            ParamKind::Stroke => StrokeStyle::parse(raw)
                .map(ParamValue::Stroke)
                .ok_or_else(invalid),
            ParamKind::Integer => raw
                .parse::<i64>()
                .map(ParamValue::Integer)
                .map_err(|_| invalid()),
            ParamKind::Double => raw
                .parse::<f64>()
                .map(ParamValue::Double)
                .map_err(|_| invalid()),
            ParamKind::Boolean => match raw {
                "true" => Ok(ParamValue::Boolean(true)),
                "false" => Ok(ParamValue::Boolean(false)),
                _ => Err(invalid()),
            },
            ParamKind::String => Ok(ParamValue::String(self.value.clone())),
            ParamKind::ChartPlacement => match raw {
                "overlay" => Ok(ParamValue::Placement(ChartPlacement::Overlay)),
                "subpane" => Ok(ParamValue::Placement(ChartPlacement::Subpane)),
                _ => Err(invalid()),
            },
            ParamKind::Category => Ok(ParamValue::Category(Category::parse(raw))),
        }
    }
}

/// Decoded, typed form of a parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Color(SeriesColor),
    Shape(MarkerShape),
    Stroke(StrokeStyle),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    Placement(ChartPlacement),
    Category(Category),
}

/// The decoded parameter map handed to indicator constructors.
///
/// Constructors read these through the typed getters and never touch the
/// configuration document themselves.
#[derive(Debug, Clone, Default)]
pub struct ResolvedParams {
    values: BTreeMap<String, ParamValue>,
}

impl ResolvedParams {
    /// Decode every descriptor; the first malformed value fails the whole
    /// resolution so the indicator is not built from partial parameters.
    pub fn decode(
        descriptors: &BTreeMap<String, ParameterDescriptor>,
    ) -> Result<Self, IndicatorError> {
        let mut values = BTreeMap::new();
        for (name, descriptor) in descriptors {
            values.insert(name.clone(), descriptor.decode()?);
        }
        Ok(Self { values })
    }

    pub fn from_values(values: BTreeMap<String, ParamValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn integer(&self, name: &str) -> Result<i64, IndicatorError> {
        match self.values.get(name) {
            Some(ParamValue::Integer(v)) => Ok(*v),
            Some(other) => Err(self.kind_mismatch(name, other)),
            None => Err(IndicatorError::MissingParameter(name.to_string())),
        }
    }

    pub fn double(&self, name: &str) -> Result<f64, IndicatorError> {
        match self.values.get(name) {
            Some(ParamValue::Double(v)) => Ok(*v),
            Some(ParamValue::Integer(v)) => Ok(*v as f64),
            Some(other) => Err(self.kind_mismatch(name, other)),
            None => Err(IndicatorError::MissingParameter(name.to_string())),
        }
    }

    pub fn boolean_or(&self, name: &str, default: bool) -> Result<bool, IndicatorError> {
        match self.values.get(name) {
            Some(ParamValue::Boolean(v)) => Ok(*v),
            Some(other) => Err(self.kind_mismatch(name, other)),
            None => Ok(default),
        }
    }

    pub fn color_or(&self, name: &str, default: SeriesColor) -> Result<SeriesColor, IndicatorError> {
        match self.values.get(name) {
            Some(ParamValue::Color(v)) => Ok(*v),
            Some(other) => Err(self.kind_mismatch(name, other)),
            None => Ok(default),
        }
    }

    pub fn shape_or(&self, name: &str, default: MarkerShape) -> Result<MarkerShape, IndicatorError> {
        match self.values.get(name) {
            Some(ParamValue::Shape(v)) => Ok(*v),
            Some(other) => Err(self.kind_mismatch(name, other)),
            None => Ok(default),
        }
    }

    pub fn stroke_or(&self, name: &str, default: StrokeStyle) -> Result<StrokeStyle, IndicatorError> {
        match self.values.get(name) {
            Some(ParamValue::Stroke(v)) => Ok(*v),
            Some(other) => Err(self.kind_mismatch(name, other)),
            None => Ok(default),
        }
    }

    pub fn placement_or(
        &self,
        name: &str,
        default: ChartPlacement,
    ) -> Result<ChartPlacement, IndicatorError> {
        match self.values.get(name) {
            Some(ParamValue::Placement(v)) => Ok(*v),
            Some(other) => Err(self.kind_mismatch(name, other)),
            None => Ok(default),
        }
    }

    fn kind_mismatch(&self, name: &str, value: &ParamValue) -> IndicatorError {
        IndicatorError::InvalidParameterValue {
            name: name.to_string(),
            raw: format!("{value:?}"),
        }
    }
}
