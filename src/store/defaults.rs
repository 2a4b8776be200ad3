//! Shipped default configuration document for first-run population.

use crate::models::{ParamKind, ParameterDescriptor};
use crate::store::document::{Document, IndicatorNode, InstanceNode};

fn param(name: &str, kind: ParamKind, value: &str) -> ParameterDescriptor {
    ParameterDescriptor::new(name, kind, value)
}

fn instance(id: u32, description: &str, params: Vec<ParameterDescriptor>) -> InstanceNode {
    InstanceNode {
        id,
        description: Some(description.to_string()),
        params,
    }
}

/// The default document: two EMA overlays, an SMA overlay, and RSI, MACD
/// and volume sub-panes.
pub fn default_document() -> Document {
    Document {
        indicators: vec![
            IndicatorNode {
                type_id: "EMAIndicator".to_string(),
                category: Some("trend".to_string()),
                instances: vec![
                    instance(
                        1,
                        "fast exponential average",
                        vec![
                            param("Time Frame", ParamKind::Integer, "20"),
                            param("Color", ParamKind::Color, "#1f77b4"),
                            param("Stroke", ParamKind::Stroke, "solid"),
                            param("Placement", ParamKind::ChartPlacement, "overlay"),
                        ],
                    ),
                    instance(
                        2,
                        "slow exponential average",
                        vec![
                            param("Time Frame", ParamKind::Integer, "60"),
                            param("Color", ParamKind::Color, "#ff7f0e"),
                            param("Stroke", ParamKind::Stroke, "dashed"),
                            param("Placement", ParamKind::ChartPlacement, "overlay"),
                        ],
                    ),
                ],
            },
            IndicatorNode {
                type_id: "SMAIndicator".to_string(),
                category: Some("trend".to_string()),
                instances: vec![instance(
                    1,
                    "simple average",
                    vec![
                        param("Time Frame", ParamKind::Integer, "50"),
                        param("Color", ParamKind::Color, "#2ca02c"),
                        param("Placement", ParamKind::ChartPlacement, "overlay"),
                    ],
                )],
            },
            IndicatorNode {
                type_id: "RSIIndicator".to_string(),
                category: Some("momentum".to_string()),
                instances: vec![instance(
                    1,
                    "relative strength",
                    vec![
                        param("Time Frame", ParamKind::Integer, "14"),
                        param("Color", ParamKind::Color, "#9467bd"),
                        param("Placement", ParamKind::ChartPlacement, "subpane"),
                    ],
                )],
            },
            IndicatorNode {
                type_id: "MACDIndicator".to_string(),
                category: Some("momentum".to_string()),
                instances: vec![instance(
                    1,
                    "moving average convergence divergence",
                    vec![
                        param("Fast Frame", ParamKind::Integer, "12"),
                        param("Slow Frame", ParamKind::Integer, "26"),
                        param("Signal Frame", ParamKind::Integer, "9"),
                        param("Color", ParamKind::Color, "#d62728"),
                        param("Placement", ParamKind::ChartPlacement, "subpane"),
                    ],
                )],
            },
            IndicatorNode {
                type_id: "VolumeBars".to_string(),
                category: Some("volume".to_string()),
                instances: vec![instance(
                    1,
                    "traded volume",
                    vec![
                        param("Color", ParamKind::Color, "#7f7f7f"),
                        param("Placement", ParamKind::ChartPlacement, "subpane"),
                    ],
                )],
            },
        ],
    }
}
