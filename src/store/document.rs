//! Serde schema of the indicator configuration document.
//!
//! The on-disk form is a tree of indicator nodes, each carrying a type
//! identifier, a category attribute and its instance nodes. `Vec`s keep
//! document order for enumeration and reproducible layouts.

use crate::models::{IndicatorKey, ParameterDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub indicators: Vec<IndicatorNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorNode {
    #[serde(rename = "type")]
    pub type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub instances: Vec<InstanceNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceNode {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Vec<ParameterDescriptor>,
}

impl Document {
    pub fn indicator(&self, type_id: &str) -> Option<&IndicatorNode> {
        self.indicators.iter().find(|n| n.type_id == type_id)
    }

    pub fn indicator_mut(&mut self, type_id: &str) -> Option<&mut IndicatorNode> {
        self.indicators.iter_mut().find(|n| n.type_id == type_id)
    }

    pub fn instance(&self, key: &IndicatorKey) -> Option<&InstanceNode> {
        self.indicator(&key.type_id)?
            .instances
            .iter()
            .find(|i| i.id == key.instance_id)
    }

    pub fn instance_mut(&mut self, key: &IndicatorKey) -> Option<&mut InstanceNode> {
        self.indicator_mut(&key.type_id)?
            .instances
            .iter_mut()
            .find(|i| i.id == key.instance_id)
    }

    /// Every `(type, id)` pair present, in document order
    pub fn all_keys(&self) -> Vec<IndicatorKey> {
        self.indicators
            .iter()
            .flat_map(|node| {
                node.instances
                    .iter()
                    .map(|i| IndicatorKey::new(node.type_id.clone(), i.id))
            })
            .collect()
    }
}

impl InstanceNode {
    pub fn param(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn param_mut(&mut self, name: &str) -> Option<&mut ParameterDescriptor> {
        self.params.iter_mut().find(|p| p.name == name)
    }
}
