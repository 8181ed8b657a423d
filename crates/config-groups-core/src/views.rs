// crates/config-groups-core/src/views.rs
// ============================================================================
// Module: Config Groups Views
// Description: Serializable response shapes for groups, instances, and rules.
// Purpose: Give every outer surface one stable JSON representation.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! Views are read-only projections of core types. Parameter values render as
//! plain JSON scalars and rule bounds render as string-encoded integers, the
//! same shape rule documents use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::core::ConfigurationGroup;
use crate::core::GroupId;
use crate::core::InstanceId;
use crate::core::InstanceRef;
use crate::core::ParameterRule;
use crate::core::RuleKind;
use crate::core::RuleTable;

// ============================================================================
// SECTION: Group Views
// ============================================================================

/// Summary line for a group listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationSummaryView {
    /// Group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

impl From<&ConfigurationGroup> for ConfigurationSummaryView {
    fn from(group: &ConfigurationGroup) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            description: group.description.clone(),
        }
    }
}

/// Full group representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailedConfigurationView {
    /// Group identifier.
    pub id: GroupId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Parameter overrides as JSON scalars.
    pub values: BTreeMap<String, Value>,
    /// Instances using the group.
    pub instances: Vec<InstanceRef>,
}

impl From<&ConfigurationGroup> for DetailedConfigurationView {
    fn from(group: &ConfigurationGroup) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            description: group.description.clone(),
            values: group.items.iter().map(|(key, value)| (key.clone(), value.to_json())).collect(),
            instances: group.instances.clone(),
        }
    }
}

/// Instances attached to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstancesView {
    /// Group identifier.
    pub id: GroupId,
    /// Attached instances.
    pub instances: Vec<InstanceRef>,
}

impl From<&ConfigurationGroup> for InstancesView {
    fn from(group: &ConfigurationGroup) -> Self {
        Self {
            id: group.id.clone(),
            instances: group.instances.clone(),
        }
    }
}

// ============================================================================
// SECTION: Rule Views
// ============================================================================

/// One parameter rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterView {
    /// Parameter name.
    pub name: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub value_type: &'static str,
    /// Dynamic flag.
    pub dynamic: bool,
    /// Minimum bound (integer rules only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    /// Maximum bound (integer rules only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

impl From<&ParameterRule> for ParameterView {
    fn from(rule: &ParameterRule) -> Self {
        let (min, max) = match rule.kind {
            RuleKind::Integer {
                min,
                max,
            } => (Some(min.to_string()), Some(max.to_string())),
            RuleKind::Boolean | RuleKind::String => (None, None),
        };
        Self {
            name: rule.name.clone(),
            value_type: rule.kind.value_kind().as_str(),
            dynamic: rule.dynamic,
            min,
            max,
        }
    }
}

/// All parameter rules in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParametersView {
    /// Rules in declaration order.
    #[serde(rename = "configuration-parameters")]
    pub parameters: Vec<ParameterView>,
}

impl From<&RuleTable> for ParametersView {
    fn from(rules: &RuleTable) -> Self {
        Self {
            parameters: rules.rules().iter().map(ParameterView::from).collect(),
        }
    }
}

// ============================================================================
// SECTION: Default Configuration View
// ============================================================================

/// Rendered engine defaults for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultConfigurationView {
    /// Instance identifier.
    pub instance_id: InstanceId,
    /// Engine type the template was chosen for.
    pub service_type: String,
    /// Flavor identifier.
    pub flavor_id: String,
    /// Ordered key/value pairs; value-less keys render as null.
    pub configuration: Vec<(String, Option<String>)>,
}
