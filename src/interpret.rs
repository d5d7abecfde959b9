//! Interpreter output
//!
//! The natural-language interpreter is an external collaborator. Its output
//! arrives here as a fixed record; this module parses it, checks its shape,
//! and flags boundary hints that name inputs the request never declared.

use crate::error::{Error, Result};
use crate::model::{InputField, Rule};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Field name -> advisory boundary hint
pub type BoundaryHints = IndexMap<String, BoundaryHint>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum InterpretationStatus {
    Ok,
    /// The requirement is too ambiguous to test; nothing is generated
    Blocked,
}

impl std::fmt::Display for InterpretationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpretationStatus::Ok => write!(f, "OK"),
            InterpretationStatus::Blocked => write!(f, "BLOCKED"),
        }
    }
}

/// Advisory bounds for one field. Only its presence affects selection.
///
/// Parsing never fails: a bare number or a list becomes critical points,
/// numeric strings are read as numbers, and anything else is dropped with
/// a warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(from = "serde_json::Value")]
pub struct BoundaryHint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critical_points: Vec<f64>,
}

impl From<serde_json::Value> for BoundaryHint {
    fn from(raw: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match &raw {
            Json::Object(entries) => {
                let mut hint = BoundaryHint::default();
                for (key, value) in entries {
                    match key.as_str() {
                        "min" => hint.min = hint_number(key, value),
                        "max" => hint.max = hint_number(key, value),
                        "critical_points" => hint.critical_points = hint_points(value),
                        _ => tracing::warn!(key = %key, "ignoring unknown boundary hint key"),
                    }
                }
                hint
            }
            Json::Array(_) | Json::Number(_) => BoundaryHint {
                critical_points: hint_points(&raw),
                ..Default::default()
            },
            Json::Null => BoundaryHint::default(),
            other => {
                tracing::warn!(hint = %other, "unreadable boundary hint, keeping it empty");
                BoundaryHint::default()
            }
        }
    }
}

fn as_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn hint_number(key: &str, value: &serde_json::Value) -> Option<f64> {
    let number = as_number(value);
    if number.is_none() && !value.is_null() {
        tracing::warn!(key = %key, value = %value, "dropping non-numeric boundary hint");
    }
    number
}

fn hint_points(value: &serde_json::Value) -> Vec<f64> {
    let items = match value {
        serde_json::Value::Array(items) => items.as_slice(),
        serde_json::Value::Null => return Vec::new(),
        single => std::slice::from_ref(single),
    };
    items
        .iter()
        .filter_map(|item| hint_number("critical_points", item))
        .collect()
}

/// Structured interpretation of one requirement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Interpretation {
    pub requirement_id: String,
    pub interpretation_status: InterpretationStatus,
    /// Restated requirement text
    pub interpreted_requirement: String,
    pub rules: Vec<Rule>,
    pub constraints: Vec<String>,
    pub boundary_values: BoundaryHints,
    pub assumptions: Vec<String>,
    pub ambiguities: Vec<String>,
}

impl Interpretation {
    /// Parse from YAML. Missing fields reject the whole record.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::Interpretation(e.to_string()))
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Interpretation(e.to_string()))
    }

    pub fn is_blocked(&self) -> bool {
        self.interpretation_status == InterpretationStatus::Blocked
    }

    /// Structural checks beyond what deserialization enforces
    pub fn validate(&self) -> Result<()> {
        if self.requirement_id.trim().is_empty() {
            return Err(Error::Interpretation("requirement_id is empty".into()));
        }

        match self.interpretation_status {
            InterpretationStatus::Blocked if self.ambiguities.is_empty() => {
                return Err(Error::Interpretation(
                    "Status is BLOCKED but no ambiguities listed".into(),
                ));
            }
            InterpretationStatus::Ok if self.rules.is_empty() => {
                return Err(Error::Interpretation(
                    "Status is OK but no rules extracted".into(),
                ));
            }
            _ => {}
        }

        let mut seen = HashSet::new();
        for (idx, rule) in self.rules.iter().enumerate() {
            if rule.rule_id.trim().is_empty() {
                return Err(Error::Interpretation(format!("Rule {} has an empty rule_id", idx)));
            }
            if !seen.insert(rule.rule_id.as_str()) {
                return Err(Error::Interpretation(format!(
                    "Duplicate rule_id: {}",
                    rule.rule_id
                )));
            }
        }

        Ok(())
    }

    /// Boundary hint keys that name no declared input, in hint order
    pub fn check_references(&self, inputs: &[InputField]) -> Vec<String> {
        let known: HashSet<&str> = inputs.iter().map(|f| f.name.as_str()).collect();
        self.boundary_values
            .keys()
            .filter(|name| !known.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Record unknown hint references as an assumption instead of failing
    pub fn annotate_unknown_references(&mut self, inputs: &[InputField]) {
        let unknown = self.check_references(inputs);
        if unknown.is_empty() {
            return;
        }
        for name in &unknown {
            tracing::warn!(field = %name, "boundary hint references unknown input");
        }
        let warning = unknown
            .iter()
            .map(|name| format!("Boundary value references unknown input: {}", name))
            .collect::<Vec<_>>()
            .join("; ");
        self.assumptions.push(format!("WARNING: {}", warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

    const OK_YAML: &str = r#"
requirement_id: REQ-1
interpretation_status: OK
interpreted_requirement: "Alarm when speed exceeds 200"
rules:
  - rule_id: R1
    condition: "speed > 200"
    expected_behavior: "overspeed_alarm is raised"
constraints: []
boundary_values:
  speed: { min: 0, max: 300, critical_points: [200] }
  rpm: { max: 9000 }
assumptions: []
ambiguities: []
"#;

    #[test]
    fn test_parse_and_validate() {
        let interp = Interpretation::from_yaml(OK_YAML).unwrap();
        interp.validate().unwrap();
        assert!(!interp.is_blocked());
        assert_eq!(interp.boundary_values["speed"].critical_points, vec![200.0]);
    }

    #[test]
    fn test_malformed_hints_are_tolerated() {
        let yaml = OK_YAML.replace(
            "  speed: { min: 0, max: 300, critical_points: [200] }\n  rpm: { max: 9000 }",
            "  speed: { min: \"0\", max: unbounded, critical_points: [\"200 km/h\", 250] }\n  rpm: [0, 9000]\n  mode: sometimes",
        );
        let interp = Interpretation::from_yaml(&yaml).unwrap();

        let speed = &interp.boundary_values["speed"];
        assert_eq!(speed.min, Some(0.0));
        assert_eq!(speed.max, None);
        assert_eq!(speed.critical_points, vec![250.0]);
        assert_eq!(interp.boundary_values["rpm"].critical_points, vec![0.0, 9000.0]);
        assert_eq!(interp.boundary_values["mode"], BoundaryHint::default());
        assert_eq!(interp.boundary_values.len(), 3);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = Interpretation::from_json(r#"{"requirement_id": "R", "rules": []}"#).unwrap_err();
        assert!(matches!(err, Error::Interpretation(_)));
    }

    #[test]
    fn test_status_rules() {
        let mut interp = Interpretation::from_yaml(OK_YAML).unwrap();
        interp.rules.clear();
        assert!(interp.validate().unwrap_err().to_string().contains("no rules"));

        interp.interpretation_status = InterpretationStatus::Blocked;
        assert!(interp.validate().unwrap_err().to_string().contains("no ambiguities"));

        interp.ambiguities.push("which speed unit?".into());
        interp.validate().unwrap();
    }

    #[test]
    fn test_duplicate_rule_ids() {
        let mut interp = Interpretation::from_yaml(OK_YAML).unwrap();
        interp.rules.push(interp.rules[0].clone());
        assert!(interp.validate().unwrap_err().to_string().contains("Duplicate rule_id"));
    }

    #[test]
    fn test_unknown_references_become_assumption() {
        let mut interp = Interpretation::from_yaml(OK_YAML).unwrap();
        let inputs = vec![InputField::new("speed", FieldType::Integer)];
        assert_eq!(interp.check_references(&inputs), vec!["rpm".to_string()]);

        interp.annotate_unknown_references(&inputs);
        assert_eq!(
            interp.assumptions,
            vec!["WARNING: Boundary value references unknown input: rpm".to_string()]
        );
    }
}
