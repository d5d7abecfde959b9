//! Data model: fields, rules, values and generated test cases
//!
//! Input and output signatures arrive from the caller, rules arrive from the
//! interpreter. Everything here is immutable once received; the pipeline only
//! ever derives new records from it.
//!
//! ## Example request
//!
//! ```yaml
//! requirement_id: REQ-001
//! requirement_text: "Raise the overspeed alarm when speed exceeds 200"
//! inputs:
//!   - name: speed
//!     data_type: integer
//!     unit: km/h
//! outputs:
//!   - name: overspeed_alarm
//!     data_type: boolean
//! ```

use crate::error::{Error, Result};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ordered field name -> value mapping used for test inputs and expected outputs
pub type ValueMap = IndexMap<String, Value>;

/// Rule id -> selected techniques, in rule order
pub type StrategyMap = IndexMap<String, Vec<Technique>>;

/// Declared type of an input or output field
///
/// Parsing ignores case and accepts the common aliases (`int`, `double`,
/// `text`, `bool`, `enum`, ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FieldType {
    Integer,
    Float,
    String,
    Boolean,
    Enumeration,
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(FieldType::Integer),
            "float" | "double" | "decimal" | "number" => Ok(FieldType::Float),
            "string" | "str" | "text" => Ok(FieldType::String),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            "enumeration" | "enum" => Ok(FieldType::Enumeration),
            other => Err(format!("unknown data type: {}", other)),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl FieldType {
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float)
    }

    pub fn is_integer(self) -> bool {
        self == FieldType::Integer
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::String => write!(f, "string"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Enumeration => write!(f, "enumeration"),
        }
    }
}

/// An input signature field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct InputField {
    /// Field name (unique within a requirement)
    pub name: String,

    /// Declared type
    #[serde(alias = "type")]
    pub data_type: FieldType,

    /// Unit of measure, used as a range hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Explicit lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_min: Option<f64>,

    /// Explicit upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_max: Option<f64>,

    /// Ordered set of allowed discrete values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InputField {
    /// Shorthand constructor with no range, unit or value set
    pub fn new(name: impl Into<String>, data_type: FieldType) -> Self {
        Self {
            name: name.into(),
            data_type,
            unit: None,
            range_min: None,
            range_max: None,
            allowed_values: None,
            description: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range_min = Some(min);
        self.range_max = Some(max);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_values<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Both bounds, when both were supplied
    pub fn explicit_range(&self) -> Option<(f64, f64)> {
        Some((self.range_min?, self.range_max?))
    }

    /// Allowed values, treating an empty list as absent
    pub fn allowed(&self) -> Option<&[String]> {
        self.allowed_values.as_deref().filter(|v| !v.is_empty())
    }
}

/// An output signature field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct OutputField {
    pub name: String,

    #[serde(alias = "type")]
    pub data_type: FieldType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered set of possible discrete values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<String>>,
}

impl OutputField {
    pub fn new(name: impl Into<String>, data_type: FieldType) -> Self {
        Self {
            name: name.into(),
            data_type,
            unit: None,
            description: None,
            possible_values: None,
        }
    }

    pub fn with_values<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.possible_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Possible values, treating an empty list as absent
    pub fn possible(&self) -> Option<&[String]> {
        self.possible_values.as_deref().filter(|v| !v.is_empty())
    }
}

/// A rule produced by the interpreter
///
/// Condition and behavior are free text; they are only ever scanned
/// lexically (see [`crate::text::RuleText`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Rule {
    #[serde(alias = "id")]
    pub rule_id: String,
    pub condition: String,
    pub expected_behavior: String,
}

impl Rule {
    pub fn new(
        rule_id: impl Into<String>,
        condition: impl Into<String>,
        expected_behavior: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            condition: condition.into(),
            expected_behavior: expected_behavior.into(),
        }
    }
}

/// A concrete test value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Numeric view; booleans and strings are not numbers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" so floats stay distinguishable from ints
            Value::Float(fl) => write!(f, "{:?}", fl),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

/// Whether a test exercises valid or invalid input
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Validity {
    Valid,
    Invalid,
}

impl Validity {
    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }
}

impl std::fmt::Display for Validity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Validity::Valid => write!(f, "VALID"),
            Validity::Invalid => write!(f, "INVALID"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

/// Test design technique
///
/// Variant order is the canonical order techniques are applied in.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
pub enum Technique {
    #[serde(rename = "BVA")]
    Bva,
    #[serde(rename = "EP")]
    Ep,
    #[serde(rename = "MCDC")]
    Mcdc,
    #[serde(rename = "STATE")]
    State,
    #[serde(rename = "NEGATIVE")]
    Negative,
}

impl Technique {
    pub const ALL: [Technique; 5] = [
        Technique::Bva,
        Technique::Ep,
        Technique::Mcdc,
        Technique::State,
        Technique::Negative,
    ];

    /// Human-readable label used in reports
    pub fn label(self) -> &'static str {
        match self {
            Technique::Bva => "Boundary Value Analysis",
            Technique::Ep => "Equivalence Partitioning",
            Technique::Mcdc => "MC/DC",
            Technique::State => "State Transition",
            Technique::Negative => "Negative Testing",
        }
    }

    /// Short prefix used in scenario strings
    pub fn short(self) -> &'static str {
        match self {
            Technique::Bva => "BVA",
            Technique::Ep => "EP",
            Technique::Mcdc => "MC/DC",
            Technique::State => "STATE",
            Technique::Negative => "Negative",
        }
    }

    /// Code used in strategy maps (`BVA`, `MCDC`, ...)
    pub fn code(self) -> &'static str {
        match self {
            Technique::Bva => "BVA",
            Technique::Ep => "EP",
            Technique::Mcdc => "MCDC",
            Technique::State => "STATE",
            Technique::Negative => "NEGATIVE",
        }
    }

    /// Accepts either the report label or the code
    pub fn from_label(text: &str) -> Option<Self> {
        Technique::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(text) || t.code() == text)
    }
}

/// `test_type` is written as the human-readable label
mod technique_label {
    use super::Technique;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(technique: &Technique, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(technique.label())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Technique, D::Error> {
        let text = String::deserialize(d)?;
        Technique::from_label(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown test type: {}", text)))
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Requirement and rule a test case traces back to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Traceability {
    pub requirement: String,
    pub rule: String,
}

/// A generated test case
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TestCase {
    pub tc_id: String,
    pub rule_id: String,
    #[serde(rename = "test_type", with = "technique_label")]
    #[schemars(with = "String")]
    pub technique: Technique,
    pub scenario: String,
    /// Every declared input, in declaration order
    pub inputs: ValueMap,
    pub expected_output: ValueMap,
    pub priority: Priority,
    pub validity: Validity,
    pub traceability: Traceability,
}

/// Caller-supplied request: the requirement and its typed signature
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct GenerationRequest {
    pub requirement_id: String,
    #[serde(default)]
    pub requirement_text: String,
    #[serde(default)]
    pub inputs: Vec<InputField>,
    #[serde(default)]
    pub outputs: Vec<OutputField>,
}

impl GenerationRequest {
    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::RequestParse(e.to_string()))
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::RequestParse(e.to_string()))
    }

    /// Check the signature itself: names present and unique
    pub fn validate(&self) -> Result<()> {
        if self.requirement_id.trim().is_empty() {
            return Err(Error::RequestParse("requirement_id is required".into()));
        }

        let mut seen = std::collections::HashSet::new();
        for input in &self.inputs {
            if input.name.trim().is_empty() {
                return Err(Error::RequestParse("input with empty name".into()));
            }
            if !seen.insert(input.name.as_str()) {
                return Err(Error::RequestParse(format!(
                    "Duplicate input name: {}",
                    input.name
                )));
            }
        }

        for output in &self.outputs {
            if output.name.trim().is_empty() {
                return Err(Error::RequestParse("output with empty name".into()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_yaml() {
        let yaml = r#"
requirement_id: REQ-7
requirement_text: "Alarm above 200"
inputs:
  - name: speed
    type: int
    range_min: 0
    range_max: 300
  - name: mode
    data_type: enum
    allowed_values: [INIT, ACTIVE]
outputs:
  - name: alarm
    data_type: bool
"#;
        let req = GenerationRequest::from_yaml(yaml).unwrap();
        assert_eq!(req.requirement_id, "REQ-7");
        assert_eq!(req.inputs[0].data_type, FieldType::Integer);
        assert_eq!(req.inputs[0].explicit_range(), Some((0.0, 300.0)));
        assert_eq!(req.inputs[1].data_type, FieldType::Enumeration);
        assert_eq!(req.outputs[0].data_type, FieldType::Boolean);
    }

    #[test]
    fn test_type_aliases() {
        for (text, expected) in [
            ("\"double\"", FieldType::Float),
            ("\"number\"", FieldType::Float),
            ("\"text\"", FieldType::String),
            ("\"boolean\"", FieldType::Boolean),
            ("\"integer\"", FieldType::Integer),
            ("\"Integer\"", FieldType::Integer),
            ("\"INT\"", FieldType::Integer),
            ("\"Enum\"", FieldType::Enumeration),
        ] {
            let parsed: FieldType = serde_json::from_str(text).unwrap();
            assert_eq!(parsed, expected, "{}", text);
        }
        assert!(serde_json::from_str::<FieldType>("\"date\"").is_err());
        assert_eq!(serde_json::to_string(&FieldType::Float).unwrap(), "\"float\"");
    }

    #[test]
    fn test_value_untagged_roundtrip_shapes() {
        let parsed: Vec<Value> = serde_json::from_str(r#"[null, true, 3, 2.5, "x"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(3),
                Value::Float(2.5),
                Value::String("x".into()),
            ]
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Float(50.0).to_string(), "50.0");
        assert_eq!(Value::Float(0.1).to_string(), "0.1");
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_technique_order_and_serde() {
        let mut t = vec![Technique::Negative, Technique::Bva, Technique::State];
        t.sort();
        assert_eq!(t, vec![Technique::Bva, Technique::State, Technique::Negative]);
        assert_eq!(serde_json::to_string(&Technique::Mcdc).unwrap(), "\"MCDC\"");
        assert_eq!(Technique::from_label("MC/DC"), Some(Technique::Mcdc));
        assert_eq!(Technique::from_label("NEGATIVE"), Some(Technique::Negative));
        assert_eq!(Technique::from_label("fuzzing"), None);
    }

    #[test]
    fn test_request_validate_duplicate_inputs() {
        let req = GenerationRequest {
            requirement_id: "R".into(),
            requirement_text: String::new(),
            inputs: vec![
                InputField::new("a", FieldType::Integer),
                InputField::new("a", FieldType::Float),
            ],
            outputs: vec![],
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate input name"));
    }
}
