//! Candidate values for a single input field
//!
//! Three generators, all pure functions of the field definition:
//! - [`bva_values`]: boundary values around the inferred range (numeric only)
//! - [`ep_values`]: one representative per equivalence class
//! - [`negative_values`]: null and wrong-type inputs
//!
//! Each candidate is tagged VALID or INVALID and carries a short rationale.

use crate::model::{FieldType, InputField, Validity, Value};
use crate::range::infer_range;

/// Out-of-set sentinel for discrete fields
pub const NOT_IN_SET: &str = "INVALID_VALUE";

/// Wrong-type value offered to numeric fields
pub const NOT_A_NUMBER: &str = "NOT_A_NUMBER";

/// Wrong-type value offered to string fields
pub const WRONG_TYPE_NUMBER: i64 = 12345;

/// Distance of the EP out-of-range partitions from the bounds
const EP_OFFSET: f64 = 10.0;

/// Longest string ever materialized; longer requested lengths are capped
pub const MAX_STRING_LEN: usize = 65_536;

/// One generated value for one field
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub value: Value,
    pub description: String,
    pub validity: Validity,
}

impl Candidate {
    fn valid(value: Value, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
            validity: Validity::Valid,
        }
    }

    fn invalid(value: Value, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
            validity: Validity::Invalid,
        }
    }
}

/// Step used for "just inside/outside" boundary points
pub fn increment(field: &InputField) -> f64 {
    if field.data_type.is_integer() {
        1.0
    } else {
        0.1
    }
}

/// Round away float noise (`0.1 + 0.2`) so values print cleanly
pub(crate) fn tidy(x: f64) -> f64 {
    const SCALE: f64 = 1e9;
    let scaled = x * SCALE;
    if !scaled.is_finite() {
        return x;
    }
    let rounded = scaled.round() / SCALE;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Concrete numeric value for a field: truncated for integers
pub fn numeric_value(field: &InputField, x: f64) -> Value {
    if field.data_type.is_integer() {
        Value::Int(x.trunc() as i64)
    } else {
        Value::Float(tidy(x))
    }
}

/// String length for a requested (possibly fractional or huge) length
fn clamp_length(len: f64) -> usize {
    if len.is_finite() && len > 0.0 {
        (len.trunc() as usize).min(MAX_STRING_LEN)
    } else {
        0
    }
}

/// A string of `len` characters, capped at [`MAX_STRING_LEN`]
pub fn string_of_length(len: f64) -> Value {
    Value::String("x".repeat(clamp_length(len)))
}

/// Description suffix noting a length that was capped
fn length_note(len: f64) -> String {
    if len.is_finite() && len > MAX_STRING_LEN as f64 {
        format!(" (length {} capped at {})", len.trunc(), MAX_STRING_LEN)
    } else {
        String::new()
    }
}

/// Representative in-range value used to fill non-target fields
pub fn nominal_value(field: &InputField) -> Value {
    if let Some(values) = field.allowed() {
        return Value::String(values[0].clone());
    }
    match field.data_type {
        FieldType::Boolean => Value::Bool(true),
        FieldType::String => string_of_length(infer_range(field).midpoint()),
        FieldType::Integer | FieldType::Float | FieldType::Enumeration => {
            numeric_value(field, infer_range(field).midpoint())
        }
    }
}

/// Boundary value analysis
///
/// Emits min, min+inc, nominal, max-inc, max (VALID) and min-inc, max+inc
/// (INVALID). The inner points are skipped when they would cross the
/// opposite bound. Non-numeric fields yield nothing.
pub fn bva_values(field: &InputField) -> Vec<Candidate> {
    if !field.data_type.is_numeric() {
        return Vec::new();
    }

    let range = infer_range(field);
    let (min, max) = range.bounds();
    let inc = increment(field);
    let mut values = Vec::with_capacity(7);

    values.push(Candidate::valid(numeric_value(field, min), "Minimum boundary"));

    if min + inc <= max {
        values.push(Candidate::valid(
            numeric_value(field, min + inc),
            "Just above minimum",
        ));
    }

    values.push(Candidate::valid(
        numeric_value(field, range.midpoint()),
        "Nominal value",
    ));

    if max - inc >= min {
        values.push(Candidate::valid(
            numeric_value(field, max - inc),
            "Just below maximum",
        ));
    }

    values.push(Candidate::valid(numeric_value(field, max), "Maximum boundary"));
    values.push(Candidate::invalid(
        numeric_value(field, min - inc),
        "Below minimum (invalid)",
    ));
    values.push(Candidate::invalid(
        numeric_value(field, max + inc),
        "Above maximum (invalid)",
    ));

    values
}

/// Equivalence partitioning
///
/// Discrete fields get one VALID candidate per allowed value plus an
/// out-of-set sentinel. Numeric fields get the range midpoint plus one
/// candidate `EP_OFFSET` outside each bound.
///
/// Two types deliberately leave the range-based scheme:
/// - booleans have no range, so they are partitioned as `{true, false}`
///   plus a non-boolean sentinel;
/// - strings partition by length, and the "too short" class is omitted
///   when `min - EP_OFFSET` would be a negative length.
///
/// String lengths above [`MAX_STRING_LEN`] are capped and the cap is noted
/// in the description.
pub fn ep_values(field: &InputField) -> Vec<Candidate> {
    if let Some(allowed) = field.allowed() {
        let mut values: Vec<Candidate> = allowed
            .iter()
            .map(|v| Candidate::valid(Value::String(v.clone()), format!("Valid partition: {}", v)))
            .collect();
        values.push(Candidate::invalid(
            Value::String(NOT_IN_SET.into()),
            "Invalid partition (not in allowed values)",
        ));
        return values;
    }

    let range = infer_range(field);
    let (min, max) = range.bounds();

    match field.data_type {
        FieldType::Boolean => vec![
            Candidate::valid(Value::Bool(true), "Valid partition: true"),
            Candidate::valid(Value::Bool(false), "Valid partition: false"),
            Candidate::invalid(
                Value::String(NOT_IN_SET.into()),
                "Invalid partition (not a boolean)",
            ),
        ],
        FieldType::String => {
            let mid = range.midpoint();
            let mut values = vec![Candidate::valid(
                string_of_length(mid),
                format!("Valid partition (length {}){}", mid.trunc(), length_note(mid)),
            )];
            // A negative length has no string to represent it
            if min - EP_OFFSET >= 0.0 {
                values.push(Candidate::invalid(
                    string_of_length(min - EP_OFFSET),
                    "Invalid partition (too short)",
                ));
            }
            let long = max + EP_OFFSET;
            values.push(Candidate::invalid(
                string_of_length(long),
                format!("Invalid partition (too long){}", length_note(long)),
            ));
            values
        }
        FieldType::Integer | FieldType::Float | FieldType::Enumeration => vec![
            Candidate::valid(
                numeric_value(field, range.midpoint()),
                "Valid partition (within range)",
            ),
            Candidate::invalid(
                numeric_value(field, min - EP_OFFSET),
                "Invalid partition (below range)",
            ),
            Candidate::invalid(
                numeric_value(field, max + EP_OFFSET),
                "Invalid partition (above range)",
            ),
        ],
    }
}

/// Negative testing: null, wrong type, empty string
pub fn negative_values(field: &InputField) -> Vec<Candidate> {
    let mut values = vec![Candidate::invalid(Value::Null, "Null/None input")];

    match field.data_type {
        FieldType::Integer | FieldType::Float => {
            values.push(Candidate::invalid(
                Value::String(NOT_A_NUMBER.into()),
                "Wrong type (string instead of number)",
            ));
        }
        FieldType::String => {
            values.push(Candidate::invalid(
                Value::Int(WRONG_TYPE_NUMBER),
                "Wrong type (number instead of string)",
            ));
            values.push(Candidate::invalid(Value::String(String::new()), "Empty string"));
        }
        FieldType::Boolean | FieldType::Enumeration => {}
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn count(values: &[Candidate], validity: Validity) -> usize {
        values.iter().filter(|c| c.validity == validity).count()
    }

    #[test]
    fn test_bva_integer_full_set() {
        let field = InputField::new("speed", FieldType::Integer).with_range(0.0, 300.0);
        let values: Vec<Value> = bva_values(&field).into_iter().map(|c| c.value).collect();
        assert_eq!(
            values,
            vec![
                Value::Int(0),
                Value::Int(1),
                Value::Int(150),
                Value::Int(299),
                Value::Int(300),
                Value::Int(-1),
                Value::Int(301),
            ]
        );
    }

    #[test]
    fn test_bva_float_increment() {
        let field = InputField::new("ratio", FieldType::Float).with_range(0.0, 1.0);
        let values = bva_values(&field);
        assert_eq!(values[1].value, Value::Float(0.1));
        assert_eq!(values[3].value, Value::Float(0.9));
        assert_eq!(values[5].value, Value::Float(-0.1));
        assert_eq!(values[6].value, Value::Float(1.1));
        assert_eq!(count(&values, Validity::Valid), 5);
        assert_eq!(count(&values, Validity::Invalid), 2);
    }

    #[test]
    fn test_bva_narrow_range_drops_inner_points() {
        let field = InputField::new("flag", FieldType::Integer).with_range(5.0, 5.0);
        let values = bva_values(&field);
        assert_eq!(count(&values, Validity::Valid), 3);
        assert_eq!(count(&values, Validity::Invalid), 2);
    }

    #[test]
    fn test_bva_non_numeric_is_empty() {
        assert!(bva_values(&InputField::new("email", FieldType::String)).is_empty());
        assert!(bva_values(&InputField::new("on", FieldType::Boolean)).is_empty());
    }

    #[test]
    fn test_bva_nominal_truncates_toward_zero() {
        let field = InputField::new("t", FieldType::Integer).with_range(-5.0, 0.0);
        let nominal = &bva_values(&field)[2];
        assert_eq!(nominal.description, "Nominal value");
        assert_eq!(nominal.value, Value::Int(-2));
    }

    #[test]
    fn test_ep_allowed_values() {
        let field = InputField::new("mode", FieldType::Enumeration).with_values(["A", "B"]);
        let values = ep_values(&field);
        assert_eq!(values.len(), 3);
        assert_eq!(values[0].value, Value::String("A".into()));
        assert_eq!(values[2].value, Value::String(NOT_IN_SET.into()));
        assert_eq!(values[2].validity, Validity::Invalid);
    }

    #[test]
    fn test_ep_numeric_range() {
        let field = InputField::new("age", FieldType::Integer);
        let values: Vec<Value> = ep_values(&field).into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec![Value::Int(60), Value::Int(-10), Value::Int(130)]);
    }

    #[test]
    fn test_ep_string_uses_lengths() {
        let field = InputField::new("phone", FieldType::String);
        let values = ep_values(&field);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].value, Value::String("x".repeat(10)));
        assert_eq!(values[1].value, Value::String("x".repeat(30)));
        assert_eq!(values[1].validity, Validity::Invalid);
    }

    #[test]
    fn test_huge_string_range_is_capped() {
        let field = InputField::new("payload", FieldType::String).with_range(0.0, 1e12);
        assert_eq!(nominal_value(&field), Value::String("x".repeat(MAX_STRING_LEN)));

        let values = ep_values(&field);
        assert_eq!(values.len(), 2);
        for candidate in &values {
            match &candidate.value {
                Value::String(s) => assert_eq!(s.len(), MAX_STRING_LEN),
                other => panic!("expected a string, got {:?}", other),
            }
        }
        assert_eq!(
            values[1].description,
            format!("Invalid partition (too long) (length 1000000000010 capped at {})", MAX_STRING_LEN)
        );
        assert_eq!(values[1].validity, Validity::Invalid);
    }

    #[test]
    fn test_keyword_length_is_not_capped() {
        let values = ep_values(&InputField::new("url", FieldType::String));
        assert_eq!(values.last().unwrap().description, "Invalid partition (too long)");
        assert_eq!(values.last().unwrap().value, Value::String("x".repeat(2058)));
    }

    #[test]
    fn test_tidy_keeps_huge_floats_finite() {
        assert_eq!(tidy(1e300), 1e300);
        assert_eq!(tidy(0.1 + 0.2), 0.3);
    }

    #[test]
    fn test_ep_boolean_partitions() {
        let values = ep_values(&InputField::new("armed", FieldType::Boolean));
        assert_eq!(count(&values, Validity::Valid), 2);
        assert_eq!(count(&values, Validity::Invalid), 1);
    }

    #[test]
    fn test_negative_values_by_type() {
        let numeric = negative_values(&InputField::new("n", FieldType::Float));
        assert_eq!(numeric.len(), 2);
        assert_eq!(numeric[1].value, Value::String(NOT_A_NUMBER.into()));

        let string = negative_values(&InputField::new("s", FieldType::String));
        assert_eq!(string.len(), 3);
        assert_eq!(string[1].value, Value::Int(WRONG_TYPE_NUMBER));
        assert_eq!(string[2].value, Value::String(String::new()));

        let boolean = negative_values(&InputField::new("b", FieldType::Boolean));
        assert_eq!(boolean, vec![Candidate::invalid(Value::Null, "Null/None input")]);

        assert!(numeric
            .iter()
            .chain(&string)
            .all(|c| c.validity == Validity::Invalid));
    }

    #[test]
    fn test_nominal_values() {
        assert_eq!(
            nominal_value(&InputField::new("altitude", FieldType::Integer)),
            Value::Int(50000)
        );
        assert_eq!(
            nominal_value(&InputField::new("on", FieldType::Boolean)),
            Value::Bool(true)
        );
        assert_eq!(
            nominal_value(&InputField::new("m", FieldType::String).with_values(["X", "Y"])),
            Value::String("X".into())
        );
        assert_eq!(
            nominal_value(&InputField::new("code", FieldType::String)),
            Value::String("x".repeat(25))
        );
    }
}
