//! Condition combinations for MC/DC-style coverage
//!
//! The fields a rule depends on are found lexically (see
//! [`RuleText::referenced_fields`]). Up to `full_table_limit` fields get the
//! full truth table; beyond that each field is flipped false once against
//! the all-true row. This is a reduction, not a masking-pair MC/DC proof.

use crate::model::{FieldType, InputField, Value};
use crate::range::infer_range;
use crate::text::{CompareOp, RuleText};
use crate::values::{increment, nominal_value, numeric_value};
use indexmap::IndexMap;

/// Hard ceiling on full truth tables regardless of configuration
const MAX_FULL_TABLE: usize = 16;

/// One row: field name -> whether its sub-condition holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub assignment: IndexMap<String, bool>,
    pub description: String,
}

impl Combination {
    pub fn all_true(&self) -> bool {
        self.assignment.values().all(|v| *v)
    }
}

/// Enumerate combinations over the referenced fields
///
/// Full table rows start at all-true and count down to all-false, with the
/// first field as the most significant bit.
pub fn condition_combinations(
    relevant: &[&InputField],
    full_table_limit: usize,
) -> Vec<Combination> {
    if relevant.is_empty() {
        return Vec::new();
    }

    if relevant.len() > full_table_limit.min(MAX_FULL_TABLE) {
        return reduced_combinations(relevant);
    }

    let n = relevant.len();
    (0..1usize << n)
        .map(|row| {
            let assignment: IndexMap<String, bool> = relevant
                .iter()
                .enumerate()
                .map(|(i, f)| (f.name.clone(), row & (1 << (n - 1 - i)) == 0))
                .collect();
            let description = assignment
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            Combination {
                assignment,
                description,
            }
        })
        .collect()
}

fn reduced_combinations(relevant: &[&InputField]) -> Vec<Combination> {
    let all_true: IndexMap<String, bool> =
        relevant.iter().map(|f| (f.name.clone(), true)).collect();

    relevant
        .iter()
        .flat_map(|field| {
            let mut one_false = all_true.clone();
            one_false.insert(field.name.clone(), false);
            [
                Combination {
                    assignment: all_true.clone(),
                    description: "All conditions true".into(),
                },
                Combination {
                    assignment: one_false,
                    description: format!("{} false, others true", field.name),
                },
            ]
        })
        .collect()
}

/// Concrete value making a field's sub-condition true or false
///
/// Uses a `field <op> literal` comparison from the condition when one is
/// present; otherwise falls back to per-type choices (nominal vs minimum,
/// first vs last allowed value, nominal vs empty string).
pub fn condition_value(field: &InputField, holds: bool, text: &RuleText) -> Value {
    if field.data_type == FieldType::Boolean {
        return Value::Bool(holds);
    }

    if let Some(values) = field.allowed() {
        let pick = if holds {
            &values[0]
        } else {
            &values[values.len() - 1]
        };
        return Value::String(pick.clone());
    }

    if field.data_type == FieldType::String {
        return if holds {
            nominal_value(field)
        } else {
            Value::String(String::new())
        };
    }

    if let Some(cmp) = text.comparison_for(&field.name) {
        let inc = increment(field);
        let t = cmp.threshold;
        let x = match (cmp.op, holds) {
            (CompareOp::Gt, true) | (CompareOp::Le, false) | (CompareOp::Eq, false) => t + inc,
            (CompareOp::Lt, true) | (CompareOp::Ge, false) => t - inc,
            (CompareOp::Ge, true)
            | (CompareOp::Le, true)
            | (CompareOp::Eq, true)
            | (CompareOp::Gt, false)
            | (CompareOp::Lt, false) => t,
        };
        return numeric_value(field, x);
    }

    if holds {
        nominal_value(field)
    } else {
        numeric_value(field, infer_range(field).min)
    }
}
