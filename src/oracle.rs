//! Expected-output oracle
//!
//! Turns a rule plus a concrete input assignment into an expected output
//! mapping, without further human input. Invalid inputs are always
//! `{status: REJECTED}`. Valid inputs go through an ordered list of
//! [`Scorer`]s; the first scorer that produces a value for *any* output
//! wins and the mapping holds just that output:
//!
//! 1. [`DiscreteScorer`]: outputs with a set of possible values
//! 2. [`BooleanScorer`]: boolean outputs, via a comparison in the rule text
//! 3. [`ArithmeticScorer`]: numeric outputs, via sum/product/difference/mean
//!
//! When none applies, [`common_sense`] fills every output independently.
//! The oracle is heuristic; it never claims semantic correctness.

use crate::model::{FieldType, InputField, OutputField, Rule, Value, ValueMap};
use crate::range::infer_range;
use crate::text::{Relation, RuleText};
use crate::values::tidy;
use thiserror::Error;

pub const STATUS_KEY: &str = "status";
pub const ACCEPTED: &str = "ACCEPTED";
pub const REJECTED: &str = "REJECTED";

/// Substrings marking an enumerated value as the "success" outcome
const SUCCESS_WORDS: [&str; 5] = ["accept", "success", "ok", "valid", "pass"];

/// Substrings marking a boolean output as an alarm-like flag
const ALARM_WORDS: [&str; 5] = ["alarm", "warning", "alert", "error", "flag"];

/// Internal oracle failure; callers replace it with a fixed fallback
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("non-finite result for output '{output}'")]
    NonFinite { output: String },

    #[error("result {value} for output '{output}' does not fit an integer")]
    IntegerOverflow { output: String, value: f64 },
}

/// Everything a scorer may look at for one test
pub struct OracleContext<'a> {
    pub rule: &'a Rule,
    pub text: RuleText,
    pub inputs: &'a ValueMap,
    pub fields: &'a [InputField],
}

impl<'a> OracleContext<'a> {
    pub fn new(rule: &'a Rule, inputs: &'a ValueMap, fields: &'a [InputField]) -> Self {
        Self {
            rule,
            text: RuleText::new(rule),
            inputs,
            fields,
        }
    }

    /// Declared fields paired with their numeric concrete value, in declared order
    fn numeric_inputs(&self) -> impl Iterator<Item = (&'a InputField, f64)> + '_ {
        self.fields.iter().filter_map(move |f| {
            self.inputs
                .get(&f.name)
                .and_then(Value::as_f64)
                .map(|v| (f, v))
        })
    }
}

/// One tier of the oracle
pub trait Scorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Value for `output`, `None` when this tier has nothing to say
    fn try_compute(
        &self,
        ctx: &OracleContext<'_>,
        output: &OutputField,
    ) -> Result<Option<Value>, OracleError>;
}

/// Tier 1: threshold cue selects an enumerated value mentioned in the rule
pub struct DiscreteScorer;

impl Scorer for DiscreteScorer {
    fn name(&self) -> &'static str {
        "discrete"
    }

    fn try_compute(
        &self,
        ctx: &OracleContext<'_>,
        output: &OutputField,
    ) -> Result<Option<Value>, OracleError> {
        let Some(possible) = output.possible() else {
            return Ok(None);
        };

        if let (Some(threshold), Some(relation)) = (ctx.text.first_number(), ctx.text.relation()) {
            for (_, value) in ctx.numeric_inputs() {
                let holds = match relation {
                    Relation::Greater => value > threshold,
                    Relation::Less => value < threshold,
                };
                if !holds {
                    continue;
                }
                if let Some(hit) = possible.iter().find(|pv| ctx.text.mentions(pv)) {
                    return Ok(Some(Value::String(hit.clone())));
                }
            }
        }

        Ok(Some(Value::String(success_like(possible).clone())))
    }
}

/// Tier 2: evaluate the rule's comparison on a field named in the rule
pub struct BooleanScorer;

impl Scorer for BooleanScorer {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn try_compute(
        &self,
        ctx: &OracleContext<'_>,
        output: &OutputField,
    ) -> Result<Option<Value>, OracleError> {
        if output.data_type != FieldType::Boolean {
            return Ok(None);
        }

        if let Some(cmp) = ctx.text.comparison() {
            if let Some((_, value)) = ctx
                .numeric_inputs()
                .find(|(f, _)| ctx.text.names_field(&f.name))
            {
                return Ok(Some(Value::Bool(cmp.holds(value))));
            }
        }

        Ok(Some(Value::Bool(!is_alarm_like(&output.name))))
    }
}

/// Tier 3: arithmetic over all numeric inputs
pub struct ArithmeticScorer;

impl Scorer for ArithmeticScorer {
    fn name(&self) -> &'static str {
        "arithmetic"
    }

    fn try_compute(
        &self,
        ctx: &OracleContext<'_>,
        output: &OutputField,
    ) -> Result<Option<Value>, OracleError> {
        if !output.data_type.is_numeric() {
            return Ok(None);
        }
        let Some(op) = ctx.text.arithmetic() else {
            return Ok(None);
        };

        let operands: Vec<f64> = ctx.numeric_inputs().map(|(_, v)| v).collect();
        let Some(result) = op.apply(&operands) else {
            return Ok(None);
        };

        numeric_output(output, result).map(Some)
    }
}

/// Expected-output oracle with an ordered scorer chain
pub struct Oracle {
    scorers: Vec<Box<dyn Scorer>>,
}

impl Default for Oracle {
    fn default() -> Self {
        Self::with_scorers(vec![
            Box::new(DiscreteScorer),
            Box::new(BooleanScorer),
            Box::new(ArithmeticScorer),
        ])
    }
}

impl Oracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scorers(scorers: Vec<Box<dyn Scorer>>) -> Self {
        Self { scorers }
    }

    /// Expected output for one concrete assignment
    pub fn compute(
        &self,
        rule: &Rule,
        inputs: &ValueMap,
        fields: &[InputField],
        outputs: &[OutputField],
        is_valid_input: bool,
    ) -> Result<ValueMap, OracleError> {
        if !is_valid_input {
            return Ok(status(REJECTED));
        }

        let ctx = OracleContext::new(rule, inputs, fields);

        for scorer in &self.scorers {
            for output in outputs {
                if let Some(value) = scorer.try_compute(&ctx, output)? {
                    tracing::trace!(
                        rule = %rule.rule_id,
                        scorer = scorer.name(),
                        output = %output.name,
                        "oracle tier produced a value"
                    );
                    let mut mapping = ValueMap::new();
                    mapping.insert(output.name.clone(), value);
                    return Ok(mapping);
                }
            }
        }

        Ok(common_sense(&ctx, outputs))
    }
}

/// `{status: <value>}`
pub fn status(value: &str) -> ValueMap {
    let mut mapping = ValueMap::new();
    mapping.insert(STATUS_KEY.into(), Value::String(value.into()));
    mapping
}

/// Tier 4: per-output defaults when no scorer produced anything
pub fn common_sense(ctx: &OracleContext<'_>, outputs: &[OutputField]) -> ValueMap {
    if outputs.is_empty() {
        return status(ACCEPTED);
    }

    let violation = ctx
        .numeric_inputs()
        .any(|(field, value)| !infer_range(field).contains(value));

    outputs
        .iter()
        .map(|output| {
            let name = output.name.to_lowercase();
            let value = if name.contains("status") {
                match output.possible() {
                    Some(values) => Value::String(success_like(values).clone()),
                    None => Value::String(ACCEPTED.into()),
                }
            } else if name.contains("result") {
                match (output.possible(), output.data_type) {
                    (Some(values), _) => Value::String(values[0].clone()),
                    (None, FieldType::Boolean) => Value::Bool(true),
                    (None, FieldType::Integer) => Value::Int(1),
                    (None, FieldType::Float) => Value::Float(1.0),
                    (None, _) => Value::String("SUCCESS".into()),
                }
            } else if output.data_type == FieldType::Boolean {
                Value::Bool(if is_alarm_like(&name) {
                    violation
                } else {
                    !violation
                })
            } else if output.data_type == FieldType::Integer {
                Value::Int(0)
            } else if output.data_type == FieldType::Float {
                Value::Float(0.0)
            } else if let Some(values) = output.possible() {
                Value::String(values[0].clone())
            } else {
                Value::String("OK".into())
            };
            (output.name.clone(), value)
        })
        .collect()
}

/// First value that reads like success, else the first value
fn success_like(values: &[String]) -> &String {
    values
        .iter()
        .find(|v| {
            let lower = v.to_lowercase();
            SUCCESS_WORDS.iter().any(|w| lower.contains(w))
        })
        .unwrap_or(&values[0])
}

fn is_alarm_like(name: &str) -> bool {
    let lower = name.to_lowercase();
    ALARM_WORDS.iter().any(|w| lower.contains(w))
}

fn numeric_output(output: &OutputField, x: f64) -> Result<Value, OracleError> {
    if !x.is_finite() {
        return Err(OracleError::NonFinite {
            output: output.name.clone(),
        });
    }
    if output.data_type.is_integer() {
        let truncated = x.trunc();
        if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
            return Err(OracleError::IntegerOverflow {
                output: output.name.clone(),
                value: x,
            });
        }
        Ok(Value::Int(truncated as i64))
    } else {
        Ok(Value::Float(tidy(x)))
    }
}
