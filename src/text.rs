//! Lexical view of rule text
//!
//! Rule conditions and behaviors are free text. Nothing here parses them
//! into a grammar: `RuleText` lower-cases both strings once and answers
//! keyword, numeric-literal and operator questions by pattern matching.
//! The oracle, the strategy selector and the MC/DC generator all go through
//! this type, so a stricter parser can replace it without touching them.

use crate::model::{InputField, Rule};
use regex::Regex;
use std::sync::OnceLock;

static NUMBER: OnceLock<Regex> = OnceLock::new();

fn number_pattern() -> &'static Regex {
    NUMBER.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("numeric literal pattern"))
}

/// Coarse direction cue used for discrete outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Greater,
    Less,
}

/// Comparison operators, in detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Ge,
    Gt,
    Le,
    Lt,
    Eq,
}

impl CompareOp {
    /// Literal operators and synonym words for each operator
    const CUES: [(CompareOp, &'static [&'static str]); 5] = [
        (CompareOp::Ge, &[">=", "at least"]),
        (CompareOp::Gt, &[">", "greater", "exceed", "above"]),
        (CompareOp::Le, &["<=", "at most"]),
        (CompareOp::Lt, &["<", "less", "below"]),
        (CompareOp::Eq, &["==", "equal"]),
    ];

    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Eq => lhs == rhs,
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">=" => Some(CompareOp::Ge),
            ">" => Some(CompareOp::Gt),
            "<=" => Some(CompareOp::Le),
            "<" => Some(CompareOp::Lt),
            "==" | "=" => Some(CompareOp::Eq),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareOp::Ge => write!(f, ">="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Le => write!(f, "<="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Eq => write!(f, "=="),
        }
    }
}

/// An operator paired with a numeric threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub op: CompareOp,
    pub threshold: f64,
}

impl Comparison {
    pub fn holds(&self, value: f64) -> bool {
        self.op.holds(value, self.threshold)
    }
}

/// Arithmetic operation named in a behavior text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Sum,
    Product,
    Difference,
    Mean,
}

impl ArithmeticOp {
    const CUES: [(ArithmeticOp, &'static [&'static str]); 4] = [
        (ArithmeticOp::Sum, &["sum", "+", "add"]),
        (ArithmeticOp::Product, &["product", "*", "multiply"]),
        (ArithmeticOp::Difference, &["difference", "-", "\u{2212}", "subtract"]),
        (ArithmeticOp::Mean, &["average", "mean"]),
    ];

    /// Apply over values in order; `None` when there are too few operands
    pub fn apply(self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            ArithmeticOp::Sum => Some(values.iter().sum()),
            ArithmeticOp::Product => Some(values.iter().product()),
            ArithmeticOp::Difference => match values {
                [a, b, ..] => Some(a - b),
                _ => None,
            },
            ArithmeticOp::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
        }
    }
}

/// Lower-cased condition and behavior text of one rule
#[derive(Debug, Clone)]
pub struct RuleText {
    condition: String,
    behavior: String,
    combined: String,
}

impl RuleText {
    pub fn new(rule: &Rule) -> Self {
        let condition = rule.condition.to_lowercase();
        let behavior = rule.expected_behavior.to_lowercase();
        let combined = format!("{} {}", condition, behavior);
        Self {
            condition,
            behavior,
            combined,
        }
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn behavior(&self) -> &str {
        &self.behavior
    }

    /// Condition and behavior joined by a space
    pub fn combined(&self) -> &str {
        &self.combined
    }

    /// Case-insensitive substring test against the combined text
    pub fn mentions(&self, needle: &str) -> bool {
        self.combined.contains(&needle.to_lowercase())
    }

    pub fn mentions_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.mentions(n))
    }

    /// First numeric literal in the combined text
    pub fn first_number(&self) -> Option<f64> {
        number_pattern()
            .find(&self.combined)
            .and_then(|m| m.as_str().parse().ok())
    }

    /// Direction cue used for discrete outputs: `>`/exceed/above, else `<`/below
    pub fn relation(&self) -> Option<Relation> {
        if self.mentions_any(&[">", "exceed", "above"]) {
            Some(Relation::Greater)
        } else if self.mentions_any(&["<", "below"]) {
            Some(Relation::Less)
        } else {
            None
        }
    }

    /// First operator cue (by priority) paired with the first numeric literal
    pub fn comparison(&self) -> Option<Comparison> {
        let threshold = self.first_number()?;
        CompareOp::CUES
            .iter()
            .find(|(_, cues)| self.mentions_any(cues))
            .map(|(op, _)| Comparison { op: *op, threshold })
    }

    /// Strict `name <op> literal` match in the condition text
    pub fn comparison_for(&self, field_name: &str) -> Option<Comparison> {
        let pattern = format!(
            r"{}\s*(>=|<=|==|>|<|=)\s*(\d+(?:\.\d+)?)",
            regex::escape(&field_name.to_lowercase())
        );
        let re = Regex::new(&pattern).ok()?;
        let caps = re.captures(&self.condition)?;
        let op = CompareOp::from_symbol(caps.get(1)?.as_str())?;
        let threshold = caps.get(2)?.as_str().parse().ok()?;
        Some(Comparison { op, threshold })
    }

    /// First arithmetic cue in the behavior text
    pub fn arithmetic(&self) -> Option<ArithmeticOp> {
        ArithmeticOp::CUES
            .iter()
            .find(|(_, cues)| cues.iter().any(|c| self.behavior.contains(*c)))
            .map(|(op, _)| *op)
    }

    /// Inputs whose name appears in the condition text, in declaration order
    ///
    /// Substring matching: `speed` also matches `airspeed`.
    pub fn referenced_fields<'a>(&self, inputs: &'a [InputField]) -> Vec<&'a InputField> {
        inputs
            .iter()
            .filter(|f| self.condition.contains(&f.name.to_lowercase()))
            .collect()
    }

    /// Whether a field name occurs anywhere in the rule
    pub fn names_field(&self, name: &str) -> bool {
        self.mentions(name)
    }
}
