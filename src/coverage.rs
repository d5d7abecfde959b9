//! Rule coverage and traceability
//!
//! Read-only aggregates over a finished test case list.

use crate::model::{Rule, Technique, TestCase};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Requirement id used when there are no test cases to take it from
pub const UNKNOWN_REQUIREMENT: &str = "UNKNOWN";

/// Rule id -> ids of the test cases exercising it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TraceabilityMatrix {
    pub requirement_id: String,
    pub rule_coverage: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CoverageReport {
    pub requirement_id: String,
    pub total_rules: usize,
    pub rules_covered: usize,
    /// Percentage of rules with at least one test, two decimals
    pub coverage_percentage: f64,
    /// Technique labels, canonical order
    pub techniques_used: Vec<String>,
    pub valid_test_count: usize,
    pub invalid_test_count: usize,
    pub total_test_count: usize,
}

impl CoverageReport {
    /// Report for a run that generated nothing
    pub fn empty(requirement_id: impl Into<String>, total_rules: usize) -> Self {
        Self {
            requirement_id: requirement_id.into(),
            total_rules,
            rules_covered: 0,
            coverage_percentage: 0.0,
            techniques_used: Vec::new(),
            valid_test_count: 0,
            invalid_test_count: 0,
            total_test_count: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_rules > 0 && self.rules_covered == self.total_rules
    }
}

fn requirement_of(test_cases: &[TestCase]) -> String {
    test_cases
        .first()
        .map(|tc| tc.traceability.requirement.clone())
        .unwrap_or_else(|| UNKNOWN_REQUIREMENT.to_string())
}

/// Every rule, in order, with the ids of its test cases
pub fn traceability(rules: &[Rule], test_cases: &[TestCase]) -> TraceabilityMatrix {
    let rule_coverage = rules
        .iter()
        .map(|rule| {
            let ids = test_cases
                .iter()
                .filter(|tc| tc.rule_id == rule.rule_id)
                .map(|tc| tc.tc_id.clone())
                .collect();
            (rule.rule_id.clone(), ids)
        })
        .collect();

    TraceabilityMatrix {
        requirement_id: requirement_of(test_cases),
        rule_coverage,
    }
}

/// Summary statistics over the test case list
pub fn coverage_report(rules: &[Rule], test_cases: &[TestCase]) -> CoverageReport {
    let total_rules = rules.len();
    let rules_covered = rules
        .iter()
        .filter(|rule| test_cases.iter().any(|tc| tc.rule_id == rule.rule_id))
        .map(|rule| rule.rule_id.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let coverage_percentage = if total_rules == 0 {
        0.0
    } else {
        round2(rules_covered as f64 / total_rules as f64 * 100.0)
    };

    let techniques: BTreeSet<Technique> = test_cases.iter().map(|tc| tc.technique).collect();
    let valid_test_count = test_cases.iter().filter(|tc| tc.validity.is_valid()).count();

    CoverageReport {
        requirement_id: requirement_of(test_cases),
        total_rules,
        rules_covered,
        coverage_percentage,
        techniques_used: techniques.into_iter().map(|t| t.label().to_string()).collect(),
        valid_test_count,
        invalid_test_count: test_cases.len() - valid_test_count,
        total_test_count: test_cases.len(),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
