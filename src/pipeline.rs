//! End-to-end generation for one request
//!
//! ```text
//! request + interpretation
//!     -> validate
//!     -> BLOCKED? empty report
//!     -> select_strategies -> synthesize -> traceability / coverage_report
//! ```
//!
//! Every call is independent; nothing is cached between requests.

use crate::builder::synthesize;
use crate::config::SynthesisConfig;
use crate::coverage::{coverage_report, traceability, CoverageReport, TraceabilityMatrix};
use crate::error::Result;
use crate::interpret::Interpretation;
use crate::model::{GenerationRequest, StrategyMap, TestCase};
use crate::strategy::select_strategies;
use chrono::Utc;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Everything produced for one request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct GenerationReport {
    /// Interpretation as used, including any added warnings
    pub interpretation: Interpretation,
    pub strategies: StrategyMap,
    pub test_cases: Vec<TestCase>,
    pub traceability_matrix: TraceabilityMatrix,
    pub coverage_report: CoverageReport,
    /// RFC 3339 UTC timestamp
    pub generated_at: String,
    /// Hash of request and interpretation; equal inputs give equal fingerprints
    pub fingerprint: String,
}

/// Fingerprint of the inputs, `sha256:` plus the first 8 bytes in hex
pub fn fingerprint(request: &GenerationRequest, interpretation: &Interpretation) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(request)?);
    hasher.update(serde_json::to_vec(interpretation)?);
    Ok(format!("sha256:{}", hex::encode(&hasher.finalize()[..8])))
}

/// Run the whole pipeline
///
/// Malformed requests or interpretations are rejected as a whole. A BLOCKED
/// interpretation yields an empty report without running any generator.
pub fn generate(
    request: &GenerationRequest,
    interpretation: Interpretation,
    config: &SynthesisConfig,
) -> Result<GenerationReport> {
    request.validate()?;
    interpretation.validate()?;
    config.validate()?;

    let fingerprint = fingerprint(request, &interpretation)?;
    let requirement_id = request.requirement_id.as_str();

    if interpretation.requirement_id != request.requirement_id {
        tracing::warn!(
            request = requirement_id,
            interpretation = %interpretation.requirement_id,
            "interpretation requirement id differs from request"
        );
    }

    let mut interpretation = interpretation;
    interpretation.annotate_unknown_references(&request.inputs);

    if interpretation.is_blocked() {
        tracing::info!(requirement = requirement_id, "interpretation blocked, no tests generated");
        let total_rules = interpretation.rules.len();
        return Ok(GenerationReport {
            interpretation,
            strategies: StrategyMap::new(),
            test_cases: Vec::new(),
            traceability_matrix: TraceabilityMatrix {
                requirement_id: requirement_id.to_string(),
                rule_coverage: IndexMap::new(),
            },
            coverage_report: CoverageReport::empty(requirement_id, total_rules),
            generated_at: Utc::now().to_rfc3339(),
            fingerprint,
        });
    }

    let rules = &interpretation.rules;
    let strategies = select_strategies(rules, &request.inputs, &interpretation.boundary_values);
    let test_cases = synthesize(
        rules,
        &request.inputs,
        &request.outputs,
        &strategies,
        requirement_id,
        config,
    );
    let traceability_matrix = traceability(rules, &test_cases);
    let coverage_report = coverage_report(rules, &test_cases);

    tracing::info!(
        requirement = requirement_id,
        tests = test_cases.len(),
        coverage = coverage_report.coverage_percentage,
        "generation complete"
    );

    Ok(GenerationReport {
        interpretation,
        strategies,
        test_cases,
        traceability_matrix,
        coverage_report,
        generated_at: Utc::now().to_rfc3339(),
        fingerprint,
    })
}

impl GenerationReport {
    pub fn is_blocked(&self) -> bool {
        self.interpretation.is_blocked()
    }

    /// Format as human-readable report
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        let coverage = &self.coverage_report;

        out.push_str(&format!(
            "Requirement: {} [{}]\n",
            coverage.requirement_id, self.interpretation.interpretation_status
        ));
        out.push_str(&format!("Fingerprint: {}\n", self.fingerprint));

        if self.is_blocked() {
            out.push_str("\nBlocked by ambiguities:\n");
            for ambiguity in &self.interpretation.ambiguities {
                out.push_str(&format!("  - {}\n", ambiguity));
            }
            return out;
        }

        out.push_str(&format!(
            "Coverage: {}/{} rules ({:.2}%)\n",
            coverage.rules_covered, coverage.total_rules, coverage.coverage_percentage
        ));
        out.push_str(&format!(
            "Tests: {} total, {} valid, {} invalid\n",
            coverage.total_test_count, coverage.valid_test_count, coverage.invalid_test_count
        ));
        out.push_str(&format!("Techniques: {}\n", coverage.techniques_used.join(", ")));

        out.push_str("\nRules:\n");
        for rule in &self.interpretation.rules {
            let ids = self
                .traceability_matrix
                .rule_coverage
                .get(&rule.rule_id)
                .map(Vec::len)
                .unwrap_or(0);
            let techniques = self
                .strategies
                .get(&rule.rule_id)
                .map(|t| t.iter().map(|t| t.code()).collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            out.push_str(&format!(
                "  {}: when {} → {} ({} tests; {})\n",
                rule.rule_id, rule.condition, rule.expected_behavior, ids, techniques
            ));
        }

        if !self.interpretation.assumptions.is_empty() {
            out.push_str("\nAssumptions:\n");
            for assumption in &self.interpretation.assumptions {
                out.push_str(&format!("  - {}\n", assumption));
            }
        }

        out
    }
}
