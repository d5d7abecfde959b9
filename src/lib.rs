// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # casegen - deterministic test case synthesis
//!
//! Turns a requirement, its typed input/output signature and a structured
//! interpretation (rules, hints, assumptions) into a traceable set of test
//! cases with expected outputs and coverage metrics.
//!
//! ## Core Concept
//!
//! The interpreter that reads natural language lives elsewhere. casegen only
//! sees its output: a list of rules whose conditions and behaviors are free
//! text. From those rules and the field signatures, casegen:
//!
//! - **Selects techniques** per rule (BVA, EP, MC/DC, state transition, negative)
//! - **Infers ranges** for fields from names, units and types
//! - **Generates values** for each technique, tagged VALID or INVALID
//! - **Computes expected outputs** with a tiered heuristic oracle
//! - **Aggregates coverage** into a traceability matrix and summary
//!
//! Generation is deterministic: the same inputs give the same test list.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use casegen::{generate, GenerationRequest, Interpretation, SynthesisConfig};
//!
//! let request = GenerationRequest::from_yaml(r#"
//!   requirement_id: REQ-001
//!   requirement_text: "Raise the overspeed alarm when speed exceeds 200"
//!   inputs:
//!     - name: speed
//!       type: integer
//!       range_min: 0
//!       range_max: 300
//!   outputs:
//!     - name: overspeed_alarm
//!       type: boolean
//! "#)?;
//!
//! let interpretation = Interpretation::from_yaml(r#"
//!   requirement_id: REQ-001
//!   interpretation_status: OK
//!   interpreted_requirement: "overspeed alarm above 200"
//!   rules:
//!     - rule_id: R1
//!       condition: "speed > 200"
//!       expected_behavior: "overspeed_alarm is raised"
//!   constraints: []
//!   boundary_values: {}
//!   assumptions: []
//!   ambiguities: []
//! "#)?;
//!
//! let report = generate(&request, interpretation, &SynthesisConfig::default())?;
//! for tc in &report.test_cases {
//!     println!("{} {} -> {:?}", tc.tc_id, tc.scenario, tc.expected_output);
//! }
//! println!("{}", report.to_report());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │  Interpretation ──► select_strategies ──► StrategyMap        │
//! │                                              │               │
//! │  InputField ──► infer_range                  ▼               │
//! │        │            │                   synthesize           │
//! │        ├──► bva / ep / negative values ──────┤               │
//! │        ├──► condition_combinations ──────────┤               │
//! │        └──► state_cases ─────────────────────┤               │
//! │                                              ▼               │
//! │                         Oracle ──► Vec<TestCase>             │
//! │                                              │               │
//! │                  traceability / coverage_report              │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```

// Core types
pub mod config;
pub mod error;
pub mod interpret;
pub mod model;

// Value generation
pub mod mcdc;
pub mod range;
pub mod state;
pub mod text;
pub mod values;

// Synthesis
pub mod builder;
pub mod coverage;
pub mod oracle;
pub mod strategy;

// Orchestration and output
pub mod export;
pub mod pipeline;

// Re-exports
pub use builder::{synthesize, IdSequence, TestCaseBuilder};
pub use config::SynthesisConfig;
pub use coverage::{coverage_report, traceability, CoverageReport, TraceabilityMatrix};
pub use error::{Error, Result};
pub use export::{render, to_csv, to_json, to_yaml, ExportFormat};
pub use interpret::{BoundaryHint, BoundaryHints, Interpretation, InterpretationStatus};
pub use mcdc::{condition_combinations, Combination};
pub use model::{
    FieldType, GenerationRequest, InputField, OutputField, Priority, Rule, StrategyMap,
    Technique, TestCase, Traceability, Validity, Value, ValueMap,
};
pub use oracle::{Oracle, Scorer};
pub use pipeline::{fingerprint, generate, GenerationReport};
pub use range::{infer_range, InferredRange, RangeSource};
pub use state::{find_state_field, state_cases, StateCase};
pub use strategy::select_strategies;
pub use text::RuleText;
pub use values::{bva_values, ep_values, negative_values, nominal_value, Candidate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
