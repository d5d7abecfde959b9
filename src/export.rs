//! Report export: JSON, YAML, CSV and plain text

use crate::error::{Error, Result};
use crate::model::{TestCase, ValueMap};
use crate::pipeline::GenerationReport;
use std::str::FromStr;

/// Spreadsheet columns, one row per test case
pub const CSV_HEADERS: [&str; 10] = [
    "Test Case ID",
    "Rule ID",
    "Test Type",
    "Scenario",
    "Inputs",
    "Expected Output",
    "Priority",
    "Validity",
    "Requirement",
    "Rule",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
    Csv,
    Report,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "csv" => Ok(ExportFormat::Csv),
            "report" | "text" | "txt" => Ok(ExportFormat::Report),
            other => Err(Error::Export(format!(
                "Unknown format: {}. Use json, yaml, csv or report",
                other
            ))),
        }
    }
}

pub fn to_json(report: &GenerationReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn to_yaml(report: &GenerationReport) -> Result<String> {
    Ok(serde_norway::to_string(report)?)
}

/// Test cases as CSV; input and output mappings become compact JSON cells
pub fn to_csv(test_cases: &[TestCase]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for tc in test_cases {
        let inputs = compact(&tc.inputs)?;
        let expected = compact(&tc.expected_output)?;
        let priority = tc.priority.to_string();
        let validity = tc.validity.to_string();
        writer.write_record([
            tc.tc_id.as_str(),
            tc.rule_id.as_str(),
            tc.technique.label(),
            tc.scenario.as_str(),
            inputs.as_str(),
            expected.as_str(),
            priority.as_str(),
            validity.as_str(),
            tc.traceability.requirement.as_str(),
            tc.traceability.rule.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(format!("Failed to flush CSV writer: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

fn compact(values: &ValueMap) -> Result<String> {
    Ok(serde_json::to_string(values)?)
}

/// Render a report in the requested format
pub fn render(report: &GenerationReport, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(report),
        ExportFormat::Yaml => to_yaml(report),
        ExportFormat::Csv => to_csv(&report.test_cases),
        ExportFormat::Report => Ok(report.to_report()),
    }
}
