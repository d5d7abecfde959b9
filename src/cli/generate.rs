//! Generate command

use super::util::{flag_value, parse_output_arg, positional, read_document, write_output};
use casegen::*;
use std::path::Path;

const USAGE: &str = "Usage: casegen generate <request.yaml|json> <interpretation.yaml|json> \
                     [--format json|yaml|csv|report] [--output <file>] [--config <file>]";

pub fn cmd_generate(args: &[String]) -> Result<()> {
    let files = positional(args);
    let [request_path, interpretation_path] = files.as_slice() else {
        return Err(USAGE.into());
    };

    let format = flag_value(args, "--format", "-f")
        .map(str::parse::<ExportFormat>)
        .transpose()?
        .unwrap_or_default();
    let output = parse_output_arg(args);
    let config = match flag_value(args, "--config", "-c") {
        Some(path) => SynthesisConfig::load(Path::new(path))?,
        None => SynthesisConfig::default(),
    };

    let request = read_document(
        request_path,
        GenerationRequest::from_yaml,
        GenerationRequest::from_json,
    )?;
    let interpretation = read_document(
        interpretation_path,
        Interpretation::from_yaml,
        Interpretation::from_json,
    )?;

    let report = generate(&request, interpretation, &config)?;
    write_output(&output, &render(&report, format)?)
}
