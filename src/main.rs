//! casegen CLI - Command-line interface
//!
//! Commands:
//!   generate - Synthesize test cases from a request and an interpretation
//!   schema   - Print JSON Schema for an input or output document
//!   version  - Print version

mod cli;

use casegen::VERSION;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "CASEGEN_LOG";

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "generate" => cli::cmd_generate(&args[2..]),
        "schema" => cli::cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("casegen {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Diagnostics go to stderr so stdout stays machine-readable
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_usage() {
    println!(
        r#"
casegen - Deterministic test case synthesis

USAGE:
    casegen <COMMAND> [OPTIONS]

COMMANDS:
    generate <request> <interpretation>   Synthesize test cases (YAML or JSON inputs)
    schema [name]                         Print JSON schema (request, interpretation, report, config)
    version                               Print version
    help                                  Print this message

OPTIONS:
    --format <json|yaml|csv|report>   Output format (default: json)
    --output <file>                   Output file (default: stdout)
    --config <file>                   Synthesis config (YAML)

ENVIRONMENT:
    CASEGEN_LOG                       Log filter, e.g. debug or casegen=trace (default: warn)

EXAMPLES:
    casegen generate req.yaml interp.yaml
    casegen generate req.json interp.json --format csv --output cases.csv
    casegen schema interpretation > interpretation.schema.json
"#
    );
}
