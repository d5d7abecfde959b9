//! Schema command

use casegen::*;

pub fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: request, interpretation, report, config");
            Ok(())
        }
        "request" => print_schema::<GenerationRequest>(),
        "interpretation" => print_schema::<Interpretation>(),
        "report" => print_schema::<GenerationReport>(),
        "config" => print_schema::<SynthesisConfig>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
