//! CLI utility helpers

use casegen::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Value following `--name` (or its short form), if present
pub fn flag_value<'a>(args: &'a [String], long: &str, short: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == long || arg == short)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Parse --output argument to determine output file path
pub fn parse_output_arg(args: &[String]) -> Option<PathBuf> {
    flag_value(args, "--output", "-o").map(PathBuf::from)
}

/// Positional arguments, skipping flags and their values
pub fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with('-') {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

/// Read a YAML or JSON document, chosen by file extension
pub fn read_document<T>(
    path: &str,
    from_yaml: fn(&str) -> Result<T>,
    from_json: fn(&str) -> Result<T>,
) -> Result<T> {
    let content = fs::read_to_string(path).map_err(Error::Io)?;
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        from_json(&content)
    } else {
        from_yaml(&content)
    }
}

/// Write content to file or stdout
pub fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content).map_err(Error::Io)?;
            eprintln!("Written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
