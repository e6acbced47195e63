use std::path::Path;
use std::process;

use crate::commands::read_json;
use crate::{report_error, OutputFormat};

static CONTENT_SCHEMA_STR: &str = include_str!("../../../../docs/content-schema.json");

/// Schema check first; the table checks only run on schema-valid documents.
pub(crate) fn cmd_validate(content_path: &Path, output: OutputFormat, quiet: bool) {
    let schema: serde_json::Value = match serde_json::from_str(CONTENT_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded content schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let validator = match jsonschema::validator_for(&schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc = read_json(content_path, output, quiet);

    let mut errors: Vec<String> = validator
        .iter_errors(&doc)
        .map(|e| format!("{}", e))
        .collect();
    let stage = if errors.is_empty() {
        if let Err(e) = dbu_content::from_value(doc) {
            errors.push(e.to_string());
        }
        "tables"
    } else {
        "schema"
    };

    if errors.is_empty() {
        if !quiet {
            match output {
                OutputFormat::Text => println!("valid"),
                OutputFormat::Json => println!("{}", serde_json::json!({ "valid": true })),
            }
        }
        return;
    }

    tracing::debug!(stage, count = errors.len(), "content rejected");
    match output {
        OutputFormat::Text => {
            if !quiet {
                eprintln!("invalid content ({})", stage);
                for err in &errors {
                    eprintln!("  - {}", err);
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": false,
                "stage": stage,
                "errors": errors,
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
    process::exit(1);
}
