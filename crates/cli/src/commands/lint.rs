use std::path::Path;
use std::process;

use dbu_eval::Ruleset;

use crate::commands::{print_json, read_json};
use crate::{report_error, OutputFormat};

/// Lint findings are warnings: the command succeeds whenever the ruleset parses.
pub(crate) fn cmd_lint(ruleset_path: &Path, output: OutputFormat, quiet: bool) {
    let raw = read_json(ruleset_path, output, quiet);
    let ruleset: Ruleset = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("error: invalid ruleset in '{}': {}", ruleset_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let warnings = ruleset.lint();
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "ruleset": ruleset.id,
            "warnings": warnings,
        })),
        OutputFormat::Text => {
            if warnings.is_empty() {
                println!("{}: no warnings", ruleset.id);
            } else {
                println!("{}: {} warning(s)", ruleset.id, warnings.len());
                for w in &warnings {
                    println!("  - {}", w);
                }
            }
        }
    }
}
