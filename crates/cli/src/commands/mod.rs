pub(crate) mod create;
pub(crate) mod derive;
pub(crate) mod eval;
pub(crate) mod lint;
pub(crate) mod validate;

use std::path::Path;
use std::process;

use dbu_content::GameContent;
use serde::Serialize;

use crate::{report_error, OutputFormat};

/// Read and parse a JSON file, exiting with a reported error on failure.
pub(crate) fn read_json(path: &Path, output: OutputFormat, quiet: bool) -> serde_json::Value {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Load content tables from `path`, or the bundled corebook when `None`.
pub(crate) fn load_content(path: Option<&Path>, output: OutputFormat, quiet: bool) -> GameContent {
    let loaded = match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading content tables");
            let text = match std::fs::read_to_string(p) {
                Ok(s) => s,
                Err(e) => {
                    let msg = format!("error reading file '{}': {}", p.display(), e);
                    report_error(&msg, output, quiet);
                    process::exit(1);
                }
            };
            dbu_content::from_json(&text)
                .map_err(|e| format!("invalid content in '{}': {}", p.display(), e))
        }
        None => dbu_content::corebook()
            .map_err(|e| format!("internal error: bundled content is invalid: {}", e)),
    };
    match loaded {
        Ok(c) => c,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Pretty-print a serializable value to stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("serialization error: {}", e))
    );
}
