use std::path::Path;
use std::process;

use crate::commands::{print_json, read_json};
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_eval(ruleset_path: &Path, inputs_path: &Path, output: OutputFormat, quiet: bool) {
    let ruleset = read_json(ruleset_path, output, quiet);
    let inputs = read_json(inputs_path, output, quiet);

    let result = match dbu_eval::evaluate(&ruleset, &inputs) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("error: invalid ruleset or inputs: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    tracing::debug!(
        rules = result.receipts.len(),
        outputs = result.outputs.len(),
        "ruleset evaluated"
    );

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Text => {
            for (name, value) in &result.outputs {
                if value.is_null() {
                    println!("{} = null", name);
                } else {
                    println!("{} = {} ({})", name, value, value.type_name());
                }
            }
        }
    }
}
