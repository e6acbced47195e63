use std::path::Path;
use std::process;

use dbu_character::{compute_derived_ratings, CharacterAttributes};

use crate::commands::{load_content, print_json, read_json};
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_derive(
    attributes_path: &Path,
    kin_id: &str,
    content_path: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) {
    let content = load_content(content_path, output, quiet);
    let raw = read_json(attributes_path, output, quiet);
    let attributes: CharacterAttributes = match serde_json::from_value(raw) {
        Ok(a) => a,
        Err(e) => {
            let msg = format!(
                "error: invalid attributes in '{}': {}",
                attributes_path.display(),
                e
            );
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    if content.kin(kin_id).is_none() {
        tracing::warn!(kin = kin_id, "unknown kin; movement falls back to 0");
    }
    let computed = compute_derived_ratings(&content, &attributes, kin_id);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "derived_ratings": computed.derived,
            "max_hp": computed.numeric_output("max_hp"),
            "max_wp": computed.numeric_output("max_wp"),
            "evaluation": computed.receipt,
        })),
        OutputFormat::Text => {
            let d = &computed.derived;
            println!("Movement: {}", d.movement);
            println!("Carrying capacity: {}", d.carrying_capacity);
            println!(
                "Damage bonus (STR): {}",
                d.damage_bonus_str.as_deref().unwrap_or("-")
            );
            println!(
                "Damage bonus (AGL): {}",
                d.damage_bonus_agl.as_deref().unwrap_or("-")
            );
            for name in ["max_hp", "max_wp"] {
                if let Some(v) = computed.numeric_output(name) {
                    println!("{}: {}", name, v);
                }
            }
        }
    }
}
