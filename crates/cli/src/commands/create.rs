use std::path::Path;
use std::process;

use dbu_character::create_from_json;

use crate::commands::{load_content, print_json, read_json};
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_create(
    input_path: &Path,
    content_path: Option<&Path>,
    output: OutputFormat,
    quiet: bool,
) {
    let content = load_content(content_path, output, quiet);
    let request = read_json(input_path, output, quiet);

    let sheet = match create_from_json(&content, &request) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => print_json(&sheet),
        OutputFormat::Text => {
            let h = &sheet.header;
            println!("{} ({} {}, {})", h.character_name, h.kin, h.profession, h.age);
            let a = &sheet.attributes;
            println!(
                "STR {}  CON {}  AGL {}  INT {}  WIL {}  CHA {}",
                a.str, a.con, a.agl, a.int, a.wil, a.cha
            );
            println!(
                "HP {}  WP {}  Movement {}",
                sheet.hit_points.max, sheet.willpower_points.max, sheet.derived_ratings.movement
            );
            let trained: Vec<String> = sheet
                .skills
                .iter()
                .chain(sheet.weapon_skills.iter())
                .filter(|s| s.trained)
                .map(|s| format!("{} {}", s.name, s.value))
                .collect();
            println!("Trained: {}", trained.join(", "));
        }
    }
}
