//! dbu-character -- builds character sheets from creation requests.
//!
//! Derived ratings are computed by evaluating a ruleset built from the
//! content tables (see [`derive`]), so every rating comes with a receipt.
//! Skills, reference resolution and skill-selection validation live
//! alongside. All functions take the content tables explicitly.

pub mod create;
pub mod derive;
pub mod error;
pub mod sheet;
pub mod skills;

pub use create::{build_character_sheet, validate_skill_selection};
pub use derive::{build_derived_ruleset, compute_derived_ratings, DerivedComputation};
pub use error::{CharacterError, ReferenceKind};
pub use sheet::*;
pub use skills::{base_chance, build_character_skills, build_skill_entries, CharacterSkills};

/// Parse a creation request from JSON and build the sheet.
pub fn create_from_json(
    content: &dbu_content::GameContent,
    input: &serde_json::Value,
) -> Result<CharacterSheet, CreateFromJsonError> {
    let input: CharacterCreationInput = serde_json::from_value(input.clone())?;
    Ok(build_character_sheet(content, &input)?)
}

/// Failure of [`create_from_json`]: a malformed request or a rejected one.
#[derive(Debug, thiserror::Error)]
pub enum CreateFromJsonError {
    #[error("invalid creation request: {0}")]
    Request(#[from] serde_json::Error),
    #[error(transparent)]
    Character(#[from] CharacterError),
}
