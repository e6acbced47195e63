//! Parsing and validation of content documents.
//!
//! The main entry point is [`from_json`]. Every constructor runs
//! [`validate`] before handing out a [`GameContent`], so a value of that
//! type always has non-overlapping bracket tables and unique ids.

use std::collections::HashSet;

use crate::error::ContentError;
use crate::tables::GameContent;
use crate::types::ValueRange;

static COREBOOK_STR: &str = include_str!("../data/corebook.json");

/// Parse and validate a content document.
pub fn from_json(s: &str) -> Result<GameContent, ContentError> {
    let content: GameContent = serde_json::from_str(s)?;
    validate(&content)?;
    Ok(content)
}

/// Parse and validate an already-decoded content document.
pub fn from_value(v: serde_json::Value) -> Result<GameContent, ContentError> {
    let content: GameContent = serde_json::from_value(v)?;
    validate(&content)?;
    Ok(content)
}

/// The corebook tables bundled with this crate.
pub fn corebook() -> Result<GameContent, ContentError> {
    from_json(COREBOOK_STR)
}

/// Raw text of the bundled corebook document.
pub fn corebook_source() -> &'static str {
    COREBOOK_STR
}

/// Check the invariants the derivation code relies on.
///
/// Bracket tables are resolved first-match; that is only equivalent to
/// "the bracket containing the value" when no two brackets overlap.
pub fn validate(content: &GameContent) -> Result<(), ContentError> {
    check_brackets(
        "skill base chance",
        content
            .skills
            .skill_base_chance
            .brackets
            .iter()
            .map(|b| b.attribute_range),
    )?;
    check_brackets(
        "damage bonus",
        content
            .rules
            .derived_ratings
            .damage_bonus
            .brackets
            .iter()
            .map(|b| b.range),
    )?;
    check_brackets(
        "movement modifier",
        content
            .rules
            .derived_ratings
            .movement
            .agl_modifiers
            .iter()
            .map(|m| m.agl_range),
    )?;

    check_unique("kins", content.kins.iter().map(|k| k.id.as_str()))?;
    check_unique(
        "professions",
        content.professions.iter().map(|p| p.id.as_str()),
    )?;
    check_unique("skills", content.all_skills().map(|s| s.id.as_str()))?;
    check_unique(
        "age categories",
        content.rules.age.categories.iter().map(|c| c.name.as_str()),
    )?;

    for c in &content.rules.age.categories {
        let sum = c
            .trained_skills_from_profession
            .checked_add(c.trained_skills_free_choice);
        if sum != Some(c.trained_skills_total) {
            return Err(ContentError::AgeSlotMismatch {
                age: c.name.to_string(),
                total: c.trained_skills_total,
                from_profession: c.trained_skills_from_profession,
                free_choice: c.trained_skills_free_choice,
            });
        }
    }

    Ok(())
}

fn check_brackets(
    table: &'static str,
    ranges: impl Iterator<Item = ValueRange>,
) -> Result<(), ContentError> {
    let ranges: Vec<ValueRange> = ranges.collect();
    for (index, r) in ranges.iter().enumerate() {
        if r.min() > r.max() {
            return Err(ContentError::InvalidRange {
                table,
                index,
                min: r.min(),
                max: r.max(),
            });
        }
    }
    for (first, a) in ranges.iter().enumerate() {
        for (second, b) in ranges.iter().enumerate().skip(first + 1) {
            if a.overlaps(b) {
                return Err(ContentError::OverlappingBrackets {
                    table,
                    first,
                    second,
                });
            }
        }
    }
    Ok(())
}

fn check_unique<'a>(
    table: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                table,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
