//! Skill values at character creation.
//!
//! A skill's value is the base chance of the bracket containing its
//! linked attribute, doubled when the skill is trained.

use dbu_content::{GameContent, SkillDef};

use crate::sheet::{CharacterAttributes, SkillEntry};

/// Base chance when no bracket contains the attribute value.
pub const DEFAULT_BASE_CHANCE: i32 = 3;

/// Attribute value used when a skill names an unrecognised attribute.
pub const DEFAULT_ATTRIBUTE_VALUE: i32 = 3;

/// Base chance for an attribute value, or [`DEFAULT_BASE_CHANCE`] if no
/// bracket matches.
pub fn base_chance(content: &GameContent, attribute_value: i32) -> i32 {
    content
        .base_chance_bracket(attribute_value)
        .map(|b| b.base_chance)
        .unwrap_or(DEFAULT_BASE_CHANCE)
}

/// One entry per skill definition, in table order. Doubling a trained
/// skill saturates at `i32::MAX`.
pub fn build_skill_entries(
    content: &GameContent,
    skill_defs: &[SkillDef],
    attributes: &CharacterAttributes,
    trained_skill_ids: &[String],
) -> Vec<SkillEntry> {
    skill_defs
        .iter()
        .map(|skill| {
            let linked = skill.linked_attribute();
            let attribute_value = linked
                .map(|a| attributes.get(a))
                .unwrap_or(DEFAULT_ATTRIBUTE_VALUE);
            let base = base_chance(content, attribute_value);
            let trained = trained_skill_ids.iter().any(|id| *id == skill.id);

            SkillEntry {
                id: skill.id.clone(),
                name: skill.name.clone(),
                name_sv: skill.name_sv.clone(),
                linked_attribute: linked,
                value: if trained { base.saturating_mul(2) } else { base },
                trained,
                improvement_mark: false,
            }
        })
        .collect()
}

/// Skill lists a new character starts with. Secondary skills are learned
/// in play and start empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSkills {
    pub skills: Vec<SkillEntry>,
    pub weapon_skills: Vec<SkillEntry>,
}

pub fn build_character_skills(
    content: &GameContent,
    attributes: &CharacterAttributes,
    trained_skill_ids: &[String],
) -> CharacterSkills {
    let lists = &content.skills.skills;
    CharacterSkills {
        skills: build_skill_entries(content, &lists.base_skills, attributes, trained_skill_ids),
        weapon_skills: build_skill_entries(
            content,
            &lists.weapon_skills,
            attributes,
            trained_skill_ids,
        ),
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
