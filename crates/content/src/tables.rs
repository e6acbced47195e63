//! The complete set of content tables and the lookups derivation needs.

use serde::{Deserialize, Serialize};

use crate::types::*;

/// Immutable game content handed to character derivation.
///
/// Built once (from a content file or the bundled corebook) and shared
/// read-only afterwards; nothing in this workspace mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameContent {
    pub kins: Vec<Kin>,
    pub professions: Vec<Profession>,
    pub skills: SkillTables,
    pub rules: RulesTables,
}

impl GameContent {
    pub fn kin(&self, id: &str) -> Option<&Kin> {
        self.kins.iter().find(|k| k.id == id)
    }

    pub fn profession(&self, id: &str) -> Option<&Profession> {
        self.professions.iter().find(|p| p.id == id)
    }

    pub fn age_category(&self, age: Age) -> Option<&AgeCategory> {
        self.rules.age.categories.iter().find(|c| c.name == age)
    }

    /// Trained-skill counts for `age`; all zero if the table has no such
    /// category.
    pub fn age_skill_slots(&self, age: Age) -> AgeSkillSlots {
        self.age_category(age)
            .map(AgeSkillSlots::from)
            .unwrap_or_default()
    }

    /// Base chance of the first bracket containing `attribute_value`.
    pub fn base_chance_bracket(&self, attribute_value: i32) -> Option<&BaseChanceBracket> {
        self.skills
            .skill_base_chance
            .brackets
            .iter()
            .find(|b| b.attribute_range.contains(attribute_value))
    }

    /// Every skill definition: base, weapon, then secondary.
    pub fn all_skills(&self) -> impl Iterator<Item = &SkillDef> {
        let lists = &self.skills.skills;
        lists
            .base_skills
            .iter()
            .chain(lists.weapon_skills.iter())
            .chain(lists.secondary_skills.iter())
    }
}
