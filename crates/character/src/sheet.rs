//! Character data model.
//!
//! A [`CharacterSheet`] is what character creation produces and what the
//! storage layer persists. After creation it is edited field by field by
//! other handlers; nothing here mutates it.

use serde::{Deserialize, Serialize};

use dbu_content::{Age, AttributeId};
use dbu_eval::{RulesInputs, RulesValue};

// ── Attributes ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterAttributes {
    #[serde(rename = "STR")]
    pub str: i32,
    #[serde(rename = "CON")]
    pub con: i32,
    #[serde(rename = "AGL")]
    pub agl: i32,
    #[serde(rename = "INT")]
    pub int: i32,
    #[serde(rename = "WIL")]
    pub wil: i32,
    #[serde(rename = "CHA")]
    pub cha: i32,
}

impl CharacterAttributes {
    pub fn get(&self, id: AttributeId) -> i32 {
        match id {
            AttributeId::STR => self.str,
            AttributeId::CON => self.con,
            AttributeId::AGL => self.agl,
            AttributeId::INT => self.int,
            AttributeId::WIL => self.wil,
            AttributeId::CHA => self.cha,
        }
    }

    /// Input record keyed by attribute abbreviation (`STR`, `CON`, ...).
    pub fn to_inputs(&self) -> RulesInputs {
        AttributeId::ALL
            .iter()
            .map(|a| (a.as_str().to_string(), RulesValue::from(self.get(*a))))
            .collect()
    }
}

// ── Header and state ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterHeader {
    pub player_name: Option<String>,
    pub character_name: String,
    /// Kin display name.
    pub kin: String,
    pub kin_id: Option<String>,
    pub age: Age,
    /// Profession display name.
    pub profession: String,
    pub profession_id: Option<String>,
    pub weakness: Option<String>,
    pub appearance: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterConditions {
    pub exhausted: bool,
    pub sickly: bool,
    pub dazed: bool,
    pub angry: bool,
    pub scared: bool,
    pub disheartened: bool,
}

impl CharacterConditions {
    pub fn any_active(&self) -> bool {
        self.exhausted || self.sickly || self.dazed || self.angry || self.scared || self.disheartened
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRatings {
    pub damage_bonus_str: Option<String>,
    pub damage_bonus_agl: Option<String>,
    pub movement: i32,
    pub carrying_capacity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub name_sv: String,
    /// `None` when the skill table names an attribute this build does not know.
    #[serde(default)]
    pub linked_attribute: Option<AttributeId>,
    pub value: i32,
    #[serde(default)]
    pub trained: bool,
    pub improvement_mark: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    HeroicAbility,
    KinAbility,
    Spell,
    Cantrip,
}

/// Heroic abilities, kin abilities and spells share one list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroicAbilityEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub name_sv: Option<String>,
    #[serde(rename = "type")]
    pub kind: AbilityKind,
    /// Number or free text such as `"2 per level"`.
    #[serde(default)]
    pub wp_cost: Option<serde_json::Value>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub spell_level: Option<u32>,
    #[serde(default)]
    pub prepared: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub pack_id: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub name_sv: Option<String>,
    /// `1H` or `2H`.
    #[serde(default)]
    pub grip: Option<String>,
    #[serde(default)]
    pub str_requirement: Option<i32>,
    /// Number of metres or a descriptive range such as `"STR"`.
    #[serde(default)]
    pub range: Option<serde_json::Value>,
    pub damage: String,
    #[serde(default)]
    pub durability: Option<i32>,
    #[serde(default)]
    pub durability_max: Option<i32>,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub skill_id: Option<String>,
    #[serde(default)]
    pub is_masterwork: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub pack_id: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub name_sv: Option<String>,
    pub protection: i32,
    #[serde(default)]
    pub disadvantages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterArmor {
    pub body_armor: Option<ArmorEntry>,
    pub helmet: Option<ArmorEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingEntry {
    pub slot: u32,
    #[serde(default)]
    pub pack_id: Option<String>,
    #[serde(default)]
    pub item_id: Option<String>,
    pub item: String,
    #[serde(default)]
    pub item_sv: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Currency {
    pub gold: u32,
    pub silver: u32,
    pub copper: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestTracking {
    pub quick_rest_used: bool,
    pub short_rest_used: bool,
}

/// A current/max pool (hit points, willpower points).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTrack {
    pub max: i32,
    pub current: i32,
}

impl PointTrack {
    pub fn full(max: i32) -> Self {
        PointTrack { max, current: max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeathSaves {
    pub successes: u32,
    pub failures: u32,
}

// ── Sheet ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub header: CharacterHeader,
    pub attributes: CharacterAttributes,
    pub conditions: CharacterConditions,
    pub derived_ratings: DerivedRatings,
    pub skills: Vec<SkillEntry>,
    pub weapon_skills: Vec<SkillEntry>,
    pub secondary_skills: Vec<SkillEntry>,
    pub heroic_abilities_and_spells: Vec<HeroicAbilityEntry>,
    pub weapons: Vec<WeaponEntry>,
    pub armor: CharacterArmor,
    pub packing: Vec<PackingEntry>,
    pub currency: Currency,
    pub rest: RestTracking,
    pub hit_points: PointTrack,
    pub willpower_points: PointTrack,
    pub death_saves: DeathSaves,
    #[serde(default)]
    pub memento: Option<String>,
    #[serde(default)]
    pub trinkets: Vec<String>,
}

/// Request payload for character creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCreationInput {
    #[serde(default)]
    pub player_name: Option<String>,
    pub character_name: String,
    pub kin_id: String,
    pub age: Age,
    pub profession_id: String,
    #[serde(default)]
    pub weakness: Option<String>,
    #[serde(default)]
    pub appearance: Option<String>,
    pub attributes: CharacterAttributes,
    pub trained_skill_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs() -> CharacterAttributes {
        CharacterAttributes {
            str: 16,
            con: 12,
            agl: 14,
            int: 10,
            wil: 11,
            cha: 9,
        }
    }

    #[test]
    fn attributes_use_abbreviated_keys() {
        let json = serde_json::to_value(attrs()).unwrap();
        assert_eq!(
            json,
            json!({ "STR": 16, "CON": 12, "AGL": 14, "INT": 10, "WIL": 11, "CHA": 9 })
        );
    }

    #[test]
    fn attributes_to_inputs() {
        let inputs = attrs().to_inputs();
        assert_eq!(inputs.len(), 6);
        assert_eq!(inputs["WIL"], RulesValue::Number(11.0));
        assert_eq!(attrs().get(AttributeId::CHA), 9);
    }

    #[test]
    fn creation_input_parses_camel_case() {
        let input: CharacterCreationInput = serde_json::from_value(json!({
            "characterName": "Brynja",
            "kinId": "dwarf",
            "age": "Middle-Aged",
            "professionId": "fighter",
            "attributes": { "STR": 16, "CON": 12, "AGL": 14, "INT": 10, "WIL": 11, "CHA": 9 },
            "trainedSkillIds": ["swords"]
        }))
        .unwrap();
        assert_eq!(input.age, Age::MiddleAged);
        assert_eq!(input.player_name, None);
        assert_eq!(input.trained_skill_ids, vec!["swords"]);
    }

    #[test]
    fn edited_sheet_parts_parse() {
        let weapon: WeaponEntry = serde_json::from_value(json!({
            "name": "Broadsword",
            "grip": "1H",
            "range": 2,
            "damage": "2D6",
            "properties": ["slashing"]
        }))
        .unwrap();
        assert_eq!(weapon.range, Some(json!(2)));
        assert!(!weapon.is_masterwork);

        let spell: HeroicAbilityEntry = serde_json::from_value(json!({
            "name": "Fireball",
            "type": "spell",
            "wp_cost": "2 per power level",
            "spell_level": 1
        }))
        .unwrap();
        assert_eq!(spell.kind, AbilityKind::Spell);
    }

    #[test]
    fn conditions_default_inactive() {
        let c = CharacterConditions::default();
        assert!(!c.any_active());
        assert!(CharacterConditions { dazed: true, ..c }.any_active());
    }
}
