//! Typed structs for the static game-content tables.
//!
//! Field names follow the content files verbatim (`name_sv`,
//! `attribute_range`, `trained_skills_total`, ...). Inclusive integer
//! ranges are written as two-element arrays: `[13, 16]`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Attributes and ages ─────────────────────────────────────────────

/// The six character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeId {
    STR,
    CON,
    AGL,
    INT,
    WIL,
    CHA,
}

impl AttributeId {
    pub const ALL: [AttributeId; 6] = [
        AttributeId::STR,
        AttributeId::CON,
        AttributeId::AGL,
        AttributeId::INT,
        AttributeId::WIL,
        AttributeId::CHA,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeId::STR => "STR",
            AttributeId::CON => "CON",
            AttributeId::AGL => "AGL",
            AttributeId::INT => "INT",
            AttributeId::WIL => "WIL",
            AttributeId::CHA => "CHA",
        }
    }

    /// Case-sensitive parse of an attribute key as written in the skill table.
    pub fn from_key(key: &str) -> Option<AttributeId> {
        AttributeId::ALL.into_iter().find(|a| a.as_str() == key)
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Character age category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Age {
    Young,
    #[serde(rename = "Middle-Aged")]
    MiddleAged,
    Old,
}

impl Age {
    pub fn as_str(&self) -> &'static str {
        match self {
            Age::Young => "Young",
            Age::MiddleAged => "Middle-Aged",
            Age::Old => "Old",
        }
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive `[min, max]` range over attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange(pub i32, pub i32);

impl ValueRange {
    pub fn min(&self) -> i32 {
        self.0
    }

    pub fn max(&self) -> i32 {
        self.1
    }

    pub fn contains(&self, v: i32) -> bool {
        self.0 <= v && v <= self.1
    }

    pub fn overlaps(&self, other: &ValueRange) -> bool {
        self.0 <= other.1 && other.0 <= self.1
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0, self.1)
    }
}

// ── Kins ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kin {
    pub id: String,
    pub name: String,
    pub name_sv: String,
    /// Base movement before the AGL modifier.
    pub movement: i32,
}

// ── Professions ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionSkillRef {
    pub id: String,
    pub name: String,
    pub name_sv: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profession {
    pub id: String,
    pub name: String,
    pub name_sv: String,
    pub skills: Vec<ProfessionSkillRef>,
}

impl Profession {
    pub fn has_skill(&self, skill_id: &str) -> bool {
        self.skills.iter().any(|s| s.id == skill_id)
    }
}

// ── Skills ──────────────────────────────────────────────────────────

/// A skill definition. `attribute` is kept as written so that an
/// unrecognised key can fall back at derivation time instead of failing
/// the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: String,
    pub name: String,
    pub name_sv: String,
    pub attribute: String,
}

impl SkillDef {
    pub fn linked_attribute(&self) -> Option<AttributeId> {
        AttributeId::from_key(&self.attribute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseChanceBracket {
    pub attribute_range: ValueRange,
    pub base_chance: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseChanceTable {
    pub brackets: Vec<BaseChanceBracket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLists {
    pub base_skills: Vec<SkillDef>,
    pub weapon_skills: Vec<SkillDef>,
    pub secondary_skills: Vec<SkillDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTables {
    pub skill_base_chance: BaseChanceTable,
    pub skills: SkillLists,
}

// ── Rules ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeCategory {
    pub id: String,
    pub name: Age,
    pub trained_skills_total: u32,
    pub trained_skills_from_profession: u32,
    pub trained_skills_free_choice: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeTable {
    pub categories: Vec<AgeCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementModifier {
    pub agl_range: ValueRange,
    pub modifier: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementTable {
    pub agl_modifiers: Vec<MovementModifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageBonusBracket {
    pub range: ValueRange,
    /// Dice expression such as `+D4`; null for no bonus.
    pub bonus: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageBonusTable {
    pub brackets: Vec<DamageBonusBracket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedRatingTables {
    pub movement: MovementTable,
    pub damage_bonus: DamageBonusTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesTables {
    pub age: AgeTable,
    pub derived_ratings: DerivedRatingTables,
}

/// Trained-skill counts mandated for one age category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AgeSkillSlots {
    pub total: usize,
    pub from_profession: usize,
    pub free_choice: usize,
}

impl From<&AgeCategory> for AgeSkillSlots {
    fn from(c: &AgeCategory) -> Self {
        AgeSkillSlots {
            total: c.trained_skills_total as usize,
            from_profession: c.trained_skills_from_profession as usize,
            free_choice: c.trained_skills_free_choice as usize,
        }
    }
}
