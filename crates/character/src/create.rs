//! Character sheet construction.
//!
//! Single pass: resolve references, validate the trained-skill selection,
//! derive ratings and skills, and assemble a sheet with fresh runtime
//! state. Any failure aborts before a sheet exists.

use dbu_content::{Age, GameContent, Kin, Profession};

use crate::derive::compute_derived_ratings;
use crate::error::{CharacterError, ReferenceKind};
use crate::sheet::*;
use crate::skills::build_character_skills;

pub fn resolve_kin<'a>(content: &'a GameContent, kin_id: &str) -> Result<&'a Kin, CharacterError> {
    content
        .kin(kin_id)
        .ok_or_else(|| CharacterError::UnknownReference {
            kind: ReferenceKind::Kin,
            id: kin_id.to_string(),
        })
}

pub fn resolve_profession<'a>(
    content: &'a GameContent,
    profession_id: &str,
) -> Result<&'a Profession, CharacterError> {
    content
        .profession(profession_id)
        .ok_or_else(|| CharacterError::UnknownReference {
            kind: ReferenceKind::Profession,
            id: profession_id.to_string(),
        })
}

/// Check the selection against the age category's mandated counts.
///
/// Both the total and the profession-sourced subset must match exactly.
/// Ids are counted as given; a repeated id counts twice.
pub fn validate_skill_selection(
    content: &GameContent,
    age: Age,
    profession: &Profession,
    trained_skill_ids: &[String],
) -> Result<(), CharacterError> {
    let slots = content.age_skill_slots(age);
    let actual_total = trained_skill_ids.len();
    let actual_from_profession = trained_skill_ids
        .iter()
        .filter(|id| profession.has_skill(id))
        .count();

    if actual_total != slots.total || actual_from_profession != slots.from_profession {
        return Err(CharacterError::InvalidSkillSelection {
            expected_total: slots.total,
            expected_from_profession: slots.from_profession,
            actual_total,
            actual_from_profession,
        });
    }
    Ok(())
}

/// Build a new character sheet from a creation request.
pub fn build_character_sheet(
    content: &GameContent,
    input: &CharacterCreationInput,
) -> Result<CharacterSheet, CharacterError> {
    let kin = resolve_kin(content, &input.kin_id)?;
    let profession = resolve_profession(content, &input.profession_id)?;
    validate_skill_selection(content, input.age, profession, &input.trained_skill_ids)?;

    let computed = compute_derived_ratings(content, &input.attributes, &kin.id);
    let skills = build_character_skills(content, &input.attributes, &input.trained_skill_ids);

    let max_hp = computed
        .numeric_output("max_hp")
        .unwrap_or(input.attributes.con);
    let max_wp = computed
        .numeric_output("max_wp")
        .unwrap_or(input.attributes.wil);

    tracing::debug!(
        character = %input.character_name,
        kin = %kin.id,
        profession = %profession.id,
        age = %input.age,
        max_hp,
        max_wp,
        "character sheet built"
    );

    Ok(CharacterSheet {
        header: CharacterHeader {
            player_name: input.player_name.clone(),
            character_name: input.character_name.clone(),
            kin: kin.name.clone(),
            kin_id: Some(kin.id.clone()),
            age: input.age,
            profession: profession.name.clone(),
            profession_id: Some(profession.id.clone()),
            weakness: input.weakness.clone(),
            appearance: input.appearance.clone(),
            nickname: None,
        },
        attributes: input.attributes,
        conditions: CharacterConditions::default(),
        derived_ratings: computed.derived,
        skills: skills.skills,
        weapon_skills: skills.weapon_skills,
        secondary_skills: Vec::new(),
        heroic_abilities_and_spells: Vec::new(),
        weapons: Vec::new(),
        armor: CharacterArmor::default(),
        packing: Vec::new(),
        currency: Currency::default(),
        rest: RestTracking::default(),
        hit_points: PointTrack::full(max_hp),
        willpower_points: PointTrack::full(max_wp),
        death_saves: DeathSaves::default(),
        memento: None,
        trinkets: Vec::new(),
    })
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
