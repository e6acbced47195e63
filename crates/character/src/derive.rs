//! Derived ratings.
//!
//! The formulas for movement, damage bonus, carrying capacity and max
//! HP/WP are expressed as a ruleset built from the content tables, so the
//! rating values come with a receipt of how each was computed.

use std::collections::BTreeMap;

use dbu_content::GameContent;
use dbu_eval::{
    eval_ruleset, RangeBracket, RulesEvaluationResult, RulesExpression, RulesRule, RulesValue,
    Ruleset,
};

use crate::sheet::{CharacterAttributes, DerivedRatings};

pub const DERIVED_RULESET_ID: &str = "dragonbane-derived";

/// Input key carrying the character's kin id.
pub const KIN_ID_INPUT: &str = "kin_id";

/// Result of [`compute_derived_ratings`]: the typed ratings plus the raw
/// evaluation they were read from.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedComputation {
    pub derived: DerivedRatings,
    pub receipt: RulesEvaluationResult,
}

impl DerivedComputation {
    /// Numeric output `name`, or `None` if the ruleset did not write it.
    pub fn numeric_output(&self, name: &str) -> Option<i32> {
        self.receipt.output(name).map(whole_number)
    }
}

fn rule(id: &str, expression: RulesExpression) -> RulesRule {
    RulesRule {
        id: id.to_string(),
        output: id.to_string(),
        expression,
    }
}

/// Build the derived-ratings ruleset from the content tables.
///
/// Rule ids and outputs: `damage_bonus_str`, `damage_bonus_agl`,
/// `movement`, `carrying_capacity`, `max_hp`, `max_wp`.
pub fn build_derived_ruleset(content: &GameContent) -> Ruleset {
    let tables = &content.rules.derived_ratings;

    let movement_map: BTreeMap<String, RulesValue> = content
        .kins
        .iter()
        .map(|kin| (kin.id.clone(), RulesValue::from(kin.movement)))
        .collect();
    let agl_ranges: Vec<RangeBracket> = tables
        .movement
        .agl_modifiers
        .iter()
        .map(|m| {
            RangeBracket::new(
                f64::from(m.agl_range.min()),
                f64::from(m.agl_range.max()),
                m.modifier,
            )
        })
        .collect();
    let damage_ranges: Vec<RangeBracket> = tables
        .damage_bonus
        .brackets
        .iter()
        .map(|b| {
            RangeBracket::new(
                f64::from(b.range.min()),
                f64::from(b.range.max()),
                b.bonus.clone(),
            )
        })
        .collect();

    let ruleset = Ruleset {
        id: DERIVED_RULESET_ID.to_string(),
        name: "Dragonbane Derived Stats".to_string(),
        rules: vec![
            rule(
                "damage_bonus_str",
                RulesExpression::range_lookup(RulesExpression::attr("STR"), damage_ranges.clone()),
            ),
            rule(
                "damage_bonus_agl",
                RulesExpression::range_lookup(RulesExpression::attr("AGL"), damage_ranges),
            ),
            rule(
                "movement",
                RulesExpression::add(vec![
                    RulesExpression::map_lookup(RulesExpression::attr(KIN_ID_INPUT), movement_map),
                    RulesExpression::range_lookup(RulesExpression::attr("AGL"), agl_ranges),
                ]),
            ),
            rule(
                "carrying_capacity",
                RulesExpression::ceil(RulesExpression::div(
                    RulesExpression::attr("STR"),
                    RulesExpression::constant(2.0),
                )),
            ),
            rule("max_hp", RulesExpression::attr("CON")),
            rule("max_wp", RulesExpression::attr("WIL")),
        ],
    };

    for warning in ruleset.lint() {
        tracing::warn!(ruleset = %ruleset.id, %warning, "derived ruleset lint");
    }

    ruleset
}

/// Evaluate the derived ruleset for `attributes` and `kin_id`.
///
/// The kin id is not validated here: an unknown kin contributes null
/// (0) base movement. Sheet construction rejects unknown kins before
/// calling this.
pub fn compute_derived_ratings(
    content: &GameContent,
    attributes: &CharacterAttributes,
    kin_id: &str,
) -> DerivedComputation {
    let ruleset = build_derived_ruleset(content);
    let mut inputs = attributes.to_inputs();
    inputs.insert(KIN_ID_INPUT.to_string(), RulesValue::from(kin_id));

    let receipt = eval_ruleset(&ruleset, &inputs);
    let text = |name: &str| {
        receipt
            .output(name)
            .and_then(RulesValue::as_text)
            .map(str::to_string)
    };
    let number = |name: &str| receipt.output(name).map(whole_number).unwrap_or(0);

    let derived = DerivedRatings {
        damage_bonus_str: text("damage_bonus_str"),
        damage_bonus_agl: text("damage_bonus_agl"),
        movement: number("movement"),
        carrying_capacity: number("carrying_capacity"),
    };
    tracing::debug!(
        kin = kin_id,
        movement = derived.movement,
        carrying_capacity = derived.carrying_capacity,
        "derived ratings computed"
    );

    DerivedComputation { derived, receipt }
}

/// Numeric coercion truncated toward zero; saturates at the `i32` bounds.
fn whole_number(v: &RulesValue) -> i32 {
    v.as_number().trunc() as i32
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> GameContent {
        dbu_content::corebook().unwrap()
    }

    fn attrs(strength: i32, agl: i32) -> CharacterAttributes {
        CharacterAttributes {
            str: strength,
            con: 12,
            agl,
            int: 10,
            wil: 10,
            cha: 10,
        }
    }

    #[test]
    fn ruleset_has_fixed_rule_ids() {
        let rs = build_derived_ruleset(&content());
        let ids: Vec<_> = rs.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "damage_bonus_str",
                "damage_bonus_agl",
                "movement",
                "carrying_capacity",
                "max_hp",
                "max_wp",
            ]
        );
        assert!(rs.lint().is_empty());
    }

    #[test]
    fn ruleset_is_rebuilt_identically() {
        let c = content();
        assert_eq!(build_derived_ruleset(&c), build_derived_ruleset(&c));
    }

    #[test]
    fn damage_bonus_brackets() {
        let c = content();
        let low = compute_derived_ratings(&c, &attrs(12, 17), "human").derived;
        assert_eq!(low.damage_bonus_str, None);
        assert_eq!(low.damage_bonus_agl.as_deref(), Some("+D6"));

        let mid = compute_derived_ratings(&c, &attrs(13, 16), "human").derived;
        assert_eq!(mid.damage_bonus_str.as_deref(), Some("+D4"));
        assert_eq!(mid.damage_bonus_agl.as_deref(), Some("+D4"));
    }

    #[test]
    fn carrying_capacity_rounds_up() {
        let c = content();
        assert_eq!(
            compute_derived_ratings(&c, &attrs(15, 10), "human")
                .derived
                .carrying_capacity,
            8
        );
        assert_eq!(
            compute_derived_ratings(&c, &attrs(16, 10), "human")
                .derived
                .carrying_capacity,
            8
        );
    }

    #[test]
    fn movement_adds_kin_base_and_agl_modifier() {
        let c = content();
        let wolfkin = compute_derived_ratings(&c, &attrs(10, 5), "wolfkin");
        assert_eq!(wolfkin.derived.movement, 8);

        let receipt = wolfkin.receipt.receipt("movement").unwrap();
        let ids: Vec<_> = receipt.steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "movement.add.0.map.key",
                "movement.add.0",
                "movement.add.1.range.value",
                "movement.add.1",
                "movement",
            ]
        );
        assert_eq!(receipt.inputs["kin_id"], RulesValue::from("wolfkin"));
    }

    #[test]
    fn unknown_kin_contributes_no_base_movement() {
        let c = content();
        let out = compute_derived_ratings(&c, &attrs(10, 14), "goblin");
        assert_eq!(out.derived.movement, 2);
    }

    #[test]
    fn attribute_outside_every_bracket_is_null_not_failure() {
        let c = content();
        let out = compute_derived_ratings(&c, &attrs(25, 25), "elf");
        assert_eq!(out.derived.damage_bonus_str, None);
        // No AGL modifier bracket covers 25.
        assert_eq!(out.derived.movement, 10);
        assert_eq!(out.receipt.output("damage_bonus_str"), Some(&RulesValue::Null));
    }

    #[test]
    fn max_points_come_from_con_and_wil() {
        let c = content();
        let out = compute_derived_ratings(&c, &attrs(10, 10), "human");
        assert_eq!(out.numeric_output("max_hp"), Some(12));
        assert_eq!(out.numeric_output("max_wp"), Some(10));
        assert_eq!(out.numeric_output("nonexistent"), None);
    }
}
