//! Rules expression tree.
//!
//! Expressions are immutable, tree-shaped and acyclic. The serialized
//! form is an object discriminated by its `type` field:
//!
//! ```json
//! { "type": "ceil", "value": { "type": "div",
//!     "numerator": { "type": "attr", "key": "STR" },
//!     "denominator": { "type": "const", "value": 2 } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::RulesValue;

/// One node of a rules expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RulesExpression {
    /// Literal value.
    Const { value: RulesValue },
    /// Input record lookup; a missing key is null.
    Attr { key: String },
    /// Sum of numeric-coerced items; empty sums to 0.
    Add { items: Vec<RulesExpression> },
    /// Product of numeric-coerced items; empty multiplies to 1.
    Mul { items: Vec<RulesExpression> },
    /// Numeric division; a zero denominator yields 0.
    Div {
        numerator: Box<RulesExpression>,
        denominator: Box<RulesExpression>,
    },
    Ceil { value: Box<RulesExpression> },
    Floor { value: Box<RulesExpression> },
    /// Exact, case-sensitive key lookup; a miss is null.
    MapLookup {
        key: Box<RulesExpression>,
        map: BTreeMap<String, RulesValue>,
    },
    /// First inclusive range containing the value wins; no match is null.
    RangeLookup {
        value: Box<RulesExpression>,
        ranges: Vec<RangeBracket>,
    },
    /// Any operator tag this build does not know. Evaluates to null.
    #[serde(other)]
    Unknown,
}

/// One `{min, max, result}` row of a bracket table. Both bounds inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBracket {
    pub min: f64,
    pub max: f64,
    pub result: RulesValue,
}

impl RangeBracket {
    pub fn new(min: f64, max: f64, result: impl Into<RulesValue>) -> Self {
        RangeBracket {
            min,
            max,
            result: result.into(),
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    pub fn overlaps(&self, other: &RangeBracket) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

impl RulesExpression {
    /// Operator name as it appears in the `type` tag.
    pub fn tag(&self) -> &'static str {
        match self {
            RulesExpression::Const { .. } => "const",
            RulesExpression::Attr { .. } => "attr",
            RulesExpression::Add { .. } => "add",
            RulesExpression::Mul { .. } => "mul",
            RulesExpression::Div { .. } => "div",
            RulesExpression::Ceil { .. } => "ceil",
            RulesExpression::Floor { .. } => "floor",
            RulesExpression::MapLookup { .. } => "mapLookup",
            RulesExpression::RangeLookup { .. } => "rangeLookup",
            RulesExpression::Unknown => "unknown",
        }
    }

    // Builders for hand-written rulesets.

    pub fn constant(value: impl Into<RulesValue>) -> Self {
        RulesExpression::Const {
            value: value.into(),
        }
    }

    pub fn attr(key: impl Into<String>) -> Self {
        RulesExpression::Attr { key: key.into() }
    }

    pub fn add(items: Vec<RulesExpression>) -> Self {
        RulesExpression::Add { items }
    }

    pub fn mul(items: Vec<RulesExpression>) -> Self {
        RulesExpression::Mul { items }
    }

    pub fn div(numerator: RulesExpression, denominator: RulesExpression) -> Self {
        RulesExpression::Div {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
        }
    }

    pub fn ceil(value: RulesExpression) -> Self {
        RulesExpression::Ceil {
            value: Box::new(value),
        }
    }

    pub fn floor(value: RulesExpression) -> Self {
        RulesExpression::Floor {
            value: Box::new(value),
        }
    }

    pub fn map_lookup(key: RulesExpression, map: BTreeMap<String, RulesValue>) -> Self {
        RulesExpression::MapLookup {
            key: Box::new(key),
            map,
        }
    }

    pub fn range_lookup(value: RulesExpression, ranges: Vec<RangeBracket>) -> Self {
        RulesExpression::RangeLookup {
            value: Box::new(value),
            ranges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tagged_wire_form() {
        let expr: RulesExpression = serde_json::from_value(json!({
            "type": "ceil",
            "value": {
                "type": "div",
                "numerator": { "type": "attr", "key": "STR" },
                "denominator": { "type": "const", "value": 2 }
            }
        }))
        .unwrap();
        assert_eq!(
            expr,
            RulesExpression::ceil(RulesExpression::div(
                RulesExpression::attr("STR"),
                RulesExpression::constant(2.0),
            ))
        );
    }

    #[test]
    fn lookup_variants_use_camel_case_tags() {
        let expr = RulesExpression::map_lookup(
            RulesExpression::attr("kin_id"),
            BTreeMap::from([("dwarf".to_string(), RulesValue::Number(8.0))]),
        );
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["type"], "mapLookup");
        assert_eq!(json["map"]["dwarf"], 8);

        let expr = RulesExpression::range_lookup(
            RulesExpression::attr("AGL"),
            vec![RangeBracket::new(1.0, 6.0, -2.0)],
        );
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["type"], "rangeLookup");
        assert_eq!(json["ranges"][0]["min"], 1.0);
        assert_eq!(json["ranges"][0]["max"], 6.0);
        assert_eq!(json["ranges"][0]["result"], -2);
    }

    #[test]
    fn unrecognised_tag_parses_as_unknown() {
        let expr: RulesExpression = serde_json::from_value(json!({ "type": "pow" })).unwrap();
        assert_eq!(expr, RulesExpression::Unknown);
        assert_eq!(expr.tag(), "unknown");
    }

    #[test]
    fn bracket_containment_is_inclusive() {
        let b = RangeBracket::new(5.0, 10.0, "x");
        assert!(b.contains(5.0));
        assert!(b.contains(10.0));
        assert!(!b.contains(10.5));
        assert!(b.overlaps(&RangeBracket::new(10.0, 12.0, "y")));
        assert!(!b.overlaps(&RangeBracket::new(11.0, 12.0, "y")));
    }
}
