//! Expression evaluator.
//!
//! Recursively reduces a [`RulesExpression`] against an input record.
//! The evaluator is total: missing keys, unparsable strings, division by
//! zero and unknown operators all reduce to a value instead of an error.
//! Arithmetic that overflows to NaN or an infinity reduces to 0.
//!
//! Every node visited appends exactly one step to the collector, after
//! its children have appended theirs.

use crate::expression::RulesExpression;
use crate::trace::{child_step_id, indexed_step_id, StepCollector};
use crate::value::{finite_or_zero, RulesInputs, RulesValue};

/// Evaluate `expr` against `inputs`, recording steps under `step_id`.
///
/// The root call uses the owning rule's id as `step_id`. Children extend
/// it with their structural position:
///
/// | operator | child suffix |
/// |---|---|
/// | add / mul | `.add.<i>` / `.mul.<i>` |
/// | div | `.num`, `.den` |
/// | ceil / floor | `.ceil` / `.floor` |
/// | mapLookup | `.map.key` |
/// | rangeLookup | `.range.value` |
pub fn eval_expr(
    expr: &RulesExpression,
    inputs: &RulesInputs,
    collector: &mut StepCollector,
    step_id: &str,
) -> RulesValue {
    let value = match expr {
        RulesExpression::Const { value } => value.clone(),

        RulesExpression::Attr { key } => inputs.get(key).cloned().unwrap_or(RulesValue::Null),

        RulesExpression::Add { items } => {
            let mut total = 0.0;
            for (i, item) in items.iter().enumerate() {
                let child_id = indexed_step_id(step_id, "add", i);
                total += eval_expr(item, inputs, collector, &child_id).as_number();
            }
            RulesValue::Number(finite_or_zero(total))
        }

        RulesExpression::Mul { items } => {
            let mut product = 1.0;
            for (i, item) in items.iter().enumerate() {
                let child_id = indexed_step_id(step_id, "mul", i);
                product *= eval_expr(item, inputs, collector, &child_id).as_number();
            }
            RulesValue::Number(finite_or_zero(product))
        }

        RulesExpression::Div {
            numerator,
            denominator,
        } => {
            let num = eval_expr(numerator, inputs, collector, &child_step_id(step_id, "num"))
                .as_number();
            let den = eval_expr(denominator, inputs, collector, &child_step_id(step_id, "den"))
                .as_number();
            if den == 0.0 {
                RulesValue::Number(0.0)
            } else {
                RulesValue::Number(finite_or_zero(num / den))
            }
        }

        RulesExpression::Ceil { value } => {
            let n = eval_expr(value, inputs, collector, &child_step_id(step_id, "ceil"))
                .as_number();
            RulesValue::Number(finite_or_zero(n.ceil()))
        }

        RulesExpression::Floor { value } => {
            let n = eval_expr(value, inputs, collector, &child_step_id(step_id, "floor"))
                .as_number();
            RulesValue::Number(finite_or_zero(n.floor()))
        }

        RulesExpression::MapLookup { key, map } => {
            let key = eval_expr(key, inputs, collector, &child_step_id(step_id, "map.key"));
            map.get(&key.as_lookup_key())
                .cloned()
                .unwrap_or(RulesValue::Null)
        }

        RulesExpression::RangeLookup { value, ranges } => {
            let n = eval_expr(value, inputs, collector, &child_step_id(step_id, "range.value"))
                .as_number();
            // First match wins, even when a later range is narrower.
            ranges
                .iter()
                .find(|range| range.contains(n))
                .map(|range| range.result.clone())
                .unwrap_or(RulesValue::Null)
        }

        RulesExpression::Unknown => RulesValue::Null,
    };

    collector.record(step_id.to_string(), expr, &value);
    value
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::expression::RangeBracket;

    fn eval(expr: &RulesExpression, inputs: &RulesInputs) -> (RulesValue, StepCollector) {
        let mut collector = StepCollector::new();
        let value = eval_expr(expr, inputs, &mut collector, "r");
        (value, collector)
    }

    fn num(n: f64) -> RulesExpression {
        RulesExpression::constant(n)
    }

    fn step_ids(collector: &StepCollector) -> Vec<&str> {
        collector.steps().iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn overflowing_arithmetic_is_zero() {
        let inputs = RulesInputs::new();
        let mul = RulesExpression::mul(vec![num(1e308), num(1e308), num(0.0)]);
        let add = RulesExpression::add(vec![num(1e308), num(1e308)]);
        let neg = RulesExpression::add(vec![num(-1e308), num(-1e308)]);

        let (value, collector) = eval(&mul, &inputs);
        assert_eq!(value, RulesValue::Number(0.0));
        for step in collector.steps() {
            if let RulesValue::Number(n) = step.value {
                assert!(n.is_finite(), "{} recorded {}", step.id, n);
            }
        }
        assert_eq!(eval(&add, &inputs).0, RulesValue::Number(0.0));
        assert_eq!(eval(&neg, &inputs).0, RulesValue::Number(0.0));
        assert_eq!(
            eval(&RulesExpression::ceil(add.clone()), &inputs).0,
            RulesValue::Number(0.0)
        );
        assert_eq!(
            eval(&RulesExpression::floor(mul), &inputs).0,
            RulesValue::Number(0.0)
        );
    }

    #[test]
    fn const_and_attr() {
        let inputs = RulesInputs::from([("STR".to_string(), RulesValue::Number(16.0))]);
        assert_eq!(eval(&num(3.0), &inputs).0, RulesValue::Number(3.0));
        assert_eq!(
            eval(&RulesExpression::attr("STR"), &inputs).0,
            RulesValue::Number(16.0)
        );
    }

    #[test]
    fn missing_attr_is_null() {
        let (value, collector) = eval(&RulesExpression::attr("CHA"), &RulesInputs::new());
        assert_eq!(value, RulesValue::Null);
        assert_eq!(collector.steps()[0].value, RulesValue::Null);
    }

    #[test]
    fn add_coerces_items() {
        let expr = RulesExpression::add(vec![
            num(2.0),
            RulesExpression::constant("3"),
            RulesExpression::constant(true),
            RulesExpression::constant(RulesValue::Null),
            RulesExpression::constant("junk"),
        ]);
        assert_eq!(eval(&expr, &RulesInputs::new()).0, RulesValue::Number(6.0));
    }

    #[test]
    fn empty_add_and_mul_identities() {
        let (sum, _) = eval(&RulesExpression::add(vec![]), &RulesInputs::new());
        let (product, _) = eval(&RulesExpression::mul(vec![]), &RulesInputs::new());
        assert_eq!(sum, RulesValue::Number(0.0));
        assert_eq!(product, RulesValue::Number(1.0));
    }

    #[test]
    fn mul_multiplies() {
        let expr = RulesExpression::mul(vec![num(3.0), num(4.0), num(0.5)]);
        assert_eq!(eval(&expr, &RulesInputs::new()).0, RulesValue::Number(6.0));
    }

    #[test]
    fn div_by_zero_is_zero() {
        let expr = RulesExpression::div(num(10.0), num(0.0));
        let (value, collector) = eval(&expr, &RulesInputs::new());
        assert_eq!(value, RulesValue::Number(0.0));
        assert_eq!(step_ids(&collector), vec!["r.num", "r.den", "r"]);
    }

    #[test]
    fn div_by_missing_attr_is_zero() {
        let expr = RulesExpression::div(num(10.0), RulesExpression::attr("nope"));
        assert_eq!(eval(&expr, &RulesInputs::new()).0, RulesValue::Number(0.0));
    }

    #[test]
    fn ceil_and_floor() {
        let half = RulesExpression::div(num(15.0), num(2.0));
        assert_eq!(
            eval(&RulesExpression::ceil(half.clone()), &RulesInputs::new()).0,
            RulesValue::Number(8.0)
        );
        assert_eq!(
            eval(&RulesExpression::floor(half), &RulesInputs::new()).0,
            RulesValue::Number(7.0)
        );
    }

    #[test]
    fn map_lookup_hit_and_miss() {
        let map = BTreeMap::from([
            ("dwarf".to_string(), RulesValue::Number(8.0)),
            ("".to_string(), RulesValue::from("blank")),
        ]);
        let expr = RulesExpression::map_lookup(RulesExpression::attr("kin_id"), map);

        let inputs = RulesInputs::from([("kin_id".to_string(), RulesValue::from("dwarf"))]);
        assert_eq!(eval(&expr, &inputs).0, RulesValue::Number(8.0));

        let inputs = RulesInputs::from([("kin_id".to_string(), RulesValue::from("Dwarf"))]);
        let (value, collector) = eval(&expr, &inputs);
        assert_eq!(value, RulesValue::Null);
        assert_eq!(collector.steps().last().unwrap().value, RulesValue::Null);

        // A null key is looked up as the empty string.
        assert_eq!(eval(&expr, &RulesInputs::new()).0, RulesValue::from("blank"));
    }

    #[test]
    fn map_lookup_stringifies_numeric_keys() {
        let map = BTreeMap::from([("3".to_string(), RulesValue::from("three"))]);
        let expr = RulesExpression::map_lookup(num(3.0), map);
        assert_eq!(eval(&expr, &RulesInputs::new()).0, RulesValue::from("three"));
    }

    #[test]
    fn range_lookup_first_match_wins() {
        let expr = RulesExpression::range_lookup(
            num(7.0),
            vec![
                RangeBracket::new(0.0, 10.0, "a"),
                RangeBracket::new(5.0, 15.0, "b"),
            ],
        );
        assert_eq!(eval(&expr, &RulesInputs::new()).0, RulesValue::from("a"));
    }

    #[test]
    fn range_lookup_bounds_inclusive_and_miss_is_null() {
        let ranges = vec![
            RangeBracket::new(1.0, 12.0, RulesValue::Null),
            RangeBracket::new(13.0, 16.0, "+D4"),
        ];
        let at = |n: f64| {
            eval(
                &RulesExpression::range_lookup(num(n), ranges.clone()),
                &RulesInputs::new(),
            )
            .0
        };
        assert_eq!(at(13.0), RulesValue::from("+D4"));
        assert_eq!(at(16.0), RulesValue::from("+D4"));
        assert_eq!(at(17.0), RulesValue::Null);
        assert_eq!(at(12.5), RulesValue::Null);
    }

    #[test]
    fn unknown_operator_is_null() {
        let (value, collector) = eval(&RulesExpression::Unknown, &RulesInputs::new());
        assert_eq!(value, RulesValue::Null);
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn steps_are_post_order() {
        // movement = kin base + AGL modifier
        let expr = RulesExpression::add(vec![
            RulesExpression::map_lookup(
                RulesExpression::attr("kin_id"),
                BTreeMap::from([("human".to_string(), RulesValue::Number(10.0))]),
            ),
            RulesExpression::range_lookup(
                RulesExpression::attr("AGL"),
                vec![RangeBracket::new(13.0, 15.0, 1.0)],
            ),
        ]);
        let inputs = RulesInputs::from([
            ("kin_id".to_string(), RulesValue::from("human")),
            ("AGL".to_string(), RulesValue::Number(14.0)),
        ]);
        let mut collector = StepCollector::new();
        let value = eval_expr(&expr, &inputs, &mut collector, "movement");

        assert_eq!(value, RulesValue::Number(11.0));
        assert_eq!(
            step_ids(&collector),
            vec![
                "movement.add.0.map.key",
                "movement.add.0",
                "movement.add.1.range.value",
                "movement.add.1",
                "movement",
            ]
        );
        assert_eq!(collector.steps()[4].expression, expr);
    }
}
