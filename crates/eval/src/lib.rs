//! Declarative rules evaluator -- evaluates typed expression trees against
//! a flat input record and produces a receipt of every step taken.
//!
//! The evaluator and the ruleset runner are total: malformed inputs coerce
//! to safe defaults instead of failing, so nothing in this crate returns
//! an error.

pub mod evaluate;
pub mod expression;
pub mod ruleset;
pub mod trace;
pub mod value;

pub use evaluate::eval_expr;
pub use expression::{RangeBracket, RulesExpression};
pub use ruleset::{
    eval_rule, eval_ruleset, RuleReceipt, RulesEvaluationResult, RulesRule, Ruleset,
    RulesetWarning,
};
pub use trace::{RuleStep, StepCollector};
pub use value::{RulesInputs, RulesValue};

/// Evaluate a ruleset given as JSON against an input record given as JSON.
///
/// This is the entry point for callers holding wire-form rulesets (content
/// packs, the CLI). Typed callers use [`eval_ruleset`] directly.
pub fn evaluate(
    ruleset: &serde_json::Value,
    inputs: &serde_json::Value,
) -> Result<RulesEvaluationResult, serde_json::Error> {
    let ruleset: Ruleset = serde_json::from_value(ruleset.clone())?;
    let inputs: RulesInputs = serde_json::from_value(inputs.clone())?;
    Ok(eval_ruleset(&ruleset, &inputs))
}
