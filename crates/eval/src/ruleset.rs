//! Ruleset evaluation.
//!
//! Rules run in declaration order against the same, unmodified input
//! record. A rule never sees another rule's output: outputs are collected
//! into a separate map, and when two rules share an output name the later
//! one overwrites the earlier one without error.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::evaluate::eval_expr;
use crate::expression::RulesExpression;
use crate::trace::{child_step_id, indexed_step_id, RuleStep, StepCollector};
use crate::value::{RulesInputs, RulesValue};

/// A named rule writing one output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesRule {
    pub id: String,
    /// Key written into the outputs map.
    pub output: String,
    pub expression: RulesExpression,
}

/// An ordered collection of rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ruleset {
    pub id: String,
    pub name: String,
    pub rules: Vec<RulesRule>,
}

/// Full evaluation trace of one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleReceipt {
    pub rule_id: String,
    pub output: String,
    pub inputs: RulesInputs,
    pub steps: Vec<RuleStep>,
    pub result: RulesValue,
}

/// Outputs of a whole ruleset plus one receipt per rule, in rule order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RulesEvaluationResult {
    pub outputs: BTreeMap<String, RulesValue>,
    pub receipts: Vec<RuleReceipt>,
}

impl RulesEvaluationResult {
    pub fn output(&self, name: &str) -> Option<&RulesValue> {
        self.outputs.get(name)
    }

    pub fn receipt(&self, rule_id: &str) -> Option<&RuleReceipt> {
        self.receipts.iter().find(|r| r.rule_id == rule_id)
    }
}

/// Evaluate a single rule with a fresh step trace rooted at the rule id.
pub fn eval_rule(rule: &RulesRule, inputs: &RulesInputs) -> RuleReceipt {
    let mut collector = StepCollector::new();
    let result = eval_expr(&rule.expression, inputs, &mut collector, &rule.id);

    RuleReceipt {
        rule_id: rule.id.clone(),
        output: rule.output.clone(),
        inputs: inputs.clone(),
        steps: collector.into_steps(),
        result,
    }
}

/// Evaluate every rule of `ruleset` in order.
pub fn eval_ruleset(ruleset: &Ruleset, inputs: &RulesInputs) -> RulesEvaluationResult {
    let mut outputs = BTreeMap::new();
    let mut receipts = Vec::with_capacity(ruleset.rules.len());

    for rule in &ruleset.rules {
        let receipt = eval_rule(rule, inputs);
        tracing::trace!(
            ruleset = %ruleset.id,
            rule = %rule.id,
            output = %rule.output,
            result = %receipt.result,
            steps = receipt.steps.len(),
            "rule evaluated"
        );
        outputs.insert(rule.output.clone(), receipt.result.clone());
        receipts.push(receipt);
    }

    RulesEvaluationResult { outputs, receipts }
}

// ──────────────────────────────────────────────
// Lint
// ──────────────────────────────────────────────

/// Structural findings that do not change evaluation but usually indicate
/// a mistake in a ruleset definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RulesetWarning {
    /// Several rules write the same output; only the last one survives.
    DuplicateOutput { output: String, rule_ids: Vec<String> },
    /// Two ranges of one `rangeLookup` overlap, so first-match hides part
    /// of the later range.
    OverlappingRanges {
        rule_id: String,
        step_id: String,
        first: usize,
        second: usize,
    },
}

impl std::fmt::Display for RulesetWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesetWarning::DuplicateOutput { output, rule_ids } => write!(
                f,
                "output '{}' is written by {} rules ({}); the last one wins",
                output,
                rule_ids.len(),
                rule_ids.join(", ")
            ),
            RulesetWarning::OverlappingRanges {
                step_id,
                first,
                second,
                ..
            } => write!(
                f,
                "{}: range {} overlaps range {}; range {} only matches outside the overlap",
                step_id, first, second, second
            ),
        }
    }
}

impl Ruleset {
    /// Report duplicate outputs and overlapping bracket ranges.
    pub fn lint(&self) -> Vec<RulesetWarning> {
        let mut warnings = Vec::new();

        let mut writers: HashMap<&str, Vec<String>> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for rule in &self.rules {
            let entry = writers.entry(rule.output.as_str()).or_default();
            if entry.is_empty() {
                order.push(rule.output.as_str());
            }
            entry.push(rule.id.clone());
        }
        for output in order {
            let rule_ids = &writers[output];
            if rule_ids.len() > 1 {
                warnings.push(RulesetWarning::DuplicateOutput {
                    output: output.to_string(),
                    rule_ids: rule_ids.clone(),
                });
            }
        }

        for rule in &self.rules {
            lint_ranges(&rule.expression, &rule.id, &rule.id, &mut warnings);
        }

        warnings
    }
}

/// Walk the tree with the evaluator's step ids so findings point at the
/// same node a receipt would.
fn lint_ranges(
    expr: &RulesExpression,
    rule_id: &str,
    step_id: &str,
    warnings: &mut Vec<RulesetWarning>,
) {
    match expr {
        RulesExpression::Const { .. } | RulesExpression::Attr { .. } => {}
        RulesExpression::Unknown => {}
        RulesExpression::Add { items } => {
            for (i, item) in items.iter().enumerate() {
                lint_ranges(item, rule_id, &indexed_step_id(step_id, "add", i), warnings);
            }
        }
        RulesExpression::Mul { items } => {
            for (i, item) in items.iter().enumerate() {
                lint_ranges(item, rule_id, &indexed_step_id(step_id, "mul", i), warnings);
            }
        }
        RulesExpression::Div {
            numerator,
            denominator,
        } => {
            lint_ranges(numerator, rule_id, &child_step_id(step_id, "num"), warnings);
            lint_ranges(denominator, rule_id, &child_step_id(step_id, "den"), warnings);
        }
        RulesExpression::Ceil { value } => {
            lint_ranges(value, rule_id, &child_step_id(step_id, "ceil"), warnings);
        }
        RulesExpression::Floor { value } => {
            lint_ranges(value, rule_id, &child_step_id(step_id, "floor"), warnings);
        }
        RulesExpression::MapLookup { key, .. } => {
            lint_ranges(key, rule_id, &child_step_id(step_id, "map.key"), warnings);
        }
        RulesExpression::RangeLookup { value, ranges } => {
            lint_ranges(value, rule_id, &child_step_id(step_id, "range.value"), warnings);
            for (i, a) in ranges.iter().enumerate() {
                for (j, b) in ranges.iter().enumerate().skip(i + 1) {
                    if a.overlaps(b) {
                        warnings.push(RulesetWarning::OverlappingRanges {
                            rule_id: rule_id.to_string(),
                            step_id: step_id.to_string(),
                            first: i,
                            second: j,
                        });
                    }
                }
            }
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
