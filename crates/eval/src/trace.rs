//! Evaluation trace types.
//!
//! Every expression node visited during evaluation leaves one
//! [`RuleStep`]. Steps are recorded in post-order: a node's children
//! are recorded before the node itself, so the trace is a flat walk of
//! the tree rather than a nested structure.

use serde::{Deserialize, Serialize};

use crate::expression::RulesExpression;
use crate::value::RulesValue;

/// One visited node: where it sits in the tree, what it was, what it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleStep {
    /// Hierarchical position, e.g. `movement.add.1.range.value`.
    pub id: String,
    pub expression: RulesExpression,
    pub value: RulesValue,
}

/// Sink that collects steps while an expression is evaluated.
#[derive(Debug, Clone, Default)]
pub struct StepCollector {
    steps: Vec<RuleStep>,
}

impl StepCollector {
    pub fn new() -> Self {
        StepCollector { steps: Vec::new() }
    }

    /// Record a finished node.
    pub fn record(&mut self, id: String, expression: &RulesExpression, value: &RulesValue) {
        self.steps.push(RuleStep {
            id,
            expression: expression.clone(),
            value: value.clone(),
        });
    }

    pub fn steps(&self) -> &[RuleStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Finalize into the ordered step list.
    pub fn into_steps(self) -> Vec<RuleStep> {
        self.steps
    }
}

/// Step id of a list operand: `<parent>.<op>.<index>`.
pub(crate) fn indexed_step_id(parent: &str, op: &str, index: usize) -> String {
    format!("{}.{}.{}", parent, op, index)
}

/// Step id of a fixed-position operand: `<parent>.<suffix>`.
pub(crate) fn child_step_id(parent: &str, suffix: &str) -> String {
    format!("{}.{}", parent, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_keeps_record_order() {
        let mut c = StepCollector::new();
        c.record(
            "r.add.0".to_string(),
            &RulesExpression::constant(1.0),
            &RulesValue::Number(1.0),
        );
        c.record(
            "r".to_string(),
            &RulesExpression::add(vec![RulesExpression::constant(1.0)]),
            &RulesValue::Number(1.0),
        );
        let ids: Vec<_> = c.steps().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["r.add.0", "r"]);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn step_ids() {
        assert_eq!(indexed_step_id("movement", "add", 1), "movement.add.1");
        assert_eq!(child_step_id("cap.ceil", "num"), "cap.ceil.num");
    }
}
