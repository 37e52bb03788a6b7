//! The boundary towards the consistency evaluator.
//!
//! Executing expressions on the reference engine and on the system under test,
//! and deciding whether their outputs agree, happens outside this crate. The
//! evaluator only has to implement [`ConsistencyEvaluator`]; [`evaluate_all`]
//! feeds it the generated expressions and tallies the verdicts.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::report::GeneratedExpression;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum Verdict {
    Consistent,
    Inconsistent { detail: String },
    /// Executed on the system under test only, nothing was compared.
    StandaloneOnly,
}

pub trait ConsistencyEvaluator {
    fn evaluate(&self, expression: &GeneratedExpression) -> Result<Verdict>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOptions {
    /// Hand expressions the reference engine cannot judge to the evaluator anyway.
    pub allow_standalone: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            allow_standalone: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub consistent: usize,
    pub standalone: usize,
    pub not_evaluated: usize,
    /// Rendered syntax and detail of every divergence, in evaluation order.
    pub inconsistent: Vec<(String, String)>,
}

impl EvaluationSummary {
    pub fn passed(&self) -> bool {
        self.inconsistent.is_empty()
    }
    pub fn evaluated(&self) -> usize {
        self.consistent + self.standalone + self.inconsistent.len()
    }
}

pub fn evaluate_all<'e, E, I>(
    evaluator: &E,
    expressions: I,
    options: EvaluationOptions,
) -> Result<EvaluationSummary>
where
    E: ConsistencyEvaluator + ?Sized,
    I: IntoIterator<Item = &'e GeneratedExpression>,
{
    let mut summary = EvaluationSummary::default();
    for expression in expressions {
        if !expression.reference_eligible && !options.allow_standalone {
            summary.not_evaluated += 1;
            continue;
        }
        match evaluator.evaluate(expression)? {
            Verdict::Consistent => summary.consistent += 1,
            Verdict::StandaloneOnly => summary.standalone += 1,
            Verdict::Inconsistent { detail } => {
                warn!(syntax = %expression.syntax, %detail, "inconsistent output");
                summary.inconsistent.push((expression.syntax.clone(), detail));
            }
        }
    }
    debug!(
        consistent = summary.consistent,
        inconsistent = summary.inconsistent.len(),
        standalone = summary.standalone,
        "evaluation finished"
    );
    Ok(summary)
}
