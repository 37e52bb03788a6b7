//! Generation results: the emitted expressions plus one outcome per selected
//! descriptor, so skipped and truncated descriptors can be reported.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::OperationId;
use crate::datatype::ReturnTypeSpec;
use crate::error::Result;
use crate::pool::Candidate;
use crate::selector::Exclusion;

/// One executable test expression, as handed to the consistency evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedExpression {
    pub descriptor: OperationId,
    pub name: String,
    pub syntax: String,
    pub arguments: Vec<Candidate>,
    pub return_type: ReturnTypeSpec,
    /// Whether the result may be compared against the reference engine.
    pub reference_eligible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkipReason {
    /// No candidate of the pool satisfied this slot.
    UnsatisfiableParameter { slot: usize, rejected: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    CombinationCap,
    TimeBudget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum OutcomeStatus {
    Emitted,
    Truncated { reason: TruncationReason },
    Skipped { reason: SkipReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorOutcome {
    pub descriptor: OperationId,
    pub signature: String,
    pub status: OutcomeStatus,
    pub emitted: usize,
    /// Size of the cross-product of accepted candidates, `None` if it overflows.
    pub combinations: Option<u64>,
    pub rejected_candidates: usize,
}

/// What generating a single descriptor produced.
#[derive(Debug, Clone)]
pub struct DescriptorRun {
    pub outcome: DescriptorOutcome,
    pub expressions: Vec<GeneratedExpression>,
}

// ------------- GenerationReport -------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub expressions: Vec<GeneratedExpression>,
    pub outcomes: Vec<DescriptorOutcome>,
    pub excluded: Vec<(OperationId, Exclusion)>,
}

impl GenerationReport {
    /// Runs must already be in catalog order.
    pub fn assemble(
        seed: u64,
        runs: Vec<DescriptorRun>,
        excluded: &[(OperationId, Exclusion)],
    ) -> Self {
        let mut expressions = Vec::new();
        let mut outcomes = Vec::with_capacity(runs.len());
        for run in runs {
            expressions.extend(run.expressions);
            outcomes.push(run.outcome);
        }
        Self {
            seed,
            expressions,
            outcomes,
            excluded: excluded.to_vec(),
        }
    }
    pub fn emitted(&self) -> usize {
        self.expressions.len()
    }
    pub fn skipped(&self) -> impl Iterator<Item = &DescriptorOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Skipped { .. }))
    }
    pub fn truncated(&self) -> impl Iterator<Item = &DescriptorOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Truncated { .. }))
    }
    /// The rendered expressions, one per line, in emission order.
    pub fn syntax_lines(&self) -> Vec<&str> {
        self.expressions.iter().map(|e| e.syntax.as_str()).collect()
    }
    /// One JSON object per expression, newline separated.
    pub fn to_json_lines(&self) -> Result<String> {
        let mut out = String::new();
        for expression in &self.expressions {
            out.push_str(&serde_json::to_string(expression)?);
            out.push('\n');
        }
        Ok(out)
    }
    /// blake3 digest over the ordered expression syntax.
    pub fn digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for expression in &self.expressions {
            hasher.update(expression.syntax.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "seed {}: {} expressions from {} descriptors ({} skipped, {} truncated, {} excluded)",
            self.seed,
            self.emitted(),
            self.outcomes.len(),
            self.skipped().count(),
            self.truncated().count(),
            self.excluded.len()
        )?;
        for outcome in &self.outcomes {
            let status = match outcome.status {
                OutcomeStatus::Emitted => "emitted".to_string(),
                OutcomeStatus::Truncated { reason } => format!("truncated ({reason:?})"),
                OutcomeStatus::Skipped {
                    reason: SkipReason::UnsatisfiableParameter { slot, rejected },
                } => format!("skipped (slot {slot} unsatisfiable, {rejected} rejected)"),
            };
            writeln!(
                f,
                "  {:>4} {:<60} {:>4} {}",
                outcome.descriptor.to_string(),
                outcome.signature,
                outcome.emitted,
                status
            )?;
        }
        Ok(())
    }
}
