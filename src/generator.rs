//! Expression generation.
//!
//! For every selected descriptor the generator asks each slot for its
//! candidates, keeps the ones the resolver accepts, and combines them into
//! rendered expressions. Small cross-products are enumerated completely in
//! odometer order (the last slot varies fastest). Larger ones are sampled with
//! a ChaCha RNG seeded from the run seed and the descriptor id, so a descriptor
//! yields the same expressions whether it runs alone, sequentially, or in a shard.
//!
//! Work per descriptor is bounded by a relevance-scaled expression quota, a
//! cap on combinations tried and an optional time budget. A descriptor with an
//! unsatisfiable slot yields nothing and is reported as skipped.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use roaring::RoaringTreemap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::catalog::OperationId;
use crate::error::Result;
use crate::operation::{OperationDescriptor, Relevance};
use crate::pool::{Candidate, ValuePool};
use crate::report::{
    DescriptorOutcome, DescriptorRun, GeneratedExpression, GenerationReport, OutcomeStatus,
    SkipReason, TruncationReason,
};
use crate::resolver::resolve_candidate;
use crate::selector::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Expressions per descriptor of default relevance, scaled by relevance weight.
    pub max_expressions_per_descriptor: usize,
    /// Upper bound on combinations enumerated or sampling draws per descriptor.
    pub max_combinations_per_descriptor: u64,
    pub time_budget_ms: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_expressions_per_descriptor: 24,
            max_combinations_per_descriptor: 10_000,
            time_budget_ms: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
    pub fn quota(&self, relevance: Relevance) -> usize {
        let scaled = self.max_expressions_per_descriptor.saturating_mul(relevance.weight());
        (scaled / Relevance::Default.weight()).max(1)
    }
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

/// Seed of the RNG used for one descriptor, independent of run order.
pub fn descriptor_seed(seed: u64, id: OperationId) -> u64 {
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..].copy_from_slice(&(id.0 as u64).to_le_bytes());
    seahash::hash(&bytes)
}

// mixed radix, last slot varies fastest
fn decode(mut index: u64, radices: &[u64]) -> Vec<usize> {
    let mut tuple = vec![0; radices.len()];
    for (slot, radix) in radices.iter().enumerate().rev() {
        tuple[slot] = (index % radix) as usize;
        index /= radix;
    }
    tuple
}

struct Deadline(Option<Instant>);

impl Deadline {
    fn new(budget: Option<Duration>) -> Self {
        Self(budget.map(|b| Instant::now() + b))
    }
    fn passed(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

pub struct ExpressionGenerator<'p> {
    pool: &'p dyn ValuePool,
    config: GeneratorConfig,
}

impl<'p> ExpressionGenerator<'p> {
    pub fn new(pool: &'p dyn ValuePool, config: GeneratorConfig) -> Self {
        Self { pool, config }
    }
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&self, selection: &Selection) -> Result<GenerationReport> {
        let mut runs = Vec::with_capacity(selection.len());
        for (id, descriptor) in selection.descriptors() {
            runs.push(self.generate_descriptor(*id, descriptor)?);
        }
        let report = GenerationReport::assemble(self.config.seed, runs, selection.excluded());
        info!(
            seed = self.config.seed,
            emitted = report.emitted(),
            skipped = report.skipped().count(),
            truncated = report.truncated().count(),
            "generation complete"
        );
        Ok(report)
    }

    /// Accepted candidates per slot, or the first slot nothing satisfies.
    fn resolve_slots(
        &self,
        descriptor: &OperationDescriptor,
    ) -> (std::result::Result<Vec<Vec<Candidate>>, SkipReason>, usize) {
        let mut rejected = 0;
        let mut slots = Vec::with_capacity(descriptor.arity());
        for (slot, param) in descriptor.parameters().iter().enumerate() {
            let drawn = match param.constants() {
                Some(_) => param.constant_candidates(),
                None => self.pool.candidates(param.accepted()),
            };
            let drawn_count = drawn.len();
            let accepted: Vec<Candidate> = drawn
                .into_iter()
                .filter(|c| resolve_candidate(param, c).is_accepted())
                .collect();
            let slot_rejected = drawn_count - accepted.len();
            rejected += slot_rejected;
            if accepted.is_empty() {
                return (
                    Err(SkipReason::UnsatisfiableParameter {
                        slot,
                        rejected: slot_rejected,
                    }),
                    rejected,
                );
            }
            slots.push(accepted);
        }
        (Ok(slots), rejected)
    }

    pub fn generate_descriptor(
        &self,
        id: OperationId,
        descriptor: &OperationDescriptor,
    ) -> Result<DescriptorRun> {
        let deadline = Deadline::new(self.config.time_budget());
        let signature = descriptor.signature();
        let (slots, rejected_candidates) = self.resolve_slots(descriptor);
        let slots = match slots {
            Ok(slots) => slots,
            Err(reason) => {
                info!(descriptor = %id, %signature, ?reason, "descriptor skipped");
                return Ok(DescriptorRun {
                    outcome: DescriptorOutcome {
                        descriptor: id,
                        signature,
                        status: OutcomeStatus::Skipped { reason },
                        emitted: 0,
                        combinations: None,
                        rejected_candidates,
                    },
                    expressions: Vec::new(),
                });
            }
        };

        let radices: Vec<u64> = slots.iter().map(|s| s.len() as u64).collect();
        let combinations = radices.iter().try_fold(1u64, |acc, r| acc.checked_mul(*r));
        let quota = self.config.quota(descriptor.get_relevance());
        let (tuples, mut truncation): (Vec<Vec<usize>>, Option<TruncationReason>) =
            match combinations {
                Some(total) if total <= quota as u64 => self.enumerate(total, &radices),
                Some(total) => self.sample_indices(id, total, quota, &radices, &deadline),
                None => self.sample_tuples(id, quota, &radices, &deadline),
            };

        let mut expressions = Vec::with_capacity(tuples.len());
        for tuple in tuples {
            if deadline.passed() {
                truncation = Some(TruncationReason::TimeBudget);
                break;
            }
            let arguments: Vec<Candidate> = tuple
                .iter()
                .enumerate()
                .map(|(slot, i)| slots[slot][*i].clone())
                .collect();
            let args: Vec<&str> = arguments.iter().map(|a| a.syntax()).collect();
            let syntax = descriptor.render(&args)?;
            expressions.push(GeneratedExpression {
                descriptor: id,
                name: descriptor.name().to_owned(),
                syntax,
                arguments,
                return_type: *descriptor.return_type(),
                reference_eligible: descriptor.is_reference_compatible(),
            });
        }

        let status = match truncation {
            Some(reason) => {
                info!(
                    descriptor = %id,
                    %signature,
                    ?reason,
                    emitted = expressions.len(),
                    "descriptor truncated"
                );
                OutcomeStatus::Truncated { reason }
            }
            None => OutcomeStatus::Emitted,
        };
        debug!(
            descriptor = %id,
            %signature,
            emitted = expressions.len(),
            ?combinations,
            "descriptor generated"
        );
        Ok(DescriptorRun {
            outcome: DescriptorOutcome {
                descriptor: id,
                signature,
                status,
                emitted: expressions.len(),
                combinations,
                rejected_candidates,
            },
            expressions,
        })
    }

    // the whole cross-product in odometer order, cut short at the combination cap
    fn enumerate(
        &self,
        total: u64,
        radices: &[u64],
    ) -> (Vec<Vec<usize>>, Option<TruncationReason>) {
        let cap = self.config.max_combinations_per_descriptor;
        let tuples = (0..total.min(cap)).map(|i| decode(i, radices)).collect();
        (tuples, (total > cap).then_some(TruncationReason::CombinationCap))
    }

    // distinct indexes into the cross-product, emitted in ascending order
    fn sample_indices(
        &self,
        id: OperationId,
        total: u64,
        quota: usize,
        radices: &[u64],
        deadline: &Deadline,
    ) -> (Vec<Vec<usize>>, Option<TruncationReason>) {
        let mut rng = ChaCha8Rng::seed_from_u64(descriptor_seed(self.config.seed, id));
        let mut sampled = RoaringTreemap::new();
        let mut draws = 0u64;
        let mut truncation = None;
        while sampled.len() < quota as u64 {
            if draws >= self.config.max_combinations_per_descriptor {
                truncation = Some(TruncationReason::CombinationCap);
                break;
            }
            if deadline.passed() {
                truncation = Some(TruncationReason::TimeBudget);
                break;
            }
            sampled.insert(rng.random_range(0..total));
            draws += 1;
        }
        (sampled.iter().map(|i| decode(i, radices)).collect(), truncation)
    }

    // for cross-products too large to index, tuples are drawn slot by slot
    fn sample_tuples(
        &self,
        id: OperationId,
        quota: usize,
        radices: &[u64],
        deadline: &Deadline,
    ) -> (Vec<Vec<usize>>, Option<TruncationReason>) {
        let mut rng = ChaCha8Rng::seed_from_u64(descriptor_seed(self.config.seed, id));
        let mut sampled = BTreeSet::new();
        let mut draws = 0u64;
        let mut truncation = None;
        while sampled.len() < quota {
            if draws >= self.config.max_combinations_per_descriptor {
                truncation = Some(TruncationReason::CombinationCap);
                break;
            }
            if deadline.passed() {
                truncation = Some(TruncationReason::TimeBudget);
                break;
            }
            let tuple: Vec<usize> = radices
                .iter()
                .map(|radix| rng.random_range(0..*radix) as usize)
                .collect();
            sampled.insert(tuple);
            draws += 1;
        }
        (sampled.into_iter().collect(), truncation)
    }
}
