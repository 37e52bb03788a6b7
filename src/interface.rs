//! Threaded interface for running a generation across several shards.
//!
//! The selection is dealt round-robin onto `shards` scoped threads. Every shard
//! owns its output; nothing is shared between shards except the read-only
//! catalog and value pool. Results are merged back in catalog order, so the
//! outcome is identical to a sequential run with the same seed.
//!
//! Cancellation is cooperative via an `Arc<AtomicBool>` checked between
//! descriptors.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::catalog::OperationId;
use crate::error::{ConcordError, Result};
use crate::generator::{ExpressionGenerator, GeneratorConfig};
use crate::operation::OperationDescriptor;
use crate::pool::ValuePool;
use crate::report::{DescriptorRun, GenerationReport};
use crate::selector::Selection;

/// Cancellation token shared with the shard threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);
impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct GenerationInterface<'p> {
    pool: &'p dyn ValuePool,
    config: GeneratorConfig,
    shards: usize,
    cancel: CancelToken,
}

impl<'p> GenerationInterface<'p> {
    pub fn new(pool: &'p dyn ValuePool, config: GeneratorConfig, shards: usize) -> Self {
        Self {
            pool,
            config,
            shards: shards.max(1),
            cancel: CancelToken::new(),
        }
    }
    pub fn shards(&self) -> usize {
        self.shards
    }
    /// A handle that can cancel a running [`GenerationInterface::run`] from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn run(&self, selection: &Selection) -> Result<GenerationReport> {
        let started = Instant::now();
        let descriptors = selection.descriptors();
        let shard_count = self.shards.min(descriptors.len()).max(1);

        let mut dealt: Vec<Vec<(usize, OperationId, &OperationDescriptor)>> =
            vec![Vec::new(); shard_count];
        for (position, (id, descriptor)) in descriptors.iter().enumerate() {
            dealt[position % shard_count].push((position, *id, *descriptor));
        }

        let shard_results: Vec<Result<Vec<(usize, DescriptorRun)>>> = thread::scope(|scope| {
            let handles: Vec<_> = dealt
                .into_iter()
                .enumerate()
                .map(|(shard, work)| scope.spawn(move || self.run_shard(shard, work)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(ConcordError::Invariant("generation shard panicked".into()))
                    })
                })
                .collect()
        });

        let mut merged = Vec::with_capacity(descriptors.len());
        for result in shard_results {
            merged.extend(result?);
        }
        merged.sort_by_key(|(position, _)| *position);
        let runs = merged.into_iter().map(|(_, run)| run).collect();

        let report = GenerationReport::assemble(self.config.seed, runs, selection.excluded());
        info!(
            seed = self.config.seed,
            shards = shard_count,
            emitted = report.emitted(),
            ms = started.elapsed().as_secs_f64() * 1000.0,
            "sharded generation complete"
        );
        Ok(report)
    }

    fn run_shard(
        &self,
        shard: usize,
        work: Vec<(usize, OperationId, &OperationDescriptor)>,
    ) -> Result<Vec<(usize, DescriptorRun)>> {
        let generator = ExpressionGenerator::new(self.pool, self.config);
        let mut runs = Vec::with_capacity(work.len());
        for (position, id, descriptor) in work {
            if self.cancel.is_cancelled() {
                warn!(shard, "generation cancelled");
                return Err(ConcordError::Cancelled);
            }
            runs.push((position, generator.generate_descriptor(id, descriptor)?));
        }
        debug!(shard, descriptors = runs.len(), "shard finished");
        Ok(runs)
    }
}
