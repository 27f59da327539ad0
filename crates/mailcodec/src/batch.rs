//! Per-id dispatch with aggregated failures
//!
//! Every id is attempted even after a failure. Failures are collected in
//! input order and surfaced as one [`CodecError::BatchPartialFailure`].

use log::{debug, warn};
use rayon::prelude::*;

use crate::config::BatchOptions;
use crate::error::{BatchFailure, CodecError, Result};
use crate::models::MessageId;

/// Run `op` once per id sequentially, aggregating failures under `label`
pub fn batch_operation<F>(ids: &[MessageId], op: F, label: &str) -> Result<()>
where
    F: Fn(&MessageId) -> anyhow::Result<()> + Sync,
{
    BatchDispatcher::new().dispatch(ids, op, label)
}

/// Dispatches a per-id operation, optionally on a bounded worker pool
#[derive(Debug, Clone, Copy)]
pub struct BatchDispatcher {
    workers: usize,
}

impl Default for BatchDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchDispatcher {
    /// Sequential dispatcher
    pub fn new() -> Self {
        Self { workers: 1 }
    }

    /// Dispatcher running up to `workers` operations at once (0 is treated as 1)
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn from_options(options: &BatchOptions) -> Self {
        Self::with_workers(options.workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn dispatch<F>(&self, ids: &[MessageId], op: F, label: &str) -> Result<()>
    where
        F: Fn(&MessageId) -> anyhow::Result<()> + Sync,
    {
        if ids.is_empty() {
            return Ok(());
        }

        debug!("Dispatching {} for {} messages", label, ids.len());

        let failures: Vec<BatchFailure> = self
            .run(ids, &op)
            .into_iter()
            .flatten()
            .collect();

        if failures.is_empty() {
            return Ok(());
        }

        warn!(
            "Failed to {} {} of {} messages",
            label,
            failures.len(),
            ids.len()
        );
        Err(CodecError::BatchPartialFailure {
            label: label.to_string(),
            failures,
        })
    }

    /// One slot per id, in input order
    fn run<F>(&self, ids: &[MessageId], op: &F) -> Vec<Option<BatchFailure>>
    where
        F: Fn(&MessageId) -> anyhow::Result<()> + Sync,
    {
        if self.workers > 1 && ids.len() > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
            {
                Ok(pool) => {
                    return pool.install(|| ids.par_iter().map(|id| attempt(id, op)).collect());
                }
                Err(e) => warn!("Worker pool unavailable, dispatching sequentially: {}", e),
            }
        }
        ids.iter().map(|id| attempt(id, op)).collect()
    }
}

fn attempt<F>(id: &MessageId, op: &F) -> Option<BatchFailure>
where
    F: Fn(&MessageId) -> anyhow::Result<()>,
{
    op(id).err().map(|e| BatchFailure {
        id: id.to_string(),
        message: format!("{e:#}"),
    })
}
