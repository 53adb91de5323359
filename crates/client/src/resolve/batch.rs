//! Sequential batch resolution.
//!
//! Batches run strictly in input order, one item at a time. Deterministic
//! progress is part of the contract with the UI layer, so items are never
//! resolved concurrently. Per-item failures become that item's outcome;
//! only setup validation fails the batch as a whole.

use thiserror::Error;
use tracing::instrument;

use nameport_core::Network;

use super::{ResolutionBackend, ResolutionOutcome, ResolutionService};
use crate::registrar::RegistrarApi;

/// Most inputs accepted in a single batch.
pub const MAX_BATCH_INPUTS: usize = 10;

/// Which way a batch resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchDirection {
    NameToAddress,
    AddressToName,
}

/// A batch submission: direction, ordered raw inputs, and the network every
/// item resolves against.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub direction: BatchDirection,
    pub inputs: Vec<String>,
    pub network: Network,
}

/// Setup errors that reject a batch before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("batch has no inputs")]
    Empty,

    #[error("batch has {0} inputs, maximum is {MAX_BATCH_INPUTS}")]
    TooManyInputs(usize),
}

/// Receives `(completed, total)` after each item finishes.
pub trait ProgressSink {
    fn on_progress(&mut self, completed: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn on_progress(&mut self, completed: usize, total: usize) {
        self(completed, total);
    }
}

/// Sink that discards progress updates.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _completed: usize, _total: usize) {}
}

impl<R: RegistrarApi, B: ResolutionBackend> ResolutionService<R, B> {
    /// Resolve a batch of inputs sequentially.
    ///
    /// Returns one outcome per input, in input order. The sink sees exactly
    /// `inputs.len()` updates, with `completed` increasing by one each time.
    ///
    /// # Errors
    ///
    /// `BatchError::Empty` or `BatchError::TooManyInputs` before any item is
    /// processed. Item-level failures never surface here.
    #[instrument(skip(self, request, progress), fields(inputs = request.inputs.len()))]
    pub async fn resolve_batch(
        &self,
        request: &BatchRequest,
        progress: &mut impl ProgressSink,
    ) -> Result<Vec<ResolutionOutcome>, BatchError> {
        if request.inputs.is_empty() {
            return Err(BatchError::Empty);
        }
        if request.inputs.len() > MAX_BATCH_INPUTS {
            return Err(BatchError::TooManyInputs(request.inputs.len()));
        }

        let total = request.inputs.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, input) in request.inputs.iter().enumerate() {
            let result = match request.direction {
                BatchDirection::NameToAddress => {
                    self.resolve_name(input, request.network).await
                }
                BatchDirection::AddressToName => {
                    self.resolve_address(input, request.network).await
                }
            };

            let outcome = match result {
                Ok(resolved) => ResolutionOutcome::success(input.clone(), resolved),
                Err(err) => ResolutionOutcome::failure(input.clone(), &err),
            };
            outcomes.push(outcome);

            progress.on_progress(index + 1, total);
        }

        Ok(outcomes)
    }
}
