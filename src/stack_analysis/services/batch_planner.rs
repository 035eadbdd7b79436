use crate::shared::error::AggregatorError;
use crate::shared::Result;
use std::slice::Chunks;

/// Default number of packages per graph query
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// BatchPlanner service for splitting packages into graph query batches
///
/// Batches are contiguous, in input order, and each holds at most
/// `batch_size` items. `N` items produce `ceil(N / batch_size)` batches and
/// an empty input produces none.
pub struct BatchPlanner;

impl BatchPlanner {
    pub fn partition<T>(items: &[T], batch_size: usize) -> Result<Chunks<'_, T>> {
        if batch_size == 0 {
            return Err(AggregatorError::Validation {
                message: "batch size must be at least 1".to_string(),
            }
            .into());
        }
        Ok(items.chunks(batch_size))
    }

    pub fn batch_count(total: usize, batch_size: usize) -> usize {
        if batch_size == 0 {
            return 0;
        }
        total.div_ceil(batch_size)
    }
}
