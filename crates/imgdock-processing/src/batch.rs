//! Batch transform
//!
//! Items are transformed in parallel on the rayon pool. Results keep input
//! order and the whole batch fails on the first failing position.

use crate::error::BatchError;
use crate::resolver::OutputSpec;
use crate::transformer::{ImageTransformer, SourceImage, TransformResult};
use rayon::prelude::*;

/// One image of a batch
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Caller-side identifier, the numeric suffix of the form field
    pub index: usize,
    pub source: SourceImage,
    pub spec: OutputSpec,
}

/// Transform every item, in input order.
///
/// On failure the error of the lowest failing position is returned, tagged
/// with that item's `index`. Nothing is dropped silently.
pub fn transform_batch(items: &[BatchItem]) -> Result<Vec<TransformResult>, BatchError> {
    let start = std::time::Instant::now();

    let results: Vec<Result<TransformResult, BatchError>> = items
        .par_iter()
        .map(|item| {
            ImageTransformer::transform(&item.source, &item.spec).map_err(|source| {
                tracing::warn!(index = item.index, error = %source, "Batch item failed");
                BatchError {
                    index: item.index,
                    source,
                }
            })
        })
        .collect();

    let outputs = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        count = outputs.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Batch transformed"
    );

    Ok(outputs)
}
