use crate::{helpers, memory::*, BatchedStep, CentroidAccumulator, KMeansKernels, KernelError, KernelResult};
use tracing::{instrument, trace};

#[instrument(level = "debug", skip_all, fields(points = n, batch_size = batch_size, clusters = accumulator.k()))]
pub(crate) fn calculate<T: Primitive, const DIM: usize>(
    kernels: &KMeansKernels<'_, T, DIM>, points: &[T], centroids: &[T], n: usize, batch_size: usize,
    accumulator: &mut CentroidAccumulator<T, DIM>,
) -> KernelResult<BatchedStep<T>> {
    if batch_size == 0 {
        return Err(KernelError::InvalidConfig("batch_size must be at least 1".to_string()));
    }
    // Validate everything up-front, so that a bad call does not leave a half-accumulated epoch behind
    kernels.validate_points(points, n)?;
    kernels.validate_centroids(centroids, accumulator.k())?;

    let mut assignments = Vec::with_capacity(n);
    let mut distsum = T::zero();
    for batch in 0..helpers::unit_count(n, batch_size) {
        let range = helpers::chunk_range(batch, batch_size, n);
        let batch_points = &points[range.start * DIM..range.end * DIM];
        let step = super::lloyd::calculate(kernels, batch_points, centroids, range.len(), accumulator)?;
        trace!(batch, start = range.start, end = range.end, "batch accumulated");
        distsum += step.distsum;
        assignments.extend(step.assignments);
    }

    Ok(BatchedStep { assignments, distsum })
}
