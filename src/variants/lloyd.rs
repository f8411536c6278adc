use crate::{memory::*, CentroidAccumulator, KMeansKernels, KernelResult, LloydStep};
use tracing::{debug, instrument};

/// Sum of each point's distance to its assigned centroid.
pub(crate) fn assigned_distsum<T: Primitive>(distances: &[T], assignments: &[i32], k: usize) -> T {
    distances.chunks_exact(k)
        .zip(assignments.iter().cloned())
        .fold(T::zero(), |sum, (row, assignment)| sum + row[assignment as usize])
}

#[instrument(level = "debug", skip_all, fields(points = n, clusters = accumulator.k()))]
pub(crate) fn calculate<T: Primitive, const DIM: usize>(
    kernels: &KMeansKernels<'_, T, DIM>, points: &[T], centroids: &[T], n: usize, accumulator: &mut CentroidAccumulator<T, DIM>,
) -> KernelResult<LloydStep<T>> {
    let k = accumulator.k();
    // launch boundaries: every kernel's output is complete before the next one starts
    let distances = kernels.compute_distances(points, centroids, n, k)?;
    let assignments = kernels.assign(&distances, n, k)?;
    kernels.accumulate_into(points, &assignments, n, accumulator)?;

    let distsum = assigned_distsum(&distances, &assignments, k);
    debug!(distsum = %distsum, "lloyd step done");
    Ok(LloydStep { distances, assignments, distsum })
}
