use crate::{memory::*, KernelError, KernelResult, DEFAULT_DIM};

/// Caller-owned accumulation target for [`KMeansKernels::accumulate_into`](crate::KMeansKernels::accumulate_into).
///
/// The kernels only ever **add** into this state. Zeroing it at the start of an accumulation epoch is
/// the responsibility of the owner ([`CentroidAccumulator::new`] or [`CentroidAccumulator::reset`]).
/// Not resetting it between calls is how results of multiple batches, or of independent compute
/// resources (see [`CentroidAccumulator::merge`]), are combined.
///
/// Dividing the sums by the counts (to get the new centroid positions) is left to the caller.
///
/// ## Fields
/// - **sums**: Per-cluster feature sums [row-major] = [<sum0>,<sum1>,<sum2>,...]
/// - **counts**: Amount of points accumulated into each cluster
#[derive(Clone, Debug, PartialEq)]
pub struct CentroidAccumulator<T: Primitive, const DIM: usize = DEFAULT_DIM> {
    pub(crate) k: usize,
    pub(crate) sums: Vec<T>,
    pub(crate) counts: Vec<usize>,
}
impl<T: Primitive, const DIM: usize> CentroidAccumulator<T, DIM> {
    /// Create a zeroed accumulator for **k** clusters.
    ///
    /// **k** is not checked here. An accumulator for `k = 0` clusters is rejected by every launch
    /// with [`KernelError::InvalidClusterCount`]; use [`CentroidAccumulator::try_new`] to catch that early.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            sums: vec![T::zero(); k * DIM],
            counts: vec![0usize; k],
        }
    }

    /// Create a zeroed accumulator for **k** clusters, rejecting cluster counts no launch accepts.
    pub fn try_new(k: usize) -> KernelResult<Self> {
        crate::api::check_cluster_count(k)?;
        if DIM == 0 {
            return Err(KernelError::InvalidDimension("points need at least one feature (DIM = 0)".to_string()));
        }
        k.checked_mul(DIM).ok_or_else(|| KernelError::InvalidDimension(
            format!("sum buffer size {} × {} overflows", k, DIM)))?;
        Ok(Self::new(k))
    }

    /// Start a new accumulation epoch.
    pub fn reset(&mut self) {
        self.sums.iter_mut().for_each(|s| *s = T::zero());
        self.counts.iter_mut().for_each(|c| *c = 0);
    }

    /// Add the partial result **other** (e.g. computed over a disjoint set of points) into this one.
    pub fn merge(&mut self, other: &CentroidAccumulator<T, DIM>) -> KernelResult<()> {
        if other.k != self.k {
            return Err(KernelError::InvalidDimension(
                format!("cannot merge accumulator for {} clusters into one for {}", other.k, self.k)));
        }
        self.sums.iter_mut().zip(other.sums.iter()).for_each(|(s, o)| *s += *o);
        self.counts.iter_mut().zip(other.counts.iter()).for_each(|(c, o)| *c += *o);
        Ok(())
    }

    pub fn k(&self) -> usize { self.k }
    pub fn sums(&self) -> &[T] { &self.sums }
    pub fn counts(&self) -> &[usize] { &self.counts }
    pub fn total_count(&self) -> usize { self.counts.iter().sum() }

    /// Feature sum of a single cluster.
    pub fn cluster_sum(&self, cluster: usize) -> Option<&[T]> {
        self.sums.chunks_exact(DIM).nth(cluster)
    }

    /// Give up ownership of the `(sums, counts)` buffers.
    pub fn into_parts(self) -> (Vec<T>, Vec<usize>) { (self.sums, self.counts) }
}
