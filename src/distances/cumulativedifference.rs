use super::DistanceFunction;
use crate::memory::Primitive;

/// Closed-form 1-D earth-mover (Wasserstein-1) distance between two ordered histograms.
///
/// Both records are read as unnormalized distributions over `DIM` ordered bins. The per-bin
/// differences are turned into their running prefix sum, and the absolute values of that prefix sum
/// are added up.
///
/// ## Precondition
/// The result is only meaningful if features represent an ordered partition (histogram bins) and
/// both histograms carry the same total mass. This can not be detected at runtime and is the
/// caller's responsibility.
pub struct CumulativeDifference;

impl<T: Primitive, const DIM: usize> DistanceFunction<T, DIM> for CumulativeDifference {
    #[inline(always)]
    fn distance(&self, point: &[T; DIM], centroid: &[T; DIM]) -> T {
        let mut dist = [T::zero(); DIM];
        for i in 0..DIM {
            dist[i] = point[i] - centroid[i];
        }
        for i in 1..DIM {
            let prev = dist[i - 1];
            dist[i] += prev;
        }
        dist.iter().fold(T::zero(), |sum, d| sum + d.abs())
    }
}
