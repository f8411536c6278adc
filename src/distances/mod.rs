mod cumulativedifference;
mod squaredeuclidean;

pub use cumulativedifference::CumulativeDifference;
pub use squaredeuclidean::SquaredEuclidean;

use crate::memory::Primitive;

/// A point × centroid → scalar distance function over `DIM`-dimensional records.
///
/// Implementations must be free of side-effects and must never return a negative value for finite input.
pub trait DistanceFunction<T: Primitive, const DIM: usize>: Send + Sync {
    /// Distance between **point** and **centroid**.
    fn distance(&self, point: &[T; DIM], centroid: &[T; DIM]) -> T;
}

/// Selects the distance function used for a whole run. Distances of differing metrics are never
/// mixed within one distance matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    /// See [`SquaredEuclidean`]
    #[default]
    SquaredEuclidean,
    /// See [`CumulativeDifference`]
    CumulativeDifference,
}
impl<T: Primitive, const DIM: usize> DistanceFunction<T, DIM> for Metric {
    #[inline(always)]
    fn distance(&self, point: &[T; DIM], centroid: &[T; DIM]) -> T {
        match self {
            Metric::SquaredEuclidean => SquaredEuclidean.distance(point, centroid),
            Metric::CumulativeDifference => CumulativeDifference.distance(point, centroid),
        }
    }
}
impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::SquaredEuclidean => write!(f, "squared_euclidean"),
            Metric::CumulativeDifference => write!(f, "cumulative_difference"),
        }
    }
}
