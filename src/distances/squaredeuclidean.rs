use super::DistanceFunction;
use crate::memory::Primitive;

/// Sum of the squared per-feature differences, accumulated in increasing feature order.
///
/// No square root is taken: nearest-centroid search only needs the (monotonic) squared form.
/// Callers that need true euclidean distances apply the root themselves.
pub struct SquaredEuclidean;

impl<T: Primitive, const DIM: usize> DistanceFunction<T, DIM> for SquaredEuclidean {
    #[inline(always)]
    fn distance(&self, point: &[T; DIM], centroid: &[T; DIM]) -> T {
        let mut sum = T::zero();
        for i in 0..DIM {
            let diff = point[i] - centroid[i];
            sum += diff * diff;
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::random_samples;

    #[test]
    fn known_values() {
        assert_eq!(SquaredEuclidean.distance(&[0.0f32, 0.0, 0.0], &[10.0, 10.0, 10.0]), 300.0);
        assert_eq!(SquaredEuclidean.distance(&[1.0f64, 2.0], &[4.0, -2.0]), 25.0);
        assert_eq!(SquaredEuclidean.distance(&[7.5f32], &[7.5]), 0.0);
    }

    #[test]
    fn non_negative_and_zero_only_on_identity() {
        let samples = random_samples::<f64>(1337, 500, 3);
        let points: Vec<&[f64]> = samples.chunks_exact(3).collect();
        for pair in points.windows(2) {
            let (a, b): ([f64; 3], [f64; 3]) = (crate::memory::load_point(pair[0]), crate::memory::load_point(pair[1]));
            let d = SquaredEuclidean.distance(&a, &b);
            assert!(d >= 0.0);
            assert_eq!(d == 0.0, a == b);
            assert_eq!(SquaredEuclidean.distance(&a, &a), 0.0);
        }
    }
}
