use crate::{helpers, memory::*, DistanceFunction};
use rayon::prelude::*;

/// Fill the row-major `n × k` **distances** matrix.
///
/// Every rayon work item is one execution unit, owning `chunk_size` consecutive rows. A unit only ever
/// writes the rows of its own point range, so the units need no synchronization among each other.
pub(crate) fn compute_distances<T, D, const DIM: usize>(
    points: &[T], centroids: &[T], distances: &mut [T], k: usize, chunk_size: usize, metric: &D,
) where
    T: Primitive,
    D: DistanceFunction<T, DIM>,
{
    let n = points.len() / DIM;
    let centroids: Vec<[T; DIM]> = load_points(centroids);

    distances.par_chunks_mut(chunk_size.saturating_mul(k))
        .enumerate()
        .for_each(|(unit, rows)| {
            let range = helpers::chunk_range(unit, chunk_size, n);
            points[range.start * DIM..range.end * DIM].chunks_exact(DIM)
                .zip(rows.chunks_exact_mut(k))
                .for_each(|(p, row)| {
                    let point: [T; DIM] = load_point(p);
                    row.iter_mut()
                        .zip(centroids.iter())
                        .for_each(|(d, c)| *d = metric.distance(&point, c));
                });
        });
}
