use crate::{helpers, memory::*};
use rayon::prelude::*;

/// Add every cluster's feature-sum and member count into **sums** / **counts**.
///
/// The cluster id space is partitioned one cluster per execution unit. Unit `c` is the only one ever
/// holding the `&mut` slots `sums[c * DIM..(c + 1) * DIM]` and `counts[c]`, so the final additive
/// write needs neither atomics nor locks. Each unit scans all points serially (O(n) per unit).
///
/// With `lanes > 1`, the scan of one unit is split over that many cooperating workers. Their partial
/// results are only combined (in lane order) after all of them joined, and only the unit itself
/// writes the combined result.
///
/// Assignments have to be validated to lie in `[0, k)` by the caller.
pub(crate) fn accumulate<T: Primitive, const DIM: usize>(
    points: &[T], assignments: &[i32], sums: &mut [T], counts: &mut [usize], lanes: usize,
) {
    sums.par_chunks_exact_mut(DIM)
        .zip(counts.par_iter_mut())
        .enumerate()
        .for_each(|(cluster, (sum, count))| {
            let cluster = cluster as i32;
            let (local_sum, local_count) = if lanes > 1 {
                scan_cooperative::<T, DIM>(points, assignments, cluster, lanes)
            } else {
                scan_cluster::<T, DIM>(points, assignments, cluster)
            };

            sum.iter_mut().zip(local_sum.iter()).for_each(|(s, l)| *s += *l);
            *count += local_count;
        });
}

/// Serial scan over all points, summing up the members of **cluster** into a private accumulator.
#[inline(always)]
fn scan_cluster<T: Primitive, const DIM: usize>(points: &[T], assignments: &[i32], cluster: i32) -> ([T; DIM], usize) {
    let mut local_sum = [T::zero(); DIM];
    let mut local_count = 0usize;
    points.chunks_exact(DIM)
        .zip(assignments.iter().cloned())
        .filter(|&(_, assignment)| assignment == cluster)
        .for_each(|(features, _)| {
            local_sum.iter_mut().zip(features.iter()).for_each(|(l, f)| *l += *f);
            local_count += 1;
        });
    (local_sum, local_count)
}

fn scan_cooperative<T: Primitive, const DIM: usize>(points: &[T], assignments: &[i32], cluster: i32, lanes: usize) -> ([T; DIM], usize) {
    let n = assignments.len();
    let lane_size = helpers::unit_count(n, lanes).max(1);
    let partials: Vec<([T; DIM], usize)> = (0..lanes).into_par_iter()
        .map(|lane| {
            let range = helpers::chunk_range(lane, lane_size, n);
            scan_cluster::<T, DIM>(&points[range.start * DIM..range.end * DIM], &assignments[range], cluster)
        })
        .collect();

    // all lanes joined
    partials.into_iter().fold(([T::zero(); DIM], 0usize), |(mut sum, count), (lane_sum, lane_count)| {
        sum.iter_mut().zip(lane_sum.iter()).for_each(|(s, l)| *s += *l);
        (sum, count + lane_count)
    })
}
