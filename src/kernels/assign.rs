use crate::memory::*;
use rayon::prelude::*;

/// Index of the smallest value within **row**.
///
/// The row is scanned front to back, and a later entry only replaces the current best if it is strictly
/// smaller. Ties therefore resolve to the lowest index. An empty row (no clusters) has no nearest
/// centroid and yields `None`.
#[inline]
pub fn min_index<T: Primitive>(row: &[T]) -> Option<usize> {
    if row.is_empty() {
        return None;
    }
    Some(lowest_index(row))
}

/// `min_index` for rows known to hold at least one entry.
#[inline(always)]
fn lowest_index<T: Primitive>(row: &[T]) -> usize {
    let mut lowest = 0;
    for (i, d) in row.iter().enumerate().skip(1) {
        if *d < row[lowest] {
            lowest = i;
        }
    }
    lowest
}

/// Write each point's nearest-centroid index into **assignments**.
///
/// Partitioned like the distance kernel: one execution unit per `chunk_size` consecutive rows.
/// `k` has to be at least 1 and fit into an `i32`, which is checked by the caller.
pub(crate) fn assign<T: Primitive>(distances: &[T], assignments: &mut [i32], k: usize, chunk_size: usize) {
    distances.par_chunks(chunk_size.saturating_mul(k))
        .zip(assignments.par_chunks_mut(chunk_size))
        .for_each(|(rows, outputs)| {
            rows.chunks_exact(k)
                .zip(outputs.iter_mut())
                .for_each(|(row, assignment)| *assignment = lowest_index(row) as i32);
        });
}
