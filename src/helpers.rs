use std::ops::Range;

/// Amount of execution units needed to cover `total` items, when every unit owns `chunk_size` of them.
pub fn unit_count(total: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        0
    } else {
        total / chunk_size + usize::from(total % chunk_size != 0)
    }
}

/// Contiguous item range owned by execution unit `unit`: `[unit * chunk_size, min(start + chunk_size, total))`.
///
/// Units past the end of the index space (over-provisioned launches) get an empty range at `total`.
pub fn chunk_range(unit: usize, chunk_size: usize, total: usize) -> Range<usize> {
    let start = unit.saturating_mul(chunk_size).min(total);
    let end = start.saturating_add(chunk_size).min(total);
    start..end
}

#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-15))
}




#[cfg(test)]
mod tests {
	use super::*;

	#[test]
    fn unit_count_rounds_up() {
		for cs in 1..20 {
			assert_eq!(unit_count(0, cs), 0);
			for n in 1..=cs {
				assert_eq!(unit_count(n, cs), 1);
			}
			for n in cs+1..=2*cs {
				assert_eq!(unit_count(n, cs), 2);
			}
		}
		assert_eq!(unit_count(10, 0), 0);
    }

	#[test]
	fn chunk_ranges_cover_index_space_exactly_once() {
		for total in 0..50 {
			for cs in 1..12 {
				let mut covered = vec![0usize; total];
				for unit in 0..unit_count(total, cs) {
					let range = chunk_range(unit, cs, total);
					assert!(range.len() <= cs);
					range.for_each(|i| covered[i] += 1);
				}
				assert!(covered.iter().all(|&c| c == 1), "total={} chunk_size={}", total, cs);
			}
		}
	}

	#[test]
	fn over_provisioned_units_do_no_work() {
		assert_eq!(chunk_range(3, 4, 10), 10..10);
		assert_eq!(chunk_range(100, 4, 10), 10..10);
		assert_eq!(chunk_range(usize::MAX, usize::MAX, 10), 10..10);
		assert_eq!(chunk_range(2, 4, 10), 8..10);
	}
}
