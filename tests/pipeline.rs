use kmeans_kernels::*;
use rand::prelude::*;

fn random_points(seed: u64, cnt: usize, dims: usize, scale: f64) -> Vec<f64> {
    let mut rnd = StdRng::seed_from_u64(seed);
    (0..cnt * dims).map(|_| rnd.gen_range(-scale, scale)).collect()
}

fn kernels<'a, const DIM: usize>(metric: Metric, chunk_size: usize) -> KMeansKernels<'a, f64, DIM> {
    KMeansKernels::new(KernelConfig::build().metric(metric).chunk_size(chunk_size).build()).unwrap()
}

#[test]
fn two_point_example() {
    let points = vec![0.0f64, 0.0, 0.0, 10.0, 10.0, 10.0];
    let kernels = kernels::<3>(Metric::SquaredEuclidean, 1);

    let distances = kernels.compute_distances(&points, &points, 2, 2).unwrap();
    assert_eq!(distances, vec![0.0, 300.0, 300.0, 0.0]);
    let assignments = kernels.assign(&distances, 2, 2).unwrap();
    assert_eq!(assignments, vec![0, 1]);

    let (mut sums, mut counts) = (vec![0.0; 6], vec![0usize; 2]);
    kernels.accumulate(&points, &assignments, 2, 2, &mut sums, &mut counts).unwrap();
    assert_eq!(sums, vec![0.0, 0.0, 0.0, 10.0, 10.0, 10.0]);
    assert_eq!(counts, vec![1, 1]);
}

#[test]
fn cumulative_difference_example() {
    let kernels = kernels::<3>(Metric::CumulativeDifference, 8);
    let distances = kernels.compute_distances(&[1.0, 2.0, 3.0, 3.0, 2.0, 1.0], &[1.0, 2.0, 3.0], 2, 1).unwrap();
    assert_eq!(distances, vec![0.0, 4.0]);
}

#[test]
fn partition_invariance() {
    let (n, k) = (1003, 6);
    let points = random_points(1, n, 3, 5.0);
    let centroids = random_points(2, k, 3, 5.0);

    for metric in [Metric::SquaredEuclidean, Metric::CumulativeDifference] {
        let whole = kernels::<3>(metric, n);
        let should_distances = whole.compute_distances(&points, &centroids, n, k).unwrap();
        let should_assignments = whole.assign(&should_distances, n, k).unwrap();

        // same launch, differing unit sizes
        for chunk_size in [1, 2, 64, 500, 1002, 4096] {
            let chunked = kernels::<3>(metric, chunk_size);
            let distances = chunked.compute_distances(&points, &centroids, n, k).unwrap();
            assert_eq!(distances, should_distances);
            assert_eq!(chunked.assign(&distances, n, k).unwrap(), should_assignments);
        }

        // point set split into two separate launches
        let split = 400;
        let mut distances = whole.compute_distances(&points[..split * 3], &centroids, split, k).unwrap();
        distances.extend(whole.compute_distances(&points[split * 3..], &centroids, n - split, k).unwrap());
        assert_eq!(distances, should_distances);
        let mut assignments = whole.assign(&distances[..split * k], split, k).unwrap();
        assignments.extend(whole.assign(&distances[split * k..], n - split, k).unwrap());
        assert_eq!(assignments, should_assignments);
    }
}

#[test]
fn assignments_are_nearest_with_lowest_index_on_ties() {
    let (n, k) = (800, 5);
    // integer coordinates produce plenty of exact ties
    let points: Vec<f64> = random_points(3, n, 2, 3.0).iter().map(|v| v.round()).collect();
    let centroids = vec![0.0, 0.0, 1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 0.0, 0.0];
    let kernels = kernels::<2>(Metric::SquaredEuclidean, 33);

    let distances = kernels.compute_distances(&points, &centroids, n, k).unwrap();
    let assignments = kernels.assign(&distances, n, k).unwrap();
    for (row, &a) in distances.chunks_exact(k).zip(assignments.iter()) {
        assert!(a >= 0 && (a as usize) < k);
        let a = a as usize;
        assert_eq!(min_index(row), Some(a));
        for c in 0..k {
            assert!(row[a] <= row[c]);
            if c < a {
                assert!(row[c] > row[a]);
            }
        }
    }
    // centroids 0/4 and 1/3 are duplicates: the later copy never wins
    assert!(assignments.iter().all(|&a| a != 3 && a != 4));
}

#[test]
fn additive_accumulation_over_halves() {
    let (n, k) = (999, 7);
    let points = random_points(4, n, 3, 1.0);
    let centroids = random_points(5, k, 3, 1.0);
    let kernels = kernels::<3>(Metric::SquaredEuclidean, 100);
    let distances = kernels.compute_distances(&points, &centroids, n, k).unwrap();
    let assignments = kernels.assign(&distances, n, k).unwrap();

    let mut once = CentroidAccumulator::<f64, 3>::new(k);
    kernels.accumulate_into(&points, &assignments, n, &mut once).unwrap();

    let mut twice = CentroidAccumulator::<f64, 3>::new(k);
    let half = n / 2;
    kernels.accumulate_into(&points[..half * 3], &assignments[..half], half, &mut twice).unwrap();
    kernels.accumulate_into(&points[half * 3..], &assignments[half..], n - half, &mut twice).unwrap();

    assert_eq!(once.counts(), twice.counts());
    assert_eq!(once.total_count(), n);
    for (a, b) in once.sums().iter().zip(twice.sums().iter()) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    // partial results from independent resources, merged afterwards
    let (mut left, mut right) = (CentroidAccumulator::<f64, 3>::new(k), CentroidAccumulator::<f64, 3>::new(k));
    kernels.accumulate_into(&points[..half * 3], &assignments[..half], half, &mut left).unwrap();
    kernels.accumulate_into(&points[half * 3..], &assignments[half..], n - half, &mut right).unwrap();
    left.merge(&right).unwrap();
    assert_eq!(left.counts(), once.counts());
}

#[test]
fn cooperative_lanes_match_single_lane() {
    let (n, k) = (2048, 4);
    let points = random_points(6, n, 3, 1.0);
    let assignments: Vec<i32> = (0..n).map(|i| (i % k) as i32).collect();

    let single = kernels::<3>(Metric::SquaredEuclidean, 256);
    let mut should = CentroidAccumulator::<f64, 3>::new(k);
    single.accumulate_into(&points, &assignments, n, &mut should).unwrap();

    for lanes in [2, 4, 16, 3000] {
        let coop: KMeansKernels<f64> = KMeansKernels::new(KernelConfig::build().lanes_per_unit(lanes).build()).unwrap();
        let mut acc = CentroidAccumulator::new(k);
        coop.accumulate_into(&points, &assignments, n, &mut acc).unwrap();
        assert_eq!(acc.counts(), should.counts());
        for (a, b) in acc.sums().iter().zip(should.sums().iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}

#[test]
fn validation_errors() {
    let kernels = kernels::<3>(Metric::SquaredEuclidean, 16);
    let points = vec![0.0; 6];

    assert!(matches!(kernels.compute_distances(&points[..5], &points, 2, 2), Err(KernelError::InvalidDimension(_))));
    assert!(matches!(kernels.compute_distances(&points, &points[..3], 2, 2), Err(KernelError::InvalidDimension(_))));
    assert_eq!(kernels.compute_distances(&points, &[], 2, 0), Err(KernelError::InvalidClusterCount(0)));
    assert_eq!(kernels.assign(&[], 0, 0), Err(KernelError::InvalidClusterCount(0)));
    assert!(matches!(kernels.assign(&[1.0, 2.0, 3.0], 2, 2), Err(KernelError::InvalidDimension(_))));
    // a row without any centroid has no valid index either
    assert_eq!(min_index::<f64>(&[]), None);

    let (mut sums, mut counts) = (vec![0.0; 6], vec![0usize; 2]);
    assert_eq!(kernels.accumulate(&points, &[0, 2], 2, 2, &mut sums, &mut counts),
               Err(KernelError::IndexOutOfRange { index: 1, value: 2, k: 2 }));
    assert_eq!(kernels.accumulate(&points, &[-1, 5], 2, 2, &mut sums, &mut counts),
               Err(KernelError::IndexOutOfRange { index: 0, value: -1, k: 2 }));
    assert!(matches!(kernels.accumulate(&points, &[0, 1], 2, 2, &mut sums[..5], &mut counts), Err(KernelError::InvalidDimension(_))));
    assert!(matches!(kernels.accumulate(&points, &[0], 2, 2, &mut sums, &mut counts), Err(KernelError::InvalidDimension(_))));
    // nothing was written by the rejected calls
    assert_eq!(sums, vec![0.0; 6]);
    assert_eq!(counts, vec![0, 0]);
}

#[test]
fn empty_point_set() {
    let kernels = kernels::<3>(Metric::CumulativeDifference, 16);
    let distances = kernels.compute_distances(&[], &[1.0, 2.0, 3.0], 0, 1).unwrap();
    assert!(distances.is_empty());
    assert!(kernels.assign(&distances, 0, 1).unwrap().is_empty());
    let mut acc = CentroidAccumulator::<f64, 3>::new(1);
    kernels.accumulate_into(&[], &[], 0, &mut acc).unwrap();
    assert_eq!(acc.counts(), &[0][..]);
}
