use crate::{
    helpers, kernels, memory::*, CentroidAccumulator, CumulativeDifference, DistanceFunction, Kernel,
    KernelError, KernelResult, Metric, SquaredEuclidean, DEFAULT_DIM,
};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, error, trace};

pub type LaunchDoneCallbackFn<'a> = &'a (dyn Fn(&LaunchReport) + Sync);

/// Status information about a finished kernel launch, as passed to the `launch_done` callback.
///
/// ## Fields
/// - **kernel**: The kernel that was launched
/// - **units**: Amount of execution units the index space was partitioned into
/// - **items**: Size of the partitioned index space (points, or clusters for [`Kernel::Accumulate`])
/// - **elapsed**: Wall-clock time of the launch
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchReport {
    pub kernel: Kernel,
    pub units: usize,
    pub items: usize,
    pub elapsed: Duration,
}

/// This is a structure holding the configuration options of a [`KMeansKernels`] instance, such as the
/// distance metric, the work-partitioning or a callback that can be set to get status information about
/// every kernel launch.
///
/// For a more detailed information about all possible options, have a look at [`KernelConfigBuilder`].
pub struct KernelConfig<'a> {
    /// Distance metric used for the whole run
    pub(crate) metric: Metric,
    /// Amount of consecutive points owned by one execution unit (distance & assignment kernels)
    pub(crate) chunk_size: usize,
    /// Amount of cooperating workers scanning the points of one cluster (accumulation kernel)
    pub(crate) lanes_per_unit: usize,
    /// Size of a dedicated worker pool (`None` = rayon's global pool)
    pub(crate) threads: Option<usize>,
    /// Callback that is called after each successful kernel launch
    /// ## Arguments
    /// - **report**: [`LaunchReport`] describing the launch
    pub(crate) launch_done: LaunchDoneCallbackFn<'a>,
}
impl<'a> Default for KernelConfig<'a> {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            chunk_size: 256,
            lanes_per_unit: 1,
            threads: None,
            launch_done: &|_| {},
        }
    }
}
impl<'a> KernelConfig<'a> {
    /// Use the [`KernelConfigBuilder`] to build a [`KernelConfig`] instance.
    pub fn build() -> KernelConfigBuilder<'a> {
        KernelConfigBuilder { config: KernelConfig::default() }
    }
}
impl<'a> std::fmt::Debug for KernelConfig<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelConfig")
            .field("metric", &self.metric)
            .field("chunk_size", &self.chunk_size)
            .field("lanes_per_unit", &self.lanes_per_unit)
            .field("threads", &self.threads)
            .finish()
    }
}

pub struct KernelConfigBuilder<'a> {
    config: KernelConfig<'a>
}
impl<'a> KernelConfigBuilder<'a> {
    /// Set the distance metric. Distances of differing metrics are never mixed within one run.
    /// ## Default
    /// [`Metric::SquaredEuclidean`]
    pub fn metric(mut self, metric: Metric) -> Self {
        self.config.metric = metric; self
    }
    /// Set the amount of consecutive points each execution unit of the distance and assignment kernels owns.
    /// ## Default
    /// `256`
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size; self
    }
    /// Set the amount of cooperating workers that split the point scan of one cluster during accumulation.
    /// ## Default
    /// `1` (one worker per cluster)
    pub fn lanes_per_unit(mut self, lanes: usize) -> Self {
        self.config.lanes_per_unit = lanes; self
    }
    /// Run all launches on a dedicated worker pool of the given size, instead of rayon's global pool.
    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = Some(threads); self
    }
    /// Set the callback that should be called after each successful kernel launch.
    pub fn launch_done(mut self, launch_done: LaunchDoneCallbackFn<'a>) -> Self {
        self.config.launch_done = launch_done; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KernelConfig<'a> { self.config }
}


/// Result of one Lloyd iteration, as returned by [`KMeansKernels::lloyd_step`].
///
/// ## Fields
/// - **distances**: Point-to-centroid distance matrix [row-major] = [<point0 to c0>,<point0 to c1>,...]
/// - **assignments**: Index of each point's nearest centroid
/// - **distsum**: Sum of the distances of all points to their assigned centroid
#[derive(Clone, Debug, PartialEq)]
pub struct LloydStep<T: Primitive> {
    pub distances: Vec<T>,
    pub assignments: Vec<i32>,
    pub distsum: T,
}

/// Result of a streamed accumulation, as returned by [`KMeansKernels::accumulate_batches`].
#[derive(Clone, Debug, PartialEq)]
pub struct BatchedStep<T: Primitive> {
    pub assignments: Vec<i32>,
    pub distsum: T,
}


/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct from a [`KernelConfig`]. The primitive type **T** is the type used
/// for all buffers and calculations, **DIM** the (fixed) amount of features per point.
///
/// All buffers are flat and point-major: point `i` occupies `[i * DIM, (i + 1) * DIM)`.
/// Every launch validates its input completely before dispatching any parallel work, so on an
/// error no output buffer has been touched.
///
/// ## Kernels
/// - Distance matrix [`KMeansKernels::compute_distances`]
/// - Nearest-centroid assignment [`KMeansKernels::assign`]
/// - Per-cluster sums & counts [`KMeansKernels::accumulate`]
///
/// ## Compositions
/// - One Lloyd iteration [`KMeansKernels::lloyd_step`]
/// - Streamed (batched) accumulation [`KMeansKernels::accumulate_batches`]
pub struct KMeansKernels<'a, T: Primitive, const DIM: usize = DEFAULT_DIM> {
    pub(crate) config: KernelConfig<'a>,
    pool: Option<rayon::ThreadPool>,
    _p: std::marker::PhantomData<T>,
}
impl<'a, T: Primitive, const DIM: usize> KMeansKernels<'a, T, DIM> {
    /// Create a new instance of the [`KMeansKernels`] structure, validating the passed configuration.
    pub fn new(config: KernelConfig<'a>) -> KernelResult<Self> {
        if DIM == 0 {
            return Err(KernelError::InvalidDimension("points need at least one feature (DIM = 0)".to_string()));
        }
        if config.chunk_size == 0 {
            return Err(KernelError::InvalidConfig("chunk_size must be at least 1".to_string()));
        }
        if config.lanes_per_unit == 0 {
            return Err(KernelError::InvalidConfig("lanes_per_unit must be at least 1".to_string()));
        }
        let pool = match config.threads {
            Some(0) => return Err(KernelError::InvalidConfig("threads must be at least 1".to_string())),
            Some(threads) => Some(rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| KernelError::ThreadPool(e.to_string()))?),
            None => None,
        };
        debug!(config = ?config, dim = DIM, "created kernels");

        Ok(Self { config, pool, _p: std::marker::PhantomData })
    }

    pub fn metric(&self) -> Metric { self.config.metric }
    pub fn chunk_size(&self) -> usize { self.config.chunk_size }
    pub fn lanes_per_unit(&self) -> usize { self.config.lanes_per_unit }


    /// Compute the full `n × k` distance matrix between **points** and **centroids**, using the configured metric.
    ///
    /// ## Arguments
    /// - **points**: Points [row-major] = [<point0>,<point1>,<point2>,...] (`n * DIM` values)
    /// - **centroids**: Centroids [row-major] = [<centroid0>,<centroid1>,...] (`k * DIM` values)
    /// - **n**: Amount of points
    /// - **k**: Amount of centroids
    ///
    /// ## Returns
    /// Row-major distance matrix: `distances[i * k + c]` is the distance of point `i` to centroid `c`.
    pub fn compute_distances(&self, points: &[T], centroids: &[T], n: usize, k: usize) -> KernelResult<Vec<T>> {
        self.validate_points(points, n)?;
        self.validate_centroids(centroids, k)?;
        let mut distances = vec![T::zero(); matrix_len(n, k)?];
        self.dispatch_distances(points, centroids, n, k, &mut distances)?;
        Ok(distances)
    }

    /// Same as [`KMeansKernels::compute_distances`], writing into a caller-provided `n * k` buffer.
    pub fn compute_distances_into(&self, points: &[T], centroids: &[T], n: usize, k: usize, distances: &mut [T]) -> KernelResult<()> {
        self.validate_points(points, n)?;
        self.validate_centroids(centroids, k)?;
        check_len("distance", distances.len(), n, k)?;
        self.dispatch_distances(points, centroids, n, k, distances)
    }

    /// Compute the distance matrix using a custom [`DistanceFunction`] instead of the configured metric.
    pub fn compute_distances_with<D>(&self, points: &[T], centroids: &[T], n: usize, k: usize, metric: &D) -> KernelResult<Vec<T>>
            where D: DistanceFunction<T, DIM> {
        self.validate_points(points, n)?;
        self.validate_centroids(centroids, k)?;
        let mut distances = vec![T::zero(); matrix_len(n, k)?];
        let chunk_size = self.config.chunk_size;
        self.launch(Kernel::Distances, helpers::unit_count(n, chunk_size), n, || {
            kernels::compute_distances::<T, D, DIM>(points, centroids, &mut distances, k, chunk_size, metric)
        })?;
        Ok(distances)
    }

    fn dispatch_distances(&self, points: &[T], centroids: &[T], n: usize, k: usize, distances: &mut [T]) -> KernelResult<()> {
        let chunk_size = self.config.chunk_size;
        let metric = self.config.metric;
        self.launch(Kernel::Distances, helpers::unit_count(n, chunk_size), n, || match metric {
            Metric::SquaredEuclidean =>
                kernels::compute_distances::<T, _, DIM>(points, centroids, distances, k, chunk_size, &SquaredEuclidean),
            Metric::CumulativeDifference =>
                kernels::compute_distances::<T, _, DIM>(points, centroids, distances, k, chunk_size, &CumulativeDifference),
        })
    }


    /// Assign every point to its nearest centroid.
    ///
    /// ## Arguments
    /// - **distances**: Row-major `n × k` distance matrix, as computed by [`KMeansKernels::compute_distances`]
    /// - **n**: Amount of points (rows)
    /// - **k**: Amount of centroids (columns), has to be at least 1
    ///
    /// ## Returns
    /// For each point, the index of the centroid with the smallest distance. On ties the lowest index wins.
    pub fn assign(&self, distances: &[T], n: usize, k: usize) -> KernelResult<Vec<i32>> {
        let mut assignments = vec![0i32; n];
        self.assign_into(distances, n, k, &mut assignments)?;
        Ok(assignments)
    }

    /// Same as [`KMeansKernels::assign`], writing into a caller-provided buffer of length `n`.
    pub fn assign_into(&self, distances: &[T], n: usize, k: usize, assignments: &mut [i32]) -> KernelResult<()> {
        check_cluster_count(k)?;
        check_len("distance", distances.len(), n, k)?;
        check_len("assignment", assignments.len(), n, 1)?;
        let chunk_size = self.config.chunk_size;
        self.launch(Kernel::Assign, helpers::unit_count(n, chunk_size), n, || {
            kernels::assign(distances, assignments, k, chunk_size)
        })
    }


    /// Add the per-cluster feature sums and member counts of **points** into **sums** and **counts**.
    ///
    /// The buffers are only added into, never reset: zero them at the start of every accumulation
    /// epoch. Leaving them untouched between calls merges the results of multiple calls (e.g. over
    /// successive batches of points).
    ///
    /// ## Arguments
    /// - **points**: Points [row-major] (`n * DIM` values)
    /// - **assignments**: Cluster index of each point (`n` values, each in `[0, k)`)
    /// - **n**: Amount of points
    /// - **k**: Amount of clusters
    /// - **sums**: Per-cluster feature sums [row-major] (`k * DIM` values)
    /// - **counts**: Per-cluster point counts (`k` values)
    ///
    /// ## Errors
    /// [`KernelError::IndexOutOfRange`] for the first assignment outside `[0, k)`.
    /// If the launch itself fails ([`KernelError::LaunchFailed`]), **sums** and **counts** may be
    /// partially updated and have to be reset before the epoch is repeated.
    pub fn accumulate(&self, points: &[T], assignments: &[i32], n: usize, k: usize, sums: &mut [T], counts: &mut [usize]) -> KernelResult<()> {
        check_cluster_count(k)?;
        self.validate_points(points, n)?;
        check_len("assignment", assignments.len(), n, 1)?;
        check_len("sum", sums.len(), k, DIM)?;
        check_len("count", counts.len(), k, 1)?;
        let out_of_range = assignments.par_iter().cloned()
            .enumerate()
            .find_first(|&(_, a)| a < 0 || a as usize >= k);
        if let Some((index, value)) = out_of_range {
            return Err(KernelError::IndexOutOfRange { index, value, k });
        }

        let lanes = self.config.lanes_per_unit;
        self.launch(Kernel::Accumulate, k, k, || {
            kernels::accumulate::<T, DIM>(points, assignments, sums, counts, lanes)
        })
    }

    /// Same as [`KMeansKernels::accumulate`], adding into a [`CentroidAccumulator`] (for `accumulator.k()` clusters).
    pub fn accumulate_into(&self, points: &[T], assignments: &[i32], n: usize, accumulator: &mut CentroidAccumulator<T, DIM>) -> KernelResult<()> {
        self.accumulate(points, assignments, n, accumulator.k, &mut accumulator.sums, &mut accumulator.counts)
    }


    /// One Lloyd iteration: distance matrix, assignment and accumulation, launched in this order.
    ///
    /// The per-cluster sums and counts are added into **accumulator**, which is **not** reset. Deciding
    /// about convergence and computing the new centroids (`sums / counts`) is up to the caller.
    ///
    /// ## Arguments
    /// - **points**: Points [row-major] (`n * DIM` values)
    /// - **centroids**: Current centroids [row-major] (`accumulator.k() * DIM` values)
    /// - **n**: Amount of points
    /// - **accumulator**: Accumulation target, defining the amount of clusters
    pub fn lloyd_step(&self, points: &[T], centroids: &[T], n: usize, accumulator: &mut CentroidAccumulator<T, DIM>) -> KernelResult<LloydStep<T>> {
        crate::variants::lloyd::calculate(self, points, centroids, n, accumulator)
    }

    /// Stream the points through all three kernels in consecutive batches of **batch_size** points,
    /// accumulating every batch into the same **accumulator**.
    ///
    /// The resulting sums, counts and assignments are identical to a single [`KMeansKernels::lloyd_step`]
    /// over all points, while only `batch_size × k` distances are held in memory at a time.
    ///
    /// ## Errors
    /// Buffer sizes, **batch_size** and the cluster count are checked before the first batch, so an
    /// invalid call leaves **accumulator** untouched. If a launch fails ([`KernelError::LaunchFailed`])
    /// while batch `j` runs, batches `0..j` have already been added into **accumulator**, so it has to
    /// be reset before the epoch is repeated.
    pub fn accumulate_batches(&self, points: &[T], centroids: &[T], n: usize, batch_size: usize, accumulator: &mut CentroidAccumulator<T, DIM>) -> KernelResult<BatchedStep<T>> {
        crate::variants::minibatch::calculate(self, points, centroids, n, batch_size, accumulator)
    }


    pub(crate) fn validate_points(&self, points: &[T], n: usize) -> KernelResult<()> {
        check_len("point", points.len(), n, DIM)
    }

    pub(crate) fn validate_centroids(&self, centroids: &[T], k: usize) -> KernelResult<()> {
        check_cluster_count(k)?;
        check_len("centroid", centroids.len(), k, DIM)
    }

    /// Run **work** as one kernel launch, on the dedicated pool if there is one.
    ///
    /// A panicking execution unit voids the whole launch.
    fn launch<R, F>(&self, kernel: Kernel, units: usize, items: usize, work: F) -> KernelResult<R>
            where F: FnOnce() -> R + Send, R: Send {
        debug!(%kernel, units, items, "launching kernel");
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }));

        match outcome {
            Ok(result) => {
                let report = LaunchReport { kernel, units, items, elapsed: started.elapsed() };
                trace!(%kernel, elapsed_us = report.elapsed.as_micros() as u64, "kernel finished");
                (self.config.launch_done)(&report);
                Ok(result)
            }
            Err(payload) => {
                let reason = payload.downcast_ref::<&str>().map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "execution unit panicked".to_string());
                error!(%kernel, %reason, "kernel launch failed");
                Err(KernelError::LaunchFailed { kernel, reason })
            }
        }
    }
}

pub(crate) fn check_cluster_count(k: usize) -> KernelResult<()> {
    if k == 0 || k > i32::MAX as usize {
        return Err(KernelError::InvalidClusterCount(k));
    }
    Ok(())
}

fn matrix_len(n: usize, k: usize) -> KernelResult<usize> {
    n.checked_mul(k).ok_or_else(|| KernelError::InvalidDimension(
        format!("distance matrix size {} × {} overflows", n, k)))
}

/// Check that the **buffer** holds exactly `count * width` values.
fn check_len(buffer: &str, actual: usize, count: usize, width: usize) -> KernelResult<()> {
    let expected = count.checked_mul(width).ok_or_else(|| KernelError::InvalidDimension(
        format!("{} buffer size {} × {} overflows", buffer, count, width)))?;
    if actual != expected {
        return Err(KernelError::InvalidDimension(
            format!("{} buffer holds {} values, expected {} ({} × {})", buffer, actual, expected, count, width)));
    }
    Ok(())
}
