//! # kmeans-kernels - API documentation
//!
//! kmeans-kernels implements the compute-intensive inner loop of k-means clustering as three
//! data-parallel kernels over flat buffers:
//! 1. the full point-to-centroid **distance matrix**
//! 2. the **assignment** of every point to its nearest centroid
//! 3. the **accumulation** of per-cluster feature sums and member counts
//!
//! ## Design target
//! Like a GPU kernel library, the API-surface is rather plain: points, centroids, distances and
//! assignments are passed as raw, point-major slices instead of any matrix crate. The amount of
//! features per point (`DIM`, default 3) is a compile-time constant, so all per-point scratch
//! buffers live on the stack.
//!
//! Everything around these kernels (picking initial centroids, dividing the sums by the counts,
//! deciding about convergence) is left to the caller.
//!
//! ## Work partitioning
//! - Distances & assignments: the point index space is split into contiguous chunks of
//!   `chunk_size` points, one chunk per execution unit. Units write disjoint rows.
//! - Accumulation: one execution unit per cluster. Each unit scans all points and is the only one
//!   ever writing its cluster's sum and count, so the combine needs neither atomics nor locks.
//!
//! ## Supported distance metrics
//! - [`SquaredEuclidean`]
//! - [`CumulativeDifference`] (1-D earth-mover distance for ordered histograms)
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kmeans_kernels::*;
//!
//! let points = vec![0.0f32, 0.0, 0.0, 10.0, 10.0, 10.0];
//! let centroids = points.clone();
//!
//! let kernels: KMeansKernels<f32> = KMeansKernels::new(KernelConfig::default()).unwrap();
//! let distances = kernels.compute_distances(&points, &centroids, 2, 2).unwrap();
//! assert_eq!(distances, vec![0.0, 300.0, 300.0, 0.0]);
//!
//! let assignments = kernels.assign(&distances, 2, 2).unwrap();
//! assert_eq!(assignments, vec![0, 1]);
//!
//! // The kernels only ever add into these, zero them at the start of every epoch
//! let (mut sums, mut counts) = (vec![0.0f32; 6], vec![0usize; 2]);
//! kernels.accumulate(&points, &assignments, 2, 2, &mut sums, &mut counts).unwrap();
//! assert_eq!(sums, vec![0.0, 0.0, 0.0, 10.0, 10.0, 10.0]);
//! assert_eq!(counts, vec![1, 1]);
//! ```
//!
//! ## Example (histogram features, status callback)
//! ```rust
//! use kmeans_kernels::*;
//!
//! let conf = KernelConfig::build()
//!     .metric(Metric::CumulativeDifference)
//!     .chunk_size(1024)
//!     .launch_done(&|report| println!("{} finished: {} units in {:?}", report.kernel, report.units, report.elapsed))
//!     .build();
//! let kernels: KMeansKernels<f64> = KMeansKernels::new(conf).unwrap();
//!
//! let mut accumulator = CentroidAccumulator::new(1);
//! let step = kernels.lloyd_step(&[3.0, 2.0, 1.0], &[1.0, 2.0, 3.0], 1, &mut accumulator).unwrap();
//! assert_eq!(step.distsum, 4.0);
//! ```

#[macro_use] mod helpers;
mod memory;
mod api;
mod error;
mod accumulator;
mod distances;
mod kernels;
mod variants;

/// Default amount of features per point.
pub const DEFAULT_DIM: usize = 3;

pub use accumulator::CentroidAccumulator;
pub use api::{BatchedStep, KMeansKernels, KernelConfig, KernelConfigBuilder, LaunchDoneCallbackFn, LaunchReport, LloydStep};
pub use distances::{CumulativeDifference, DistanceFunction, Metric, SquaredEuclidean};
pub use error::{Kernel, KernelError, KernelResult};
pub use helpers::{chunk_range, unit_count};
pub use kernels::min_index;
pub use memory::Primitive;
