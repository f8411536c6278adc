use thiserror::Error;

/// The kernels a [`KMeansKernels`](crate::KMeansKernels) instance launches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// Point-to-centroid distance matrix
    Distances,
    /// Nearest-centroid (minimum index) search
    Assign,
    /// Per-cluster feature sums and counts
    Accumulate,
}
impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kernel::Distances => write!(f, "compute_distances"),
            Kernel::Assign => write!(f, "assign"),
            Kernel::Accumulate => write!(f, "accumulate"),
        }
    }
}

/// Error types for the kernel launches.
///
/// Everything except [`KernelError::LaunchFailed`] is detected before any parallel work is
/// dispatched, so no output buffer is touched in those cases.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A buffer length does not match `N`, `K` and `DIM`
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// The number of clusters is zero, or does not fit the `i32` assignment type
    #[error("Invalid cluster count: {0}")]
    InvalidClusterCount(usize),

    /// An externally supplied assignment lies outside `[0, k)`
    #[error("Assignment {value} of point {index} is out of range [0, {k})")]
    IndexOutOfRange { index: usize, value: i32, k: usize },

    /// Invalid configuration parameter
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The dedicated worker pool could not be created
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(String),

    /// An execution unit failed; the whole launch is void
    #[error("Kernel {kernel} failed: {reason}")]
    LaunchFailed { kernel: Kernel, reason: String },
}

/// Result type for kernel launches.
pub type KernelResult<T> = Result<T, KernelError>;
