//! The data-parallel kernels themselves. Every function in here expects already validated buffers,
//! validation happens in [`crate::KMeansKernels`] before anything is dispatched.

mod accumulate;
mod assign;
mod distances;

pub(crate) use accumulate::accumulate;
pub(crate) use assign::assign;
pub(crate) use distances::compute_distances;
pub use assign::min_index;
