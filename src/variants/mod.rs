pub(crate) mod lloyd;
pub(crate) mod minibatch;
