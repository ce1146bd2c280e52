pub(crate) mod ease;
pub(crate) mod sampler;
pub(crate) mod style;
