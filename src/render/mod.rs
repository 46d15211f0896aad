pub(crate) mod compositor;
pub(crate) mod sequence;
pub(crate) mod surface;
