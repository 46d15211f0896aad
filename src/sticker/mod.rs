pub(crate) mod engine;
pub(crate) mod model;
pub(crate) mod trigger;
