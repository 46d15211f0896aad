pub(crate) mod catalog;
pub(crate) mod solver;
pub(crate) mod template;
