//! Internal utility modules.

pub(crate) mod dir;
pub mod path;
