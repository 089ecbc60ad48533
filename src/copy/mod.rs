//! Core copy operations.
//!
//! Planning ([`plan_operation`]) resolves what a copy would do without
//! touching the filesystem; [`CopyEngine`] re-validates each plan right
//! before executing it and dispatches to the file, symlink or directory
//! handler.

mod dir;
mod engine;
mod file;
mod link;
mod plan;
mod utils;

pub use engine::{CopyEngine, CopyStats, DEFAULT_PROGRAM_NAME, Status, Validation};
pub use plan::{CopyOperation, FileType, plan_child, plan_operation};
