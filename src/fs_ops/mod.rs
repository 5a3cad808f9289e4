//! Filesystem operations: root resolution, the tree walk, per-file stamping.

mod helpers;
mod prefix;
pub mod report;
mod resolve;
mod stamp;
mod walk;

pub use helpers::io_error_with_help;
pub use prefix::utc_prefix;
pub use report::{Failure, RunReport};
pub use resolve::resolve_root;
pub use stamp::stamp_file;
pub use walk::stamp_tree;
