//! Utility functions for the graph builder and rule implementations.

pub mod paths;

#[doc(inline)]
pub use paths::{file_name, normalize_path, package_matches, parent_dir, relative_to};
