//! Discovery of lintable items in a PBIP tree
//!
//! - `scanner`: bounded walk that finds folders holding a marker file
//! - `classifier`: reads the declared item type from the marker file
//! - `grouper`: groups items by parent folder and buckets them by kind

pub mod classifier;
pub mod grouper;
pub mod scanner;

pub use classifier::{classify, read_metadata_field};
pub use grouper::group;
pub use scanner::{is_item_root, scan, DEFAULT_MAX_DEPTH};

/// Marker file that turns a folder into an item root
pub const MARKER_FILE: &str = ".platform";
