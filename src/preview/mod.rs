pub mod diff;

pub use diff::{DiffPreview, preview, print_preview, unified_diff};
