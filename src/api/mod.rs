pub mod errors;
pub mod merge;
pub mod table;

pub use errors::{MergeError, MergeResult};
pub use merge::{Merger, merge_csv_dir, merge_csv_files};
pub use table::{MergeStats, UnifiedTable};
