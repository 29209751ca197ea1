//! Line diffs between the index and the working copy
//!
//! - `myers`: Myers' shortest-edit-script algorithm
//! - `unified`: grouping of an edit script into hunks and unified-diff rendering

pub mod myers;
pub mod unified;

/// Lines of unchanged context around each hunk
pub const CONTEXT_LINES: usize = 3;

/// Separator printed between the diffs of consecutive files
pub const FILE_SEPARATOR_WIDTH: usize = 70;
