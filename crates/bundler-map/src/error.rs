//! Raw map error types.

use thiserror::Error;

/// A raw bundler map whose module records cannot be laid out in order.
#[derive(Debug, Error)]
pub enum MalformedInputError {
    /// The input is not a raw bundler map.
    #[error("invalid raw source map: {0}")]
    Json(#[from] serde_json::Error),

    /// A module starts before the previous module ends.
    #[error("module {module} starts at bundle line offset {offset}, overlapping {previous} which ends at {expected}")]
    Overlap {
        /// The overlapping module.
        module: String,
        /// The module preceding it.
        previous: String,
        /// Line offset of the overlapping module.
        offset: u32,
        /// Line offset where the previous module ends.
        expected: u32,
    },

    /// A module starts after the previous module ends, leaving unowned lines.
    #[error("module {module} starts at bundle line offset {offset}, leaving a gap after {previous} which ends at {expected}")]
    Gap {
        /// The module after the gap.
        module: String,
        /// The module before the gap.
        previous: String,
        /// Line offset of the module after the gap.
        offset: u32,
        /// Line offset where the previous module ends.
        expected: u32,
    },

    /// A segment lies outside its module's lines.
    #[error("module {module} has a mapping on line {line}, but only spans {line_count} lines")]
    SegmentOutOfRange {
        /// The module owning the segment.
        module: String,
        /// The segment's module-relative line.
        line: u32,
        /// Number of lines the module spans.
        line_count: u32,
    },

    /// A segment uses line 0, which does not exist in 1-based numbering.
    #[error("module {module} has a mapping on line 0 (lines are 1-based)")]
    ZeroLine {
        /// The module owning the segment.
        module: String,
    },

    /// A segment points at original line 0, which does not exist in 1-based
    /// numbering.
    #[error("module {module} maps generated line {line} to original line 0 (lines are 1-based)")]
    ZeroOriginalLine {
        /// The module owning the segment.
        module: String,
        /// The segment's generated line.
        line: u32,
    },

    /// Module offsets exceed the representable line range.
    #[error("module {module} extends past the last representable bundle line")]
    LineOverflow {
        /// The module that overflows.
        module: String,
    },
}
