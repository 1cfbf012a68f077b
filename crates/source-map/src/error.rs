//! Source map error types.

use thiserror::Error;

/// An error decoding a single base64 VLQ value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VlqError {
    /// A character outside the base64 alphabet was found.
    #[error("invalid base64 character {0:?}")]
    InvalidBase64(char),

    /// The input ended while a continuation bit was set.
    #[error("unexpected end of VLQ value")]
    UnexpectedEof,

    /// The decoded value does not fit into 64 bits.
    #[error("VLQ value overflows")]
    Overflow,
}

/// A supplied source map failed structural validation.
#[derive(Debug, Error)]
pub enum InvalidMapError {
    /// The input is not valid source map JSON.
    #[error("invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The `version` field is not 3.
    #[error("unsupported source map version {0}, expected 3")]
    UnsupportedVersion(u32),

    /// A `mappings` entry could not be decoded.
    #[error("corrupt mappings on generated line {line}: {source}")]
    Vlq {
        /// 1-based generated line containing the bad segment.
        line: u32,
        /// The underlying decode error.
        source: VlqError,
    },

    /// A segment has a field count other than 1, 4 or 5.
    #[error("segment on generated line {line} has {fields} fields, expected 1, 4 or 5")]
    InvalidSegmentLength {
        /// 1-based generated line containing the bad segment.
        line: u32,
        /// Number of fields found.
        fields: usize,
    },

    /// A running delta produced a negative value.
    #[error("negative {field} on generated line {line}")]
    NegativeValue {
        /// 1-based generated line containing the bad segment.
        line: u32,
        /// The field that went negative.
        field: &'static str,
    },

    /// A value does not fit the position range.
    #[error("{field} out of range on generated line {line}")]
    ValueOutOfRange {
        /// 1-based generated line containing the bad segment.
        line: u32,
        /// The field that overflowed.
        field: &'static str,
    },

    /// A segment references a source that does not exist.
    #[error("source index {index} out of range ({len} sources)")]
    SourceOutOfRange {
        /// The referenced index.
        index: u32,
        /// Length of the `sources` table.
        len: usize,
    },

    /// A segment references a name that does not exist.
    #[error("name index {index} out of range ({len} names)")]
    NameOutOfRange {
        /// The referenced index.
        index: u32,
        /// Length of the `names` table.
        len: usize,
    },

    /// `sourcesContent` does not line up with `sources`.
    #[error("sourcesContent has {content} entries but there are {sources} sources")]
    SourcesContentLength {
        /// Number of `sourcesContent` entries.
        content: usize,
        /// Number of `sources` entries.
        sources: usize,
    },
}
