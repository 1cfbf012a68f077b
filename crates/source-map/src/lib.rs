//! Source map model and composition for obfuscated bundles.
//!
//! This crate reads and writes version 3 source maps, looks up original
//! positions for generated ones, and composes two maps of a transformation
//! chain (original → intermediate → final) into a single map from the original
//! source straight to the final output.
//!
//! # Example
//!
//! ```
//! use source_map::{compose, SourceMap};
//!
//! let first = SourceMap::from_json_str(
//!     r#"{"version":3,"sources":["a.js"],"names":[],"mappings":";;;;AAAA"}"#,
//! )
//! .unwrap();
//! let second = SourceMap::from_json_str(
//!     r#"{"version":3,"sources":["a.bundle.js"],"names":[],"mappings":";;;;;;;;GAIE"}"#,
//! )
//! .unwrap();
//!
//! let composed = compose(&first, &second, "a.obfuscated.js", "let a = 1;");
//! assert_eq!(composed.sources(), ["a.js"]);
//! ```

mod builder;
mod compose;
mod error;
mod line_index;
mod map;
mod mappings;
mod position;
pub mod vlq;

pub use builder::SourceMapBuilder;
pub use compose::{compose, compose_json};
pub use error::{InvalidMapError, VlqError};
pub use line_index::{LineCol, LineIndex};
pub use map::{RawSourceMap, ResolvedPosition, SourceMap};
pub use mappings::{decode_mappings, encode_mappings};
pub use position::{ByteOffset, OriginalLocation, Position, Segment};
