//! Adapter from the bundler's raw source map arrays to standard source maps.
//!
//! The bundler hands out mappings as arrays of tuples instead of a VLQ
//! encoded map, either flat for a single module or grouped into per-module
//! records that carry the module's line offset within the bundle. This crate
//! converts both shapes into a [`source_map::SourceMap`] sorted by generated
//! position, ready to be used as the first stage of a composition.
//!
//! # Example
//!
//! ```
//! use bundler_map::{normalize, RawBundlerMap};
//!
//! let raw = RawBundlerMap::from_json_str(
//!     r#"[{"module": "app.js", "lineOffset": 10, "lineCount": 5, "mappings": [[2, 0, 5, 2]]}]"#,
//! )
//! .unwrap();
//! let map = normalize(&raw, "src/app.js", "").unwrap();
//! assert_eq!(map.sources(), ["src/app.js"]);
//! ```

mod error;
mod normalize;
mod raw;

pub use error::MalformedInputError;
pub use normalize::normalize;
pub use raw::{RawBundlerMap, RawModule, RawSegment};
