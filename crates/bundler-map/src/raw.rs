//! The bundler's raw source map shapes.

use serde::{Deserialize, Serialize};
use source_map::Position;

use crate::MalformedInputError;

/// One raw mapping tuple.
///
/// Generated lines are 1-based and relative to the owning module; columns are
/// 0-based. Original lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSegment {
    /// `[genLine, genCol]`: generated code with no original position.
    Generated(u32, u32),
    /// `[genLine, genCol, origLine, origCol]`.
    Original(u32, u32, u32, u32),
    /// `[genLine, genCol, origLine, origCol, name]`.
    Named(u32, u32, u32, u32, String),
}

impl RawSegment {
    /// Returns the module-relative generated position.
    pub fn generated(&self) -> Position {
        match *self {
            RawSegment::Generated(line, column)
            | RawSegment::Original(line, column, _, _)
            | RawSegment::Named(line, column, _, _, _) => Position::new(line, column),
        }
    }

    /// Returns the original position, if any.
    pub fn original(&self) -> Option<Position> {
        match *self {
            RawSegment::Generated(..) => None,
            RawSegment::Original(_, _, line, column) | RawSegment::Named(_, _, line, column, _) => {
                Some(Position::new(line, column))
            }
        }
    }

    /// Returns the original identifier name, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            RawSegment::Named(.., name) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// A module's slice of the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawModule {
    /// Module identifier, used in error messages.
    pub module: String,
    /// Number of bundle lines that precede this module.
    pub line_offset: u32,
    /// Number of bundle lines this module occupies.
    pub line_count: u32,
    /// Source the module's segments are attributed to, instead of the file
    /// being transformed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// The module's mappings, with module-relative generated lines.
    #[serde(default)]
    pub mappings: Vec<RawSegment>,
}

/// A raw bundler map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawBundlerMap {
    /// Per-module records, ordered by line offset.
    Modules(Vec<RawModule>),
    /// Flat tuples for a single module at the top of the bundle.
    Segments(Vec<RawSegment>),
}

impl RawBundlerMap {
    /// Parses a raw map from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, MalformedInputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a raw map from an already parsed JSON value.
    pub fn from_json_value(json: serde_json::Value) -> Result<Self, MalformedInputError> {
        Ok(serde_json::from_value(json)?)
    }
}
