//! The standard (version 3) source map.

use serde::{Deserialize, Serialize};

use crate::mappings::{decode_mappings, encode_mappings};
use crate::{
    ByteOffset, InvalidMapError, LineIndex, OriginalLocation, Position, Segment, SourceMapBuilder,
};

/// The JSON shape of a version 3 source map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    /// Always 3.
    pub version: u32,
    /// Name of the generated file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Prefix applied to every source by consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    /// Original source identifiers.
    pub sources: Vec<Option<String>>,
    /// Original source texts, parallel to `sources`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    /// Identifier names referenced by segments.
    #[serde(default)]
    pub names: Vec<String>,
    /// VLQ encoded segments.
    pub mappings: String,
}

/// An original position with its source and name resolved to strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPosition<'a> {
    /// The original source identifier.
    pub source: &'a str,
    /// Position in the original source.
    pub position: Position,
    /// The original identifier name, if recorded.
    pub name: Option<&'a str>,
}

/// A decoded source map.
///
/// Segments are sorted by generated position and the `sources` and `names`
/// tables contain no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSourceMap", into = "RawSourceMap")]
pub struct SourceMap {
    pub(crate) file: Option<String>,
    pub(crate) source_root: Option<String>,
    pub(crate) sources: Vec<String>,
    pub(crate) sources_content: Option<Vec<Option<String>>>,
    pub(crate) names: Vec<String>,
    pub(crate) segments: Vec<Segment>,
}

impl SourceMap {
    /// Creates a source map builder.
    pub fn builder() -> SourceMapBuilder {
        SourceMapBuilder::new()
    }

    /// Parses a source map from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, InvalidMapError> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Parses a source map from an already parsed JSON value.
    pub fn from_json_value(json: serde_json::Value) -> Result<Self, InvalidMapError> {
        let raw: RawSourceMap = serde_json::from_value(json)?;
        Self::try_from(raw)
    }

    /// Builds an identity map for `code`: every token start maps to itself.
    ///
    /// A token is a maximal run of non-whitespace characters. Columns count
    /// UTF-16 code units.
    pub fn identity(code: &str, source: &str) -> Self {
        let index = LineIndex::new(code);
        let mut builder = SourceMapBuilder::new();
        let source_idx = builder.add_source(source);
        builder.set_source_content(source_idx, code);

        let mut in_token = false;
        for (offset, ch) in code.char_indices() {
            let is_token = !ch.is_whitespace();
            if is_token && !in_token {
                if let Some(position) = index.position(code, ByteOffset::from(offset as u32)) {
                    builder.add_mapped(position, source, position, None);
                }
            }
            in_token = is_token;
        }

        builder.build()
    }

    /// Returns the `file` field.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Returns the `sourceRoot` field.
    pub fn source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    /// Returns the sources table.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the names table.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the `sourcesContent` table, parallel to `sources`.
    pub fn sources_content(&self) -> Option<&[Option<String>]> {
        self.sources_content.as_deref()
    }

    /// Returns all segments, sorted by generated position.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the source at `idx`.
    pub fn source(&self, idx: u32) -> Option<&str> {
        self.sources.get(idx as usize).map(String::as_str)
    }

    /// Returns the name at `idx`.
    pub fn name(&self, idx: u32) -> Option<&str> {
        self.names.get(idx as usize).map(String::as_str)
    }

    /// Returns the content recorded for the source at `idx`.
    pub fn source_content(&self, idx: u32) -> Option<&str> {
        self.sources_content
            .as_ref()?
            .get(idx as usize)?
            .as_deref()
    }

    /// Returns the number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the map has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Finds the segment covering a generated position.
    ///
    /// A segment covers its own generated position and everything after it on
    /// the same generated line, up to the next segment. Positions before the
    /// first segment of a line, or on a line without segments, are uncovered.
    /// When several segments share a generated position the last one wins.
    pub fn lookup(&self, generated: Position) -> Option<&Segment> {
        let idx = self
            .segments
            .partition_point(|segment| segment.generated <= generated);
        let segment = self.segments.get(idx.checked_sub(1)?)?;
        (segment.generated.line == generated.line).then_some(segment)
    }

    /// Maps a generated position to its original location.
    ///
    /// The column offset from the covering segment's generated start is carried
    /// onto its original column. Returns `None` for uncovered positions and for
    /// positions covered by a null mapping.
    pub fn original_location_for(&self, generated: Position) -> Option<OriginalLocation> {
        let segment = self.lookup(generated)?;
        let mut original = segment.original?;
        let delta = generated.column - segment.generated.column;
        original.position.column = original.position.column.saturating_add(delta);
        Some(original)
    }

    /// Like [`SourceMap::original_location_for`], with source and name resolved.
    pub fn original_position_for(&self, generated: Position) -> Option<ResolvedPosition<'_>> {
        let original = self.original_location_for(generated)?;
        Some(ResolvedPosition {
            source: self.source(original.source)?,
            position: original.position,
            name: original.name.and_then(|name| self.name(name)),
        })
    }

    /// Converts this map into its JSON shape.
    pub fn to_raw(&self) -> RawSourceMap {
        RawSourceMap {
            version: 3,
            file: self.file.clone(),
            source_root: self.source_root.clone(),
            sources: self.sources.iter().cloned().map(Some).collect(),
            sources_content: self.sources_content.clone(),
            names: self.names.clone(),
            mappings: encode_mappings(&self.segments),
        }
    }

    /// Serializes this map to JSON text.
    pub fn to_json_string(&self) -> String {
        // Serializing plain strings and integers cannot fail.
        serde_json::to_string(&self.to_raw()).unwrap_or_default()
    }
}

impl TryFrom<RawSourceMap> for SourceMap {
    type Error = InvalidMapError;

    fn try_from(raw: RawSourceMap) -> Result<Self, Self::Error> {
        if raw.version != 3 {
            return Err(InvalidMapError::UnsupportedVersion(raw.version));
        }
        if let Some(content) = &raw.sources_content {
            if content.len() != raw.sources.len() {
                return Err(InvalidMapError::SourcesContentLength {
                    content: content.len(),
                    sources: raw.sources.len(),
                });
            }
        }

        let mut segments = decode_mappings(&raw.mappings, raw.sources.len(), raw.names.len())?;

        // Fold duplicate table entries onto their first occurrence.
        let mut builder = SourceMapBuilder::new();
        let source_remap: Vec<u32> = raw
            .sources
            .iter()
            .map(|source| builder.add_source(source.as_deref().unwrap_or_default()))
            .collect();
        let name_remap: Vec<u32> = raw.names.iter().map(|name| builder.add_name(name)).collect();

        for segment in &mut segments {
            if let Some(original) = &mut segment.original {
                original.source = source_remap[original.source as usize];
                original.name = original.name.map(|name| name_remap[name as usize]);
            }
        }

        let mut sources_content = raw
            .sources_content
            .as_ref()
            .map(|_| vec![None; builder.source_count()]);
        if let (Some(deduped), Some(content)) = (&mut sources_content, &raw.sources_content) {
            for (raw_idx, text) in content.iter().enumerate() {
                let slot = &mut deduped[source_remap[raw_idx] as usize];
                if slot.is_none() {
                    slot.clone_from(text);
                }
            }
        }

        let mut map = builder.build();
        segments.sort_by_key(|segment| segment.generated);
        map.segments = segments;
        map.file = raw.file;
        map.source_root = raw.source_root;
        map.sources_content = sources_content;
        Ok(map)
    }
}

impl From<SourceMap> for RawSourceMap {
    fn from(map: SourceMap) -> Self {
        map.to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SIMPLE: &str = r#"{
        "version": 3,
        "file": "out.js",
        "sources": ["a.js"],
        "sourcesContent": ["let x = 1;"],
        "names": ["x"],
        "mappings": "AAAA,IAAIA;AACA"
    }"#;

    #[test]
    fn test_parse_simple() {
        let map = SourceMap::from_json_str(SIMPLE).unwrap();
        assert_eq!(map.file(), Some("out.js"));
        assert_eq!(map.sources(), ["a.js"]);
        assert_eq!(map.names(), ["x"]);
        assert_eq!(map.source_content(0), Some("let x = 1;"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_rejects_wrong_version() {
        let err = SourceMap::from_json_str(
            r#"{"version":2,"sources":[],"names":[],"mappings":""}"#,
        )
        .unwrap_err();
        assert!(matches!(err, InvalidMapError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_rejects_non_json() {
        let err = SourceMap::from_json_str("not a map").unwrap_err();
        assert!(matches!(err, InvalidMapError::Json(_)));
    }

    #[test]
    fn test_rejects_sources_content_mismatch() {
        let err = SourceMap::from_json_str(
            r#"{"version":3,"sources":["a.js"],"sourcesContent":[],"names":[],"mappings":""}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InvalidMapError::SourcesContentLength {
                content: 0,
                sources: 1
            }
        ));
    }

    #[test]
    fn test_duplicate_sources_are_folded() {
        let map = SourceMap::from_json_str(
            r#"{"version":3,"sources":["a.js","a.js"],"names":["n","n"],"mappings":"AAAA,CCAAC"}"#,
        )
        .unwrap();
        assert_eq!(map.sources(), ["a.js"]);
        assert_eq!(map.names(), ["n"]);
        let original = map.segments()[1].original.unwrap();
        assert_eq!(original.source, 0);
        assert_eq!(original.name, Some(0));
    }

    #[test]
    fn test_duplicate_sources_keep_first_content() {
        let map = SourceMap::from_json_str(
            r#"{
                "version": 3,
                "sources": ["a.js", "b.js", "a.js"],
                "sourcesContent": [null, "let b;", "let a;"],
                "names": [],
                "mappings": "AAAA,CCAA,CCAA"
            }"#,
        )
        .unwrap();
        assert_eq!(map.sources(), ["a.js", "b.js"]);
        // The first occurrence has no content, so the duplicate's fills the slot.
        assert_eq!(map.source_content(0), Some("let a;"));
        assert_eq!(map.source_content(1), Some("let b;"));
        let sources: Vec<_> = map
            .segments()
            .iter()
            .map(|segment| segment.original.unwrap().source)
            .collect();
        assert_eq!(sources, vec![0, 1, 0]);
    }

    #[test]
    fn test_lookup_nearest_preceding_on_line() {
        let map = SourceMap::from_json_str(SIMPLE).unwrap();

        let segment = map.lookup(Position::new(1, 6)).unwrap();
        assert_eq!(segment.generated, Position::new(1, 4));

        // Line 2 starts with a segment at column 0.
        let segment = map.lookup(Position::new(2, 9)).unwrap();
        assert_eq!(segment.generated, Position::new(2, 0));

        // Nothing on line 3, and line 2's segment does not spill over.
        assert_eq!(map.lookup(Position::new(3, 0)), None);
    }

    #[test]
    fn test_lookup_tie_prefers_last() {
        let map = SourceMap::from_json_str(
            r#"{"version":3,"sources":["a.js"],"names":[],"mappings":"AAAA,AACA"}"#,
        )
        .unwrap();
        let segment = map.lookup(Position::new(1, 0)).unwrap();
        assert_eq!(segment.original.unwrap().position, Position::new(2, 0));
    }

    #[test]
    fn test_original_position_carries_column() {
        let map = SourceMap::from_json_str(SIMPLE).unwrap();
        let resolved = map.original_position_for(Position::new(1, 6)).unwrap();
        assert_eq!(resolved.source, "a.js");
        assert_eq!(resolved.position, Position::new(1, 6));
        assert_eq!(resolved.name, Some("x"));
    }

    #[test]
    fn test_serialize_is_stable() {
        let map = SourceMap::from_json_str(SIMPLE).unwrap();
        assert_eq!(
            map.to_json_string(),
            r#"{"version":3,"file":"out.js","sources":["a.js"],"sourcesContent":["let x = 1;"],"names":["x"],"mappings":"AAAA,IAAIA;AACA"}"#
        );
        assert_eq!(map.to_json_string(), map.clone().to_json_string());
    }

    #[test]
    fn test_serde_roundtrip_through_value() {
        let map = SourceMap::from_json_str(SIMPLE).unwrap();
        let value = serde_json::to_value(&map).unwrap();
        let back: SourceMap = serde_json::from_value(value).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_identity_maps_token_starts() {
        let map = SourceMap::identity("let a = 1;\n  foo(a);", "a.js");
        let generated: Vec<_> = map.segments().iter().map(|s| s.generated).collect();
        assert_eq!(
            generated,
            vec![
                Position::new(1, 0),
                Position::new(1, 4),
                Position::new(1, 6),
                Position::new(1, 8),
                Position::new(2, 2),
            ]
        );
        for segment in map.segments() {
            assert_eq!(segment.original.unwrap().position, segment.generated);
        }
        assert_eq!(map.source_content(0), Some("let a = 1;\n  foo(a);"));
    }

    #[test]
    fn test_identity_counts_utf16_columns() {
        // 'é' is two bytes and one UTF-16 unit; the emoji is four bytes and two.
        let map = SourceMap::identity("é x\n😀 y", "a.js");
        let generated: Vec<_> = map.segments().iter().map(|s| s.generated).collect();
        assert_eq!(
            generated,
            vec![
                Position::new(1, 0),
                Position::new(1, 2),
                Position::new(2, 0),
                Position::new(2, 3),
            ]
        );
    }
}
