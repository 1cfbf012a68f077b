//! Builder for assembling source maps segment by segment.

use indexmap::IndexSet;

use crate::{OriginalLocation, Position, Segment, SourceMap};

/// A builder for constructing source maps.
///
/// Sources and names are interned in first-occurrence order, so the built map
/// never contains duplicate table entries.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    file: Option<String>,
    sources: IndexSet<String>,
    /// Parallel to `sources`.
    sources_content: Vec<Option<String>>,
    names: IndexSet<String>,
    segments: Vec<Segment>,
}

impl SourceMapBuilder {
    /// Creates a new source map builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `file` field of the built map.
    pub fn set_file(&mut self, file: impl Into<String>) -> &mut Self {
        self.file = Some(file.into());
        self
    }

    /// Interns a source, returning its index.
    pub fn add_source(&mut self, source: &str) -> u32 {
        if let Some(idx) = self.sources.get_index_of(source) {
            return idx as u32;
        }
        let (idx, _) = self.sources.insert_full(source.to_string());
        self.sources_content.push(None);
        idx as u32
    }

    /// Interns a name, returning its index.
    pub fn add_name(&mut self, name: &str) -> u32 {
        if let Some(idx) = self.names.get_index_of(name) {
            return idx as u32;
        }
        self.names.insert_full(name.to_string()).0 as u32
    }

    /// Attaches content to an interned source. Existing content is kept.
    pub fn set_source_content(&mut self, source: u32, content: impl Into<String>) {
        if let Some(slot) = self.sources_content.get_mut(source as usize) {
            if slot.is_none() {
                *slot = Some(content.into());
            }
        }
    }

    /// Returns the index of an already interned source.
    pub fn source_index(&self, source: &str) -> Option<u32> {
        self.sources.get_index_of(source).map(|idx| idx as u32)
    }

    /// Returns the number of interned sources.
    #[inline]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if any source has content attached.
    pub fn has_source_content(&self) -> bool {
        self.sources_content.iter().any(Option::is_some)
    }

    /// Adds a null mapping at a generated position.
    pub fn add_null(&mut self, generated: Position) {
        self.segments.push(Segment::null(generated));
    }

    /// Adds a mapping to an original position in `source`.
    pub fn add_mapped(
        &mut self,
        generated: Position,
        source: &str,
        original: Position,
        name: Option<&str>,
    ) {
        let source = self.add_source(source);
        let name = name.map(|name| self.add_name(name));
        self.segments.push(Segment::mapped(
            generated,
            OriginalLocation {
                source,
                position: original,
                name,
            },
        ));
    }

    /// Builds the final source map.
    pub fn build(mut self) -> SourceMap {
        // Stable: ties keep insertion order.
        self.segments.sort_by_key(|segment| segment.generated);

        let sources_content = self
            .has_source_content()
            .then_some(self.sources_content);

        SourceMap {
            file: self.file,
            source_root: None,
            sources: self.sources.into_iter().collect(),
            sources_content,
            names: self.names.into_iter().collect(),
            segments: self.segments,
        }
    }
}
