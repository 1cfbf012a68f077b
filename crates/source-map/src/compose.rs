//! Composition of two chained source maps.

use tracing::debug;

use crate::{InvalidMapError, Position, SourceMap, SourceMapBuilder};

/// Composes `first` (original → intermediate) with `second` (intermediate →
/// final) into a single map from the original source to the final output.
///
/// Every segment of `second` yields exactly one output segment at the same
/// generated position, except that repeated generated positions keep only the
/// first. A segment resolves through `first` when `first` covers its
/// intermediate position and that covering segment has an original position;
/// otherwise it becomes a null mapping. Sources and names come from `first`;
/// `second`'s own sources name the intermediate code and are dropped.
///
/// `file` is set to `final_filename`. When exactly one source is referenced and
/// `first` carries no content for it, `original_source` becomes its content.
pub fn compose(
    first: &SourceMap,
    second: &SourceMap,
    final_filename: &str,
    original_source: &str,
) -> SourceMap {
    let mut builder = SourceMapBuilder::new();
    builder.set_file(final_filename);

    let mut last_generated: Option<Position> = None;
    let mut resolved = 0usize;

    for segment in second.segments() {
        if last_generated == Some(segment.generated) {
            continue;
        }
        last_generated = Some(segment.generated);

        let Some(intermediate) = segment.original else {
            builder.add_null(segment.generated);
            continue;
        };

        let Some(original) = first.original_location_for(intermediate.position) else {
            builder.add_null(segment.generated);
            continue;
        };

        let Some(source) = first.source(original.source) else {
            builder.add_null(segment.generated);
            continue;
        };
        let name = original.name.and_then(|name| first.name(name));

        let source_idx = builder.add_source(source);
        if let Some(content) = first.source_content(original.source) {
            builder.set_source_content(source_idx, content);
        }
        builder.add_mapped(segment.generated, source, original.position, name);
        resolved += 1;
    }

    if builder.source_count() == 1 && !builder.has_source_content() {
        builder.set_source_content(0, original_source);
    }

    debug!(
        file = final_filename,
        segments = second.len(),
        resolved,
        "composed source maps"
    );

    builder.build()
}

/// Parses both maps from JSON and composes them.
///
/// This is the only fallible path: a map that is not a structurally valid
/// version 3 source map is rejected before any composition happens.
pub fn compose_json(
    first: &str,
    second: &str,
    final_filename: &str,
    original_source: &str,
) -> Result<SourceMap, InvalidMapError> {
    let first = SourceMap::from_json_str(first)?;
    let second = SourceMap::from_json_str(second)?;
    Ok(compose(&first, &second, final_filename, original_source))
}
