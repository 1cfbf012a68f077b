//! Conversion from raw bundler maps to standard source maps.

use source_map::{Position, SourceMap, SourceMapBuilder};
use tracing::debug;

use crate::{MalformedInputError, RawBundlerMap, RawModule, RawSegment};

/// Converts a raw bundler map into a standard source map.
///
/// Module-relative generated lines are re-based onto the bundle by adding each
/// module's line offset. Segments are attributed to `original_filename` unless
/// their module names another source. When `original_filename` is the only
/// source, `original_source` is recorded as its content.
///
/// Fails if module records are not contiguous in bundle lines, if a segment
/// falls outside its module, or if a line number is 0.
pub fn normalize(
    raw: &RawBundlerMap,
    original_filename: &str,
    original_source: &str,
) -> Result<SourceMap, MalformedInputError> {
    let mut builder = SourceMapBuilder::new();

    match raw {
        RawBundlerMap::Modules(modules) => {
            check_contiguous(modules)?;
            for module in modules {
                let source = module.source.as_deref().unwrap_or(original_filename);
                for segment in &module.mappings {
                    check_in_module(module, segment)?;
                    let generated = rebase(module, segment.generated())?;
                    add_segment(&mut builder, &module.module, generated, source, segment)?;
                }
            }
        }
        RawBundlerMap::Segments(segments) => {
            for segment in segments {
                let generated = segment.generated();
                if generated.line == 0 {
                    return Err(MalformedInputError::ZeroLine {
                        module: original_filename.to_string(),
                    });
                }
                add_segment(
                    &mut builder,
                    original_filename,
                    generated,
                    original_filename,
                    segment,
                )?;
            }
        }
    }

    if builder.source_count() == 1 {
        if let Some(idx) = builder.source_index(original_filename) {
            builder.set_source_content(idx, original_source);
        }
    }

    let map = builder.build();
    debug!(
        file = original_filename,
        segments = map.len(),
        sources = map.sources().len(),
        "normalized raw bundler map"
    );
    Ok(map)
}

fn check_contiguous(modules: &[RawModule]) -> Result<(), MalformedInputError> {
    for pair in modules.windows(2) {
        let (previous, module) = (&pair[0], &pair[1]);
        let expected = end_offset(previous)?;

        if module.line_offset < expected {
            return Err(MalformedInputError::Overlap {
                module: module.module.clone(),
                previous: previous.module.clone(),
                offset: module.line_offset,
                expected,
            });
        }
        if module.line_offset > expected {
            return Err(MalformedInputError::Gap {
                module: module.module.clone(),
                previous: previous.module.clone(),
                offset: module.line_offset,
                expected,
            });
        }
    }
    Ok(())
}

fn end_offset(module: &RawModule) -> Result<u32, MalformedInputError> {
    module
        .line_offset
        .checked_add(module.line_count)
        .ok_or_else(|| MalformedInputError::LineOverflow {
            module: module.module.clone(),
        })
}

fn check_in_module(module: &RawModule, segment: &RawSegment) -> Result<(), MalformedInputError> {
    let line = segment.generated().line;
    if line == 0 {
        return Err(MalformedInputError::ZeroLine {
            module: module.module.clone(),
        });
    }
    if line > module.line_count {
        return Err(MalformedInputError::SegmentOutOfRange {
            module: module.module.clone(),
            line,
            line_count: module.line_count,
        });
    }
    Ok(())
}

fn rebase(module: &RawModule, relative: Position) -> Result<Position, MalformedInputError> {
    let line = relative
        .line
        .checked_add(module.line_offset)
        .ok_or_else(|| MalformedInputError::LineOverflow {
            module: module.module.clone(),
        })?;
    Ok(Position::new(line, relative.column))
}

fn add_segment(
    builder: &mut SourceMapBuilder,
    module: &str,
    generated: Position,
    source: &str,
    segment: &RawSegment,
) -> Result<(), MalformedInputError> {
    match segment.original() {
        Some(original) if original.line == 0 => Err(MalformedInputError::ZeroOriginalLine {
            module: module.to_string(),
            line: segment.generated().line,
        }),
        Some(original) => {
            builder.add_mapped(generated, source, original, segment.name());
            Ok(())
        }
        None => {
            builder.add_null(generated);
            Ok(())
        }
    }
}
