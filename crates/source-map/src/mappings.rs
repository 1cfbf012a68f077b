//! Encoding and decoding of the `mappings` field.

use crate::{vlq, InvalidMapError, OriginalLocation, Position, Segment};

/// Running values shared by consecutive segments.
///
/// The generated column resets on every line; everything else carries over for
/// the whole mappings string.
#[derive(Debug, Default, Clone, Copy)]
struct DeltaState {
    generated_column: i64,
    source: i64,
    original_line: i64,
    original_column: i64,
    name: i64,
}

/// Decodes a `mappings` string into segments ordered as they appear.
///
/// `sources_len` and `names_len` bound the indices a segment may reference.
pub fn decode_mappings(
    mappings: &str,
    sources_len: usize,
    names_len: usize,
) -> Result<Vec<Segment>, InvalidMapError> {
    let mut segments = Vec::new();
    let mut state = DeltaState::default();

    for (line_idx, line_text) in mappings.split(';').enumerate() {
        let line = u32::try_from(line_idx + 1).map_err(|_| InvalidMapError::ValueOutOfRange {
            line: u32::MAX,
            field: "generated line",
        })?;
        state.generated_column = 0;

        for segment_text in line_text.split(',') {
            if segment_text.is_empty() {
                continue;
            }
            let fields = decode_fields(segment_text, line)?;
            let segment = apply_fields(&fields, &mut state, line, sources_len, names_len)?;
            segments.push(segment);
        }
    }

    Ok(segments)
}

fn decode_fields(mut text: &str, line: u32) -> Result<Vec<i64>, InvalidMapError> {
    let mut fields = Vec::with_capacity(5);
    while !text.is_empty() {
        let (value, consumed) =
            vlq::decode(text).map_err(|source| InvalidMapError::Vlq { line, source })?;
        fields.push(value);
        text = &text[consumed..];
    }
    Ok(fields)
}

fn apply_fields(
    fields: &[i64],
    state: &mut DeltaState,
    line: u32,
    sources_len: usize,
    names_len: usize,
) -> Result<Segment, InvalidMapError> {
    if !matches!(fields.len(), 1 | 4 | 5) {
        return Err(InvalidMapError::InvalidSegmentLength {
            line,
            fields: fields.len(),
        });
    }

    state.generated_column = advance(state.generated_column, fields[0], line, "generated column")?;
    let generated = Position::new(line, to_u32(state.generated_column, line, "generated column")?);

    if fields.len() == 1 {
        return Ok(Segment::null(generated));
    }

    state.source = advance(state.source, fields[1], line, "source index")?;
    state.original_line = advance(state.original_line, fields[2], line, "original line")?;
    state.original_column = advance(state.original_column, fields[3], line, "original column")?;

    let source = to_u32(state.source, line, "source index")?;
    if source as usize >= sources_len {
        return Err(InvalidMapError::SourceOutOfRange {
            index: source,
            len: sources_len,
        });
    }

    let name = if fields.len() == 5 {
        state.name = advance(state.name, fields[4], line, "name index")?;
        let name = to_u32(state.name, line, "name index")?;
        if name as usize >= names_len {
            return Err(InvalidMapError::NameOutOfRange {
                index: name,
                len: names_len,
            });
        }
        Some(name)
    } else {
        None
    };

    // `mappings` stores 0-based original lines.
    let original_line = to_u32(state.original_line + 1, line, "original line")?;
    let original_column = to_u32(state.original_column, line, "original column")?;

    Ok(Segment::mapped(
        generated,
        OriginalLocation {
            source,
            position: Position::new(original_line, original_column),
            name,
        },
    ))
}

fn advance(current: i64, delta: i64, line: u32, field: &'static str) -> Result<i64, InvalidMapError> {
    let next = current
        .checked_add(delta)
        .ok_or(InvalidMapError::ValueOutOfRange { line, field })?;
    if next < 0 {
        return Err(InvalidMapError::NegativeValue { line, field });
    }
    Ok(next)
}

fn to_u32(value: i64, line: u32, field: &'static str) -> Result<u32, InvalidMapError> {
    u32::try_from(value).map_err(|_| InvalidMapError::ValueOutOfRange { line, field })
}

/// Encodes segments into a `mappings` string.
///
/// Segments must be sorted by generated position.
pub fn encode_mappings(segments: &[Segment]) -> String {
    let mut out = String::new();
    let mut state = DeltaState::default();
    let mut current_line = 1u32;
    let mut first_on_line = true;

    for segment in segments {
        while current_line < segment.generated.line {
            out.push(';');
            current_line += 1;
            state.generated_column = 0;
            first_on_line = true;
        }
        if !first_on_line {
            out.push(',');
        }
        first_on_line = false;

        let column = i64::from(segment.generated.column);
        vlq::encode_into(column - state.generated_column, &mut out);
        state.generated_column = column;

        let Some(original) = segment.original else {
            continue;
        };

        let source = i64::from(original.source);
        let original_line = i64::from(original.position.line) - 1;
        let original_column = i64::from(original.position.column);

        vlq::encode_into(source - state.source, &mut out);
        vlq::encode_into(original_line - state.original_line, &mut out);
        vlq::encode_into(original_column - state.original_column, &mut out);
        state.source = source;
        state.original_line = original_line;
        state.original_column = original_column;

        if let Some(name) = original.name {
            let name = i64::from(name);
            vlq::encode_into(name - state.name, &mut out);
            state.name = name;
        }
    }

    out
}
