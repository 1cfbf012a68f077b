//! Properties of composing two chained source maps.
//!
//! Each test builds a first-stage map (original → intermediate) and a
//! second-stage map (intermediate → final) and checks the composed result.

use pretty_assertions::assert_eq;
use source_map::{compose, compose_json, Position, Segment, SourceMap, SourceMapBuilder};

fn map(json: &str) -> SourceMap {
    SourceMap::from_json_str(json).unwrap()
}

/// A map sending each generated position of `of` to itself in `intermediate.js`.
fn identity_over_generated(of: &SourceMap) -> SourceMap {
    let mut builder = SourceMapBuilder::new();
    for segment in of.segments() {
        builder.add_mapped(segment.generated, "intermediate.js", segment.generated, None);
    }
    builder.build()
}

fn first_stage() -> SourceMap {
    map(r#"{
        "version": 3,
        "sources": ["src/app.js", "src/util.js"],
        "names": ["render", "helper"],
        "mappings": "AAAAA,MAAM;AACN,E;ACDAC,IAAI"
    }"#)
}

#[test]
fn test_identity_second_stage_preserves_map() {
    let first = first_stage();
    let identity = identity_over_generated(&first);

    let composed = compose(&first, &identity, "out.js", "");

    assert_eq!(composed.segments(), first.segments());
    assert_eq!(composed.sources(), first.sources());
    assert_eq!(composed.names(), first.names());
}

#[test]
fn test_identity_first_stage_preserves_map() {
    let code = "let a = 1;\nlet b = a;";
    let identity = SourceMap::identity(code, "a.js");
    let second = map(r#"{
        "version": 3,
        "sources": ["a.js"],
        "names": [],
        "mappings": "AAAA,CAAI,CAAE;AACF"
    }"#);

    let composed = compose(&identity, &second, "out.js", code);

    let expected: Vec<_> = second
        .segments()
        .iter()
        .map(|s| (s.generated, s.original.map(|o| o.position)))
        .collect();
    let actual: Vec<_> = composed
        .segments()
        .iter()
        .map(|s| (s.generated, s.original.map(|o| o.position)))
        .collect();
    assert_eq!(actual, expected);
    assert_eq!(composed.sources(), ["a.js"]);
}

#[test]
fn test_uncovered_final_positions_stay_uncovered() {
    let first = first_stage();
    // Segments only on final lines 1 and 3.
    let second = map(r#"{"version":3,"sources":["i.js"],"names":[],"mappings":"AAAA;;AACA"}"#);

    let composed = compose(&first, &second, "out.js", "");

    assert_eq!(composed.len(), 2);
    assert!(composed.lookup(Position::new(2, 0)).is_none());
    assert!(composed.lookup(Position::new(4, 0)).is_none());
}

#[test]
fn test_null_second_stage_segment_stays_null() {
    let first = first_stage();
    let second = map(r#"{"version":3,"sources":["i.js"],"names":[],"mappings":"A,CAAA"}"#);

    let composed = compose(&first, &second, "out.js", "");

    assert_eq!(composed.segments()[0], Segment::null(Position::new(1, 0)));
    assert!(!composed.segments()[1].is_null());
}

#[test]
fn test_unknown_provenance_is_transitive() {
    // Intermediate (2,4) is a null mapping in the first stage.
    let first = first_stage();
    assert!(first.lookup(Position::new(2, 4)).unwrap().is_null());

    // Final (1,7) -> intermediate (2,4)
    let second = map(r#"{"version":3,"sources":["i.js"],"names":[],"mappings":"OACI"}"#);

    let composed = compose(&first, &second, "out.js", "");

    assert_eq!(composed.segments(), [Segment::null(Position::new(1, 7))]);
    assert!(composed.sources().is_empty());
}

#[test]
fn test_unmapped_intermediate_position_becomes_null() {
    let first = map(r#"{"version":3,"sources":["a.js"],"names":[],"mappings":"KAAA"}"#);
    // Final (1,0) -> intermediate (1,2), before the first stage's only segment at (1,5).
    let second = map(r#"{"version":3,"sources":["i.js"],"names":[],"mappings":"AAAE"}"#);

    let composed = compose(&first, &second, "out.js", "");

    assert_eq!(composed.segments(), [Segment::null(Position::new(1, 0))]);
}

#[test]
fn test_lookup_does_not_cross_generated_lines() {
    // First stage covers intermediate line 5 only.
    let first = map(r#"{"version":3,"sources":["a.js"],"names":[],"mappings":";;;;AAAA"}"#);
    // Final (1,0) -> intermediate (6,4).
    let second = map(r#"{"version":3,"sources":["i.js"],"names":[],"mappings":"AAKI"}"#);

    let composed = compose(&first, &second, "out.js", "");

    assert_eq!(composed.segments(), [Segment::null(Position::new(1, 0))]);
}

#[test]
fn test_end_to_end_column_delta() {
    let composed = compose_json(
        r#"{"version":3,"sources":["a.js"],"names":[],"mappings":";;;;AAAA"}"#,
        r#"{"version":3,"sources":["a.intermediate.js"],"names":[],"mappings":";;;;;;;;GAIE"}"#,
        "a.obfuscated.js",
        "let a;",
    )
    .unwrap();

    insta::assert_snapshot!(
        composed.to_json_string(),
        @r#"{"version":3,"file":"a.obfuscated.js","sources":["a.js"],"sourcesContent":["let a;"],"names":[],"mappings":";;;;;;;;GAAE"}"#
    );
}

#[test]
fn test_names_come_from_first_stage() {
    let first = first_stage();
    // Final (1,0) -> intermediate (1,6) with a second-stage name that must not leak.
    let second =
        map(r#"{"version":3,"sources":["i.js"],"names":["_0x1a2b"],"mappings":"AAAMA"}"#);

    let composed = compose(&first, &second, "out.js", "");

    let resolved = composed.original_position_for(Position::new(1, 0)).unwrap();
    assert_eq!(resolved.source, "src/app.js");
    assert_eq!(resolved.position, Position::new(1, 6));
    assert_eq!(resolved.name, None);
    assert!(composed.names().is_empty());
}

#[test]
fn test_composition_is_deterministic() {
    let first = first_stage();
    let second = map(r#"{"version":3,"sources":["i.js"],"names":[],"mappings":"AAAA,CAAM;AACN,GACA;A"}"#);

    let a = compose(&first, &second, "out.js", "src").to_json_string();
    let b = compose(&first, &second, "out.js", "src").to_json_string();
    assert_eq!(a, b);
}

#[test]
fn test_output_tables_have_no_duplicates() {
    let first = first_stage();
    // Hit app.js twice and util.js once.
    let second = map(r#"{"version":3,"sources":["i.js"],"names":[],"mappings":"AAAA,CAAM,CACA,CACA"}"#);

    let composed = compose(&first, &second, "out.js", "");

    let mut sources = composed.sources().to_vec();
    sources.sort();
    sources.dedup();
    assert_eq!(sources.len(), composed.sources().len());
    let mut names = composed.names().to_vec();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), composed.names().len());
    // Two sources referenced, so no fallback content is attached.
    assert!(composed.sources_content().is_none());
}
