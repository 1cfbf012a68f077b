//! Subcommand implementations.

use std::fs;

use bundler_map::{normalize, RawBundlerMap};
use camino::Utf8Path;
use miette::{miette, IntoDiagnostic, Result, WrapErr};
use obfuscating_transformer::UpstreamMap;
use source_map::{compose, Position, SourceMap};
use tracing::debug;

use crate::cli::{Args, Command};

/// Runs the parsed command.
pub fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Compose {
            first,
            second,
            file,
            source_name,
            original,
            out,
        } => {
            let original_source = read_optional(original.as_deref())?;
            let source_name = source_name.unwrap_or_else(|| file.clone());

            let first = match read_upstream_map(&first)? {
                UpstreamMap::Standard(map) => map,
                UpstreamMap::Raw(raw) => normalize(&raw, &source_name, &original_source)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("failed to normalize {first}"))?,
            };
            let second = read_source_map(&second)?;

            let composed = compose(&first, &second, &file, &original_source);
            debug!(segments = composed.len(), "composed");
            write_map(&composed, args.pretty, out.as_deref())
        }
        Command::Normalize {
            raw,
            filename,
            original,
            out,
        } => {
            let original_source = read_optional(original.as_deref())?;
            let text = read(&raw)?;
            let raw_map = RawBundlerMap::from_json_str(&text)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to parse {raw}"))?;
            let map = normalize(&raw_map, &filename, &original_source)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to normalize {raw}"))?;
            write_map(&map, args.pretty, out.as_deref())
        }
        Command::Lookup { map, line, column } => {
            let source_map = read_source_map(&map)?;
            println!("{}", lookup(&source_map, Position::new(line, column)));
            Ok(())
        }
    }
}

/// Formats the original position of `generated`.
fn lookup(map: &SourceMap, generated: Position) -> String {
    match map.original_position_for(generated) {
        Some(resolved) => match resolved.name {
            Some(name) => format!("{}:{} ({name})", resolved.source, resolved.position),
            None => format!("{}:{}", resolved.source, resolved.position),
        },
        None => format!("{generated}: no original position"),
    }
}

fn read(path: &Utf8Path) -> Result<String> {
    fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {path}"))
}

fn read_optional(path: Option<&Utf8Path>) -> Result<String> {
    path.map(read).transpose().map(Option::unwrap_or_default)
}

fn read_source_map(path: &Utf8Path) -> Result<SourceMap> {
    SourceMap::from_json_str(&read(path)?)
        .into_diagnostic()
        .wrap_err_with(|| format!("invalid source map {path}"))
}

fn read_upstream_map(path: &Utf8Path) -> Result<UpstreamMap> {
    UpstreamMap::from_json_str(&read(path)?)
        .into_diagnostic()
        .wrap_err_with(|| format!("invalid source map {path}"))
}

fn write_map(map: &SourceMap, pretty: bool, out: Option<&Utf8Path>) -> Result<()> {
    let raw = map.to_raw();
    let json = if pretty {
        serde_json::to_string_pretty(&raw)
    } else {
        serde_json::to_string(&raw)
    }
    .map_err(|e| miette!("failed to serialize source map: {e}"))?;

    match out {
        Some(path) => fs::write(path, json)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {path}")),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
