//! Obfuscating transform wrapper for a bundler pipeline.
//!
//! [`ObfuscatingTransformer`] wraps an upstream transformer. It passes each
//! selected file's output through an obfuscation engine and composes the
//! upstream source map with the engine's map, so the result still points at
//! the original source. The bundler's raw array maps are normalized first.
//!
//! The upstream transformer, the obfuscation engine and AST code generation are
//! supplied by the caller through the [`UpstreamTransformer`], [`Obfuscator`]
//! and [`CodeGenerator`] traits.

mod engine;
mod error;
mod options;
mod transformer;

pub use engine::{
    CodeGenerator, EngineError, GeneratedCode, Obfuscated, Obfuscator, TransformOutput,
    TransformProps, UpstreamMap, UpstreamTransformer,
};
pub use error::{ConfigError, TransformError};
pub use options::{FileFilter, ObfuscatorOptions, SourceMapMode, TransformerOptions};
pub use transformer::{
    obfuscate_code, obfuscate_preserving_source_map, ObfuscatedWithMap, ObfuscatingTransformer,
};
