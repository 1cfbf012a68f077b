//! Interfaces to the upstream transformer and the obfuscation engine.

use bundler_map::RawBundlerMap;
use serde::{Deserialize, Deserializer, Serialize};
use source_map::SourceMap;
use thiserror::Error;

use crate::{ObfuscatorOptions, TransformError};

/// A failure reported by an external collaborator.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct EngineError {
    /// A description of the failure.
    pub message: String,
}

impl EngineError {
    /// Creates a new engine error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Output of the obfuscation engine.
#[derive(Debug, Clone)]
pub struct Obfuscated {
    /// The obfuscated code.
    pub code: String,
    /// The engine's map from its input to the obfuscated code.
    pub source_map: Option<SourceMap>,
}

/// An obfuscation engine.
pub trait Obfuscator {
    /// Obfuscates `code`.
    fn obfuscate(&self, code: &str, options: &ObfuscatorOptions) -> Result<Obfuscated, EngineError>;
}

/// A file handed to the transformer.
#[derive(Debug, Clone, Default)]
pub struct TransformProps {
    /// Path of the file being transformed.
    pub filename: String,
    /// The original source text.
    pub src: String,
    /// Whether the bundler runs in development mode.
    pub dev: bool,
}

/// A source map attached to an upstream result.
///
/// Deserializes from a standard map object, a raw bundler array, or a string
/// containing either as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpstreamMap {
    /// A version 3 source map.
    Standard(SourceMap),
    /// The bundler's raw array format.
    Raw(RawBundlerMap),
}

impl UpstreamMap {
    /// Parses a map from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, TransformError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(source_map::InvalidMapError::from)?;
        Self::from_json_value(value)
    }

    /// Interprets a JSON value as a map.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, TransformError> {
        match value {
            serde_json::Value::String(json) => Self::from_json_str(&json),
            serde_json::Value::Array(_) => Ok(UpstreamMap::Raw(RawBundlerMap::from_json_value(value)?)),
            value => Ok(UpstreamMap::Standard(SourceMap::from_json_value(value)?)),
        }
    }
}

impl<'de> Deserialize<'de> for UpstreamMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json_value(value).map_err(serde::de::Error::custom)
    }
}

/// The result shape shared by the upstream transformer and this wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformOutput {
    /// Generated code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Map from the original source to `code`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<UpstreamMap>,
    /// An AST, when the upstream transformer produced one instead of code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<serde_json::Value>,
    /// Any other fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The transformer this wrapper runs before obfuscating.
pub trait UpstreamTransformer {
    /// Transforms one file.
    fn transform(&self, props: &TransformProps) -> Result<TransformOutput, EngineError>;
}

/// Code produced from an AST.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    /// The generated code.
    pub code: String,
    /// Map from the original source to `code`.
    pub map: Option<UpstreamMap>,
}

/// Turns an upstream AST into code and a map.
pub trait CodeGenerator: Send + Sync {
    /// Generates code for `ast`, which came from `filename`.
    fn generate(&self, ast: &serde_json::Value, filename: &str) -> Result<GeneratedCode, EngineError>;
}
