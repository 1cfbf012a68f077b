//! Transformer and obfuscator options.

use camino::Utf8Path;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Where the engine puts its source map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapMode {
    /// Appended to the code as a data URL.
    Inline,
    /// Returned separately from the code.
    Separate,
}

/// Options passed to the obfuscation engine.
///
/// Only the fields this crate needs to control are typed; everything else is
/// passed through to the engine as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObfuscatorOptions {
    /// Whether the engine should produce a source map.
    #[serde(default)]
    pub source_map: bool,
    /// Where the engine puts its source map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map_mode: Option<SourceMapMode>,
    /// Whether string literals are moved into a lookup array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_array: Option<bool>,
    /// Engine options this crate does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ObfuscatorOptions {
    /// Overrides the options the transformer depends on.
    ///
    /// The engine must hand back a separate map for composition, and string
    /// array extraction breaks the bundler's module output.
    pub fn for_composition(mut self) -> Self {
        self.source_map = true;
        self.source_map_mode = Some(SourceMapMode::Separate);
        self.string_array = Some(false);
        self
    }
}

/// Options for [`crate::ObfuscatingTransformer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformerOptions {
    /// Glob patterns selecting files to obfuscate.
    pub include: Vec<String>,
    /// Glob patterns excluded even when included.
    pub exclude: Vec<String>,
    /// Obfuscate in development builds too.
    pub enable_in_development: bool,
    /// Log every file that gets obfuscated.
    pub trace: bool,
    /// Options passed to the engine.
    pub obfuscator_options: ObfuscatorOptions,
}

impl Default for TransformerOptions {
    fn default() -> Self {
        Self {
            include: vec!["**/src/**".to_string()],
            exclude: Vec::new(),
            enable_in_development: false,
            trace: false,
            obfuscator_options: ObfuscatorOptions::default(),
        }
    }
}

impl TransformerOptions {
    /// Loads options from a JSON file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parses options from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compiles the include/exclude patterns.
    pub fn file_filter(&self) -> Result<FileFilter, ConfigError> {
        Ok(FileFilter {
            include: build_glob_set(&self.include)?,
            exclude: build_glob_set(&self.exclude)?,
        })
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Selects files by path.
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: GlobSet,
    exclude: GlobSet,
}

impl FileFilter {
    /// Returns true if `filename` is included and not excluded.
    pub fn matches(&self, filename: &str) -> bool {
        self.include.is_match(filename) && !self.exclude.is_match(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = TransformerOptions::from_json_str("{}").unwrap();
        assert_eq!(options, TransformerOptions::default());
        assert!(!options.enable_in_development);
    }

    #[test]
    fn test_parse_options() {
        let options = TransformerOptions::from_json_str(
            r#"{
                "include": ["app/**/*.js"],
                "exclude": ["app/vendor/**"],
                "enableInDevelopment": true,
                "trace": true,
                "obfuscatorOptions": {"compact": true, "stringArray": true}
            }"#,
        )
        .unwrap();
        assert!(options.enable_in_development);
        assert!(options.trace);
        assert_eq!(options.obfuscator_options.string_array, Some(true));
        assert_eq!(
            options.obfuscator_options.extra.get("compact"),
            Some(&serde_json::Value::Bool(true))
        );
    }

    #[test]
    fn test_for_composition_forces_map_options() {
        let options = ObfuscatorOptions {
            string_array: Some(true),
            ..Default::default()
        }
        .for_composition();
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({
                "sourceMap": true,
                "sourceMapMode": "separate",
                "stringArray": false
            })
        );
    }

    #[test]
    fn test_file_filter() {
        let options = TransformerOptions {
            exclude: vec!["**/generated/**".to_string()],
            ..Default::default()
        };
        let filter = options.file_filter().unwrap();
        assert!(filter.matches("/home/app/src/App.js"));
        assert!(filter.matches("src/screens/Home.js"));
        assert!(!filter.matches("node_modules/react/index.js"));
        assert!(!filter.matches("src/generated/schema.js"));
    }

    #[test]
    fn test_invalid_glob() {
        let options = TransformerOptions {
            include: vec!["src/[".to_string()],
            ..Default::default()
        };
        assert!(matches!(options.file_filter(), Err(ConfigError::Glob(_))));
    }
}
