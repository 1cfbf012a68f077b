//! The obfuscating transform wrapper.

use bundler_map::normalize;
use source_map::{compose, SourceMap};
use tracing::{debug, info, warn};

use crate::{
    CodeGenerator, ConfigError, EngineError, ObfuscatorOptions, Obfuscator, TransformError,
    TransformOutput, TransformProps, TransformerOptions, UpstreamMap, UpstreamTransformer,
};

type Filter = Box<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Obfuscated code together with a map back to the original source.
#[derive(Debug, Clone)]
pub struct ObfuscatedWithMap {
    /// The obfuscated code.
    pub code: String,
    /// Map from the original source to `code`.
    pub map: SourceMap,
}

/// Obfuscates `code` without tracking positions.
pub fn obfuscate_code<O: Obfuscator + ?Sized>(
    obfuscator: &O,
    code: &str,
    options: &ObfuscatorOptions,
) -> Result<String, EngineError> {
    Ok(obfuscator.obfuscate(code, options)?.code)
}

/// Obfuscates `code` and composes `map` (original → `code`) with the engine's
/// map (`code` → obfuscated) into a map from the original source to the
/// obfuscated code.
///
/// A raw bundler map is normalized first. Fails with
/// [`TransformError::MissingUpstreamMap`] if the engine returns no map.
pub fn obfuscate_preserving_source_map<O: Obfuscator + ?Sized>(
    obfuscator: &O,
    code: &str,
    map: &UpstreamMap,
    original_filename: &str,
    original_source: &str,
    options: &ObfuscatorOptions,
) -> Result<ObfuscatedWithMap, TransformError> {
    let obfuscated = obfuscator.obfuscate(code, options)?;
    let Some(engine_map) = obfuscated.source_map else {
        warn!(file = original_filename, "obfuscation engine returned no source map");
        return Err(TransformError::MissingUpstreamMap {
            filename: original_filename.to_string(),
        });
    };

    let normalized;
    let first = match map {
        UpstreamMap::Standard(map) => map,
        UpstreamMap::Raw(raw) => {
            normalized = normalize(raw, original_filename, original_source)?;
            &normalized
        }
    };

    Ok(ObfuscatedWithMap {
        code: obfuscated.code,
        map: compose(first, &engine_map, original_filename, original_source),
    })
}

/// Wraps an upstream transformer and obfuscates the files it selects.
pub struct ObfuscatingTransformer<U, O> {
    upstream: U,
    obfuscator: O,
    generator: Option<Box<dyn CodeGenerator>>,
    filter: Filter,
    obfuscator_options: ObfuscatorOptions,
    enable_in_development: bool,
    trace: bool,
}

impl<U, O> ObfuscatingTransformer<U, O>
where
    U: UpstreamTransformer,
    O: Obfuscator,
{
    /// Creates a new transformer.
    pub fn new(upstream: U, obfuscator: O, options: TransformerOptions) -> Result<Self, ConfigError> {
        let file_filter = options.file_filter()?;
        Ok(Self {
            upstream,
            obfuscator,
            generator: None,
            filter: Box::new(move |filename, _src| file_filter.matches(filename)),
            obfuscator_options: options.obfuscator_options.for_composition(),
            enable_in_development: options.enable_in_development,
            trace: options.trace,
        })
    }

    /// Replaces the file filter. The closure receives the filename and source.
    pub fn with_filter(mut self, filter: impl Fn(&str, &str) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    /// Sets the generator used when the upstream result only has an AST.
    pub fn with_code_generator(mut self, generator: impl CodeGenerator + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Returns the options passed to the engine.
    pub fn obfuscator_options(&self) -> &ObfuscatorOptions {
        &self.obfuscator_options
    }

    /// Transforms one file.
    ///
    /// Files skipped by the development-mode check or the filter, and results
    /// without code, come back exactly as the upstream transformer produced
    /// them.
    pub fn transform(&self, props: &TransformProps) -> Result<TransformOutput, TransformError> {
        let result = self.upstream.transform(props)?;

        if props.dev && !self.enable_in_development {
            return Ok(result);
        }
        if result.code.is_none() && result.ast.is_none() {
            return Ok(result);
        }
        if !(self.filter)(&props.filename, &props.src) {
            return Ok(result);
        }

        if self.trace {
            info!(file = %props.filename, "obfuscating");
        } else {
            debug!(file = %props.filename, "obfuscating");
        }

        let (code, map) = if let Some(code) = &result.code {
            (code.clone(), result.map.clone())
        } else if let (Some(ast), Some(generator)) = (&result.ast, &self.generator) {
            let generated = generator.generate(ast, &props.filename)?;
            (generated.code, generated.map)
        } else {
            debug!(file = %props.filename, "no code generator for AST result, skipping");
            return Ok(result);
        };

        if code.is_empty() {
            return Ok(result);
        }

        let Some(map) = map else {
            let code = obfuscate_code(&self.obfuscator, &code, &self.obfuscator_options)?;
            return Ok(TransformOutput {
                code: Some(code),
                ..Default::default()
            });
        };

        let obfuscated = obfuscate_preserving_source_map(
            &self.obfuscator,
            &code,
            &map,
            &props.filename,
            &props.src,
            &self.obfuscator_options,
        )?;

        Ok(TransformOutput {
            code: Some(obfuscated.code),
            map: Some(UpstreamMap::Standard(obfuscated.map)),
            ast: None,
            extra: result.extra,
        })
    }
}
