//! Configuration loader for elisp-autodoc.
//!
//! `defaults/autodoc.default.toml` is embedded into the library so that the
//! documented defaults and runtime behavior stay in sync. Applications layer
//! user-specific files on top of those defaults via [`Loader`] before
//! deserializing into [`AutodocConfig`].

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::docstring::DocstringParser;
use crate::lisp::{Environment, Interpreter, LispResult};

const DEFAULT_TOML: &str = include_str!("../defaults/autodoc.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AutodocConfig {
    pub interpreter: InterpreterConfig,
    pub docstring: DocstringConfig,
}

/// Where and how the interpreter finds features.
#[derive(Debug, Clone, Deserialize)]
pub struct InterpreterConfig {
    pub load_path: Vec<PathBuf>,
    pub source_extension: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocstringConfig {
    pub tab_width: usize,
    pub debug: bool,
}

impl AutodocConfig {
    /// An interpreter over the configured load path.
    ///
    /// Fails with `EmptyLoadPath` when no directory is configured.
    pub fn interpreter(&self, previous: Option<Environment>) -> LispResult<Interpreter> {
        Ok(Interpreter::new(self.interpreter.load_path.clone(), previous)?
            .with_extension(self.interpreter.source_extension.clone()))
    }

    pub fn docstring_parser(&self) -> DocstringParser {
        DocstringParser::new()
            .with_tab_width(self.docstring.tab_width)
            .with_debug(self.docstring.debug)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<AutodocConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<AutodocConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lisp::LispError;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.interpreter.load_path.is_empty());
        assert_eq!(config.interpreter.source_extension, "el");
        assert_eq!(config.docstring.tab_width, 8);
        assert!(!config.docstring.debug);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("docstring.tab_width", 4)
            .expect("override to apply")
            .set_override("interpreter.source_extension", "elc")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.docstring.tab_width, 4);
        assert_eq!(config.interpreter.source_extension, "elc");
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[interpreter]\nload_path = [\"lisp\", \"vendor\"]").unwrap();

        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert_eq!(
            config.interpreter.load_path,
            vec![PathBuf::from("lisp"), PathBuf::from("vendor")]
        );
        assert_eq!(config.docstring.tab_width, 8);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = Loader::new()
            .with_optional_file(dir.path().join("absent.toml"))
            .build()
            .unwrap();
        assert_eq!(config.interpreter.source_extension, "el");
        assert!(Loader::new().with_file(dir.path().join("absent.toml")).build().is_err());
    }

    #[test]
    fn empty_load_path_cannot_build_interpreter() {
        let config = load_defaults().unwrap();
        assert!(matches!(config.interpreter(None), Err(LispError::EmptyLoadPath)));
    }
}
