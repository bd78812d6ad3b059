//! Warnings and errors reported to the embedding application
//!
//! The core never decides how problems are shown. It builds a [`Diagnostic`]
//! and hands it to whatever [`Reporter`] the caller supplied: a plain
//! `Vec<Diagnostic>` collects them, [`TracingReporter`] logs them.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Opaque pointer back to where a piece of text came from: the file and the
/// symbol whose docstring is being processed, both optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceLocator {
    pub file: Option<PathBuf>,
    pub symbol: Option<String>,
}

impl SourceLocator {
    pub fn new(file: Option<&Path>, symbol: Option<&str>) -> Self {
        Self {
            file: file.map(Path::to_path_buf),
            symbol: symbol.map(str::to_string),
        }
    }

    pub fn for_symbol(symbol: &str) -> Self {
        Self::new(None, Some(symbol))
    }

    /// Pin the locator to a 1-based line of the text
    pub fn at_line(&self, line: usize) -> Location {
        Location {
            source: self.clone(),
            line: Some(line),
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, &self.symbol) {
            (Some(file), Some(symbol)) => write!(f, "{}:{}", file.display(), symbol),
            (Some(file), None) => write!(f, "{}", file.display()),
            (None, Some(symbol)) => write!(f, "{}", symbol),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Location {
    pub source: SourceLocator,
    pub line: Option<usize>,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} line {}", self.source, line),
            None => write!(f, "{}", self.source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            location: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {} ({})", self.severity, self.message, location),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Receiver of diagnostics
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl Reporter for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Logs every diagnostic through `tracing` at the matching level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        let location = diagnostic
            .location
            .as_ref()
            .map(Location::to_string)
            .unwrap_or_default();
        match diagnostic.severity {
            Severity::Error => tracing::error!(%location, "{}", diagnostic.message),
            Severity::Warning => tracing::warn!(%location, "{}", diagnostic.message),
            Severity::Info => tracing::info!(%location, "{}", diagnostic.message),
        }
    }
}
