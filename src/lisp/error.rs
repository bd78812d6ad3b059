//! Error types for reading and interpreting Emacs Lisp sources

use std::ops::Range as ByteRange;
use std::path::PathBuf;

/// Syntax error raised by the reader.
///
/// Reader errors are never reinterpreted by the interpreter: they surface to
/// the caller of `load`/`require` exactly as the reader produced them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Syntax error at line {line}: {message}")]
pub struct ReadError {
    pub message: String,
    /// Byte span in the text handed to the reader.
    pub span: ByteRange<usize>,
    /// 1-based line in the original source.
    pub line: usize,
}

impl ReadError {
    pub fn new(message: impl Into<String>, span: ByteRange<usize>, line: usize) -> Self {
        Self {
            message: message.into(),
            span,
            line,
        }
    }
}

/// Errors raised by the environment and the abstract interpreter
#[derive(Debug, thiserror::Error)]
pub enum LispError {
    /// Interning something that is not a plain symbol token
    #[error("Invalid symbol name: {0}")]
    InvalidSymbolName(String),

    /// A feature could not be resolved to a file on the load path
    #[error("Cannot locate library: {0}")]
    LibraryNotFound(String),

    /// The interpreter was constructed without search directories
    #[error("Empty load path!")]
    EmptyLoadPath,

    /// A definition appeared where its context does not allow it
    #[error("Malformed definition site: {0}")]
    MalformedDefinitionSite(String),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid environment snapshot: {0}")]
    Snapshot(String),
}

pub type LispResult<T> = Result<T, LispError>;
