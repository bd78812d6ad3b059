//! Emacs Lisp symbol extraction
//!
//! The pipeline runs from source text to symbol table:
//!
//! ```text
//! file -> token -> reader -> interpreter (forms, custom) -> environment
//! ```
//!
//! The reader produces [`Sexp`] values; the [`Interpreter`] walks top-level
//! forms and lets the handlers in [`forms`] record definitions as
//! [`Symbol`]s in its [`Environment`].

pub mod custom;
pub mod environment;
pub mod error;
pub mod forms;
pub mod interpreter;
pub mod reader;
pub mod sexp;
pub mod symbol;
pub mod token;

pub use environment::{Environment, Feature};
pub use error::{LispError, LispResult, ReadError};
pub use interpreter::{FormHandler, Interpreter, LoadContext};
pub use sexp::Sexp;
pub use symbol::{properties, PropertyValue, Provenance, Scope, Symbol};
