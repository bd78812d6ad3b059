//! # elisp-autodoc
//!
//! Extracts documentation from Emacs Lisp libraries without running Emacs.
//!
//! The [`lisp`] module reads Emacs Lisp source and interprets the defining
//! forms it finds (`defun`, `defcustom`, `defface`, `put`, ...) into a symbol
//! table. The [`docstring`] module parses the docstrings recorded there into
//! block and inline trees, following the conventions of Emacs help buffers.
//! [`autodoc`] brings both together into the description of one symbol.
//!
//! ## Testing
//!
//! Docstring trees are best checked with the fluent API in [`testing`].

pub mod autodoc;
pub mod config;
pub mod diagnostics;
pub mod docstring;
pub mod info;
pub mod lisp;
pub mod roles;
pub mod testing;
