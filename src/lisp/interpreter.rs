//! The abstract interpreter
//!
//! The interpreter loads Emacs Lisp libraries without executing them. Each
//! top-level form is looked up by its operator in a dispatch table; the
//! handlers for the recognized definition forms (see [`forms`](super::forms))
//! record what they define in the [`Environment`]. Any other form is skipped.
//!
//! New operators are supported by registering another [`FormHandler`] with
//! [`Interpreter::with_handler`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::environment::Environment;
use super::error::{LispError, LispResult};
use super::forms;
use super::reader::{read_file, sanitize};
use super::sexp::Sexp;
use super::symbol::Provenance;

/// Default extension of Emacs Lisp source files
pub const SOURCE_EXTENSION: &str = "el";

/// Handler for one recognized operator.
///
/// Handlers receive the interpreter, the current load context, the operator
/// name as it appeared in the form, and the operands.
pub type FormHandler =
    fn(&mut Interpreter, &LoadContext, &str, &[Sexp]) -> LispResult<Option<Sexp>>;

/// Where the forms being evaluated come from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadContext {
    pub file: Option<PathBuf>,
    pub feature: Option<String>,
}

impl LoadContext {
    pub fn new(file: Option<&Path>, feature: Option<&str>) -> Self {
        Self {
            file: file.map(Path::to_path_buf),
            feature: feature.map(str::to_string),
        }
    }

    /// Provenance for symbols defined in this context
    pub fn provenance(&self) -> Provenance {
        Provenance::new(self.file.as_deref(), self.feature.as_deref())
    }
}

pub struct Interpreter {
    env: Environment,
    load_path: Vec<PathBuf>,
    extension: String,
    handlers: BTreeMap<String, FormHandler>,
}

impl Interpreter {
    /// Create an interpreter searching `load_path` for libraries.
    ///
    /// A `previous` environment from an earlier build is reused unless one of
    /// its features is outdated, in which case the interpreter starts empty.
    pub fn new(load_path: Vec<PathBuf>, previous: Option<Environment>) -> LispResult<Self> {
        if load_path.is_empty() {
            return Err(LispError::EmptyLoadPath);
        }

        let env = match previous {
            Some(env) if env.is_outdated() => {
                info!("Discarding outdated environment");
                Environment::new()
            }
            Some(env) => env,
            None => Environment::new(),
        };

        Ok(Self {
            env,
            load_path,
            extension: SOURCE_EXTENSION.to_string(),
            handlers: forms::default_handlers(),
        })
    }

    /// Use `extension` instead of `el` when locating libraries
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Register (or replace) the handler for `operator`
    pub fn with_handler(mut self, operator: impl Into<String>, handler: FormHandler) -> Self {
        self.handlers.insert(operator.into(), handler);
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn into_env(self) -> Environment {
        self.env
    }

    pub fn load_path(&self) -> &[PathBuf] {
        &self.load_path
    }

    pub fn handles(&self, operator: &str) -> bool {
        self.handlers.contains_key(operator)
    }

    /// Find the file backing `feature`.
    ///
    /// Provided features resolve to the file they were loaded from; otherwise
    /// the load path is searched in order.
    pub fn locate(&self, feature: &str) -> Option<PathBuf> {
        if let Some(provided) = self.env.feature(feature) {
            return Some(provided.file.clone());
        }
        let filename = format!("{}.{}", feature, self.extension);
        self.load_path
            .iter()
            .map(|dir| dir.join(&filename))
            .find(|candidate| candidate.is_file())
    }

    /// Load `feature` unless it is already provided
    pub fn require(&mut self, feature: &str) -> LispResult<()> {
        if self.env.is_provided(feature) {
            debug!(feature, "Feature already provided");
            return Ok(());
        }

        let file = self
            .locate(feature)
            .ok_or_else(|| LispError::LibraryNotFound(feature.to_string()))?;
        let context = LoadContext::new(Some(&file), Some(feature));
        let count = self.load_in_context(&file, &context)?;
        info!(feature, file = %file.display(), forms = count, "Loaded feature");
        self.env.provide(feature, &file);
        Ok(())
    }

    /// Evaluate all top-level forms of `file`
    pub fn load(&mut self, file: &Path) -> LispResult<()> {
        let context = LoadContext::new(Some(file), None);
        self.load_in_context(file, &context)?;
        Ok(())
    }

    fn load_in_context(&mut self, file: &Path, context: &LoadContext) -> LispResult<usize> {
        let forms = read_file(file)?;
        self.eval_all(&forms, context)?;
        Ok(forms.len())
    }

    /// Evaluate `forms` in order, stopping at the first error
    pub fn eval_all(&mut self, forms: &[Sexp], context: &LoadContext) -> LispResult<Option<Sexp>> {
        let mut result = None;
        for form in forms {
            result = self.eval(form, context)?;
        }
        Ok(result)
    }

    /// Evaluate one form.
    ///
    /// Only lists headed by an operator in the dispatch table have an effect;
    /// everything else evaluates to `None`.
    pub fn eval(&mut self, form: &Sexp, context: &LoadContext) -> LispResult<Option<Sexp>> {
        let form = sanitize(form.clone());
        let Some((operator, operands)) = form.as_list().and_then(|items| items.split_first())
        else {
            debug!(%form, "Skipping form that is not an operator call");
            return Ok(None);
        };
        let Some(name) = operator.as_symbol() else {
            debug!(%form, "Skipping form without a symbol operator");
            return Ok(None);
        };

        match self.handlers.get(name).copied() {
            Some(handler) => handler(self, context, name, operands),
            None => {
                debug!(operator = name, "Skipping unsupported form");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lisp::reader::read;
    use crate::lisp::symbol::{properties, PropertyValue, Scope};
    use std::fs;

    fn interpreter() -> Interpreter {
        Interpreter::new(vec![PathBuf::from("/nonexistent")], None).unwrap()
    }

    #[test]
    fn test_empty_load_path_is_rejected() {
        assert!(matches!(
            Interpreter::new(Vec::new(), None),
            Err(LispError::EmptyLoadPath)
        ));
    }

    #[test]
    fn test_unknown_operators_are_ignored() {
        let mut interpreter = interpreter();
        let context = LoadContext::default();
        let result = interpreter
            .eval(&read("(message \"hi\")").unwrap(), &context)
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(interpreter.env().symbols().count(), 0);

        assert_eq!(interpreter.eval(&Sexp::symbol("nil"), &context).unwrap(), None);
        assert_eq!(interpreter.eval(&Sexp::List(vec![]), &context).unwrap(), None);
        assert_eq!(
            interpreter
                .eval(&read("((lambda () 1))").unwrap(), &context)
                .unwrap(),
            None
        );
    }

    fn define_command(
        interpreter: &mut Interpreter,
        context: &LoadContext,
        _operator: &str,
        operands: &[Sexp],
    ) -> LispResult<Option<Sexp>> {
        let name = operands
            .first()
            .ok_or_else(|| LispError::MalformedDefinitionSite("define-command".into()))?;
        interpreter
            .env_mut()
            .intern_sexp(name)?
            .set_provenance(Scope::Function, context.provenance());
        Ok(None)
    }

    #[test]
    fn test_custom_handlers_extend_the_dispatch_table() {
        let mut interpreter = interpreter().with_handler("define-command", define_command);
        assert!(interpreter.handles("define-command"));
        interpreter
            .eval(&read("(define-command my-command)").unwrap(), &LoadContext::default())
            .unwrap();
        assert!(interpreter
            .env()
            .lookup("my-command")
            .unwrap()
            .in_scope(Scope::Function));
    }

    #[test]
    fn test_require_loads_and_provides() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("greet.el"),
            "(defun greet (name) \"Say hi\" (ignored-form))\n(provide 'greet)\n",
        )
        .unwrap();

        let mut interpreter = Interpreter::new(vec![dir.path().to_path_buf()], None).unwrap();
        interpreter.require("greet").unwrap();

        let feature = interpreter.env().feature("greet").unwrap();
        assert_eq!(feature.file, dir.path().join("greet.el"));

        let greet = interpreter.env().lookup("greet").unwrap();
        let provenance = greet.provenance(Scope::Function).unwrap();
        assert_eq!(provenance.feature.as_deref(), Some("greet"));
        assert_eq!(
            greet.property(properties::FUNCTION_ARGLIST),
            Some(&PropertyValue::List(vec!["name".into()]))
        );
    }

    #[test]
    fn test_locate_searches_load_path_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("foo.el"), "").unwrap();
        fs::write(first.path().join("foo.elc"), "").unwrap();

        let interpreter = Interpreter::new(
            vec![first.path().to_path_buf(), second.path().to_path_buf()],
            None,
        )
        .unwrap();
        assert_eq!(interpreter.locate("foo"), Some(second.path().join("foo.el")));
        assert_eq!(interpreter.locate("bar"), None);

        let interpreter = interpreter.with_extension("elc");
        assert_eq!(interpreter.locate("foo"), Some(first.path().join("foo.elc")));
    }

    #[test]
    fn test_require_missing_library() {
        let mut interpreter = interpreter();
        let error = interpreter.require("missing").unwrap_err();
        assert_eq!(error.to_string(), "Cannot locate library: missing");
    }

    #[test]
    fn test_load_has_no_feature_context() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("init.el");
        fs::write(&file, "(defvar init-done nil \"Whether init ran.\")").unwrap();

        let mut interpreter = interpreter();
        interpreter.load(&file).unwrap();
        let provenance = interpreter
            .env()
            .lookup("init-done")
            .unwrap()
            .provenance(Scope::Variable)
            .cloned()
            .unwrap();
        assert_eq!(provenance, Provenance::new(Some(&file), None));
        assert!(!interpreter.env().is_provided("init"));
    }

    #[test]
    fn test_outdated_previous_environment_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("foo.el");
        fs::write(&file, "").unwrap();

        let mut previous = Environment::new();
        previous.intern("foo").unwrap();
        previous.provide("foo", &file);
        assert!(previous.is_outdated());

        let interpreter = Interpreter::new(vec![dir.path().to_path_buf()], Some(previous)).unwrap();
        assert_eq!(interpreter.env().symbols().count(), 0);
        assert!(!interpreter.env().is_provided("foo"));
    }

    #[test]
    fn test_current_previous_environment_is_kept() {
        let mut previous = Environment::new();
        previous.intern("foo").unwrap();
        previous.provide("foo", Path::new("/nonexistent/foo.el"));

        let mut interpreter = Interpreter::new(vec![PathBuf::from("/nonexistent")], Some(previous))
            .unwrap();
        assert!(interpreter.env().lookup("foo").is_some());
        // Already provided, so no file is touched
        interpreter.require("foo").unwrap();
    }
}
