//! The symbol table and the table of provided features
//!
//! An [`Environment`] lives for one documentation build session. It can be
//! saved as a JSON snapshot at the end of a build and restored at the start of
//! the next one, as long as none of its features became outdated in between.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::error::{LispError, LispResult};
use super::sexp::{is_symbol_name, Sexp};
use super::symbol::{Provenance, Scope, Symbol};

fn modification_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// A loaded unit of source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub file: PathBuf,
    pub load_time: SystemTime,
}

impl Feature {
    /// Stamp the feature with the modification time of `file`, or the epoch
    /// if the file does not exist.
    pub fn new(name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let load_time = modification_time(&file).unwrap_or(UNIX_EPOCH);
        Self::with_load_time(name, file, load_time)
    }

    pub fn with_load_time(
        name: impl Into<String>,
        file: impl Into<PathBuf>,
        load_time: SystemTime,
    ) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            load_time,
        }
    }

    /// Whether the backing file was modified at or after the load time.
    ///
    /// A missing backing file never makes a feature outdated.
    pub fn is_outdated(&self) -> bool {
        match modification_time(&self.file) {
            Some(modified) => modified >= self.load_time,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    symbols: BTreeMap<String, Symbol>,
    features: BTreeMap<String, Feature>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the symbol called `name`, creating it on first use
    pub fn intern(&mut self, name: &str) -> LispResult<&mut Symbol> {
        if !is_symbol_name(name) {
            return Err(LispError::InvalidSymbolName(name.to_string()));
        }
        Ok(self
            .symbols
            .entry(name.to_string())
            .or_insert_with(|| Symbol::new(name)))
    }

    /// Intern a symbol read from source; anything but a symbol is rejected
    pub fn intern_sexp(&mut self, sexp: &Sexp) -> LispResult<&mut Symbol> {
        match sexp {
            Sexp::Symbol(name) => self.intern(name),
            other => Err(LispError::InvalidSymbolName(other.to_string())),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Intern `name` and record where its definition in `scope` came from.
    ///
    /// Redefinitions overwrite the provenance of that scope only.
    pub fn define_in_scope(
        &mut self,
        name: &str,
        scope: Scope,
        provenance: Provenance,
    ) -> LispResult<&mut Symbol> {
        let symbol = self.intern(name)?;
        symbol.set_provenance(scope, provenance);
        Ok(symbol)
    }

    /// Record that `name` has been loaded from `file`
    pub fn provide(&mut self, name: &str, file: &Path) -> &Feature {
        let feature = Feature::new(name, file);
        self.features.insert(name.to_string(), feature);
        &self.features[name]
    }

    pub fn is_provided(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.get(name)
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// True if any provided feature is outdated
    pub fn is_outdated(&self) -> bool {
        self.features.values().any(Feature::is_outdated)
    }

    /// Write the environment to `path` as JSON
    pub fn save_snapshot(&self, path: &Path) -> LispResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| LispError::Snapshot(err.to_string()))?;
        fs::write(path, json).map_err(|source| LispError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Restore an environment written by [`Environment::save_snapshot`]
    pub fn load_snapshot(path: &Path) -> LispResult<Self> {
        let json = fs::read_to_string(path).map_err(|source| LispError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|err| LispError::Snapshot(err.to_string()))
    }
}
