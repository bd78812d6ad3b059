//! Command-line interface for elisp-autodoc
//! Loads Emacs Lisp features through the abstract interpreter and prints what it learned about them.
//!
//! Usage:
//!   elisp-autodoc `<feature>`... -L `<dir>` [--format `<format>`]              - Print the symbol table
//!   elisp-autodoc `<feature>`... -L `<dir>` --symbol `<name>` --kind `<kind>`  - Describe one symbol

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use elisp_autodoc::autodoc::{describe_with, Description, ObjectKind};
use elisp_autodoc::config::{AutodocConfig, Loader};
use elisp_autodoc::diagnostics::{Diagnostic, Reporter, TracingReporter};
use elisp_autodoc::docstring::inlines::text_of;
use elisp_autodoc::docstring::treeviz::to_treeviz_str;
use elisp_autodoc::lisp::{Environment, Interpreter};

const FORMATS: &[&str] = &["json", "yaml", "tree"];

fn main() {
    let matches = Command::new("elisp-autodoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract symbols and docstrings from Emacs Lisp libraries")
        .arg_required_else_help(true)
        .arg(
            Arg::new("features")
                .help("Features to require, e.g. 'foo' for foo.el")
                .num_args(1..)
                .required(true),
        )
        .arg(
            Arg::new("load-path")
                .long("load-path")
                .short('L')
                .help("Directory to search for features (may be repeated)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: json, yaml or tree")
                .default_value("tree"),
        )
        .arg(
            Arg::new("symbol")
                .long("symbol")
                .help("Describe this symbol instead of printing the symbol table"),
        )
        .arg(
            Arg::new("kind")
                .long("kind")
                .help("Object kind to describe the symbol as (function, variable, face, ...)")
                .default_value("function"),
        )
        .arg(
            Arg::new("snapshot")
                .long("snapshot")
                .help("Environment snapshot to restore before and save after loading"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_flag("verbose"));

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("tree");
    if !FORMATS.contains(&format) {
        eprintln!("Unknown format '{}'", format);
        eprintln!("Available formats: {}", FORMATS.join(", "));
        std::process::exit(1);
    }

    let config = load_config(&matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    let snapshot = matches.get_one::<String>("snapshot").map(PathBuf::from);
    let env = handle_load_command(&matches, &config, snapshot.as_deref());

    let output = match matches.get_one::<String>("symbol") {
        Some(name) => handle_describe_command(&matches, &config, &env, name, format),
        None => format_environment(&env, format),
    };
    print!("{}", output);
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<AutodocConfig, config::ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    let mut config = loader.build()?;
    if let Some(dirs) = matches.get_many::<String>("load-path") {
        config.interpreter.load_path.extend(dirs.map(PathBuf::from));
    }
    Ok(config)
}

/// Require every feature, reporting failures without giving up on the rest
fn handle_load_command(
    matches: &ArgMatches,
    config: &AutodocConfig,
    snapshot: Option<&Path>,
) -> Environment {
    let mut reporter = TracingReporter;

    let previous = snapshot.filter(|path| path.exists()).and_then(|path| {
        Environment::load_snapshot(path)
            .map_err(|e| reporter.report(Diagnostic::warning(e.to_string())))
            .ok()
    });

    let mut interpreter: Interpreter = config.interpreter(previous).unwrap_or_else(|e| {
        eprintln!("Cannot start interpreter: {}", e);
        std::process::exit(1);
    });

    for feature in matches.get_many::<String>("features").into_iter().flatten() {
        if let Err(e) = interpreter.require(feature) {
            reporter.report(Diagnostic::warning(format!(
                "Failed to load feature {}: {}",
                feature, e
            )));
        }
    }

    let env = interpreter.into_env();
    if let Some(path) = snapshot {
        if let Err(e) = env.save_snapshot(path) {
            reporter.report(Diagnostic::warning(e.to_string()));
        }
    }
    env
}

fn handle_describe_command(
    matches: &ArgMatches,
    config: &AutodocConfig,
    env: &Environment,
    name: &str,
    format: &str,
) -> String {
    let kind = matches
        .get_one::<String>("kind")
        .map(String::as_str)
        .unwrap_or("function");
    let kind: ObjectKind = kind.parse().unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    let parser = config.docstring_parser();
    let description = describe_with(&parser, env, kind, name, &mut TracingReporter)
        .unwrap_or_else(|| std::process::exit(1));

    match format {
        "tree" => format_description(&description),
        _ => serialize(&description, format),
    }
}

fn format_description(description: &Description) -> String {
    let mut result = format!("{} {}\n", description.kind.label(), description.signature);
    result.push_str(&to_treeviz_str(&description.docstring));
    for sentence in &description.variable_properties {
        result.push_str(&format!("* {}\n", text_of(sentence)));
    }
    if let Some(note) = &description.version_note {
        result.push_str(&format!("* {}\n", note));
    }
    result
}

fn format_environment(env: &Environment, format: &str) -> String {
    match format {
        "tree" => {
            let mut result = String::new();
            for feature in env.features() {
                result.push_str(&format!("feature {} ({})\n", feature.name, feature.file.display()));
            }
            for symbol in env.symbols() {
                let scopes = symbol
                    .scopes()
                    .keys()
                    .map(|scope| scope.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                result.push_str(&format!("{} [{}]\n", symbol.name(), scopes));
            }
            result
        }
        _ => serialize(env, format),
    }
}

fn serialize<T: serde::Serialize>(value: &T, format: &str) -> String {
    let serialized = match format {
        "yaml" => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        _ => serde_json::to_string_pretty(value)
            .map(|json| json + "\n")
            .map_err(|e| e.to_string()),
    };
    serialized.unwrap_or_else(|e| {
        eprintln!("Error formatting output: {}", e);
        std::process::exit(1);
    })
}
