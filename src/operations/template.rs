//! Answers file template loading and rendering

use crate::config::Configuration;
use crate::error::{AnswersError, Result};
use crate::system::System;
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the template directory
pub const TEMPLATE_DIR_ENV: &str = "TEMPLATE_DIR";

/// Template directory used when no override is set
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// File name of the template inside the template directory
pub const TEMPLATE_FILE: &str = "answers.tmpl";

/// Names the engine provides on its own and that never count as configuration fields
const ENGINE_NAMES: &[&str] = &["loop", "range", "dict", "namespace", "debug"];

/// Resolve the template directory from the environment
#[must_use]
pub fn template_dir(system: &dyn System) -> PathBuf {
    match system.env_var(TEMPLATE_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(DEFAULT_TEMPLATE_DIR),
    }
}

/// Full path of the answers template
#[must_use]
pub fn template_path(system: &dyn System) -> PathBuf {
    template_dir(system).join(TEMPLATE_FILE)
}

/// A parsed answers template
#[derive(Debug)]
pub struct AnswersTemplate {
    path: PathBuf,
    source: String,
}

/// Engine configuration shared by parsing and rendering
fn environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    // Keeps the failing expression's span on render errors
    env.set_debug(true);
    env
}

/// Byte offset of `name` in `text` as a whole identifier
fn identifier_offset(text: &str, name: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';

    text.match_indices(name).map(|(start, _)| start).find(|&start| {
        let before = text[..start].chars().next_back();
        let after = text[start + name.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

/// Pick the undefined name the failing expression refers to
///
/// The expression is taken from the error span, or from the error line when the
/// engine kept no span. Among the candidates found there the leftmost wins. When
/// neither locates one, the alphabetically first candidate is a best guess.
fn failing_name(source: &str, err: &minijinja::Error, candidates: &[String]) -> Option<String> {
    let snippet = err
        .range()
        .and_then(|range| source.get(range))
        .or_else(|| {
            err.line()
                .and_then(|line| source.lines().nth(line.saturating_sub(1)))
        });

    if let Some(snippet) = snippet
        && let Some(name) = candidates
            .iter()
            .filter_map(|name| identifier_offset(snippet, name).map(|offset| (offset, name)))
            .min()
            .map(|(_, name)| name)
    {
        return Some(name.clone());
    }

    candidates.first().cloned()
}

impl AnswersTemplate {
    /// Read and parse a template file
    ///
    /// # Errors
    ///
    /// Returns `TemplateParse` if the file cannot be read or has a syntax error
    pub fn load(system: &dyn System, path: &Path) -> Result<Self> {
        let source = system.read_to_string(path).map_err(|err| AnswersError::TemplateParse {
            path: path.to_path_buf(),
            message: match err.kind() {
                io::ErrorKind::NotFound => format!("template file not found: {err}"),
                _ => format!("failed to read template: {err}"),
            },
        })?;

        Self::from_source(path, source)
    }

    /// Parse template text that was read elsewhere
    ///
    /// # Errors
    ///
    /// Returns `TemplateParse` if the text has a syntax error
    pub fn from_source(path: &Path, source: String) -> Result<Self> {
        environment()
            .template_from_str(&source)
            .map_err(|err| AnswersError::TemplateParse {
                path: path.to_path_buf(),
                message: format!("syntax error: {err}"),
            })?;

        debug!("Parsed template {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path the template was loaded from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the template against a configuration
    ///
    /// # Errors
    ///
    /// Returns `TemplateExecution` if rendering fails. For an undefined value the
    /// error names the unknown field used by the failing expression.
    pub fn render(&self, config: &Configuration) -> Result<String> {
        let env = environment();
        let template = env
            .template_from_str(&self.source)
            .map_err(|err| AnswersError::TemplateParse {
                path: self.path.clone(),
                message: format!("syntax error: {err}"),
            })?;

        template.render(config).map_err(|err| {
            let field = (err.kind() == ErrorKind::UndefinedError)
                .then(|| {
                    let mut unknown: Vec<String> = template
                        .undeclared_variables(false)
                        .into_iter()
                        .filter(|name| {
                            !Configuration::field_names().contains(&name.as_str())
                                && !ENGINE_NAMES.contains(&name.as_str())
                        })
                        .collect();
                    unknown.sort();
                    failing_name(&self.source, &err, &unknown)
                })
                .flatten();

            let message = match field.as_deref() {
                Some(name) => format!("undefined configuration field '{name}': {err}"),
                None => err.to_string(),
            };
            AnswersError::TemplateExecution { field, message }
        })
    }
}
