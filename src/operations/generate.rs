//! Answers file generation

use crate::config::Configuration;
use crate::error::{AnswersError, Result};
use crate::operations::template::{AnswersTemplate, template_path};
use crate::system::System;
use crate::utils::path::validate_output_path;
use std::io::Write as _;
use std::path::PathBuf;
use tracing::{debug, info};

/// Output file used when none is given
pub const DEFAULT_OUTPUT: &str = "answers.txt";

/// Renders a configuration into an answers file
#[derive(Debug, Clone)]
pub struct Generator<'config> {
    config: &'config Configuration,
    output: PathBuf,
}

impl<'config> Generator<'config> {
    /// Create a generator writing `config` to `output`
    #[must_use]
    pub fn new<P: Into<PathBuf>>(config: &'config Configuration, output: P) -> Self {
        Self {
            config,
            output: output.into(),
        }
    }

    /// Generate the answers file
    ///
    /// The template is parsed before the output path is checked, and the output
    /// file is created before rendering. A failure at any step aborts the run and
    /// leaves an already created file as it is.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The template is missing or malformed (`TemplateParse`)
    /// - The output path is rejected (`PathNotAllowed`, `ParentMissing`, `ParentNotADirectory`)
    /// - The output file cannot be created (`FileCreate`)
    /// - Rendering fails (`TemplateExecution`)
    /// - Writing the rendered text fails (`Io`)
    pub fn generate(&self, system: &dyn System) -> Result<PathBuf> {
        let tmpl_path = template_path(system);
        debug!("Using template {}", tmpl_path.display());
        let template = AnswersTemplate::load(system, &tmpl_path)?;

        validate_output_path(system, &self.output)?;

        let mut file =
            system
                .create_private(&self.output)
                .map_err(|source| AnswersError::FileCreate {
                    path: self.output.clone(),
                    source,
                })?;

        let rendered = template.render(self.config)?;

        file.write_all(rendered.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| {
                AnswersError::io(
                    format!("failed to write answers file {}", self.output.display()),
                    source,
                )
            })?;

        info!(
            "Rendered {} bytes for host '{}' into {}",
            rendered.len(),
            self.config.hostname,
            self.output.display()
        );
        Ok(self.output.clone())
    }
}
