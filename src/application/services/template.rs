//! Template loading service
//!
//! Resolves the template a tree is (re)built from: a TOML file named in the
//! settings, or the built-in operating system template.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, PathContextExt};
use crate::config::Settings;
use crate::domain::{os_template, validate_template, TemplateNode};
use crate::infrastructure::traits::FileSystem;

/// Service for loading and validating tree templates.
pub struct TemplateService {
    fs: Arc<dyn FileSystem>,
}

impl TemplateService {
    /// Create a new template service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Template selected by the settings.
    pub fn load(&self, settings: &Settings) -> ApplicationResult<TemplateNode> {
        match &settings.template_file {
            Some(path) => self.load_file(path),
            None => Ok(os_template()),
        }
    }

    /// Read, parse and validate a TOML template file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_file(&self, path: &Path) -> ApplicationResult<TemplateNode> {
        if !self.fs.exists(path) || !self.fs.is_file(path) {
            return Err(ApplicationError::TemplateNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read template", path)?;
        let template = Self::parse(&content).with_path_context("parse template", path)?;
        validate_template(&template)?;
        debug!("loaded template {} from {}", template.id, path.display());
        Ok(template)
    }

    /// Parse a TOML template without validating it.
    pub fn parse(content: &str) -> Result<TemplateNode, toml::de::Error> {
        toml::from_str(content)
    }
}
