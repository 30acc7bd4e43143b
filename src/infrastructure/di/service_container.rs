//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::TemplateService;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::TreeManager;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding application settings and I/O implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    pub fn template_service(&self) -> TemplateService {
        TemplateService::new(Arc::clone(&self.fs))
    }

    /// A fresh manager built from the configured template.
    pub fn tree_manager(&self) -> ApplicationResult<TreeManager> {
        let template = self.template_service().load(&self.settings)?;
        Ok(TreeManager::with_template(template)?)
    }
}
