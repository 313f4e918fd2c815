//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DistributionService, WorkspaceService};
use crate::config::Settings;
use crate::infrastructure::store::FileStore;
use crate::infrastructure::traits::{DistributionStore, FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Storage collaborator for saved distributions
    pub store: Arc<dyn DistributionStore>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(FileStore::new(
            Arc::clone(&fs),
            settings.distributions_dir(),
            settings.share_base_url.clone(),
        ));
        Self::with_deps(settings, fs, store)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn DistributionStore>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs, store }
    }

    pub fn workspace(&self) -> WorkspaceService {
        WorkspaceService::new(Arc::clone(&self.fs), self.settings.default_mode)
    }

    pub fn distributions(&self) -> DistributionService {
        DistributionService::new(Arc::clone(&self.store), self.settings.user.clone())
    }
}
