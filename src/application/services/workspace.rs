//! Working document service
//!
//! Loads and stores the editor's working document on disk. Working files keep
//! full precision; rounding happens only on export.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::session::Session;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Mode;
use crate::infrastructure::traits::FileSystem;

pub struct WorkspaceService {
    fs: Arc<dyn FileSystem>,
    default_mode: Mode,
}

impl WorkspaceService {
    /// `default_mode` applies to documents that do not state their own mode.
    pub fn new(fs: Arc<dyn FileSystem>, default_mode: Mode) -> Self {
        Self { fs, default_mode }
    }

    /// Create a fresh document. Refuses to overwrite unless `force`.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&self, path: &Path, mode: Mode, force: bool) -> ApplicationResult<Session> {
        if self.fs.exists(path) && !force {
            return Err(ApplicationError::validation(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        let session = Session::new(mode);
        self.store(path, &session)?;
        Ok(session)
    }

    /// Read a document through the import gate.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Session> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::DocumentNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read document", path)?;
        let mut session = Session::new(self.default_mode);
        session.import_json(&content)?;
        debug!("loaded {} ({} mode)", path.display(), session.mode());
        Ok(session)
    }

    /// Write the unrounded session state.
    #[instrument(level = "debug", skip(self, session))]
    pub fn store(&self, path: &Path, session: &Session) -> ApplicationResult<()> {
        let json = session.document().to_json()?;
        self.write(path, &json)
    }

    /// Validate `source` and replace the document at `target` with it.
    ///
    /// Nothing is written when validation fails. A source without a boolean
    /// `isAbsolute` inherits the mode of the existing target, or the default
    /// mode when there is none.
    #[instrument(level = "debug", skip(self))]
    pub fn import(&self, source: &Path, target: &Path) -> ApplicationResult<Session> {
        let content = self
            .fs
            .read_to_string(source)
            .with_path_context("read import", source)?;
        let mut session = match self.load(target) {
            Ok(existing) => existing,
            // an unreadable target is replaced as well
            Err(ApplicationError::DocumentNotFound(_)) | Err(ApplicationError::Domain(_)) => {
                Session::new(self.default_mode)
            }
            Err(e) => return Err(e),
        };
        session.import_json(&content)?;
        self.store(target, &session)?;
        Ok(session)
    }

    /// Write the rounded interchange form of `session`.
    pub fn export(&self, session: &Session, output: &Path) -> ApplicationResult<()> {
        let json = session.export_json()?;
        self.write(output, &json)
    }

    fn write(&self, path: &Path, json: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, json)
            .with_path_context("write document", path)
    }
}

