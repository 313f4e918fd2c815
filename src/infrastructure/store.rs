//! File-backed distribution store
//!
//! Layout: `<root>/<user>/<id>.json`, one record per saved distribution.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::domain::Document;
use crate::infrastructure::traits::{DistributionStore, FileSystem, SavedDistribution};

const RECORD_EXTENSION: &str = "json";

pub struct FileStore {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    share_base_url: String,
}

impl FileStore {
    pub fn new(fs: Arc<dyn FileSystem>, root: PathBuf, share_base_url: impl Into<String>) -> Self {
        Self {
            fs,
            root,
            share_base_url: share_base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, user: &str) -> PathBuf {
        self.root.join(user)
    }

    fn record_path(&self, user: &str, id: &str) -> PathBuf {
        self.user_dir(user).join(format!("{id}.{RECORD_EXTENSION}"))
    }

    fn read_record(&self, path: &Path) -> io::Result<SavedDistribution> {
        let content = self.fs.read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl DistributionStore for FileStore {
    #[instrument(level = "debug", skip(self, document))]
    fn save(&self, user: &str, name: &str, document: &Document) -> io::Result<SavedDistribution> {
        let record = SavedDistribution {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            user_id: user.to_string(),
            created_at: Utc::now(),
            document: document.clone(),
        };
        let path = self.record_path(user, &record.id);
        self.fs.ensure_parent(&path)?;
        let content = serde_json::to_string_pretty(&record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.fs.write(&path, &content)?;
        debug!("saved {} to {}", record.id, path.display());
        Ok(record)
    }

    #[instrument(level = "debug", skip(self))]
    fn list(&self, user: &str) -> io::Result<Vec<SavedDistribution>> {
        let dir = self.user_dir(user);
        if !self.fs.is_dir(&dir) {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for path in self.fs.read_dir(&dir)? {
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            match self.read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => warn!("skipping unreadable record {}: {}", path.display(), e),
            }
        }
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    fn get(&self, user: &str, id: &str) -> io::Result<SavedDistribution> {
        let path = match record_id(id) {
            Some(id) => self.record_path(user, &id),
            None => return Err(not_found(user, id)),
        };
        if !self.fs.exists(&path) {
            return Err(not_found(user, id));
        }
        self.read_record(&path)
    }

    fn share(&self, user: &str, id: &str) -> io::Result<String> {
        // only existing distributions can be shared
        let record = self.get(user, id)?;
        Ok(format!(
            "{}/shared/{}",
            self.share_base_url.trim_end_matches('/'),
            record.id
        ))
    }
}

/// Canonical record id. Anything that does not parse as a UUID names no record.
fn record_id(id: &str) -> Option<String> {
    Uuid::parse_str(id).ok().map(|u| u.hyphenated().to_string())
}

fn not_found(user: &str, id: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no distribution {id} for {user}"),
    )
}
