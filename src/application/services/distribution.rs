//! Saved distribution service
//!
//! Save, list, load and share distributions through a [`DistributionStore`],
//! keyed by the configured user identity.

use std::io;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{info, instrument};

use crate::application::session::Session;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::{DistributionStore, SavedDistribution};

fn user_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.@-]+$").expect("valid user pattern"))
}

/// Reject identities that cannot safely key on-disk storage.
pub fn validate_user(user: &str) -> ApplicationResult<()> {
    if user.starts_with('.') || !user_pattern().is_match(user) {
        return Err(ApplicationError::validation(format!(
            "invalid user identity: {user:?}"
        )));
    }
    Ok(())
}

pub struct DistributionService {
    store: Arc<dyn DistributionStore>,
    user: String,
}

impl DistributionService {
    pub fn new(store: Arc<dyn DistributionStore>, user: impl Into<String>) -> Self {
        Self {
            store,
            user: user.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Store the current session state under `name`.
    #[instrument(level = "debug", skip(self, session))]
    pub fn save(&self, name: &str, session: &Session) -> ApplicationResult<SavedDistribution> {
        validate_user(&self.user)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ApplicationError::validation(
                "please enter a name for the distribution",
            ));
        }
        let record = self
            .store
            .save(&self.user, name, &session.document())
            .with_context("save distribution")?;
        info!("saved distribution {} as {}", name, record.id);
        Ok(record)
    }

    pub fn list(&self) -> ApplicationResult<Vec<SavedDistribution>> {
        validate_user(&self.user)?;
        self.store.list(&self.user).with_context("list distributions")
    }

    /// Session rebuilt from a saved distribution.
    pub fn load(&self, id: &str) -> ApplicationResult<Session> {
        let record = self.get(id)?;
        Ok(Session::from_document(record.document))
    }

    pub fn share(&self, id: &str) -> ApplicationResult<String> {
        validate_user(&self.user)?;
        self.store
            .share(&self.user, id)
            .map_err(|e| self.not_found_or(e, id, "share distribution"))
    }

    fn get(&self, id: &str) -> ApplicationResult<SavedDistribution> {
        validate_user(&self.user)?;
        self.store
            .get(&self.user, id)
            .map_err(|e| self.not_found_or(e, id, "load distribution"))
    }

    fn not_found_or(&self, e: io::Error, id: &str, action: &str) -> ApplicationError {
        if e.kind() == io::ErrorKind::NotFound {
            ApplicationError::DistributionNotFound(id.to_string())
        } else {
            ApplicationError::OperationFailed {
                context: action.to_string(),
                source: Box::new(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice", true)]
    #[case("a.b-c_d@host", true)]
    #[case("", false)]
    #[case("..", false)]
    #[case("a/b", false)]
    #[case("with space", false)]
    fn given_user_identity_when_validating_then_only_safe_names_pass(
        #[case] user: &str,
        #[case] ok: bool,
    ) {
        assert_eq!(validate_user(user).is_ok(), ok);
    }
}
