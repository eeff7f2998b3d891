use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use super::{repo::UserRepo, repo_types::User};
use crate::{auth::password::PasswordHasher, error::AppError};

/// Owns user identities: uniqueness of emails and credential checks.
#[derive(Clone)]
pub struct UserDirectory {
    repo: Arc<dyn UserRepo>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserDirectory {
    pub fn new(repo: Arc<dyn UserRepo>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repo, hasher }
    }

    #[instrument(skip(self, raw_password))]
    pub async fn create(&self, email: &str, raw_password: &str) -> Result<User, AppError> {
        if self.repo.find_by_email(email).await?.is_some() {
            warn!(email, "email already registered");
            return Err(AppError::conflict("email already registered"));
        }

        let hash = self.hasher.hash(raw_password)?;

        // The store enforces uniqueness too; a concurrent registration lands here.
        let user = self.repo.insert(email, &hash).await?.ok_or_else(|| {
            warn!(email, "email registered concurrently");
            AppError::conflict("email already registered")
        })?;

        info!(user_id = user.id, email = %user.email, "user created");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.repo.find_by_email(email).await?)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user with id {id} not found")))
    }

    /// Returns the user when `raw_password` matches, `None` for any mismatch.
    #[instrument(skip(self, raw_password))]
    pub async fn validate_credentials(
        &self,
        email: &str,
        raw_password: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = self.repo.find_by_email(email).await? else {
            return Ok(None);
        };

        match self.hasher.verify(raw_password, &user.password_hash) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                error!(error = %e, user_id = user.id, "stored password hash is unreadable");
                Ok(None)
            }
        }
    }
}
