use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::{
    dto::{CreateSystemRequest, UpdateSystemRequest, UpdateStatusRequest},
    repo::SystemRepo,
    repo_types::{AccessLevel, System, SystemFilter, SystemStatus},
};
use crate::{error::AppError, validation::Validate};

fn not_found(id: i64) -> AppError {
    AppError::not_found(format!("system with id {id} not found"))
}

/// Validated CRUD and lookups over catalog entries.
///
/// Updates are a read followed by a write with no version check; two
/// concurrent updates of the same entry resolve as last-write-wins.
#[derive(Clone)]
pub struct SystemCatalog {
    repo: Arc<dyn SystemRepo>,
}

impl SystemCatalog {
    pub fn new(repo: Arc<dyn SystemRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, req))]
    pub async fn create(&self, req: CreateSystemRequest) -> Result<System, AppError> {
        let new = req.validate()?;
        let system = self.repo.insert(&new).await?;
        info!(system_id = system.id, name = %system.name, "system created");
        Ok(system)
    }

    pub async fn find_all(&self) -> Result<Vec<System>, AppError> {
        Ok(self.repo.find_all().await?)
    }

    pub async fn find_one(&self, id: i64) -> Result<System, AppError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    #[instrument(skip(self, req))]
    pub async fn update(&self, id: i64, req: UpdateSystemRequest) -> Result<System, AppError> {
        let mut system = self.find_one(id).await?;
        let changes = req.validate()?;
        system.apply(changes);
        let system = self.persist(system).await?;
        info!(system_id = id, "system updated");
        Ok(system)
    }

    #[instrument(skip(self, req))]
    pub async fn update_status(
        &self,
        id: i64,
        req: UpdateStatusRequest,
    ) -> Result<System, AppError> {
        let mut system = self.find_one(id).await?;
        system.status = req.validate()?;
        let system = self.persist(system).await?;
        info!(system_id = id, status = %system.status, "system status updated");
        Ok(system)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: i64) -> Result<(), AppError> {
        if self.repo.delete(id).await? == 0 {
            return Err(not_found(id));
        }
        info!(system_id = id, "system removed");
        Ok(())
    }

    pub async fn find_by_category(&self, category: &str) -> Result<Vec<System>, AppError> {
        Ok(self
            .repo
            .find_by(&SystemFilter::Category(category.to_string()))
            .await?)
    }

    pub async fn find_by_status(&self, status: &str) -> Result<Vec<System>, AppError> {
        match status.parse::<SystemStatus>() {
            Ok(s) => Ok(self.repo.find_by(&SystemFilter::Status(s)).await?),
            Err(_) => {
                debug!(status, "unknown status filter matches nothing");
                Ok(Vec::new())
            }
        }
    }

    pub async fn find_by_access_level(&self, access_level: &str) -> Result<Vec<System>, AppError> {
        match access_level.parse::<AccessLevel>() {
            Ok(a) => Ok(self.repo.find_by(&SystemFilter::AccessLevel(a)).await?),
            Err(_) => {
                debug!(access_level, "unknown access level filter matches nothing");
                Ok(Vec::new())
            }
        }
    }

    /// Writes back a loaded entry; it may have been removed in between.
    async fn persist(&self, system: System) -> Result<System, AppError> {
        let id = system.id;
        self.repo.save(&system).await?.ok_or_else(|| not_found(id))
    }
}
