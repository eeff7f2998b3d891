use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::repo_types::{NewSystem, System, SystemFilter, SystemRow};

/// Persistence for catalog entries.
#[async_trait]
pub trait SystemRepo: Send + Sync {
    async fn insert(&self, new: &NewSystem) -> anyhow::Result<System>;

    async fn find_all(&self) -> anyhow::Result<Vec<System>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<System>>;

    async fn find_by(&self, filter: &SystemFilter) -> anyhow::Result<Vec<System>>;

    /// Writes every column of `system` and bumps `updated_at`.
    /// `None` means the row no longer exists.
    async fn save(&self, system: &System) -> anyhow::Result<Option<System>>;

    /// Returns the number of rows removed.
    async fn delete(&self, id: i64) -> anyhow::Result<u64>;
}

const COLUMNS: &str = "id, name, url, icon, category, tags, responsible, description, \
     tech_stack, expiration_date, dependencies, status, access_level, created_at, updated_at";

pub struct PgSystemRepo {
    db: PgPool,
}

impl PgSystemRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_systems(rows: Vec<SystemRow>) -> anyhow::Result<Vec<System>> {
    rows.into_iter().map(System::try_from).collect()
}

#[async_trait]
impl SystemRepo for PgSystemRepo {
    async fn insert(&self, new: &NewSystem) -> anyhow::Result<System> {
        let row = sqlx::query_as::<_, SystemRow>(&format!(
            r#"
            INSERT INTO systems (name, url, icon, category, tags, responsible, description,
                                 tech_stack, expiration_date, dependencies, status, access_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.url)
        .bind(&new.icon)
        .bind(&new.category)
        .bind(&new.tags)
        .bind(&new.responsible)
        .bind(&new.description)
        .bind(&new.tech_stack)
        .bind(new.expiration_date)
        .bind(&new.dependencies)
        .bind(new.status.as_str())
        .bind(new.access_level.as_str())
        .fetch_one(&self.db)
        .await
        .context("insert system")?;
        row.try_into()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<System>> {
        let rows = sqlx::query_as::<_, SystemRow>(&format!(
            "SELECT {COLUMNS} FROM systems ORDER BY id"
        ))
        .fetch_all(&self.db)
        .await
        .context("list systems")?;
        into_systems(rows)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<System>> {
        let row = sqlx::query_as::<_, SystemRow>(&format!(
            "SELECT {COLUMNS} FROM systems WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find system by id")?;
        row.map(System::try_from).transpose()
    }

    async fn find_by(&self, filter: &SystemFilter) -> anyhow::Result<Vec<System>> {
        let (column, value) = match filter {
            SystemFilter::Category(c) => ("category", c.as_str()),
            SystemFilter::Status(s) => ("status", s.as_str()),
            SystemFilter::AccessLevel(a) => ("access_level", a.as_str()),
        };
        let rows = sqlx::query_as::<_, SystemRow>(&format!(
            "SELECT {COLUMNS} FROM systems WHERE {column} = $1 ORDER BY id"
        ))
        .bind(value)
        .fetch_all(&self.db)
        .await
        .with_context(|| format!("find systems by {column}"))?;
        into_systems(rows)
    }

    async fn save(&self, system: &System) -> anyhow::Result<Option<System>> {
        let row = sqlx::query_as::<_, SystemRow>(&format!(
            r#"
            UPDATE systems
               SET name = $2, url = $3, icon = $4, category = $5, tags = $6,
                   responsible = $7, description = $8, tech_stack = $9,
                   expiration_date = $10, dependencies = $11, status = $12,
                   access_level = $13, updated_at = now()
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(system.id)
        .bind(&system.name)
        .bind(&system.url)
        .bind(&system.icon)
        .bind(&system.category)
        .bind(&system.tags)
        .bind(&system.responsible)
        .bind(&system.description)
        .bind(&system.tech_stack)
        .bind(system.expiration_date)
        .bind(&system.dependencies)
        .bind(system.status.as_str())
        .bind(system.access_level.as_str())
        .fetch_optional(&self.db)
        .await
        .context("update system")?;
        row.map(System::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM systems WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete system")?;
        Ok(result.rows_affected())
    }
}

#[derive(Default)]
struct MemorySystems {
    last_id: i64,
    rows: Vec<System>,
}

/// Process-local catalog store; keeps insertion order.
#[derive(Default)]
pub struct MemorySystemRepo {
    inner: RwLock<MemorySystems>,
}

impl MemorySystemRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SystemRepo for MemorySystemRepo {
    async fn insert(&self, new: &NewSystem) -> anyhow::Result<System> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = OffsetDateTime::now_utc();
        let system = System {
            id: inner.last_id,
            name: new.name.clone(),
            url: new.url.clone(),
            icon: new.icon.clone(),
            category: new.category.clone(),
            tags: new.tags.clone(),
            responsible: new.responsible.clone(),
            description: new.description.clone(),
            tech_stack: new.tech_stack.clone(),
            expiration_date: new.expiration_date,
            dependencies: new.dependencies.clone(),
            status: new.status,
            access_level: new.access_level,
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(system.clone());
        Ok(system)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<System>> {
        Ok(self.inner.read().await.rows.clone())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<System>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by(&self, filter: &SystemFilter) -> anyhow::Result<Vec<System>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }

    async fn save(&self, system: &System) -> anyhow::Result<Option<System>> {
        let mut inner = self.inner.write().await;
        let Some(slot) = inner.rows.iter_mut().find(|s| s.id == system.id) else {
            return Ok(None);
        };
        *slot = System {
            created_at: slot.created_at,
            updated_at: OffsetDateTime::now_utc(),
            ..system.clone()
        };
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.rows.len();
        inner.rows.retain(|s| s.id != id);
        Ok((before - inner.rows.len()) as u64)
    }
}
