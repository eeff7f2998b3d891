use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::repo_types::User;

/// Persistence for user records.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;

    /// Inserts an active user. `None` means the email is already taken.
    async fn insert(&self, email: &str, password_hash: &str) -> anyhow::Result<Option<User>>;
}

pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, is_active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, is_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn insert(&self, email: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, is_active, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }
}

/// Process-local user store.
#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<Vec<User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Ok(None);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: users.len() as i64 + 1,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_repo_assigns_sequential_ids() {
        let repo = MemoryUserRepo::new();
        let a = repo.insert("a@x.com", "h").await.unwrap().unwrap();
        let b = repo.insert("b@x.com", "h").await.unwrap().unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert!(a.is_active);
    }

    #[tokio::test]
    async fn memory_repo_refuses_duplicate_email() {
        let repo = MemoryUserRepo::new();
        repo.insert("a@x.com", "first").await.unwrap();
        assert!(repo.insert("a@x.com", "second").await.unwrap().is_none());
        let kept = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(kept.password_hash, "first");
    }

    #[tokio::test]
    async fn memory_repo_email_lookup_is_case_sensitive() {
        let repo = MemoryUserRepo::new();
        repo.insert("Alice@x.com", "h").await.unwrap();
        assert!(repo.find_by_email("alice@x.com").await.unwrap().is_none());
    }
}
