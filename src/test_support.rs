//! Cheap doubles for the crypto and storage capabilities.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{
    auth::password::PasswordHasher,
    users::{
        repo::{MemoryUserRepo, UserRepo},
        repo_types::User,
    },
};

/// Reversible "hash" with a recognisable prefix; counts verifications.
#[derive(Default)]
pub struct PlainHasher {
    verified: AtomicUsize,
}

impl PlainHasher {
    pub fn verifications(&self) -> usize {
        self.verified.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for PlainHasher {
    fn hash(&self, plain: &str) -> anyhow::Result<String> {
        Ok(format!("plain${plain}"))
    }

    fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        self.verified.fetch_add(1, Ordering::SeqCst);
        let stored = hash
            .strip_prefix("plain$")
            .ok_or_else(|| anyhow::anyhow!("not a plain hash"))?;
        Ok(stored == plain)
    }
}

/// In-memory user store that records how often it was touched.
#[derive(Default)]
pub struct CountingUserRepo {
    inner: MemoryUserRepo,
    lookups: AtomicUsize,
    inserts: AtomicUsize,
}

impl CountingUserRepo {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepo for CountingUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, email: &str, password_hash: &str) -> anyhow::Result<Option<User>> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(email, password_hash).await
    }
}
