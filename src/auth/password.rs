use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tracing::error;

/// One-way credential hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> anyhow::Result<String>;

    /// `Ok(false)` on mismatch; `Err` only when `hash` is not a valid hash string.
    fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool>;
}

/// Argon2id hasher producing PHC strings.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    fn verify(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            anyhow::anyhow!(e.to_string())
        })?;
        // Cost parameters come from the PHC string, not from `self`.
        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Hasher {
        Argon2Hasher::with_params(Params::new(8, 1, 1, None).expect("valid params"))
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hasher = Argon2Hasher::default();
        let password = "Secur3P@ssw0rd!";
        let hash = hasher.hash(password).expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = cheap();
        let hash = hasher.hash("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!hasher.verify("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = cheap();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_uses_parameters_embedded_in_hash() {
        let hash = cheap().hash("pw1").unwrap();
        assert!(Argon2Hasher::default().verify("pw1", &hash).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = cheap().verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
