use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::config::JwtConfig;

/// Signs and verifies bearer tokens carrying a user id.
pub trait TokenService: Send + Sync {
    fn sign(&self, user_id: i64) -> anyhow::Result<String>;
    fn verify(&self, token: &str) -> anyhow::Result<Claims>;
}

/// Longest accepted token lifetime (one year).
pub const MAX_TTL_MINUTES: i64 = 365 * 24 * 60;

/// HS256 JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: TimeDuration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: TimeDuration::minutes(cfg.ttl_minutes.clamp(0, MAX_TTL_MINUTES)),
        }
    }
}

impl TokenService for JwtKeys {
    fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
        })
    }

    #[test]
    fn sign_and_verify_token() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let token = keys.sign(42).expect("sign");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good_keys = make_keys("same-secret", "good-iss", "good-aud");
        let bad_keys = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good_keys.sign(1).expect("sign");
        assert!(bad_keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_foreign_signature() {
        let ours = make_keys("secret-a", "iss", "aud");
        let theirs = make_keys("secret-b", "iss", "aud");
        let token = theirs.sign(1).expect("sign");
        assert!(ours.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let token = keys.sign(1).expect("sign");
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = make_keys("other", "iss", "aud").sign(2).expect("sign");
        let forged_payload = forged.split('.').nth(1).unwrap();
        parts[1] = forged_payload;
        assert!(keys.verify(&parts.join(".")).is_err());
    }

    #[test]
    fn ttl_is_clamped_to_one_year() {
        let keys = JwtKeys::from(&JwtConfig {
            secret: "dev-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: i64::MAX,
        });
        let token = keys.sign(9).expect("sign");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.exp - claims.iat, (MAX_TTL_MINUTES * 60) as usize);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let past = OffsetDateTime::now_utc() - TimeDuration::hours(2);
        let claims = Claims {
            sub: 7,
            iat: past.unix_timestamp() as usize,
            exp: (past + TimeDuration::minutes(5)).unix_timestamp() as usize,
            iss: "iss".into(),
            aud: "aud".into(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.verify(&token).is_err());
    }
}
