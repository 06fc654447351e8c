use anyhow::{Context, Result};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Actor, MemberId};

/// Claims this crate reads from a storefront token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Member UUID
    #[serde(default)]
    pub is_admin: bool,
    pub exp: i64,
    pub iss: String,
}

impl Claims {
    /// The principal these claims describe
    pub fn actor(&self) -> Result<Actor> {
        let member_id = Uuid::parse_str(&self.sub).context("token subject is not a member id")?;
        Ok(Actor::new(MemberId::from_uuid(member_id), self.is_admin))
    }
}

/// Verifies bearer tokens signed by the storefront login service
#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Verify a token and resolve it to the calling actor
    ///
    /// Fails unless the signature matches, the token is unexpired and it was
    /// issued by our issuer.
    pub fn verify_token(&self, token: &str) -> Result<Actor> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)?.claims;
        claims.actor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn sign(secret: &str, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(sub: &str, is_admin: bool, issuer: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            is_admin,
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
            iss: issuer.to_string(),
        }
    }

    #[test]
    fn test_verify_resolves_actor() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        let member_id = Uuid::now_v7();

        let token = sign(
            "test_secret_key",
            &claims(&member_id.to_string(), true, "test_issuer"),
        );

        let actor = service.verify_token(&token).unwrap();
        assert_eq!(actor.member_id(), MemberId::from_uuid(member_id));
        assert!(actor.is_admin());
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string());
        assert!(service.verify_token("invalid_token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service = JwtService::new("secret2", "test_issuer".to_string());
        let token = sign(
            "secret1",
            &claims(&Uuid::now_v7().to_string(), false, "test_issuer"),
        );
        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let service = JwtService::new("shared", "issuer_b".to_string());
        let token = sign("shared", &claims(&Uuid::now_v7().to_string(), false, "issuer_a"));
        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new("shared", "test_issuer".to_string());
        let mut expired = claims(&Uuid::now_v7().to_string(), true, "test_issuer");
        expired.exp = (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp();
        assert!(service.verify_token(&sign("shared", &expired)).is_err());
    }

    #[test]
    fn test_subject_must_be_a_member_id() {
        let service = JwtService::new("shared", "test_issuer".to_string());
        let token = sign("shared", &claims("not-a-uuid", true, "test_issuer"));
        assert!(service.verify_token(&token).is_err());
    }
}
