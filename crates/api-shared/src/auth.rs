//! Login and bearer-token verification.
//!
//! Tokens are HS256 JWTs signed with the configured secret. A token carries the username, the
//! issuer, its issue and expiry times, and a random id. Verification checks the signature, the
//! expiry and the issuer; every failure is reported the same way.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use mcg_core::{RecordError, RecordResult, UserService};

use crate::config::TokenConfig;

const INVALID_TOKEN: &str = "token is invalid";

/// Claims carried by an access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_secs: i64,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("issuer", &self.issuer)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(users: UserService, config: &TokenConfig) -> Self {
        let secret = config.secret().as_bytes();
        Self {
            users,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer().to_string(),
            ttl_secs: i64::try_from(config.ttl().as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Checks the credentials and issues a token.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an unknown username or a wrong password.
    /// - `Internal` if signing fails.
    pub fn login(&self, username: &str, password: &str) -> RecordResult<String> {
        self.users.verify_credentials(username, password)?;
        let token = self.issue_token(username)?;
        info!(username, "login succeeded");
        Ok(token)
    }

    /// Signs a fresh token for `username` without checking credentials.
    pub fn issue_token(&self, username: &str) -> RecordResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            username: username.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| RecordError::Internal(format!("failed to sign token: {e}")))
    }

    /// Validates `token` and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized("token is invalid")` for a bad signature, an expired token, a
    /// foreign issuer or anything that does not parse.
    pub fn verify_token(&self, token: &str) -> RecordResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                warn!(reason = %e, "token rejected");
                RecordError::Unauthorized(INVALID_TOKEN.into())
            })
    }
}
