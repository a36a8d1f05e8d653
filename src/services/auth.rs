use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Resolves a bearer credential to the authenticated user's id
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> AppResult<Uuid>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(rename = "userId", default)]
    user_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

/// Verifies HS256 tokens signed with a shared secret.
///
/// The user id may be carried in either a `userId` or an `id` claim; `exp` is
/// enforced when present.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> AppResult<Uuid> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AppError::InvalidToken
        })?;

        let raw = data
            .claims
            .user_id
            .or(data.claims.id)
            .ok_or(AppError::InvalidToken)?;

        Uuid::parse_str(&raw).map_err(|_| AppError::InvalidToken)
    }
}
