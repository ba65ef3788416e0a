use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{config::JwtConfig, error::ApiError, state::AppState};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,
    #[error("signing secret is not configured")]
    SecretUnset,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingHeader => ApiError::Unauthorized(e.to_string()),
            AuthError::SecretUnset => ApiError::internal("Internal server error", e),
            AuthError::InvalidToken(_) => ApiError::Unauthorized("Invalid token".into()),
        }
    }
}

/// Checks HMAC-signed tokens against the server secret. Only validity is
/// checked; no claim is read out of the token.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding: Option<DecodingKey>,
    leeway: u64,
}

impl FromRef<AppState> for JwtVerifier {
    fn from_ref(state: &AppState) -> Self {
        JwtVerifier::new(&state.config.jwt)
    }
}

impl JwtVerifier {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            decoding: cfg
                .secret
                .as_ref()
                .map(|s| DecodingKey::from_secret(s.as_bytes())),
            leeway: cfg.leeway_secs,
        }
    }

    pub fn verify(&self, token: &str) -> Result<(), AuthError> {
        let key = self.decoding.as_ref().ok_or(AuthError::SecretUnset)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // exp is enforced when present, but no claim is mandatory
        validation.required_spec_claims.clear();
        validation.validate_aud = false;
        validation.leeway = self.leeway;

        decode::<serde_json::Value>(token, key, &validation)?;
        debug!("jwt verified");
        Ok(())
    }
}

/// Accepts either a raw token or `Bearer <token>`.
fn token_from_header(value: &str) -> &str {
    let value = value.trim();
    match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    }
}

/// Gate for protected routes, layered with `from_extractor_with_state`.
pub struct RequireToken;

#[async_trait]
impl<S> FromRequestParts<S> for RequireToken
where
    S: Send + Sync,
    JwtVerifier: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(token_from_header)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                warn!("missing Authorization header");
                AuthError::MissingHeader
            })?;

        let verifier = JwtVerifier::from_ref(state);
        verifier.verify(token).map_err(|e| {
            if let AuthError::InvalidToken(inner) = &e {
                warn!(error = %inner, "rejected token");
            }
            ApiError::from(e)
        })?;

        Ok(RequireToken)
    }
}

#[cfg(test)]
pub(crate) fn sign_token(secret: &str, exp_offset_secs: Option<i64>) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::OffsetDateTime;

    let mut claims = serde_json::json!({ "sub": "42" });
    if let Some(offset) = exp_offset_secs {
        claims["exp"] = (OffsetDateTime::now_utc().unix_timestamp() + offset).into();
    }
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign test token")
}
