//! Access/refresh JWTs and the `AuthUser` extractor.

use anyhow::Context;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// HS256 keys plus the issuer/audience every token is checked against.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[cfg.issuer.as_str()]);
        validation.set_audience(&[cfg.audience.as_str()]);

        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            validation,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::minutes(cfg.ttl_minutes),
            refresh_ttl: Duration::minutes(cfg.refresh_ttl_minutes),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

impl JwtKeys {
    fn sign(&self, user_id: Uuid, kind: TokenKind) -> AppResult<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .with_context(|| format!("sign {kind:?} token"))?;
        Ok(token)
    }

    pub fn issue_pair(&self, user_id: Uuid) -> AppResult<TokenPair> {
        let pair = TokenPair {
            access_token: self.sign(user_id, TokenKind::Access)?,
            refresh_token: self.sign(user_id, TokenKind::Refresh)?,
        };
        debug!(%user_id, "token pair issued");
        Ok(pair)
    }

    /// Decode `token` and require it to be of kind `expected`.
    pub fn verify(&self, token: &str, expected: TokenKind) -> AppResult<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                warn!(error = %e, "token rejected");
                AppError::Unauthorized("Invalid or expired token".into())
            })?
            .claims;

        if claims.kind != expected {
            warn!(user_id = %claims.sub, kind = ?claims.kind, "wrong token kind");
            return Err(AppError::Unauthorized(match expected {
                TokenKind::Access => "Access token required".into(),
                TokenKind::Refresh => "Refresh token required".into(),
            }));
        }
        Ok(claims)
    }
}

fn bearer(parts: &Parts) -> AppResult<&str> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))
}

/// Id of the caller, taken from a valid access token.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer(parts)?;
        let claims = JwtKeys::from_ref(state).verify(token, TokenKind::Access)?;
        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: "roadmap-secret".into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 15,
            refresh_ttl_minutes: 120,
        })
    }

    #[test]
    fn pair_carries_both_kinds_for_the_same_user() {
        let k = keys("finpath", "finpath-users");
        let user_id = Uuid::new_v4();
        let pair = k.issue_pair(user_id).unwrap();

        let access = k.verify(&pair.access_token, TokenKind::Access).unwrap();
        let refresh = k.verify(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(refresh.sub, user_id);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let k = keys("finpath", "finpath-users");
        let pair = k.issue_pair(Uuid::new_v4()).unwrap();

        assert!(matches!(
            k.verify(&pair.refresh_token, TokenKind::Access),
            Err(AppError::Unauthorized(msg)) if msg == "Access token required"
        ));
        assert!(matches!(
            k.verify(&pair.access_token, TokenKind::Refresh),
            Err(AppError::Unauthorized(msg)) if msg == "Refresh token required"
        ));
    }

    #[test]
    fn foreign_issuer_and_garbage_are_unauthorized() {
        let ours = keys("finpath", "finpath-users");
        let theirs = keys("elsewhere", "finpath-users");
        let token = theirs.issue_pair(Uuid::new_v4()).unwrap().access_token;

        for t in [token.as_str(), "not.a.jwt"] {
            assert!(matches!(
                ours.verify(t, TokenKind::Access),
                Err(AppError::Unauthorized(_))
            ));
        }
    }

    #[tokio::test]
    async fn state_keys_follow_config() {
        let state = AppState::fake();
        let k = JwtKeys::from_ref(&state);
        let pair = k.issue_pair(Uuid::nil()).unwrap();
        let claims = k.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }
}
