/// Admin authentication: credential check, session tokens, extractors
use crate::{config::ConsoleConfig, context::AppContext, error::ConsoleError, metrics};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Who performed an administrative operation. Every engine call takes one
/// of these explicitly; nothing reads ambient session state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPrincipal {
    pub admin_id: String,
    pub email: String,
}

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    scope: String,
    iat: i64,
    exp: i64,
}

/// A freshly signed-in session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedSession {
    pub token: String,
    pub admin_id: String,
    pub email: String,
}

/// Verifies the configured operator credential and mints/verifies HS256
/// session tokens. Sign-out is client-side token discard; nothing is
/// stored server-side.
#[derive(Clone)]
pub struct AdminAuth {
    admin_id: String,
    admin_email: String,
    password_sha256: String,
    jwt_secret: String,
    session_ttl: Duration,
}

impl AdminAuth {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            admin_id: config.admin_id.clone(),
            admin_email: config.admin_email.clone(),
            password_sha256: config.admin_password_sha256.clone(),
            jwt_secret: config.jwt_secret.clone(),
            session_ttl: Duration::hours(config.session_ttl_hours),
        }
    }

    /// Check the operator credential and issue a session token
    pub fn sign_in(&self, email: &str, password: &str) -> Result<SignedSession, ConsoleError> {
        if !email.eq_ignore_ascii_case(&self.admin_email) || !self.verify_password(password) {
            tracing::warn!(email, "Failed admin sign-in attempt");
            metrics::record_sign_in("failed");
            return Err(ConsoleError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.issue_token()?;
        metrics::record_sign_in("ok");
        tracing::info!(admin = %self.admin_id, "Admin signed in");

        Ok(SignedSession {
            token,
            admin_id: self.admin_id.clone(),
            email: self.admin_email.clone(),
        })
    }

    /// Resolve a bearer token to the current principal
    pub fn verify(&self, token: &str) -> Result<AdminPrincipal, ConsoleError> {
        let data = verify_session_token(token, &self.jwt_secret)?;
        if data.claims.scope != "admin" {
            return Err(ConsoleError::Unauthorized(
                "Token does not carry admin scope".to_string(),
            ));
        }
        Ok(AdminPrincipal {
            admin_id: data.claims.sub,
            email: data.claims.email,
        })
    }

    fn verify_password(&self, password: &str) -> bool {
        let digest = hex::encode(Sha256::digest(password.as_bytes()));
        digest.eq_ignore_ascii_case(&self.password_sha256)
    }

    fn issue_token(&self) -> Result<String, ConsoleError> {
        let now = Utc::now();
        let claims = Claims {
            sub: self.admin_id.clone(),
            email: self.admin_email.clone(),
            scope: "admin".to_string(),
            iat: now.timestamp(),
            exp: (now + self.session_ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ConsoleError::Internal(format!("Token signing failed: {}", e)))
    }
}

/// Verify a session token's signature, expiry, and claims
fn verify_session_token(
    token: &str,
    jwt_secret: &str,
) -> Result<jsonwebtoken::TokenData<Claims>, ConsoleError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    // Allow some clock skew (5 minutes)
    validation.leeway = 300;

    decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::warn!("Session token verification failed: {}", e);
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ConsoleError::Unauthorized("Session has expired".to_string())
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                ConsoleError::Unauthorized("Invalid token signature".to_string())
            }
            _ => ConsoleError::Unauthorized(format!("Invalid token: {}", e)),
        }
    })
}

/// Pull the bearer token out of the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

/// Authenticated admin context, extracted on every protected route
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub principal: AdminPrincipal,
}

#[async_trait]
impl FromRequestParts<AppContext> for AdminContext {
    type Rejection = ConsoleError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or_else(|| {
            ConsoleError::Unauthorized("Missing authorization header".to_string())
        })?;

        let principal = state.auth.verify(&token)?;
        Ok(AdminContext { principal })
    }
}
