use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use upfluence_types::api::{Principal, SESSION_SCHEMA_VERSION, SessionClaims};

pub const SESSION_TTL_DAYS: i64 = 30;
pub const SESSION_COOKIE: &str = "upfluence_session";

/// HS256 keys derived once from the configured secret.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
    pub expires_at: DateTime<Utc>,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, principal: &Principal) -> anyhow::Result<IssuedSession> {
        self.issue_at(principal, Utc::now())
    }

    pub fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> anyhow::Result<IssuedSession> {
        let expires_at = now + Duration::days(SESSION_TTL_DAYS);
        let claims = SessionClaims::new(principal, now, expires_at);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedSession {
            token,
            claims,
            expires_at,
        })
    }

    /// Decodes a token. Bad signatures, expired tokens and tokens written under
    /// another claims version all come back as `None`.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let data = match decode::<SessionClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256)) {
            Ok(data) => data,
            Err(e) => {
                debug!("Rejected session token: {}", e);
                return None;
            }
        };

        if data.claims.ver != SESSION_SCHEMA_VERSION {
            debug!(ver = data.claims.ver, "Rejected session token with stale claims version");
            return None;
        }
        Some(data.claims)
    }
}

pub fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_TTL_DAYS * 24 * 60 * 60
    )
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}
