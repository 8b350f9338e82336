use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Access tokens authorize API calls; refresh tokens only mint new pairs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Registered JWT claims plus the token kind. `iat`/`exp` are unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

impl Claims {
    pub fn issue(
        user_id: Uuid,
        kind: TokenKind,
        ttl: Duration,
        issuer: &str,
        audience: &str,
        now: OffsetDateTime,
    ) -> Self {
        let iat = now.unix_timestamp().max(0) as usize;
        Self {
            sub: user_id,
            iat,
            exp: iat.saturating_add(ttl.as_secs() as usize),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            kind,
        }
    }
}
