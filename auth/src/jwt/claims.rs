use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token payload.
///
/// Standard RFC 7519 claims plus `scopes`, the role strings granted to the
/// subject (e.g. `ROLE_USER`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (the username the token was issued to)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Granted roles
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Claims {
    /// Build claims issued at `issued_at` and expiring `lifetime` later.
    pub fn new(
        subject: impl Into<String>,
        issuer: impl Into<String>,
        scopes: Vec<String>,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: subject.into(),
            iss: issuer.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
            scopes,
        }
    }

    /// A token is usable strictly before its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}
