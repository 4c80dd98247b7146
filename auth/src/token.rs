use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Issuer tag stamped on every token.
pub const ISSUER: &str = "bogdash";

/// Lifetime of an access token.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Issues and validates bearer tokens.
///
/// The signing key is fixed at construction; there is no rotation and no
/// revocation list, so a token stays valid until its expiry.
pub struct TokenService {
    jwt_handler: JwtHandler,
    issuer: String,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            issuer: ISSUER.to_string(),
            lifetime: Duration::hours(TOKEN_LIFETIME_HOURS),
        }
    }

    /// Issue a token for `subject` carrying `scopes`, valid from now.
    pub fn issue(&self, subject: &str, scopes: &[String]) -> Result<String, JwtError> {
        self.issue_at(subject, scopes, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        scopes: &[String],
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(
            subject,
            self.issuer.as_str(),
            scopes.to_vec(),
            issued_at,
            self.lifetime,
        );
        self.jwt_handler.encode(&claims)
    }

    /// Verified claims of a token, expired or not.
    ///
    /// # Errors
    /// * `MalformedToken` - Signature invalid or token structurally corrupt
    pub fn claims_of(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }

    /// Subject of a token whose signature checks out. Expiry is not
    /// consulted; use [`is_valid`](Self::is_valid) for that.
    ///
    /// # Errors
    /// * `MalformedToken` - Signature invalid or token structurally corrupt
    pub fn subject_of(&self, token: &str) -> Result<String, JwtError> {
        self.claims_of(token).map(|claims| claims.sub)
    }

    /// True iff the token belongs to `expected_subject` and has not expired.
    pub fn is_valid(&self, token: &str, expected_subject: &str) -> bool {
        self.is_valid_at(token, expected_subject, Utc::now())
    }

    pub fn is_valid_at(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        match self.claims_of(token) {
            Ok(claims) => claims.sub == expected_subject && !claims.is_expired(now),
            Err(_) => false,
        }
    }
}
