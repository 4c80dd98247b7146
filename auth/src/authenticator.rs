use std::sync::Arc;

use crate::jwt::JwtError;
use crate::password::Argon2PasswordEncoder;
use crate::password::PasswordEncoder;
use crate::password::PasswordError;
use crate::token::TokenService;

/// Well-formed Argon2id digest that matches no password. Checking against it
/// makes a login for an unknown account cost the same as a wrong password.
pub const DECOY_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Authentication coordinator combining password verification and token
/// issuance.
pub struct Authenticator {
    password_encoder: Arc<dyn PasswordEncoder>,
    token_service: Arc<TokenService>,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// Signed bearer token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Bad credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Authenticator using Argon2id and a token service signing with `jwt_secret`.
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::with_parts(
            Arc::new(Argon2PasswordEncoder::new()),
            Arc::new(TokenService::new(jwt_secret)),
        )
    }

    pub fn with_parts(
        password_encoder: Arc<dyn PasswordEncoder>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            password_encoder,
            token_service,
        }
    }

    pub fn password_encoder(&self) -> Arc<dyn PasswordEncoder> {
        Arc::clone(&self.password_encoder)
    }

    pub fn token_service(&self) -> Arc<TokenService> {
        Arc::clone(&self.token_service)
    }

    /// Verify a password against its stored hash and, on success, issue a
    /// token for `subject` carrying `scopes`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unreadable
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        scopes: &[String],
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_encoder.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_service.issue(subject, scopes)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login whose account does not exist, after spending one
    /// verification against [`DECOY_DIGEST`].
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        // Only the time spent matters; the outcome is always a rejection.
        let _ = self.password_encoder.verify(password, DECOY_DIGEST);
        AuthenticationError::InvalidCredentials
    }

    /// Issue a token without password verification, for flows where the
    /// caller has just established the identity itself (e.g. registration).
    pub fn issue_token(&self, subject: &str, scopes: &[String]) -> Result<String, JwtError> {
        self.token_service.issue(subject, scopes)
    }
}
