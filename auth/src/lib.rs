//! Authentication utilities library
//!
//! Provides the authentication infrastructure for the customer service:
//! - Password hashing (Argon2id)
//! - Bearer token issuance and validation (HS256 JWT)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{Argon2PasswordEncoder, PasswordEncoder};
//!
//! let encoder = Argon2PasswordEncoder::new();
//! let hash = encoder.hash("my_password").unwrap();
//! assert!(encoder.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenService;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!");
//! let token = tokens.issue("jill@x.com", &["ROLE_USER".to_string()]).unwrap();
//! assert_eq!(tokens.subject_of(&token).unwrap(), "jill@x.com");
//! assert!(tokens.is_valid(&token, "jill@x.com"));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.password_encoder().hash("password123").unwrap();
//!
//! // Login: verify and issue token
//! let scopes = vec!["ROLE_USER".to_string()];
//! let result = auth.authenticate("password123", &hash, "jill@x.com", &scopes).unwrap();
//! assert!(auth.token_service().is_valid(&result.access_token, "jill@x.com"));
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod token;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::DECOY_DIGEST;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::Argon2PasswordEncoder;
pub use password::PasswordEncoder;
pub use password::PasswordError;
pub use token::TokenService;
