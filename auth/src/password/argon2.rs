use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;
use super::PasswordEncoder;

/// Argon2id password encoder.
///
/// Digests are PHC strings (`$argon2id$v=19$...`) carrying the algorithm,
/// parameters and salt, so verification needs nothing but the digest.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordEncoder;

impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(digest).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
