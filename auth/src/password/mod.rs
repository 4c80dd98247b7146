pub mod argon2;
pub mod errors;

pub use argon2::Argon2PasswordEncoder;
pub use errors::PasswordError;

/// One-way password hashing.
///
/// Implementations must be deliberately slow and salt every digest, so the
/// same plaintext never produces the same output twice.
pub trait PasswordEncoder: Send + Sync + 'static {
    /// Hash a plaintext password into an opaque digest.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a digest produced by [`hash`](Self::hash).
    ///
    /// Returns `Ok(false)` on mismatch; an unreadable digest is an error.
    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError>;
}
