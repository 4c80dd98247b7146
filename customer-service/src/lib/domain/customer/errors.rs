use thiserror::Error;

/// Error for CustomerId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustomerIdError {
    #[error("Invalid customer id: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Age validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgeError {
    #[error("Age must be a positive integer, got {0}")]
    NotPositive(i32),
}

/// Error for Gender parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenderError {
    #[error("Unknown gender: {0}")]
    Unknown(String),
}

/// Top-level error for all customer-related operations
#[derive(Debug, Clone, Error)]
pub enum CustomerError {
    // Value validation errors
    #[error("{0}")]
    InvalidCustomerId(#[from] CustomerIdError),

    #[error("{0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{0}")]
    InvalidAge(#[from] AgeError),

    #[error("{0}")]
    InvalidGender(#[from] GenderError),

    // Domain-level errors
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    DuplicateResource(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl CustomerError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        CustomerError::NotFound(format!("Customer with id [{}] not found", id))
    }

    pub fn email_taken() -> Self {
        CustomerError::DuplicateResource("Email already taken".to_string())
    }

    pub fn bad_credentials() -> Self {
        CustomerError::Authentication("Bad credentials".to_string())
    }
}

impl From<anyhow::Error> for CustomerError {
    fn from(err: anyhow::Error) -> Self {
        CustomerError::Unknown(err.to_string())
    }
}
