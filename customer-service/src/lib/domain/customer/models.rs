use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::customer::errors::AgeError;
use crate::customer::errors::CustomerIdError;
use crate::customer::errors::EmailError;
use crate::customer::errors::GenderError;

/// Role granted to every registered customer.
pub const ROLE_USER: &str = "ROLE_USER";

/// Customer aggregate entity.
///
/// The email doubles as the login username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub age: Age,
    pub gender: Gender,
}

impl Customer {
    /// Name the customer authenticates with.
    pub fn username(&self) -> &str {
        self.email.as_str()
    }

    pub fn roles(&self) -> Vec<String> {
        vec![ROLE_USER.to_string()]
    }
}

/// Store-assigned customer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(pub i32);

impl CustomerId {
    /// Parse a customer ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - Not a base-10 integer
    pub fn from_string(s: &str) -> Result<Self, CustomerIdError> {
        s.parse::<i32>()
            .map(CustomerId)
            .map_err(|_| CustomerIdError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Customer age, strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age(i32);

impl Age {
    pub fn new(age: i32) -> Result<Self, AgeError> {
        if age > 0 {
            Ok(Self(age))
        } else {
            Err(AgeError::NotPositive(age))
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unselected,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Unselected => "UNSELECTED",
        }
    }
}

impl FromStr for Gender {
    type Err = GenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "UNSELECTED" => Ok(Gender::Unselected),
            other => Err(GenderError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer not yet persisted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub age: Age,
    pub gender: Gender,
}

/// Command to register a new customer with domain types
#[derive(Debug)]
pub struct RegisterCustomerCommand {
    pub name: String,
    pub email: EmailAddress,
    pub password: String,
    pub age: Age,
    pub gender: Gender,
}

/// Command to update an existing customer.
///
/// `None` means "leave unchanged". Password and gender are not updatable.
#[derive(Debug, Default)]
pub struct UpdateCustomerCommand {
    pub name: Option<String>,
    pub email: Option<EmailAddress>,
    pub age: Option<Age>,
}

/// Fields that actually differ from the stored record.
///
/// Built by the service from an [`UpdateCustomerCommand`]; repositories
/// write exactly the fields that are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub email: Option<EmailAddress>,
    pub age: Option<Age>,
}

impl CustomerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }

    /// Apply the staged fields to an in-memory record.
    pub fn apply_to(&self, customer: &mut Customer) {
        if let Some(name) = &self.name {
            customer.name = name.clone();
        }
        if let Some(email) = &self.email {
            customer.email = email.clone();
        }
        if let Some(age) = self.age {
            customer.age = age;
        }
    }
}

/// Command to log in with an email and plaintext password
#[derive(Debug)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// Successful login: a bearer token plus the authenticated customer.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub token: String,
    pub customer: Customer,
}
