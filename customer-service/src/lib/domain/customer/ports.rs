use async_trait::async_trait;

use crate::domain::customer::models::Authenticated;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerChanges;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::LoginCommand;
use crate::domain::customer::models::NewCustomer;
use crate::domain::customer::models::RegisterCustomerCommand;
use crate::domain::customer::models::UpdateCustomerCommand;
use crate::customer::errors::CustomerError;

/// Port for customer domain service operations.
#[async_trait]
pub trait CustomerServicePort: Send + Sync + 'static {
    /// Retrieve every customer.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_customers(&self) -> Result<Vec<Customer>, CustomerError>;

    /// Retrieve customer by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_customer(&self, id: &CustomerId) -> Result<Customer, CustomerError>;

    /// Retrieve customer by username (email), if any.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, CustomerError>;

    /// Register a new customer, hashing the password.
    ///
    /// # Errors
    /// * `DuplicateResource` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register_customer(
        &self,
        command: RegisterCustomerCommand,
    ) -> Result<Customer, CustomerError>;

    /// Apply the fields of `command` that differ from the stored record.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `DuplicateResource` - New email belongs to another customer
    /// * `Validation` - Nothing differs from the stored record
    /// * `DatabaseError` - Database operation failed
    async fn update_customer(
        &self,
        id: &CustomerId,
        command: UpdateCustomerCommand,
    ) -> Result<Customer, CustomerError>;

    /// Delete existing customer.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_customer(&self, id: &CustomerId) -> Result<(), CustomerError>;
}

/// Port for credential-based login.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Verify an email/password pair and issue a bearer token.
    ///
    /// # Errors
    /// * `Authentication` - Unknown email, wrong password or unreadable
    ///   stored hash (indistinguishable)
    /// * `Token` - Token generation failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<Authenticated, CustomerError>;
}

/// Persistence operations for the customer aggregate.
///
/// Two implementations exist, hand-written SQL and an ORM mapping; they are
/// interchangeable and chosen when the service is wired up.
#[async_trait]
pub trait CustomerRepository: Send + Sync + 'static {
    /// Retrieve all customers.
    async fn list_all(&self) -> Result<Vec<Customer>, CustomerError>;

    /// Retrieve customer by identifier, `None` if absent.
    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, CustomerError>;

    /// Retrieve customer by email, `None` if absent.
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError>;

    async fn exists_by_id(&self, id: &CustomerId) -> Result<bool, CustomerError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, CustomerError>;

    /// Persist a new customer and return it with its assigned id.
    ///
    /// # Errors
    /// * `DuplicateResource` - Email unique constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, customer: NewCustomer) -> Result<Customer, CustomerError>;

    /// Write exactly the fields set in `changes`.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `DuplicateResource` - Email unique constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, id: &CustomerId, changes: &CustomerChanges)
        -> Result<(), CustomerError>;

    /// Remove customer from storage.
    ///
    /// # Errors
    /// * `NotFound` - Customer does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &CustomerId) -> Result<(), CustomerError>;
}

#[cfg(test)]
mockall::mock! {
    pub TestCustomerRepository {}

    #[async_trait]
    impl CustomerRepository for TestCustomerRepository {
        async fn list_all(&self) -> Result<Vec<Customer>, CustomerError>;
        async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, CustomerError>;
        async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError>;
        async fn exists_by_id(&self, id: &CustomerId) -> Result<bool, CustomerError>;
        async fn exists_by_email(&self, email: &str) -> Result<bool, CustomerError>;
        async fn create(&self, customer: NewCustomer) -> Result<Customer, CustomerError>;
        async fn update(&self, id: &CustomerId, changes: &CustomerChanges) -> Result<(), CustomerError>;
        async fn delete(&self, id: &CustomerId) -> Result<(), CustomerError>;
    }
}
