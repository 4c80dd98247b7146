use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordEncoder;

use crate::customer::errors::CustomerError;
use crate::customer::ports::CustomerRepository;
use crate::customer::ports::CustomerServicePort;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerChanges;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::NewCustomer;
use crate::domain::customer::models::RegisterCustomerCommand;
use crate::domain::customer::models::UpdateCustomerCommand;

/// Domain service implementation for customer operations.
///
/// Concrete implementation of CustomerServicePort with dependency injection.
pub struct CustomerService<CR>
where
    CR: CustomerRepository,
{
    repository: Arc<CR>,
    password_encoder: Arc<dyn PasswordEncoder>,
}

impl<CR> CustomerService<CR>
where
    CR: CustomerRepository,
{
    /// Create a new customer service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Customer persistence implementation
    /// * `password_encoder` - Hashing used when registering customers
    pub fn new(repository: Arc<CR>, password_encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self {
            repository,
            password_encoder,
        }
    }

    /// Diff `command` against the stored record.
    ///
    /// A colliding email aborts the whole update before anything is written.
    async fn stage_changes(
        &self,
        customer: &Customer,
        command: UpdateCustomerCommand,
    ) -> Result<CustomerChanges, CustomerError> {
        let mut changes = CustomerChanges::default();

        if let Some(name) = command.name.filter(|name| *name != customer.name) {
            changes.name = Some(name);
        }

        if let Some(age) = command.age.filter(|age| *age != customer.age) {
            changes.age = Some(age);
        }

        if let Some(email) = command.email.filter(|email| *email != customer.email) {
            if self.repository.exists_by_email(email.as_str()).await? {
                return Err(CustomerError::email_taken());
            }
            changes.email = Some(email);
        }

        Ok(changes)
    }
}

#[async_trait]
impl<CR> CustomerServicePort for CustomerService<CR>
where
    CR: CustomerRepository,
{
    async fn list_customers(&self) -> Result<Vec<Customer>, CustomerError> {
        self.repository.list_all().await
    }

    async fn get_customer(&self, id: &CustomerId) -> Result<Customer, CustomerError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomerError::not_found(id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, CustomerError> {
        self.repository.find_by_email(username).await
    }

    async fn register_customer(
        &self,
        command: RegisterCustomerCommand,
    ) -> Result<Customer, CustomerError> {
        if self
            .repository
            .exists_by_email(command.email.as_str())
            .await?
        {
            return Err(CustomerError::email_taken());
        }

        let password_hash = self
            .password_encoder
            .hash(&command.password)
            .map_err(|e| CustomerError::Password(e.to_string()))?;

        let customer = self
            .repository
            .create(NewCustomer {
                name: command.name,
                email: command.email,
                password_hash,
                age: command.age,
                gender: command.gender,
            })
            .await?;

        tracing::info!(customer_id = %customer.id, "Customer registered");

        Ok(customer)
    }

    async fn update_customer(
        &self,
        id: &CustomerId,
        command: UpdateCustomerCommand,
    ) -> Result<Customer, CustomerError> {
        let mut customer = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CustomerError::not_found(id))?;

        let changes = self.stage_changes(&customer, command).await?;
        if changes.is_empty() {
            return Err(CustomerError::Validation("No data changes found".to_string()));
        }

        self.repository.update(id, &changes).await?;
        changes.apply_to(&mut customer);

        tracing::info!(
            customer_id = %id,
            name_changed = changes.name.is_some(),
            email_changed = changes.email.is_some(),
            age_changed = changes.age.is_some(),
            "Customer updated"
        );

        Ok(customer)
    }

    async fn delete_customer(&self, id: &CustomerId) -> Result<(), CustomerError> {
        if !self.repository.exists_by_id(id).await? {
            return Err(CustomerError::not_found(id));
        }

        self.repository.delete(id).await?;
        tracing::info!(customer_id = %id, "Customer deleted");

        Ok(())
    }
}
