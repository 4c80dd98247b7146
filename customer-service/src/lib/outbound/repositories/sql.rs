use async_trait::async_trait;
use sqlx::PgPool;

use crate::customer::errors::CustomerError;
use crate::domain::customer::models::Age;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerChanges;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::Gender;
use crate::domain::customer::models::NewCustomer;
use crate::domain::customer::ports::CustomerRepository;

const EMAIL_CONSTRAINT: &str = "customer_email_unique";

/// Customer store backed by hand-written, parameterized SQL.
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRecord {
    id: i32,
    name: String,
    email: String,
    password: String,
    age: i32,
    gender: String,
}

impl TryFrom<CustomerRecord> for Customer {
    type Error = CustomerError;

    fn try_from(r: CustomerRecord) -> Result<Self, Self::Error> {
        Ok(Customer {
            id: CustomerId(r.id),
            name: r.name,
            email: EmailAddress::new(r.email)?,
            password_hash: r.password,
            age: Age::new(r.age)?,
            gender: r.gender.parse::<Gender>()?,
        })
    }
}

fn write_error(e: sqlx::Error) -> CustomerError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_CONSTRAINT) {
            return CustomerError::email_taken();
        }
    }
    CustomerError::DatabaseError(e.to_string())
}

fn read_error(e: sqlx::Error) -> CustomerError {
    CustomerError::DatabaseError(e.to_string())
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn list_all(&self) -> Result<Vec<Customer>, CustomerError> {
        let rows = sqlx::query_as::<_, CustomerRecord>(
            r#"
            SELECT id, name, email, password, age, gender
            FROM customer
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(read_error)?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, CustomerError> {
        sqlx::query_as::<_, CustomerRecord>(
            r#"
            SELECT id, name, email, password, age, gender
            FROM customer
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?
        .map(Customer::try_from)
        .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
        sqlx::query_as::<_, CustomerRecord>(
            r#"
            SELECT id, name, email, password, age, gender
            FROM customer
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(read_error)?
        .map(Customer::try_from)
        .transpose()
    }

    async fn exists_by_id(&self, id: &CustomerId) -> Result<bool, CustomerError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM customer WHERE id = $1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(read_error)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, CustomerError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM customer WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(read_error)
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, CustomerError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO customer (name, email, password, age, gender)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&customer.name)
        .bind(customer.email.as_str())
        .bind(&customer.password_hash)
        .bind(customer.age.value())
        .bind(customer.gender.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(Customer {
            id: CustomerId(id),
            name: customer.name,
            email: customer.email,
            password_hash: customer.password_hash,
            age: customer.age,
            gender: customer.gender,
        })
    }

    async fn update(
        &self,
        id: &CustomerId,
        changes: &CustomerChanges,
    ) -> Result<(), CustomerError> {
        // NULL parameters leave the column as it is.
        let result = sqlx::query(
            r#"
            UPDATE customer
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                age = COALESCE($4, age)
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_ref().map(EmailAddress::as_str))
        .bind(changes.age.map(|age| age.value()))
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        if result.rows_affected() == 0 {
            return Err(CustomerError::not_found(id));
        }

        Ok(())
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), CustomerError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(read_error)?;

        if result.rows_affected() == 0 {
            return Err(CustomerError::not_found(id));
        }

        Ok(())
    }
}
