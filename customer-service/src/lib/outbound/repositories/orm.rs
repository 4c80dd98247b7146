//! Customer store using the Diesel query builder.
//!
//! Rows map onto the `customer` table through derived `Queryable`,
//! `Insertable` and `AsChangeset` structs; connections come from a
//! deadpool-managed `diesel-async` pool.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::result::Error as DieselError;
use diesel_async::pooled_connection::deadpool::Object;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::AsyncPgConnection;
use diesel_async::RunQueryDsl;

use super::schema::customer;
use crate::customer::errors::CustomerError;
use crate::domain::customer::models::Age;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::CustomerChanges;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::Gender;
use crate::domain::customer::models::NewCustomer;
use crate::domain::customer::ports::CustomerRepository;

pub type DbPool = Pool<AsyncPgConnection>;

pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<Object<AsyncPgConnection>, CustomerError> {
        self.pool
            .get()
            .await
            .map_err(|e| CustomerError::DatabaseError(format!("Connection pool: {}", e)))
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = customer)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct CustomerRow {
    id: i32,
    name: String,
    email: String,
    password: String,
    age: i32,
    gender: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = CustomerError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        Ok(Customer {
            id: CustomerId(row.id),
            name: row.name,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password,
            age: Age::new(row.age)?,
            gender: row.gender.parse::<Gender>()?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = customer)]
struct NewCustomerRow<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    age: i32,
    gender: &'a str,
}

impl<'a> From<&'a NewCustomer> for NewCustomerRow<'a> {
    fn from(customer: &'a NewCustomer) -> Self {
        Self {
            name: &customer.name,
            email: customer.email.as_str(),
            password: &customer.password_hash,
            age: customer.age.value(),
            gender: customer.gender.as_str(),
        }
    }
}

/// `None` fields are left out of the generated `SET` clause.
#[derive(AsChangeset)]
#[diesel(table_name = customer)]
struct CustomerChangeset<'a> {
    name: Option<&'a str>,
    email: Option<&'a str>,
    age: Option<i32>,
}

impl<'a> From<&'a CustomerChanges> for CustomerChangeset<'a> {
    fn from(changes: &'a CustomerChanges) -> Self {
        Self {
            name: changes.name.as_deref(),
            email: changes.email.as_ref().map(EmailAddress::as_str),
            age: changes.age.map(|age| age.value()),
        }
    }
}

fn query_error(e: DieselError) -> CustomerError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CustomerError::email_taken()
        }
        other => CustomerError::DatabaseError(other.to_string()),
    }
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn list_all(&self) -> Result<Vec<Customer>, CustomerError> {
        let mut conn = self.connection().await?;

        customer::table
            .order(customer::id.asc())
            .select(CustomerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(query_error)?
            .into_iter()
            .map(Customer::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, CustomerError> {
        let mut conn = self.connection().await?;

        customer::table
            .find(id.0)
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?
            .map(Customer::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
        let mut conn = self.connection().await?;

        customer::table
            .filter(customer::email.eq(email))
            .select(CustomerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(query_error)?
            .map(Customer::try_from)
            .transpose()
    }

    async fn exists_by_id(&self, id: &CustomerId) -> Result<bool, CustomerError> {
        let mut conn = self.connection().await?;

        diesel::select(diesel::dsl::exists(customer::table.find(id.0)))
            .get_result(&mut conn)
            .await
            .map_err(query_error)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, CustomerError> {
        let mut conn = self.connection().await?;

        diesel::select(diesel::dsl::exists(
            customer::table.filter(customer::email.eq(email)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(query_error)
    }

    async fn create(&self, new_customer: NewCustomer) -> Result<Customer, CustomerError> {
        let mut conn = self.connection().await?;

        let id: i32 = diesel::insert_into(customer::table)
            .values(NewCustomerRow::from(&new_customer))
            .returning(customer::id)
            .get_result(&mut conn)
            .await
            .map_err(query_error)?;

        Ok(Customer {
            id: CustomerId(id),
            name: new_customer.name,
            email: new_customer.email,
            password_hash: new_customer.password_hash,
            age: new_customer.age,
            gender: new_customer.gender,
        })
    }

    async fn update(
        &self,
        id: &CustomerId,
        changes: &CustomerChanges,
    ) -> Result<(), CustomerError> {
        let mut conn = self.connection().await?;

        let affected = diesel::update(customer::table.find(id.0))
            .set(CustomerChangeset::from(changes))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;

        if affected == 0 {
            return Err(CustomerError::not_found(id));
        }

        Ok(())
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), CustomerError> {
        let mut conn = self.connection().await?;

        let affected = diesel::delete(customer::table.find(id.0))
            .execute(&mut conn)
            .await
            .map_err(query_error)?;

        if affected == 0 {
            return Err(CustomerError::not_found(id));
        }

        Ok(())
    }
}
