use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::customer::errors::CustomerError;
use crate::customer::ports::CustomerServicePort;
use crate::domain::customer::models::Age;
use crate::domain::customer::models::CustomerId;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::UpdateCustomerCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::middleware::AuthenticatedCustomer;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a customer (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
}

impl UpdateCustomerRequest {
    fn try_into_command(self) -> Result<UpdateCustomerCommand, CustomerError> {
        let email = self.email.map(EmailAddress::new).transpose()?;

        let age = self.age.map(Age::new).transpose()?;

        Ok(UpdateCustomerCommand {
            name: self.name,
            email,
            age,
        })
    }
}

pub async fn update_customer(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
    req: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = req?;
    let customer_id = CustomerId::from_string(&id).map_err(CustomerError::from)?;
    let command = req.try_into_command()?;

    tracing::debug!(customer_id = %customer_id, caller = %caller.username, "Updating customer");

    state
        .customer_service
        .update_customer(&customer_id, command)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::OK)
}
