use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::WithToken;
use crate::customer::errors::CustomerError;
use crate::domain::customer::models::Age;
use crate::domain::customer::models::EmailAddress;
use crate::domain::customer::models::Gender;
use crate::domain::customer::models::RegisterCustomerCommand;
use crate::domain::customer::ports::CustomerServicePort;
use crate::inbound::http::router::AppState;

/// Register a customer and answer with a bearer token for them, so the
/// client is signed in straight away.
pub async fn register_customer(
    State(state): State<AppState>,
    body: Result<Json<RegisterCustomerRequest>, JsonRejection>,
) -> Result<WithToken<StatusCode>, ApiError> {
    let Json(body) = body?;
    let customer = state
        .customer_service
        .register_customer(body.try_into_command()?)
        .await?;

    let token = state
        .authenticator
        .issue_token(customer.username(), &customer.roles())
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    Ok(WithToken(token, StatusCode::OK))
}

/// HTTP request body for registering a customer (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterCustomerRequest {
    name: String,
    email: String,
    password: String,
    age: i32,
    #[serde(default)]
    gender: Gender,
}

impl RegisterCustomerRequest {
    fn try_into_command(self) -> Result<RegisterCustomerCommand, CustomerError> {
        Ok(RegisterCustomerCommand {
            name: self.name,
            email: EmailAddress::new(self.email)?,
            password: self.password,
            age: Age::new(self.age)?,
            gender: self.gender,
        })
    }
}
