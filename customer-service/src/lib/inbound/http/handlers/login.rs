use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::CustomerData;
use super::WithToken;
use crate::customer::errors::CustomerError;
use crate::domain::customer::models::LoginCommand;
use crate::domain::customer::ports::AuthenticationServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<WithToken<ApiSuccess<LoginResponseData>>, ApiError> {
    // A well-formed body missing a credential is a failed login, not bad input.
    let Json(body) = body.map_err(|rejection| match rejection {
        JsonRejection::JsonDataError(_) => ApiError::from(CustomerError::bad_credentials()),
        other => ApiError::from(other),
    })?;

    let authenticated = state
        .authentication_service
        .login(LoginCommand {
            username: body.username,
            password: body.password,
        })
        .await?;

    let data = LoginResponseData {
        token: authenticated.token.clone(),
        customer: (&authenticated.customer).into(),
    };

    Ok(WithToken(
        authenticated.token,
        ApiSuccess::new(StatusCode::OK, data),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub customer: CustomerData,
}
