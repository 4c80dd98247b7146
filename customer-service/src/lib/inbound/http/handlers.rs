use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::Request;
use axum::http::header;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::customer::errors::CustomerError;
use crate::domain::customer::models::Customer;
use crate::domain::customer::models::Gender;

pub mod delete_customer;
pub mod get_customer;
pub mod health;
pub mod list_customers;
pub mod login;
pub mod register_customer;
pub mod update_customer;

/// Upper bound when re-reading a framework-generated error body.
const ERROR_BODY_LIMIT: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Wraps a response and hands the freshly issued bearer token back in the
/// `Authorization` header.
#[derive(Debug, Clone)]
pub struct WithToken<R>(pub String, pub R);

impl<R: IntoResponse> IntoResponse for WithToken<R> {
    fn into_response(self) -> Response {
        ([(header::AUTHORIZATION, self.0)], self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn into_message(self) -> String {
        match self {
            ApiError::InternalServerError(msg)
            | ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg) => msg,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

/// Message carried from a failed handler to [`translate_errors`], which
/// knows the request path and renders the final body.
#[derive(Debug, Clone)]
struct ErrorDetail(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        }

        let mut response = status.into_response();
        response
            .extensions_mut()
            .insert(ErrorDetail(self.into_message()));
        response
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CustomerError::DuplicateResource(_) | CustomerError::Validation(_) => {
                ApiError::BadRequest(err.to_string())
            }
            CustomerError::Authentication(_) => ApiError::Unauthorized(err.to_string()),
            CustomerError::InvalidCustomerId(_)
            | CustomerError::InvalidEmail(_)
            | CustomerError::InvalidAge(_)
            | CustomerError::InvalidGender(_) => ApiError::BadRequest(err.to_string()),
            CustomerError::Password(_)
            | CustomerError::Token(_)
            | CustomerError::DatabaseError(_)
            | CustomerError::Unknown(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

/// Uniform error body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub path: String,
    pub message: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
}

/// Centralized error translator.
///
/// Every error response leaving the router, whether produced by a handler,
/// the access filter or an extractor rejection, is rewritten as an
/// [`ApiErrorBody`] naming the request path.
pub async fn translate_errors(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let message = match parts.extensions.remove::<ErrorDetail>() {
        Some(ErrorDetail(message)) => message,
        None => rejection_message(status, body).await,
    };

    let error = ApiErrorBody {
        path,
        message,
        status: status.as_u16(),
        timestamp: Utc::now(),
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    (parts, Json(error)).into_response()
}

async fn rejection_message(status: StatusCode, body: Body) -> String {
    let fallback = || status.canonical_reason().unwrap_or("Error").to_string();

    match axum::body::to_bytes(body, ERROR_BODY_LIMIT).await {
        Ok(bytes) if !bytes.is_empty() => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| fallback()),
        _ => fallback(),
    }
}

/// Public projection of a customer; never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerData {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub age: i32,
    pub roles: Vec<String>,
    pub username: String,
}

impl From<&Customer> for CustomerData {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id.0,
            name: customer.name.clone(),
            email: customer.email.as_str().to_string(),
            gender: customer.gender,
            age: customer.age.value(),
            roles: customer.roles(),
            username: customer.username().to_string(),
        }
    }
}
