use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::customer::errors::CustomerError;
use crate::customer::ports::CustomerServicePort;
use crate::domain::customer::models::CustomerId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::middleware::AuthenticatedCustomer;
use crate::inbound::http::router::AppState;

pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedCustomer>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let customer_id = CustomerId::from_string(&id).map_err(CustomerError::from)?;

    tracing::debug!(customer_id = %customer_id, caller = %caller.username, "Deleting customer");

    state
        .customer_service
        .delete_customer(&customer_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::OK)
}
