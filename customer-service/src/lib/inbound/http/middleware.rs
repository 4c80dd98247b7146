use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::customer::models::CustomerId;
use crate::domain::customer::ports::CustomerServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity resolved from a valid bearer token, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCustomer {
    pub id: CustomerId,
    pub username: String,
    pub roles: Vec<String>,
}

/// Routes reachable without an identity, matched on method and exact path.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    open_routes: Vec<(Method, String)>,
}

impl AccessPolicy {
    pub fn new(open_routes: Vec<(Method, String)>) -> Self {
        Self { open_routes }
    }

    pub fn permits_anonymous(&self, method: &Method, path: &str) -> bool {
        self.open_routes
            .iter()
            .any(|(open_method, open_path)| open_method == method && open_path == path)
    }
}

impl Default for AccessPolicy {
    /// Registration, login and the health probe.
    fn default() -> Self {
        Self::new(vec![
            (Method::POST, "/api/v1/customers".to_string()),
            (Method::POST, "/api/v1/auth/login".to_string()),
            (Method::GET, "/actuator/health".to_string()),
        ])
    }
}

/// Middleware that resolves the caller from the `Authorization` header and
/// enforces the access policy.
///
/// An unreadable token is not rejected here: the request simply carries no
/// identity, and only routes outside the allow-list turn that into a 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req).map(str::to_string);
    let identity = match token {
        Some(token) => resolve_identity(&state, &token).await?,
        None => None,
    };

    match identity {
        Some(customer) => {
            req.extensions_mut().insert(customer);
        }
        None if state
            .access_policy
            .permits_anonymous(req.method(), req.uri().path()) => {}
        None => {
            tracing::debug!(
                method = %req.method(),
                path = %req.uri().path(),
                "Rejected anonymous request"
            );
            return Err(ApiError::Unauthorized(
                "Full authentication is required to access this resource".to_string(),
            ));
        }
    }

    Ok(next.run(req).await)
}

async fn resolve_identity(
    state: &AppState,
    token: &str,
) -> Result<Option<AuthenticatedCustomer>, ApiError> {
    let token_service = state.authenticator.token_service();

    let subject = match token_service.subject_of(token) {
        Ok(subject) => subject,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unreadable bearer token");
            return Ok(None);
        }
    };

    let Some(customer) = state.customer_service.find_by_username(&subject).await? else {
        tracing::debug!("Bearer token names an unknown customer");
        return Ok(None);
    };

    if !token_service.is_valid(token, customer.username()) {
        tracing::debug!(customer_id = %customer.id, "Bearer token expired");
        return Ok(None);
    }

    Ok(Some(AuthenticatedCustomer {
        id: customer.id,
        username: customer.username().to_string(),
        roles: customer.roles(),
    }))
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    use super::*;

    #[test]
    fn test_default_policy_is_method_specific() {
        let policy = AccessPolicy::default();

        assert!(policy.permits_anonymous(&Method::POST, "/api/v1/customers"));
        assert!(policy.permits_anonymous(&Method::POST, "/api/v1/auth/login"));
        assert!(policy.permits_anonymous(&Method::GET, "/actuator/health"));

        assert!(!policy.permits_anonymous(&Method::GET, "/api/v1/customers"));
        assert!(!policy.permits_anonymous(&Method::DELETE, "/api/v1/customers/1"));
        assert!(!policy.permits_anonymous(&Method::POST, "/api/v1/customers/1"));
    }

    #[test]
    fn test_bearer_token_requires_prefix() {
        let req = HttpRequest::builder()
            .header(http::header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req), Some("abc.def.ghi"));

        let req = HttpRequest::builder()
            .header(http::header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&req), None);

        let req = HttpRequest::builder().body(Body::empty()).unwrap();
        assert_eq!(bearer_token(&req), None);
    }
}
