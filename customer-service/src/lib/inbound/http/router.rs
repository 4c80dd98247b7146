use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowMethods;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::cors::ExposeHeaders;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::delete_customer::delete_customer;
use super::handlers::get_customer::get_customer;
use super::handlers::health::health;
use super::handlers::list_customers::list_customers;
use super::handlers::login::login;
use super::handlers::register_customer::register_customer;
use super::handlers::translate_errors;
use super::handlers::update_customer::update_customer;
use super::middleware::authenticate as auth_middleware;
use super::middleware::AccessPolicy;
use crate::config::CorsConfig;
use crate::domain::customer::ports::AuthenticationServicePort;
use crate::domain::customer::ports::CustomerServicePort;

const WILDCARD: &str = "*";

#[derive(Clone)]
pub struct AppState {
    pub customer_service: Arc<dyn CustomerServicePort>,
    pub authentication_service: Arc<dyn AuthenticationServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub access_policy: Arc<AccessPolicy>,
}

pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    let customer_routes = Router::new()
        .route(
            "/api/v1/customers",
            get(list_customers).post(register_customer),
        )
        .route(
            "/api/v1/customers/:customer_id",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        );

    let auth_routes = Router::new().route("/api/v1/auth/login", post(login));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // Access filtering covers every route, including unmatched paths.
    Router::new()
        .merge(customer_routes)
        .merge(auth_routes)
        .route("/actuator/health", get(health))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(middleware::from_fn(translate_errors))
        .layer(trace_layer)
        .layer(cors_layer(cors))
        .with_state(state)
}

/// Build the CORS layer from comma-separated configuration lists, where `*`
/// stands for "any". Entries that are not valid header values are skipped.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = config.allowed_origins();
    let allow_origin = if is_wildcard(&origins) {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parse_all::<HeaderValue>(&origins))
    };

    let methods = config.allowed_methods();
    let allow_methods = if is_wildcard(&methods) {
        AllowMethods::any()
    } else {
        AllowMethods::list(parse_all::<Method>(&methods))
    };

    let headers = config.allowed_headers();
    let allow_headers = if is_wildcard(&headers) {
        AllowHeaders::any()
    } else {
        AllowHeaders::list(parse_all::<HeaderName>(&headers))
    };

    let exposed = config.exposed_headers();
    let expose_headers = if is_wildcard(&exposed) {
        ExposeHeaders::any()
    } else {
        ExposeHeaders::list(parse_all::<HeaderName>(&exposed))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(allow_methods)
        .allow_headers(allow_headers)
        .expose_headers(expose_headers)
}

fn is_wildcard(items: &[String]) -> bool {
    items.iter().any(|item| item == WILDCARD)
}

fn parse_all<T: std::str::FromStr>(items: &[String]) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match item.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(entry = %item, "Ignoring invalid CORS entry");
                None
            }
        })
        .collect()
}
