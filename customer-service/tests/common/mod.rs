use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenService;
use customer_service::config::CorsConfig;
use customer_service::domain::customer::authentication::AuthenticationService;
use customer_service::domain::customer::errors::CustomerError;
use customer_service::domain::customer::models::Customer;
use customer_service::domain::customer::models::CustomerChanges;
use customer_service::domain::customer::models::CustomerId;
use customer_service::domain::customer::models::NewCustomer;
use customer_service::domain::customer::ports::CustomerRepository;
use customer_service::domain::customer::service::CustomerService;
use customer_service::inbound::http::middleware::AccessPolicy;
use customer_service::inbound::http::router::create_router;
use customer_service::inbound::http::router::AppState;
use serde_json::json;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Customer store kept in memory, honouring the same uniqueness rule as the
/// `customer_email_unique` constraint.
#[derive(Default)]
pub struct InMemoryCustomerRepository {
    state: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    next_id: i32,
    customers: Vec<Customer>,
}

impl InMemoryCustomerRepository {
    pub fn snapshot(&self) -> Vec<Customer> {
        self.state.lock().unwrap().customers.clone()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn list_all(&self) -> Result<Vec<Customer>, CustomerError> {
        Ok(self.snapshot())
    }

    async fn find_by_id(&self, id: &CustomerId) -> Result<Option<Customer>, CustomerError> {
        let store = self.state.lock().unwrap();
        Ok(store.customers.iter().find(|c| c.id == *id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
        let store = self.state.lock().unwrap();
        Ok(store
            .customers
            .iter()
            .find(|c| c.email.as_str() == email)
            .cloned())
    }

    async fn exists_by_id(&self, id: &CustomerId) -> Result<bool, CustomerError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, CustomerError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer, CustomerError> {
        let mut store = self.state.lock().unwrap();
        if store.customers.iter().any(|c| c.email == customer.email) {
            return Err(CustomerError::email_taken());
        }

        store.next_id += 1;
        let created = Customer {
            id: CustomerId(store.next_id),
            name: customer.name,
            email: customer.email,
            password_hash: customer.password_hash,
            age: customer.age,
            gender: customer.gender,
        };
        store.customers.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &CustomerId,
        changes: &CustomerChanges,
    ) -> Result<(), CustomerError> {
        let mut store = self.state.lock().unwrap();
        if let Some(email) = &changes.email {
            if store.customers.iter().any(|c| c.id != *id && &c.email == email) {
                return Err(CustomerError::email_taken());
            }
        }

        let customer = store
            .customers
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| CustomerError::not_found(id))?;
        changes.apply_to(customer);
        Ok(())
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), CustomerError> {
        let mut store = self.state.lock().unwrap();
        let before = store.customers.len();
        store.customers.retain(|c| c.id != *id);
        if store.customers.len() == before {
            return Err(CustomerError::not_found(id));
        }
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryCustomerRepository>,
    pub api_client: reqwest::Client,
    pub token_service: Arc<TokenService>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryCustomerRepository::default());
        let authenticator = Arc::new(Authenticator::new(JWT_SECRET));

        let state = AppState {
            customer_service: Arc::new(CustomerService::new(
                Arc::clone(&repository),
                authenticator.password_encoder(),
            )),
            authentication_service: Arc::new(AuthenticationService::new(
                Arc::clone(&repository),
                Arc::clone(&authenticator),
            )),
            authenticator: Arc::clone(&authenticator),
            access_policy: Arc::new(AccessPolicy::default()),
        };

        let cors = CorsConfig {
            allowed_origins: "http://localhost:3000".to_string(),
            allowed_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            allowed_headers: "*".to_string(),
            exposed_headers: "*".to_string(),
        };
        let router = create_router(state, &cors);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            token_service: authenticator.token_service(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(self.url(path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(self.url(path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.put(self.url(path)).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(self.url(path)).bearer_auth(token)
    }

    /// Register a customer and return the token from the `Authorization`
    /// response header.
    pub async fn register(&self, name: &str, email: &str, password: &str, age: i32) -> String {
        let response = self
            .post("/api/v1/customers")
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "age": age,
                "gender": "FEMALE"
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);

        response
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .expect("Missing Authorization header")
            .to_str()
            .unwrap()
            .to_string()
    }

    pub fn id_of(&self, email: &str) -> i32 {
        self.repository
            .snapshot()
            .into_iter()
            .find(|c| c.email.as_str() == email)
            .map(|c| c.id.0)
            .expect("Customer not stored")
    }
}
