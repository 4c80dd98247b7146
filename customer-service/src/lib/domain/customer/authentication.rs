use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::customer::errors::CustomerError;
use crate::customer::ports::AuthenticationServicePort;
use crate::customer::ports::CustomerRepository;
use crate::domain::customer::models::Authenticated;
use crate::domain::customer::models::LoginCommand;

/// Login flow: resolve the customer by email, verify the password, issue a
/// token carrying the customer's roles.
pub struct AuthenticationService<CR>
where
    CR: CustomerRepository,
{
    repository: Arc<CR>,
    authenticator: Arc<Authenticator>,
}

impl<CR> AuthenticationService<CR>
where
    CR: CustomerRepository,
{
    pub fn new(repository: Arc<CR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<CR> AuthenticationServicePort for AuthenticationService<CR>
where
    CR: CustomerRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<Authenticated, CustomerError> {
        let Some(customer) = self.repository.find_by_email(&command.username).await? else {
            tracing::debug!("Login attempt for unknown username");
            self.authenticator.reject_unknown(&command.password);
            return Err(CustomerError::bad_credentials());
        };

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                &customer.password_hash,
                customer.username(),
                &customer.roles(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::debug!(customer_id = %customer.id, "Login attempt with wrong password");
                    CustomerError::bad_credentials()
                }
                AuthenticationError::PasswordError(err) => {
                    tracing::error!(customer_id = %customer.id, error = %err, "Stored password hash is unreadable");
                    CustomerError::bad_credentials()
                }
                AuthenticationError::JwtError(err) => CustomerError::Token(err.to_string()),
            })?;

        tracing::info!(customer_id = %customer.id, "Customer logged in");

        Ok(Authenticated {
            token: result.access_token,
            customer,
        })
    }
}

#[cfg(test)]
mod tests {
    use auth::PasswordEncoder;
    use auth::PasswordError;
    use auth::TokenService;

    use super::*;
    use crate::customer::ports::MockTestCustomerRepository;
    use crate::domain::customer::models::Age;
    use crate::domain::customer::models::Customer;
    use crate::domain::customer::models::CustomerId;
    use crate::domain::customer::models::EmailAddress;
    use crate::domain::customer::models::Gender;
    use crate::domain::customer::models::ROLE_USER;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    mockall::mock! {
        pub Encoder {}

        impl PasswordEncoder for Encoder {
            fn hash(&self, password: &str) -> Result<String, PasswordError>;
            fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError>;
        }
    }

    fn stored_jill(authenticator: &Authenticator) -> Customer {
        Customer {
            id: CustomerId(7),
            name: "Jill".to_string(),
            email: EmailAddress::new("jill@x.com".to_string()).unwrap(),
            password_hash: authenticator.password_encoder().hash("password").unwrap(),
            age: Age::new(25).unwrap(),
            gender: Gender::Female,
        }
    }

    fn login(username: &str, password: &str) -> LoginCommand {
        LoginCommand {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let authenticator = Arc::new(Authenticator::new(SECRET));
        let customer = stored_jill(&authenticator);

        let mut repository = MockTestCustomerRepository::new();
        repository
            .expect_find_by_email()
            .withf(|email| email == "jill@x.com")
            .times(1)
            .returning(move |_| Ok(Some(customer.clone())));

        let service = AuthenticationService::new(Arc::new(repository), Arc::clone(&authenticator));

        let authenticated = service.login(login("jill@x.com", "password")).await.unwrap();

        let tokens = authenticator.token_service();
        assert!(tokens.is_valid(&authenticated.token, "jill@x.com"));
        assert_eq!(
            tokens.claims_of(&authenticated.token).unwrap().scopes,
            vec![ROLE_USER.to_string()]
        );
        assert_eq!(authenticated.customer.id, CustomerId(7));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let authenticator = Arc::new(Authenticator::new(SECRET));
        let customer = stored_jill(&authenticator);

        let mut repository = MockTestCustomerRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(customer.clone())));

        let service = AuthenticationService::new(Arc::new(repository), authenticator);

        let result = service.login(login("jill@x.com", "wrong")).await;

        match result {
            Err(CustomerError::Authentication(message)) => assert_eq!(message, "Bad credentials"),
            other => panic!("expected Authentication, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_username_is_indistinguishable() {
        let authenticator = Arc::new(Authenticator::new(SECRET));

        let mut repository = MockTestCustomerRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthenticationService::new(Arc::new(repository), authenticator);

        let result = service.login(login("nobody@x.com", "password")).await;

        match result {
            Err(CustomerError::Authentication(message)) => assert_eq!(message, "Bad credentials"),
            other => panic!("expected Authentication, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_store_failure_propagates() {
        let authenticator = Arc::new(Authenticator::new(SECRET));

        let mut repository = MockTestCustomerRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(CustomerError::DatabaseError("connection reset".to_string())));

        let service = AuthenticationService::new(Arc::new(repository), authenticator);

        let result = service.login(login("jill@x.com", "password")).await;
        assert!(matches!(result, Err(CustomerError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_username_still_verifies_a_password() {
        let mut encoder = MockEncoder::new();
        encoder
            .expect_verify()
            .withf(|password, digest| password == "password" && digest == auth::DECOY_DIGEST)
            .times(1)
            .returning(|_, _| Ok(false));
        let authenticator = Arc::new(Authenticator::with_parts(
            Arc::new(encoder),
            Arc::new(TokenService::new(SECRET)),
        ));

        let mut repository = MockTestCustomerRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthenticationService::new(Arc::new(repository), authenticator);

        let result = service.login(login("nobody@x.com", "password")).await;
        assert!(matches!(result, Err(CustomerError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_login_unreadable_stored_hash_is_bad_credentials() {
        let authenticator = Arc::new(Authenticator::new(SECRET));
        let mut customer = stored_jill(&authenticator);
        customer.password_hash = "not-a-phc-string".to_string();

        let mut repository = MockTestCustomerRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(customer.clone())));

        let service = AuthenticationService::new(Arc::new(repository), authenticator);

        let result = service.login(login("jill@x.com", "password")).await;

        match result {
            Err(CustomerError::Authentication(message)) => assert_eq!(message, "Bad credentials"),
            other => panic!("expected Authentication, got {:?}", other),
        }
    }
}
