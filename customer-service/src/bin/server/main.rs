use std::sync::Arc;

use auth::Authenticator;
use customer_service::config::Config;
use customer_service::config::DataAccess;
use customer_service::domain::customer::authentication::AuthenticationService;
use customer_service::domain::customer::ports::AuthenticationServicePort;
use customer_service::domain::customer::ports::CustomerRepository;
use customer_service::domain::customer::ports::CustomerServicePort;
use customer_service::domain::customer::service::CustomerService;
use customer_service::inbound::http::middleware::AccessPolicy;
use customer_service::inbound::http::router::create_router;
use customer_service::inbound::http::router::AppState;
use customer_service::outbound::repositories::DieselCustomerRepository;
use customer_service::outbound::repositories::PostgresCustomerRepository;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type Services = (
    Arc<dyn CustomerServicePort>,
    Arc<dyn AuthenticationServicePort>,
);

fn services<CR: CustomerRepository>(
    repository: Arc<CR>,
    authenticator: &Arc<Authenticator>,
) -> Services {
    let customer_service: Arc<dyn CustomerServicePort> = Arc::new(CustomerService::new(
        Arc::clone(&repository),
        authenticator.password_encoder(),
    ));
    let authentication_service: Arc<dyn AuthenticationServicePort> = Arc::new(
        AuthenticationService::new(repository, Arc::clone(authenticator)),
    );

    (customer_service, authentication_service)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "customer_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "customer-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        data_access = ?config.database.access,
        max_connections = config.database.max_connections,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));

    let (customer_service, authentication_service) = match config.database.access {
        DataAccess::Sql => services(
            Arc::new(PostgresCustomerRepository::new(pg_pool)),
            &authenticator,
        ),
        DataAccess::Orm => {
            // Migrations are done; the diesel pool takes over all queries.
            pg_pool.close().await;

            let manager =
                AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database.url);
            let diesel_pool = Pool::builder(manager)
                .max_size(config.database.max_connections as usize)
                .build()?;
            services(
                Arc::new(DieselCustomerRepository::new(diesel_pool)),
                &authenticator,
            )
        }
    };
    tracing::info!(data_access = ?config.database.access, "Customer repository ready");

    let state = AppState {
        customer_service,
        authentication_service,
        authenticator,
        access_policy: Arc::new(AccessPolicy::default()),
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, &config.cors);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
