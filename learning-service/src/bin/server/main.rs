use std::sync::Arc;

use auth::Authenticator;
use auth::AuthenticatorSettings;
use chrono::Duration;
use learning_service::access::ports::AccessServicePort;
use learning_service::access::service::AccessService;
use learning_service::access::tokens::TokenIssuer;
use learning_service::access::tokens::TokenSettings;
use learning_service::config::Config;
use learning_service::config::StorageBackend;
use learning_service::domain::clock::Clock;
use learning_service::domain::clock::SystemClock;
use learning_service::identity::ports::IdentityRepository;
use learning_service::identity::ports::IdentityServicePort;
use learning_service::identity::ports::Notifier;
use learning_service::identity::service::IdentityService;
use learning_service::inbound::http::router::create_router;
use learning_service::outbound::notifications::KafkaNotificationProducer;
use learning_service::outbound::notifications::LogNotifier;
use learning_service::repositories::InMemoryIdentityRepository;
use learning_service::repositories::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

type Services = (Arc<dyn AccessServicePort>, Arc<dyn IdentityServicePort>);

fn build_services<IR, N>(
    repository: Arc<IR>,
    notifier: Arc<N>,
    tokens: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
    reset_password_url: Url,
) -> Services
where
    IR: IdentityRepository,
    N: Notifier,
{
    let password_hasher = tokens.authenticator().password_hasher().clone();

    let access_service: Arc<dyn AccessServicePort> = Arc::new(AccessService::new(
        Arc::clone(&repository),
        Arc::clone(&notifier),
        tokens,
        reset_password_url,
    ));
    let identity_service: Arc<dyn IdentityServicePort> =
        Arc::new(IdentityService::new(repository, notifier, password_hasher, clock));

    (access_service, identity_service)
}

fn with_notifier<IR>(
    config: &Config,
    repository: Arc<IR>,
    tokens: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
    reset_password_url: Url,
) -> Result<Services, anyhow::Error>
where
    IR: IdentityRepository,
{
    match &config.kafka {
        Some(kafka) => {
            let producer = Arc::new(KafkaNotificationProducer::new(kafka)?);
            Ok(build_services(
                repository,
                producer,
                tokens,
                clock,
                reset_password_url,
            ))
        }
        None => {
            tracing::warn!("No kafka section configured, emails will only be logged");
            Ok(build_services(
                repository,
                Arc::new(LogNotifier),
                tokens,
                clock,
                reset_password_url,
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "learning_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "learning-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage = ?config.storage.backend,
        jwt_issuer = %config.jwt.issuer,
        jwt_audience = %config.jwt.audience,
        access_token_minutes = config.jwt.expires_in_minutes,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(AuthenticatorSettings {
        secret: config.jwt.secret.clone(),
        issuer: config.jwt.issuer.clone(),
        audience: config.jwt.audience.clone(),
        password_cost: config.password_cost(),
    })?);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let tokens = Arc::new(TokenIssuer::new(
        authenticator,
        Arc::clone(&clock),
        TokenSettings {
            access_token_lifetime: Duration::minutes(config.jwt.expires_in_minutes),
            access_leeway_seconds: config.jwt.leeway_seconds,
        },
    ));

    let reset_password_url = config.reset_password_url()?;

    let (access_service, identity_service) = match (&config.storage.backend, &config.database) {
        (StorageBackend::Postgres, Some(database)) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let repository = Arc::new(PostgresIdentityRepository::new(pg_pool));
            with_notifier(&config, repository, tokens, clock, reset_password_url)?
        }
        (StorageBackend::Postgres, None) => {
            anyhow::bail!("storage.backend is postgres but no database section is configured")
        }
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage, identities are lost on restart");
            let repository = Arc::new(InMemoryIdentityRepository::new());
            with_notifier(&config, repository, tokens, clock, reset_password_url)?
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(access_service, identity_service);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
