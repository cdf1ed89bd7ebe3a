use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::notifier::SmtpMailer;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::user::ports::AuthServicePort;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        smtp_host = %config.email.smtp_host,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(max_connections = 5, "Database connection pool created");

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!("Database migrations completed");

    let repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let notifier = Arc::new(SmtpMailer::new(&config.email)?);

    let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
        repository,
        notifier,
        config.jwt.secret.as_bytes(),
        Duration::hours(config.jwt.expiration_hours),
        config.email.reset_url_base.clone(),
    ));

    let application = create_router(auth_service, config.jwt.cookie_expiration_days);

    let address = format!("0.0.0.0:{}", config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Http server listening");

    axum::serve(listener, application).await?;

    Ok(())
}
