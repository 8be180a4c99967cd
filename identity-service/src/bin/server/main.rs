use std::sync::Arc;

use anyhow::Context;
use auth::JwtHandler;
use auth::PasswordHasher;
use axum::Router;
use identity_service::config::Config;
use identity_service::config::DatabaseBackend;
use identity_service::config::JwtConfig;
use identity_service::domain::authentication::service::AuthService;
use identity_service::domain::user::ports::UserRepository;
use identity_service::domain::user::service::UserService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryUserRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use identity_service::outbound::security::Argon2CredentialHasher;
use identity_service::outbound::security::JwtTokenIssuer;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        jwt_issuer = %config.jwt.issuer,
        "Configuration loaded"
    );

    let jwt_handler = Arc::new(build_jwt_handler(&config.jwt)?);
    tracing::info!(algorithm = ?jwt_handler.algorithm(), "Token signing configured");

    let hasher = Arc::new(Argon2CredentialHasher::new(PasswordHasher::with_params(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?));

    let http_application = match config.database.backend {
        DatabaseBackend::Postgres => {
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

            build_application(
                Arc::new(PostgresUserRepository::new(pg_pool)),
                hasher,
                jwt_handler,
                &config.jwt.issuer,
            )
        }
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory user storage; data is lost on exit");
            build_application(
                Arc::new(InMemoryUserRepository::new()),
                hasher,
                jwt_handler,
                &config.jwt.issuer,
            )
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

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

/// Wire both services over one repository and expose them over HTTP.
fn build_application<UR: UserRepository>(
    repository: Arc<UR>,
    hasher: Arc<Argon2CredentialHasher>,
    jwt_handler: Arc<JwtHandler>,
    issuer: &str,
) -> Router {
    let token_issuer = Arc::new(JwtTokenIssuer::new(Arc::clone(&jwt_handler), issuer));

    let user_service = Arc::new(UserService::new(Arc::clone(&repository), Arc::clone(&hasher)));
    let auth_service = Arc::new(AuthService::new(repository, hasher, token_issuer));

    create_router(user_service, auth_service, jwt_handler)
}

/// RS256 when both key paths are configured, HS256 from the shared secret otherwise.
fn build_jwt_handler(config: &JwtConfig) -> Result<JwtHandler, anyhow::Error> {
    let handler = match (&config.private_key_path, &config.public_key_path, &config.secret) {
        (Some(private_path), Some(public_path), _) => {
            let private_pem = std::fs::read(private_path)
                .with_context(|| format!("reading JWT private key {private_path}"))?;
            let public_pem = std::fs::read(public_path)
                .with_context(|| format!("reading JWT public key {public_path}"))?;
            JwtHandler::from_rsa_pem(&private_pem, &public_pem)?
        }
        (None, None, Some(secret)) if !secret.is_empty() => JwtHandler::new(secret.as_bytes()),
        _ => anyhow::bail!(
            "jwt configuration needs either a secret or both private_key_path and public_key_path"
        ),
    };

    Ok(handler.with_issuer(&config.issuer))
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
