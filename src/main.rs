//! AuthHub server — authentication and session management service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use authhub_core::config::AppConfig;
use authhub_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("AUTHHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AuthHub v{}", env!("CARGO_PKG_VERSION"));

    authhub_api::error::set_production_mode(config.server.production);

    // ── Step 1: Database connection + migrations ─────────────────
    let db = authhub_database::connection::DatabasePool::connect(&config.database).await?;
    let db_pool = db.into_pool();
    authhub_database::migration::run_migrations(&db_pool).await?;

    // ── Step 2: Repositories ─────────────────────────────────────
    let user_repo = Arc::new(authhub_database::repositories::user::UserRepository::new(
        db_pool.clone(),
    ));
    let role_repo = Arc::new(authhub_database::repositories::role::RoleRepository::new(
        db_pool.clone(),
    ));
    let session_repo = Arc::new(
        authhub_database::repositories::session::SessionRepository::new(db_pool.clone()),
    );

    // ── Step 3: Seed the role catalog ────────────────────────────
    role_repo.ensure_default_roles().await?;
    tracing::info!("Role catalog seeded");

    // ── Step 4: Auth system ──────────────────────────────────────
    let password_hasher = Arc::new(authhub_auth::password::hasher::PasswordHasher::new(
        &config.auth,
    )?);
    let password_validator = Arc::new(authhub_auth::password::validator::PasswordValidator::new(
        &config.auth,
    ));
    let jwt_encoder = Arc::new(authhub_auth::jwt::encoder::JwtEncoder::new(&config.auth)?);
    let jwt_decoder = Arc::new(authhub_auth::jwt::decoder::JwtDecoder::new(&config.auth));
    let session_store = Arc::new(authhub_auth::session::store::SessionStore::new(
        Arc::clone(&session_repo),
        &config.auth,
    )?);

    let auth_service = Arc::new(authhub_auth::service::AuthService::new(
        Arc::clone(&user_repo),
        Arc::clone(&role_repo),
        Arc::clone(&session_store),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
    ));

    auth_service.ensure_bootstrap_admin(&config.auth).await?;

    // ── Step 5: Services ─────────────────────────────────────────
    let user_service = Arc::new(authhub_service::user::service::UserService::new(Arc::clone(
        &user_repo,
    )));
    let user_admin_service = Arc::new(authhub_service::user::admin::UserAdminService::new(
        Arc::clone(&user_repo),
        Arc::clone(&role_repo),
    ));
    let session_service = Arc::new(authhub_service::session::service::SessionService::new(
        Arc::clone(&session_store),
    ));

    // ── Step 6: Shutdown channel + periodic session sweep ────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweep_handle = if config.session.cleanup_enabled {
        let cleanup = authhub_auth::session::cleanup::SessionCleanup::new(Arc::clone(
            &session_store,
        ));
        let interval = std::time::Duration::from_secs(config.session.cleanup_interval_minutes * 60);
        let mut sweep_shutdown = shutdown_rx.clone();

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; consume it so sweeps
            // start one full interval after boot.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = cleanup.run_cleanup().await {
                            tracing::error!(error = %e, "Session sweep failed");
                        }
                    }
                    _ = sweep_shutdown.changed() => break,
                }
            }
        }))
    } else {
        tracing::info!("Periodic session sweep disabled");
        None
    };

    // ── Step 7: HTTP server ──────────────────────────────────────
    let app_state = authhub_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        auth_service,
        session_store,
        user_service,
        user_admin_service,
        session_service,
    };

    let app = authhub_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("AuthHub listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = sweep_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(10), handle).await;
    }

    tracing::info!("AuthHub shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
