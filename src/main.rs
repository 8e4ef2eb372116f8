use std::net::SocketAddr;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use naturopura_server::{
    auth::AuthService,
    config::Config,
    db,
    farmer::FarmerService,
    loan::LoanService,
    middleware::{request_tracing, security_headers},
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(
        environment = config.environment.as_str(),
        "Starting Naturopura loan service"
    );

    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;

    let loan_service = LoanService::new(pool.clone(), config.loan_policy.clone());
    let farmer_service = FarmerService::new(pool.clone());
    let auth_service = AuthService::new(
        pool.clone(),
        config.jwt_secret.clone(),
        config.jwt_ttl_seconds,
    );
    let state = AppState::new(pool, loan_service, farmer_service, auth_service);

    let cors = configure_cors(&config);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(routes::auth::routes())
        .merge(routes::loan::routes())
        .merge(routes::farmer::routes())
        .layer(axum::middleware::from_fn(security_headers))
        .layer(axum::middleware::from_fn(request_tracing))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn root() -> &'static str {
    "Naturopura API Server"
}

async fn health_check(State(pool): State<PgPool>) -> impl IntoResponse {
    let db_healthy = db::check_health(&pool).await;
    let status = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if db_healthy { "healthy" } else { "unhealthy" },
            "database": db_healthy,
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

fn configure_cors(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) => {
            let mut parsed = Vec::new();
            for origin in origins.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                match origin.parse::<HeaderValue>() {
                    Ok(value) => parsed.push(value),
                    Err(_) => tracing::warn!(%origin, "Ignoring invalid CORS origin"),
                }
            }
            CorsLayer::new()
                .allow_origin(parsed)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        }
        None => {
            tracing::warn!("CORS_ALLOWED_ORIGINS is not set, allowing all origins");
            CorsLayer::permissive()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
