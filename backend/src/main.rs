use axum::Router;
use hangouts::{
    db::{self, PgStore},
    get_db_pool,
    handlers::{self, AppState},
    utils, Config, HangoutEngine,
};
use std::sync::Arc;
use tower_http::cors::{CorsLayer, Any};
use axum::http::{Method, HeaderValue};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();

    let config = Config::from_env()?;
    let db_config = db::DatabaseConfig::from_env()?;
    let pool = get_db_pool(&db_config).await?;

    // Run migrations
    db::migrations::run_migrations(&pool).await?;

    let engine = HangoutEngine::new(Arc::new(PgStore::new(pool)), config.engine_settings());
    let port = config.port;
    let app = create_app(AppState::new(engine), &config);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!(
        "Server running on port {} (max {} first-degree friends, cancel confirmed: {})",
        port,
        config.max_first_degree_friends,
        config.allow_cancel_confirmed
    );

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState<PgStore>, config: &Config) -> Router {
    handlers::create_router(state).layer(create_cors_layer(config))
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    // ALLOWED_ORIGINS may list several comma-separated domains
    if let Some(cors_origins) = &config.allowed_origins {
        let origins: Vec<HeaderValue> = cors_origins
            .split(',')
            .filter_map(|origin| {
                let trimmed = origin.trim();
                if !trimmed.is_empty() {
                    trimmed.parse().ok()
                } else {
                    None
                }
            })
            .collect();

        if !origins.is_empty() {
            cors = cors.allow_origin(origins);
        } else {
            // Fallback to permissive if parsing fails
            cors = cors.allow_origin(Any);
        }
    } else {
        // Default to permissive for development
        cors = cors.allow_origin(Any);
    }

    cors
}
