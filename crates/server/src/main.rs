use parley_server::config::Config;
use parley_server::{db, routes, ws, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use axum::http::{HeaderName, Method};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley_server=info".into()),
        )
        .init();

    let config = Config::from_env();

    let pool = db::init_pool(&config.database_path).await?;

    let state = Arc::new(AppState {
        db: pool,
        config: config.clone(),
        gateway: Arc::new(ws::gateway::GatewayState::new()),
    });

    let app = routes::build_router(state.clone())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::AllowOrigin::mirror_request())
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    HeaderName::from_static("content-type"),
                    HeaderName::from_static("cookie"),
                ])
                .allow_credentials(true),
        );

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Parley server running on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
