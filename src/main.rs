use axum::{routing::get, Router};
use std::env;
use tokio::net::TcpListener;
use tower_http::{trace::TraceLayer, cors::{Any, CorsLayer}};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use educraft_studio::{config, routes, studio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "educraft_studio=info,axum=info".into())
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::StudioConfig::from_env();
    let addr = config.addr();
    tracing::info!(?config, "starting studio");
    let state = studio::AppState::new(config);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(routes::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
