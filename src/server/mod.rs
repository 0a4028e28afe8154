pub mod handlers;
mod types;

pub use handlers::AppState;
pub use types::{CSV_CONTENT_TYPE, ErrorResponse, FILE_FIELD};

use crate::{Error, Result, config::ServerConfig, model::Scorer};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::post,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

/// Binds the configured address and serves until Ctrl-C.
///
/// The scorer is loaded by the caller so a bad artifact fails before the port is taken.
pub async fn run(config: &ServerConfig, scorer: Scorer) -> Result<()> {
    let app_state = AppState {
        scorer: Arc::new(scorer),
    };

    let app = router(app_state, config)?;

    let addr = SocketAddr::new(config.host.parse()?, config.port);

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    serve(listener, app, shutdown_signal()).await
}

/// Serves `app` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining requests"),
        Err(e) => {
            // without a signal handler the server simply runs until killed
            error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

pub fn router(state: AppState, config: &ServerConfig) -> Result<Router> {
    let cors = cors_layer(&config.cors_origins)?;

    Ok(Router::new()
        .route("/predict", post(handlers::predict))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .with_state(state))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| Error::config(format!("invalid CORS origin '{origin}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
