//! HTTP surface: router, CORS, request tracing and server lifecycle

mod envelope;
mod extract;
mod routes;
mod state;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::Supabase;

pub use envelope::ApiResponse;
pub use extract::{bearer_token, AuthUser, ExpiringQuery, JsonBody, PageQuery};
pub use state::AppState;

/// Every route of the API, traced, without CORS
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::index::routes())
        .nest("/health", routes::health::routes())
        .nest("/auth", routes::auth::routes())
        .nest("/items", routes::items::routes())
        .nest("/shopping-list", routes::shopping_list::routes())
        .nest("/analytics", routes::analytics::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the configured origin; `*` reflects the caller's origin
pub fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let allow_origin = if origin == "*" {
        AllowOrigin::mirror_request()
    } else {
        let value = HeaderValue::from_str(origin)
            .map_err(|err| Error::config(format!("invalid CORS origin '{}': {}", origin, err)))?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM
pub async fn serve(config: AppConfig) -> Result<()> {
    let state = AppState::new(Supabase::from_config(&config));
    let app = router(state).layer(cors_layer(&config.cors_origin)?);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|err| Error::config(format!("failed to bind {}: {}", address, err)))?;
    info!("StockHome API listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| Error::general(format!("server error: {}", err)))?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}
