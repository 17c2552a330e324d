//! Storefront API server: the canonical, server-owned side of the bag that
//! the optimistic client reconciles against.

pub mod error;
pub mod repo;
pub mod routes;

pub use error::WebError;
pub use repo::Repository;

use axum::Router;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{delete, get, post, put};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal::{self, unix::SignalKind};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<RwLock<Repository>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(RwLock::new(Repository::new())),
        }
    }

    pub fn with_repository(repo: Repository) -> Self {
        Self {
            repo: Arc::new(RwLock::new(repo)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/shop/bag", get(routes::get_bag).post(routes::add_to_bag))
        .route(
            "/api/shop/bag/update-quantity",
            put(routes::update_quantity),
        )
        .route("/api/shop/bag/delete-item", delete(routes::delete_item))
        .route("/api/shop/orders", post(routes::create_order))
        .route("/api/products", get(routes::list_products))
        .route("/api/admin/inventory", post(routes::create_product))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("storefront API listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
