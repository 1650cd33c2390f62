use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use common::utils::route_path::validate_route_path;
use common::Stats;
use configs::HttpServerConfig;
use service::DocumentLocator;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};

/// Document API server bound to a [`DocumentLocator`].
///
/// Stops accepting connections once the locator is closed.
pub struct HttpServer {
    addr: SocketAddr,
    router: Router,
    locator: Arc<dyn DocumentLocator>,
}

impl HttpServer {
    pub fn new(
        locator: Arc<dyn DocumentLocator>,
        config: &HttpServerConfig,
        stats: Arc<Stats>,
    ) -> anyhow::Result<Self> {
        let addr: SocketAddr = config
            .address
            .parse()
            .with_context(|| format!("invalid http server address {:?}", config.address))?;
        if !config.path.is_empty() {
            validate_route_path("http server", &config.path, &[])?;
        }

        let state = AppState { locator: locator.clone(), stats };
        let router = routes::build_router(state, &config.path, CorsLayer::very_permissive());
        Ok(Self { addr, router, locator })
    }

    /// Bind the configured address and serve until the locator closes.
    pub async fn listen(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("bind http server on {}", self.addr))?;
        self.serve(listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let addr = listener.local_addr()?;
        info!(%addr, event = "http_listen", "http server listening");
        let locator = self.locator;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { locator.closed().await })
            .await?;
        info!(%addr, event = "http_stop", "http server stopped");
        Ok(())
    }
}
