//! Stats HTTP server
//!
//! Exposes `/healthz` and the configured metrics path, rendering the shared
//! [`Stats`] registry on every scrape.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, http::StatusCode, routing::get, Router};
use configs::StatsServerConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::stats::Stats;
use crate::types::Health;
use crate::utils::route_path::{validate_route_path, HEALTH_PATH};

async fn healthz() -> axum::Json<Health> {
    axum::Json(Health { status: "ok" })
}

async fn metrics_handler(State(stats): State<Arc<Stats>>) -> (StatusCode, String) {
    stats.encode()
}

pub struct StatsServer {
    addr: SocketAddr,
    router: Router,
}

impl StatsServer {
    /// Validate the configuration and prepare the router; nothing is bound yet.
    pub fn new(config: &StatsServerConfig, stats: Arc<Stats>) -> anyhow::Result<Self> {
        let addr: SocketAddr = config
            .address
            .parse()
            .with_context(|| format!("invalid stats server address {:?}", config.address))?;
        validate_route_path("stats server", &config.path, &[HEALTH_PATH])?;

        let router = Router::new()
            .route(HEALTH_PATH, get(healthz))
            .route(&config.path, get(metrics_handler))
            .with_state(stats);

        Ok(Self { addr, router })
    }

    /// Bind and serve until the listener fails.
    pub async fn listen(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("bind stats server on {}", self.addr))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        let addr = listener.local_addr()?;
        info!(%addr, event = "stats_listen", "stats server listening");
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
