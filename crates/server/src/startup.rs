//! Process lifecycle: resolve configuration, build the components for the
//! selected mode, run the listeners, and close the curator on shutdown.

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use common::{Stats, StatsServer};
use configs::ServiceConfig;
use service::{Curator, DocumentLocator};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cli::Cli;
use crate::errors::StartupError;
use crate::http::HttpServer;

/// Role this process performs. Only the curator role exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Curator,
}

impl FromStr for Mode {
    type Err = StartupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "curator" => Ok(Self::Curator),
            other => Err(StartupError::UnsupportedMode(other.to_string())),
        }
    }
}

/// What `main` should do after argument parsing.
#[derive(Debug)]
pub enum Launch {
    ShowVersion,
    Start { config: ServiceConfig, mode: Mode },
}

/// Resolve the command line into a launch plan.
///
/// The version flag short-circuits before the config file is touched.
pub fn prepare(cli: &Cli) -> Result<Launch, StartupError> {
    if cli.version {
        return Ok(Launch::ShowVersion);
    }
    let config = ServiceConfig::load(cli.config.as_deref())?;
    let mode = cli.mode.parse()?;
    Ok(Launch::Start { config, mode })
}

/// Everything constructed for a mode, not yet listening.
pub struct Components {
    pub locator: Arc<dyn DocumentLocator>,
    pub http: HttpServer,
    pub stats_server: StatsServer,
}

/// Construct the components in dependency order: curator, then the HTTP
/// server bound to it, then the stats server. The first failure aborts.
pub fn build_components(
    config: &ServiceConfig,
    mode: Mode,
    stats: Arc<Stats>,
) -> Result<Components, StartupError> {
    let (locator, http) = match mode {
        Mode::Curator => {
            let curator = Curator::new(config.curator.clone(), stats.clone())
                .map_err(|e| StartupError::construction("curator", e))?;
            let locator: Arc<dyn DocumentLocator> = Arc::new(curator);
            let http = HttpServer::new(locator.clone(), &config.http_server, stats.clone())
                .map_err(|e| StartupError::construction("http", format!("{e:#}")))?;
            (locator, http)
        }
    };

    let stats_server = StatsServer::new(&config.stats_server, stats)
        .map_err(|e| StartupError::construction("stats", format!("{e:#}")))?;

    Ok(Components { locator, http, stats_server })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT or SIGTERM arrived.
    Signal,
    /// The HTTP listener returned.
    ListenerExited,
}

/// Launch both listeners and block until `shutdown` resolves or the HTTP
/// listener exits, whichever happens first. The locator is then closed once;
/// listener tasks are not awaited.
pub async fn serve<S>(components: Components, shutdown: S, close_timeout: Duration) -> ShutdownReason
where
    S: Future<Output = ()>,
{
    let Components { locator, http, stats_server } = components;
    let listener_exit = CancellationToken::new();

    let http_exit = listener_exit.clone();
    tokio::spawn(async move {
        if let Err(e) = http.listen().await {
            error!(event = "http_listen_failed", error = %format!("{e:#}"), "http listen error");
        }
        http_exit.cancel();
    });

    // stats 监听退出只记录，不触发停机
    tokio::spawn(async move {
        if let Err(e) = stats_server.listen().await {
            error!(event = "stats_listen_failed", error = %format!("{e:#}"), "stats server listen error");
        }
    });

    info!(event = "running", "leaps instance running");

    let reason = tokio::select! {
        _ = shutdown => ShutdownReason::Signal,
        _ = listener_exit.cancelled() => ShutdownReason::ListenerExited,
    };
    info!(event = "shutdown", ?reason, "shutting down");

    if tokio::time::timeout(close_timeout, locator.close()).await.is_err() {
        warn!(
            event = "close_timeout",
            timeout_secs = close_timeout.as_secs(),
            "curator did not close in time, exiting anyway"
        );
    }
    reason
}

/// Build and run a leaps instance until an OS signal or listener exit.
pub async fn run(config: ServiceConfig, mode: Mode) -> Result<ShutdownReason, StartupError> {
    let stats = Stats::new(&config.stats).map_err(|e| StartupError::construction("stats", e))?;
    let components = build_components(&config, mode, Arc::new(stats))?;
    let close_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    Ok(serve(components, shutdown_signal(), close_timeout).await)
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(event = "signal_install_failed", error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(event = "signal_install_failed", error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
