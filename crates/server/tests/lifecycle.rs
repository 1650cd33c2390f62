use std::net::TcpListener as StdTcpListener;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use common::{Stats, StatsServer};
use configs::{CuratorConfig, HttpServerConfig, ServiceConfig, StatsConfig, StatsServerConfig};
use server::cli::Cli;
use server::errors::StartupError;
use server::http::HttpServer;
use server::startup::{self, Components, Launch, Mode, ShutdownReason};
use service::{Curator, Document, DocumentLocator, NewDocument, ServiceError};
use uuid::Uuid;

/// Curator wrapper counting `close` calls.
struct CountingLocator {
    inner: Curator,
    closes: AtomicUsize,
    hang_on_close: bool,
}

impl CountingLocator {
    fn new(hang_on_close: bool) -> Arc<Self> {
        Arc::new(Self {
            inner: Curator::new(CuratorConfig::default(), stats()).expect("memory curator"),
            closes: AtomicUsize::new(0),
            hang_on_close,
        })
    }
}

#[async_trait]
impl DocumentLocator for CountingLocator {
    async fn create_document(&self, input: NewDocument) -> Result<Arc<Document>, ServiceError> {
        self.inner.create_document(input).await
    }

    async fn find_document(&self, id: &str) -> Result<Arc<Document>, ServiceError> {
        self.inner.find_document(id).await
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.hang_on_close {
            std::future::pending::<()>().await;
        }
        self.inner.close().await
    }

    async fn closed(&self) {
        self.inner.closed().await
    }
}

fn stats() -> Arc<Stats> {
    Arc::new(Stats::new(&StatsConfig::default()).expect("stats"))
}

fn ephemeral_config() -> ServiceConfig {
    ServiceConfig {
        http_server: HttpServerConfig { address: "127.0.0.1:0".into(), ..Default::default() },
        stats_server: StatsServerConfig { address: "127.0.0.1:0".into(), ..Default::default() },
        ..Default::default()
    }
}

fn components_for(locator: Arc<CountingLocator>, config: &ServiceConfig) -> Components {
    let stats = stats();
    let locator: Arc<dyn DocumentLocator> = locator;
    let http = HttpServer::new(locator.clone(), &config.http_server, stats.clone()).expect("http server");
    let stats_server = StatsServer::new(&config.stats_server, stats).expect("stats server");
    Components { locator, http, stats_server }
}

fn temp_config(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("leaps_lifecycle_{}.json", Uuid::new_v4()));
    std::fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn no_config_file_resolves_to_defaults() {
    let cli = Cli::try_parse_from(["leaps"]).unwrap();
    match startup::prepare(&cli).unwrap() {
        Launch::Start { config, mode } => {
            assert_eq!(mode, Mode::Curator);
            assert_eq!(config.curator.document_store.backend_type, "memory");
            assert_eq!(config.num_processes, configs::default_num_processes());
            assert_eq!(config, ServiceConfig::default());
        }
        Launch::ShowVersion => panic!("version was not requested"),
    }
}

#[test]
fn version_flag_skips_config_and_components() {
    // 配置文件不存在：若被读取则会报错
    let missing = std::env::temp_dir().join(format!("leaps_absent_{}.json", Uuid::new_v4()));
    let missing = missing.to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["leaps", "-v", "-c", missing.as_str(), "-m", "bogus"]).unwrap();
    assert!(matches!(startup::prepare(&cli).unwrap(), Launch::ShowVersion));

    let banner = common::types::BUILD_INFO.to_string();
    assert!(banner.starts_with("Leaps version: "));
    assert!(banner.contains("\nDate: "));
}

#[test]
fn unsupported_mode_is_fatal() {
    let cli = Cli::try_parse_from(["leaps", "-m", "relay"]).unwrap();
    let err = startup::prepare(&cli).unwrap_err();
    assert!(matches!(err, StartupError::UnsupportedMode(ref m) if m == "relay"));
}

#[test]
fn unreadable_config_is_fatal() {
    let path = temp_config("{\"num_processes\": \"many\"}");
    let cli = Cli::try_parse_from(["leaps", "-c", path.to_str().unwrap()]).unwrap();
    let err = startup::prepare(&cli).unwrap_err();
    assert!(matches!(err, StartupError::Config(configs::ConfigError::Parse { .. })));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn bogus_store_type_aborts_construction() {
    let path = temp_config(r#"{"curator": {"document_store": {"type": "bogus"}}}"#);
    let cli = Cli::try_parse_from(["leaps", "-c", path.to_str().unwrap()]).unwrap();
    let Launch::Start { config, mode } = startup::prepare(&cli).unwrap() else {
        panic!("expected a start plan");
    };

    match startup::build_components(&config, mode, stats()) {
        Err(StartupError::Construction { component, reason }) => {
            assert_eq!(component, "curator");
            assert!(reason.contains("invalid document store type"));
        }
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("no component may be built for a bogus store"),
    }
    let _ = std::fs::remove_file(&path);
}

#[test]
fn invalid_http_address_aborts_construction() {
    let mut config = ephemeral_config();
    config.http_server.address = "nowhere".into();
    match startup::build_components(&config, Mode::Curator, stats()) {
        Err(StartupError::Construction { component, .. }) => assert_eq!(component, "http"),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("bad address must fail"),
    }
}

#[test]
fn unroutable_paths_abort_construction() {
    let mut config = ephemeral_config();
    config.http_server.path = "/leaps/*rest".into();
    match startup::build_components(&config, Mode::Curator, stats()) {
        Err(StartupError::Construction { component, reason }) => {
            assert_eq!(component, "http");
            assert!(reason.contains("captures"));
        }
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("wildcard base path must fail"),
    }

    let mut config = ephemeral_config();
    config.stats_server.path = "/healthz".into();
    match startup::build_components(&config, Mode::Curator, stats()) {
        Err(StartupError::Construction { component, reason }) => {
            assert_eq!(component, "stats");
            assert!(reason.contains("built-in route"));
        }
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("stats path may not shadow the health route"),
    }
}

#[tokio::test]
async fn invalid_stats_prefix_aborts_startup() {
    let mut config = ephemeral_config();
    config.stats.prefix = "my-app".into();
    match startup::run(config, Mode::Curator).await {
        Err(StartupError::Construction { component, reason }) => {
            assert_eq!(component, "stats");
            assert!(reason.contains("invalid stats prefix"));
        }
        Err(e) => panic!("unexpected error: {e}"),
        Ok(reason) => panic!("startup must fail, got {reason:?}"),
    }
}

#[tokio::test]
async fn signal_closes_curator_exactly_once() {
    let locator = CountingLocator::new(false);
    let components = components_for(locator.clone(), &ephemeral_config());

    let signal = tokio::time::sleep(Duration::from_millis(50));
    let reason = startup::serve(components, signal, Duration::from_secs(5)).await;

    assert_eq!(reason, ShutdownReason::Signal);
    assert_eq!(locator.closes.load(Ordering::SeqCst), 1);
    assert!(locator.inner.is_closed());
}

#[tokio::test]
async fn http_listener_exit_triggers_shutdown() {
    // 先占用端口，使 HTTP 监听失败
    let taken = StdTcpListener::bind("127.0.0.1:0").unwrap();
    let mut config = ephemeral_config();
    config.http_server.address = taken.local_addr().unwrap().to_string();

    let locator = CountingLocator::new(false);
    let components = components_for(locator.clone(), &config);

    let reason = tokio::time::timeout(
        Duration::from_secs(5),
        startup::serve(components, std::future::pending(), Duration::from_secs(5)),
    )
    .await
    .expect("listener exit must end serve");

    assert_eq!(reason, ShutdownReason::ListenerExited);
    assert_eq!(locator.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stats_listener_exit_does_not_trigger_shutdown() {
    let taken = StdTcpListener::bind("127.0.0.1:0").unwrap();
    let mut config = ephemeral_config();
    config.stats_server.address = taken.local_addr().unwrap().to_string();

    let locator = CountingLocator::new(false);
    let components = components_for(locator.clone(), &config);

    let reason = startup::serve(
        components,
        tokio::time::sleep(Duration::from_millis(200)),
        Duration::from_secs(5),
    )
    .await;
    assert_eq!(reason, ShutdownReason::Signal);
    assert_eq!(locator.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn hanging_close_is_bounded() {
    let locator = CountingLocator::new(true);
    let components = components_for(locator.clone(), &ephemeral_config());

    let reason = tokio::time::timeout(
        Duration::from_secs(5),
        startup::serve(components, std::future::ready(()), Duration::from_millis(100)),
    )
    .await
    .expect("close timeout must bound shutdown");

    assert_eq!(reason, ShutdownReason::Signal);
    assert_eq!(locator.closes.load(Ordering::SeqCst), 1);
}
