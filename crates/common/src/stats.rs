//! Process-wide metrics collector.
//!
//! Each `Stats` owns its own Prometheus registry, so several instances can
//! coexist in one process (tests build many).

use axum::http::StatusCode;
use configs::StatsConfig;
use prometheus::{IntCounter, Registry, TextEncoder, Encoder};

pub struct Stats {
    registry: Registry,
    pub documents_created: IntCounter,
    pub documents_fetched: IntCounter,
    pub document_misses: IntCounter,
    pub http_requests: IntCounter,
}

impl Stats {
    pub fn new(config: &StatsConfig) -> Result<Self, prometheus::Error> {
        let prefix = if config.prefix.trim().is_empty() {
            None
        } else if is_valid_metric_prefix(&config.prefix) {
            Some(config.prefix.clone())
        } else {
            return Err(prometheus::Error::Msg(format!(
                "invalid stats prefix {:?}, expected [a-zA-Z_:][a-zA-Z0-9_:]*",
                config.prefix
            )));
        };
        let registry = Registry::new_custom(prefix, None)?;

        let documents_created = counter(&registry, "documents_created_total", "Documents created through the curator")?;
        let documents_fetched = counter(&registry, "documents_fetched_total", "Documents fetched from the store")?;
        let document_misses = counter(&registry, "document_misses_total", "Fetches for keys with no stored document")?;
        let http_requests = counter(&registry, "http_requests_total", "Requests handled by the document API")?;

        Ok(Self {
            registry,
            documents_created,
            documents_fetched,
            document_misses,
            http_requests,
        })
    }

    /// Render all metrics in the Prometheus text format.
    pub fn encode(&self) -> (StatusCode, String) {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("metrics encode error: {e}"),
            );
        }
        (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
    }
}

/// Prometheus metric name rule: `[a-zA-Z_:][a-zA-Z0-9_:]*`.
fn is_valid_metric_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn counter(registry: &Registry, name: &str, help: &str) -> Result<IntCounter, prometheus::Error> {
    let c = IntCounter::new(name, help)?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}
