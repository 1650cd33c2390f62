//! Shared plumbing for the leaps binaries: logging, metrics, and the stats
//! server.

pub mod types;
pub mod utils;
pub mod stats;
pub mod stats_server;

pub use stats::Stats;
pub use stats_server::StatsServer;
