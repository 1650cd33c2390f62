use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Build metadata reported by `-v`.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct BuildInfo {
    pub version: &'static str,
    pub date: &'static str,
}

pub const BUILD_INFO: BuildInfo = BuildInfo {
    version: env!("CARGO_PKG_VERSION"),
    date: match option_env!("LEAPS_BUILD_DATE") {
        Some(d) => d,
        None => "unknown",
    },
};

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Leaps version: {}\nDate: {}", self.version, self.date)
    }
}
