use std::env;

/// Process settings for the sidecar, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarConfig {
    pub telemetry: TelemetryConfig,
}

/// `RUST_LOG`, when set, takes precedence over `log_level`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl SidecarConfig {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup("GRADINGD_LOG_LEVEL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "info".to_string());

        Self {
            telemetry: TelemetryConfig { log_level },
        }
    }
}
