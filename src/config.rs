use std::path::PathBuf;

pub const DEFAULT_DAILY_CSV: &str = "day.csv";
pub const DEFAULT_HOURLY_CSV: &str = "hour.csv";
pub const DEFAULT_LOG_FILE: &str = "logs/bikeshare_dashboard.log";

/// Runtime settings, read from the environment (and `.env`, once loaded).
///
/// | Variable               | Default                          |
/// |------------------------|----------------------------------|
/// | `BIKESHARE_DAILY_CSV`  | `day.csv`                        |
/// | `BIKESHARE_HOURLY_CSV` | `hour.csv`                       |
/// | `LOG_FILE_PATH`        | `logs/bikeshare_dashboard.log`   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub daily_csv: PathBuf,
    pub hourly_csv: PathBuf,
    pub log_file_path: PathBuf,
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Self {
            daily_csv: get("BIKESHARE_DAILY_CSV", DEFAULT_DAILY_CSV),
            hourly_csv: get("BIKESHARE_HOURLY_CSV", DEFAULT_HOURLY_CSV),
            log_file_path: get("LOG_FILE_PATH", DEFAULT_LOG_FILE),
        }
    }
}
