use tracing_subscriber::filter::LevelFilter;

use crate::board::DEFAULT_THEME;

/// Name of the D1 binding in wrangler.toml
pub const DB_BINDING: &str = "DB";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub default_theme: String,
    pub log_level: LevelFilter,
    pub cors_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_theme: DEFAULT_THEME.to_owned(),
            log_level: LevelFilter::INFO,
            cors_origin: None,
        }
    }
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

impl AppConfig {
    /// Builds the config from a variable lookup. Unset or blank variables keep
    /// their defaults.
    pub fn from_vars<F>(lookup: F) -> AppConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = AppConfig::default();
        AppConfig {
            default_theme: var("DEFAULT_THEME").unwrap_or(defaults.default_theme),
            log_level: var("LOG_LEVEL")
                .and_then(|level| parse_level(&level))
                .unwrap_or(defaults.log_level),
            cors_origin: var("CORS_ORIGIN"),
        }
    }

    pub fn from_env(env: &worker::Env) -> AppConfig {
        AppConfig::from_vars(|name| env.var(name).ok().map(|v| v.to_string()))
    }
}
