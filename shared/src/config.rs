use std::time::Duration;

use dotenv::dotenv;

pub const DEFAULT_WATCH_LIST: [&str; 10] = [
    "BTCUSDT", "ETHUSDT", "SOLUSDT", "XRPUSDT", "ADAUSDT", "DOGEUSDT", "DOTUSDT", "LTCUSDT",
    "MATICUSDT", "AVAXUSDT",
];

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;
const DEFAULT_WARMUP_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub refresh_interval: Duration,
    pub warmup_delay: Duration,
    pub watch_list: Vec<String>,
    pub dashboard_dir: String,
    pub run_migrations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "sqlite://signals.db?mode=rwc".to_string(),
            bind_addr: "0.0.0.0:5000".to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            warmup_delay: Duration::from_secs(DEFAULT_WARMUP_DELAY_SECS),
            watch_list: default_watch_list(),
            dashboard_dir: "./dashboard".to_string(),
            run_migrations: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();
        let defaults = Config::default();

        Ok(Config {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: std::env::var("API_BIND_ADDR").unwrap_or(defaults.bind_addr),
            refresh_interval: std::env::var("REFRESH_INTERVAL_SECS")
                .ok()
                .and_then(|v| parse_secs(&v))
                .unwrap_or(defaults.refresh_interval),
            warmup_delay: std::env::var("WARMUP_DELAY_SECS")
                .ok()
                .and_then(|v| parse_secs(&v))
                .unwrap_or(defaults.warmup_delay),
            watch_list: std::env::var("WATCH_LIST")
                .map(|v| parse_watch_list(&v))
                .unwrap_or(defaults.watch_list),
            dashboard_dir: std::env::var("DASHBOARD_DIR").unwrap_or(defaults.dashboard_dir),
            run_migrations: std::env::var("RUN_MIGRATIONS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
        })
    }
}

pub fn default_watch_list() -> Vec<String> {
    DEFAULT_WATCH_LIST.iter().map(|s| s.to_string()).collect()
}

/// Comma separated symbols, upper-cased. Falls back to the default list when
/// nothing usable is left.
pub fn parse_watch_list(raw: &str) -> Vec<String> {
    let symbols: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        default_watch_list()
    } else {
        symbols
    }
}

// Zero would make tokio's interval panic.
fn parse_secs(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.watch_list.len(), 10);
        assert_eq!(config.watch_list[0], "BTCUSDT");
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.warmup_delay, Duration::from_secs(5));
        assert!(config.run_migrations);
    }

    #[test]
    fn test_parse_watch_list() {
        assert_eq!(parse_watch_list(" btcusdt, ETHUSDT ,,"), vec!["BTCUSDT", "ETHUSDT"]);
        assert_eq!(parse_watch_list(" , "), default_watch_list());
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("30"), Some(Duration::from_secs(30)));
        assert_eq!(parse_secs("0"), None);
        assert_eq!(parse_secs("soon"), None);
    }
}
