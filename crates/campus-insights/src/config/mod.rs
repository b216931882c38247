use crate::records::search::DEFAULT_PAGE_SIZE;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub data: DataConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let search_page_size = match env::var("CAMPUS_SEARCH_PAGE_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size >= 1)
                .ok_or(ConfigError::InvalidPageSize { value: raw })?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            data: DataConfig {
                dataset_path: path_var("CAMPUS_DATASET_PATH"),
                directory_path: path_var("CAMPUS_DIRECTORY_PATH"),
                search_page_size,
            },
        })
    }
}

fn path_var(name: &str) -> Option<PathBuf> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls. Output is always plain text without ANSI colors.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the service finds its records, and how search pages them.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub dataset_path: Option<PathBuf>,
    pub directory_path: Option<PathBuf>,
    pub search_page_size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("CAMPUS_SEARCH_PAGE_SIZE must be a positive integer (got '{value}')")]
    InvalidPageSize { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "CAMPUS_DATASET_PATH",
            "CAMPUS_DIRECTORY_PATH",
            "CAMPUS_SEARCH_PAGE_SIZE",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.data.dataset_path.is_none());
        assert_eq!(config.data.search_page_size, 10);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn reads_data_paths_and_page_size() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("CAMPUS_DATASET_PATH", "data/students.csv");
        env::set_var("CAMPUS_DIRECTORY_PATH", "  ");
        env::set_var("CAMPUS_SEARCH_PAGE_SIZE", "25");
        let config = AppConfig::load().expect("config loads");

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.data.dataset_path,
            Some(PathBuf::from("data/students.csv"))
        );
        assert!(config.data.directory_path.is_none());
        assert_eq!(config.data.search_page_size, 25);
        reset_env();
    }

    #[test]
    fn rejects_zero_page_size() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CAMPUS_SEARCH_PAGE_SIZE", "0");
        let err = AppConfig::load().expect_err("zero page size rejected");
        assert!(matches!(err, ConfigError::InvalidPageSize { .. }));
        reset_env();
    }

    #[test]
    fn invalid_host_reports_parse_source() {
        let server = ServerConfig {
            host: "campus.local".to_string(),
            port: 3000,
        };
        let err = server.socket_addr().expect_err("hostname is not an address");
        assert!(matches!(err, ConfigError::InvalidHost { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }
}
