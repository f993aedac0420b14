use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Runtime stage the service is deployed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

/// Top-level configuration for the claim validation service, assembled from
/// `CLAIMS_*` environment variables (a `.env` file is honored in dev).
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

        let environment = AppEnvironment::parse(&env_or("CLAIMS_ENV", "development"));

        let server = ServerConfig {
            host: env_or("CLAIMS_HOST", "127.0.0.1"),
            port: env_or("CLAIMS_PORT", "3000")
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort)?,
        };

        let telemetry = TelemetryConfig {
            log_level: env_or("CLAIMS_LOG_LEVEL", "info"),
        };

        let data = DataConfig {
            policies_file: env::var("CLAIMS_POLICY_FILE").ok().map(PathBuf::from),
            network_csv: env::var("CLAIMS_NETWORK_CSV").ok().map(PathBuf::from),
        };

        Ok(Self {
            environment,
            server,
            telemetry,
            data,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host.parse()?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Optional reference-data files loaded at startup: a JSON array of policy
/// snapshots and an insurer CSV export of network hospitals. CLI flags
/// override both.
#[derive(Debug, Clone, Default)]
pub struct DataConfig {
    pub policies_file: Option<PathBuf>,
    pub network_csv: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CLAIMS_PORT must be a valid u16")]
    InvalidPort,
    #[error("CLAIMS_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost(#[from] std::net::AddrParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    // Env vars are process-global; serialize the tests that touch them.
    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "CLAIMS_ENV",
            "CLAIMS_HOST",
            "CLAIMS_PORT",
            "CLAIMS_LOG_LEVEL",
            "CLAIMS_POLICY_FILE",
            "CLAIMS_NETWORK_CSV",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();

        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.data.policies_file.is_none());
        assert!(config.data.network_csv.is_none());
    }

    #[test]
    fn environment_aliases_are_recognized() {
        assert_eq!(AppEnvironment::parse("prod"), AppEnvironment::Production);
        assert_eq!(AppEnvironment::parse("CI"), AppEnvironment::Test);
        assert_eq!(AppEnvironment::parse("anything"), AppEnvironment::Development);
        assert_eq!(AppEnvironment::Production.as_str(), "production");
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
        };
        let addr = server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080));
    }

    #[test]
    fn unparseable_host_is_rejected() {
        let server = ServerConfig {
            host: "not a host".to_string(),
            port: 8080,
        };
        assert!(matches!(
            server.socket_addr(),
            Err(ConfigError::InvalidHost(_))
        ));
    }

    #[test]
    fn malformed_port_is_rejected() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CLAIMS_PORT", "not-a-port");

        let result = AppConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidPort)));
        env::remove_var("CLAIMS_PORT");
    }

    #[test]
    fn data_paths_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CLAIMS_POLICY_FILE", "/var/lib/claims/policies.json");
        env::set_var("CLAIMS_NETWORK_CSV", "/var/lib/claims/network.csv");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.data.policies_file.as_deref(),
            Some(std::path::Path::new("/var/lib/claims/policies.json"))
        );
        assert_eq!(
            config.data.network_csv.as_deref(),
            Some(std::path::Path::new("/var/lib/claims/network.csv"))
        );
        reset_env();
    }
}
