/*
 * Responsibility
 * - Read environment variables / .env (PORT, DATABASE_URL, JWT_SECRET, CORS, bootstrap admin)
 * - Validate values (fail startup when something required is missing)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Credentials for the administrator account created at startup when absent.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // None => in-memory stores
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // base64url text as configured; decoded by the token codec factory
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,

    pub cors_allowed_origins: Vec<String>,

    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database", &self.database_url.is_some())
            .field("jwt_expiration_seconds", &self.jwt_expiration_seconds)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("bootstrap_admin", &self.bootstrap_admin)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let database_url = lookup("DATABASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(5);

        let jwt_secret = lookup("JWT_SECRET")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration_seconds = match lookup("JWT_EXPIRATION_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid("JWT_EXPIRATION_SECONDS"))?,
            None => 36_000, // 10 hours
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let bootstrap_admin = match (
            lookup("BOOTSTRAP_ADMIN_EMAIL").filter(|s| !s.trim().is_empty()),
            lookup("BOOTSTRAP_ADMIN_PASSWORD").filter(|s| !s.is_empty()),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                email: email.trim().to_string(),
                password,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("BOOTSTRAP_ADMIN_EMAIL")),
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_expiration_seconds,
            cors_allowed_origins,
            bootstrap_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "c2VjcmV0")])).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.database_url.is_none());
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.jwt_expiration_seconds, 36_000);
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn missing_secret_fails() {
        let err = Config::from_lookup(lookup(&[("PORT", "9000")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn invalid_port_and_ttl_fail() {
        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("PORT", "http")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));

        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("JWT_EXPIRATION_SECONDS", "0"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("JWT_EXPIRATION_SECONDS"));
    }

    #[test]
    fn parses_full_configuration() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("PORT", "3001"),
            ("APP_ENV", "PROD"),
            ("DATABASE_URL", "postgres://localhost/libros"),
            ("JWT_EXPIRATION_SECONDS", "600"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:8081, ,http://10.*.*.*:8081"),
            ("BOOTSTRAP_ADMIN_EMAIL", "admin@example.com"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "change-me-please"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 3001);
        assert!(config.app_env.is_production());
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/libros")
        );
        assert_eq!(config.jwt_expiration_seconds, 600);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:8081", "http://10.*.*.*:8081"]
        );
        let admin = config.bootstrap_admin.unwrap();
        assert_eq!(admin.email, "admin@example.com");
    }

    #[test]
    fn half_configured_bootstrap_admin_fails() {
        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("BOOTSTRAP_ADMIN_EMAIL", "admin@example.com"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("BOOTSTRAP_ADMIN_PASSWORD"));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "super-secret-value"),
            ("BOOTSTRAP_ADMIN_EMAIL", "admin@example.com"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "hunter2hunter2"),
        ]))
        .unwrap();

        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret-value"));
        assert!(!printed.contains("hunter2hunter2"));
    }
}
