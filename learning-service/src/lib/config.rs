use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    pub kafka: Option<KafkaConfig>,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    #[serde(default = "default_expires_in_minutes")]
    pub expires_in_minutes: i64,
    /// Clock skew tolerated on access tokens. Reset tokens never get any.
    #[serde(default)]
    pub leeway_seconds: u64,
}

/// Argon2 cost. Unset fields fall back to the library defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PasswordConfig {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FrontendConfig {
    /// Page that receives `?token=...` from password reset emails.
    pub reset_password_url: String,
}

fn default_max_connections() -> u32 {
    5
}

fn default_expires_in_minutes() -> i64 {
    30
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// The result is validated before it is returned, so a missing signing
    /// secret stops the process here.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret is not configured".to_string(),
            ));
        }
        if self.jwt.issuer.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.issuer is not configured".to_string(),
            ));
        }
        if self.jwt.audience.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.audience is not configured".to_string(),
            ));
        }
        if self.jwt.expires_in_minutes <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.expires_in_minutes must be positive, got {}",
                self.jwt.expires_in_minutes
            )));
        }
        if self.storage.backend == StorageBackend::Postgres && self.database.is_none() {
            return Err(ConfigError::Message(
                "database.url is required when storage.backend = \"postgres\"".to_string(),
            ));
        }
        self.reset_password_url()?;

        Ok(())
    }

    pub fn reset_password_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.frontend.reset_password_url).map_err(|e| {
            ConfigError::Message(format!("frontend.reset_password_url is invalid: {}", e))
        })
    }

    pub fn password_cost(&self) -> Option<auth::PasswordCost> {
        let defaults = argon2_defaults();
        let password = &self.password;

        if password.memory_kib.is_none()
            && password.iterations.is_none()
            && password.parallelism.is_none()
        {
            return None;
        }

        Some(auth::PasswordCost {
            memory_kib: password.memory_kib.unwrap_or(defaults.memory_kib),
            iterations: password.iterations.unwrap_or(defaults.iterations),
            parallelism: password.parallelism.unwrap_or(defaults.parallelism),
        })
    }
}

// Argon2 0.5 defaults (m=19456, t=2, p=1).
fn argon2_defaults() -> auth::PasswordCost {
    auth::PasswordCost {
        memory_kib: 19 * 1024,
        iterations: 2,
        parallelism: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig { http_port: 8080 },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
            },
            database: None,
            jwt: JwtConfig {
                secret: "test-secret-key-for-jwt-signing-at-least-32-bytes".to_string(),
                issuer: "learning-platform".to_string(),
                audience: "learning-platform-clients".to_string(),
                expires_in_minutes: 30,
                leeway_seconds: 0,
            },
            password: PasswordConfig::default(),
            kafka: None,
            frontend: FrontendConfig {
                reset_password_url: "https://app.example.com/reset-password".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let mut config = config();
        config.jwt.secret = "  ".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("jwt.secret"));
    }

    #[test]
    fn test_postgres_backend_requires_database() {
        let mut config = config();
        config.storage.backend = StorageBackend::Postgres;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_reset_url_is_rejected() {
        let mut config = config();
        config.frontend.reset_password_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_password_cost_fills_unset_fields() {
        let mut config = config();
        assert_eq!(config.password_cost(), None);

        config.password.iterations = Some(3);
        let cost = config.password_cost().unwrap();
        assert_eq!(cost.iterations, 3);
        assert_eq!(cost.memory_kib, 19 * 1024);
        assert_eq!(cost.parallelism, 1);
    }
}
