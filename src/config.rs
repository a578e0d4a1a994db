use std::env;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

const DEV_SECRET_KEY: &str = "change-this-secret-key-in-production";

/// Which password hashing scheme new credentials are written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordScheme {
    Bcrypt,
    Pbkdf2,
}

impl FromStr for PasswordScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(PasswordScheme::Bcrypt),
            "pbkdf2" => Ok(PasswordScheme::Pbkdf2),
            other => Err(ConfigError::Invalid {
                key: "PASSWORD_SCHEME",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("ALGORITHM must be one of HS256, HS384, HS512 (got {0})")]
    UnsupportedAlgorithm(String),
}

/// Settings shared by the credential codec and the token service.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
    /// `None` until the startup probe (or `PASSWORD_SCHEME`) decides.
    pub password_scheme: Option<PasswordScheme>,
}

impl AuthSettings {
    /// Settings with a fixed secret and the cheapest bcrypt cost. Meant for tests.
    pub fn for_testing(secret_key: &str) -> Self {
        Self {
            secret_key: secret_key.to_string(),
            algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
            bcrypt_cost: 4,
            password_scheme: Some(PasswordScheme::Bcrypt),
        }
    }
}

pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub auth: AuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            log::warn!("SECRET_KEY not set, falling back to the development key");
            DEV_SECRET_KEY.to_string()
        });

        let algorithm_name = env::var("ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        let algorithm = match Algorithm::from_str(&algorithm_name) {
            Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => alg,
            _ => return Err(ConfigError::UnsupportedAlgorithm(algorithm_name)),
        };

        let bcrypt_cost: u32 = parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let password_scheme = match env::var("PASSWORD_SCHEME") {
            Ok(value) => Some(value.parse()?),
            Err(_) => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://todo_app.db".to_string()),
            server_port: parse_var("SERVER_PORT", 8000)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            auth: AuthSettings {
                secret_key,
                algorithm,
                access_token_expire_minutes: parse_var("ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
                bcrypt_cost,
                password_scheme,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global, so everything touching them lives in one test.
    #[test]
    fn test_config_from_env() {
        for key in [
            "DATABASE_URL",
            "SERVER_PORT",
            "SERVER_HOST",
            "SECRET_KEY",
            "ALGORITHM",
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            "BCRYPT_COST",
            "PASSWORD_SCHEME",
        ] {
            env::remove_var(key);
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.database_url, "sqlite://todo_app.db");
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.auth.algorithm, Algorithm::HS256);
        assert_eq!(config.auth.access_token_expire_minutes, 30);
        assert_eq!(config.auth.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.auth.password_scheme.is_none());
        assert_eq!(config.server_url(), "http://127.0.0.1:8000");

        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("PASSWORD_SCHEME", "pbkdf2");
        let config = Config::from_env().unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.auth.password_scheme, Some(PasswordScheme::Pbkdf2));

        env::set_var("SERVER_PORT", "not-a-port");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid { key: "SERVER_PORT", .. })
        ));
        env::remove_var("SERVER_PORT");

        env::set_var("ALGORITHM", "RS256");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::UnsupportedAlgorithm(_))
        ));
        env::remove_var("ALGORITHM");

        env::set_var("BCRYPT_COST", "2");
        assert!(Config::from_env().is_err());

        for key in ["SERVER_HOST", "PASSWORD_SCHEME", "BCRYPT_COST"] {
            env::remove_var(key);
        }
    }
}
