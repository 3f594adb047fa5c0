use std::env;
use std::fmt;
use std::str::FromStr;

/// Error raised when a required variable is missing or a value cannot be parsed.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    /// Lifetime of issued tokens, in seconds.
    pub jwt_expiration_secs: i64,
    pub bcrypt_cost: u32,
    pub upload_dir: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, applying defaults for optional keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 5001)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_secs: positive(
                "JWT_EXPIRATION_SECS",
                parse_or(&lookup, "JWT_EXPIRATION_SECS", 3600)?,
            )?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", 10)?,
            upload_dir: lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn positive(key: &'static str, value: i64) -> Result<i64, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 5001);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.jwt_expiration_secs, 3600);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.upload_dir, "uploads");
        assert_eq!(config.server_url(), "http://127.0.0.1:5001");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "secret"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("JWT_EXPIRATION_SECS", "60"),
            ("UPLOAD_DIR", "/var/lib/taskboard"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.jwt_expiration_secs, 60);
        assert_eq!(config.upload_dir, "/var/lib/taskboard");
    }

    #[test]
    fn test_config_missing_secret() {
        let err = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://test")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_config_invalid_port() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "secret"),
            ("SERVER_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "SERVER_PORT has an invalid value: \"eighty\"");
    }

    #[test]
    fn test_config_rejects_non_positive_token_lifetime() {
        for raw in ["0", "-60"] {
            let err = Config::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://test"),
                ("JWT_SECRET", "secret"),
                ("JWT_EXPIRATION_SECS", raw),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: "JWT_EXPIRATION_SECS", .. }),
                "{} should be rejected",
                raw
            );
        }
    }
}
