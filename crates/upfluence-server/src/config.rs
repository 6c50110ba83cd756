use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

/// JWT secrets that ship in example files and must never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "your-secret-key",
];

const DEV_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("UPFLUENCE_JWT_SECRET is unset or still a placeholder")]
    InsecureSecret,

    #[error("invalid {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match var("UPFLUENCE_ENV").as_deref() {
            None | Some("development") | Some("dev") => Environment::Development,
            Some("production") | Some("prod") => Environment::Production,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "UPFLUENCE_ENV",
                    value: other.to_string(),
                });
            }
        };

        let jwt_secret = match var("UPFLUENCE_JWT_SECRET") {
            Some(secret) if !PLACEHOLDER_SECRETS.contains(&secret.as_str()) => secret,
            _ if environment == Environment::Production => return Err(ConfigError::InsecureSecret),
            Some(secret) => {
                warn!("UPFLUENCE_JWT_SECRET is a placeholder; only acceptable in development");
                secret
            }
            None => {
                warn!("UPFLUENCE_JWT_SECRET not set; using the development secret");
                DEV_SECRET.to_string()
            }
        };

        let host = var("UPFLUENCE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = var("UPFLUENCE_PORT").unwrap_or_else(|| "3000".into());
        let addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: "UPFLUENCE_HOST/UPFLUENCE_PORT",
                value: format!("{host}:{port}"),
            })?;

        Ok(Self {
            environment,
            addr,
            db_path: var("UPFLUENCE_DB_PATH").unwrap_or_else(|| "upfluence.db".into()).into(),
            jwt_secret,
            static_dir: var("UPFLUENCE_STATIC_DIR").map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn development_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.environment, Environment::Development);
        assert_eq!(cfg.addr.port(), 3000);
        assert_eq!(cfg.db_path, PathBuf::from("upfluence.db"));
        assert_eq!(cfg.jwt_secret, DEV_SECRET);
        assert!(cfg.static_dir.is_none());
    }

    #[test]
    fn production_requires_real_secret() {
        assert!(matches!(
            config(&[("UPFLUENCE_ENV", "production")]),
            Err(ConfigError::InsecureSecret)
        ));
        assert!(matches!(
            config(&[("UPFLUENCE_ENV", "production"), ("UPFLUENCE_JWT_SECRET", "dev-secret-change-me")]),
            Err(ConfigError::InsecureSecret)
        ));
        assert!(matches!(
            config(&[("UPFLUENCE_ENV", "production"), ("UPFLUENCE_JWT_SECRET", "   ")]),
            Err(ConfigError::InsecureSecret)
        ));

        let cfg = config(&[
            ("UPFLUENCE_ENV", "production"),
            ("UPFLUENCE_JWT_SECRET", "9f2c1d7e-long-random"),
            ("UPFLUENCE_PORT", "8080"),
            ("UPFLUENCE_STATIC_DIR", "./public"),
        ])
        .unwrap();
        assert_eq!(cfg.environment, Environment::Production);
        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.static_dir, Some(PathBuf::from("./public")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(config(&[("UPFLUENCE_PORT", "eighty")]), Err(ConfigError::Invalid { .. })));
        assert!(matches!(config(&[("UPFLUENCE_ENV", "staging")]), Err(ConfigError::Invalid { .. })));
    }
}
