use std::net::IpAddr;

use thiserror::Error;
use weatherpredict_supabase::SupabaseConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug)]
pub enum Backend {
    Supabase(SupabaseConfig),
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogFileConfig {
    pub path: String,
    pub archive_pattern: String,
}

#[derive(Debug)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub backend: Backend,
    pub secure_cookies: bool,
    pub log_file: Option<LogFileConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let host_raw = lookup("WEATHERPREDICT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "WEATHERPREDICT_HOST",
            value: host_raw.clone(),
        })?;

        let port = match lookup("WEATHERPREDICT_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "WEATHERPREDICT_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let backend = match lookup("WEATHERPREDICT_BACKEND").as_deref() {
            None | Some("supabase") => Backend::Supabase(
                SupabaseConfig::new(
                    required("SUPABASE_URL")?,
                    required("SUPABASE_ANON_KEY")?,
                    required("SUPABASE_JWT_SECRET")?,
                )
                .with_service_role_key(lookup("SUPABASE_SERVICE_ROLE_KEY")),
            ),
            Some("memory") => Backend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "WEATHERPREDICT_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let secure_cookies = match lookup("WEATHERPREDICT_SECURE_COOKIES") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                key: "WEATHERPREDICT_SECURE_COOKIES",
                value: raw,
            })?,
            None => false,
        };

        let log_file = match (lookup("LOG_FILE_PATH"), lookup("LOG_ARCHIVE_PATTERN")) {
            (Some(path), Some(archive_pattern)) => Some(LogFileConfig {
                path,
                archive_pattern,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("LOG_ARCHIVE_PATTERN")),
            (None, Some(_)) => return Err(ConfigError::Missing("LOG_FILE_PATH")),
        };

        Ok(Self {
            host,
            port,
            backend,
            secure_cookies,
            log_file,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_memory_defaults() {
        let config = config(&[("WEATHERPREDICT_BACKEND", "memory")]).unwrap();
        assert_eq!(config.host.to_string(), "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(matches!(config.backend, Backend::Memory));
        assert!(!config.secure_cookies);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_supabase_is_default_and_needs_credentials() {
        assert_eq!(
            config(&[]).unwrap_err(),
            ConfigError::Missing("SUPABASE_URL")
        );
        let config = config(&[
            ("SUPABASE_URL", "https://abc.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SUPABASE_JWT_SECRET", "secret"),
            ("WEATHERPREDICT_PORT", "3000"),
            ("WEATHERPREDICT_SECURE_COOKIES", "true"),
        ])
        .unwrap();
        let Backend::Supabase(supabase) = config.backend else {
            panic!("expected the hosted backend");
        };
        assert_eq!(supabase.url, "https://abc.supabase.co");
        assert_eq!(config.port, 3000);
        assert!(config.secure_cookies);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config(&[("WEATHERPREDICT_BACKEND", "sqlite")]).unwrap_err(),
            ConfigError::Invalid {
                key: "WEATHERPREDICT_BACKEND",
                value: "sqlite".to_string()
            }
        );
        assert!(config(&[("WEATHERPREDICT_BACKEND", "memory"), ("WEATHERPREDICT_PORT", "http")]).is_err());
        assert!(config(&[("WEATHERPREDICT_BACKEND", "memory"), ("WEATHERPREDICT_HOST", "localhost:1")]).is_err());
    }

    #[test]
    fn test_log_file_needs_both_settings() {
        assert_eq!(
            config(&[("WEATHERPREDICT_BACKEND", "memory"), ("LOG_FILE_PATH", "log/app.log")]).unwrap_err(),
            ConfigError::Missing("LOG_ARCHIVE_PATTERN")
        );
        let config = config(&[
            ("WEATHERPREDICT_BACKEND", "memory"),
            ("LOG_FILE_PATH", "log/app.log"),
            ("LOG_ARCHIVE_PATTERN", "log/app.{}.log.gz"),
        ])
        .unwrap();
        assert_eq!(
            config.log_file,
            Some(LogFileConfig {
                path: "log/app.log".to_string(),
                archive_pattern: "log/app.{}.log.gz".to_string(),
            })
        );
    }
}
