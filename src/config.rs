use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum request body size in bytes (default: 64KB)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Directory holding the prebuilt frontend, served if it exists
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; when unset the in-memory store is used
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum idle connections in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of a login session in hours
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins (comma-separated, or "*" for any)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

/// Ten years
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.session_ttl_hours <= 0 || self.session_ttl_hours > MAX_SESSION_TTL_HOURS {
            anyhow::bail!(
                "SESSION_TTL_HOURS must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            );
        }
        Ok(())
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_max_body_size() -> usize { 64 * 1024 } // 64KB
fn default_static_dir() -> String { "static".to_string() }
fn default_max_connections() -> u32 { 20 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_session_ttl_hours() -> i64 { 24 * 7 }
fn default_min_password_length() -> usize { 8 }
fn default_cors_origins() -> String { "*".to_string() }

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or unparsable
fn env_or<T: std::str::FromStr>(key: &str, default: fn() -> T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let auth = AuthConfig {
            session_ttl_hours: env_or("SESSION_TTL_HOURS", default_session_ttl_hours),
            min_password_length: env_or("MIN_PASSWORD_LENGTH", default_min_password_length),
        };
        auth.validate()?;

        Ok(Config {
            server: ServerConfig {
                host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
                port: env_or("PORT", default_port),
                max_body_size: env_or("MAX_BODY_SIZE", default_max_body_size),
                static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| default_static_dir()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", default_max_connections),
                min_connections: env_or("DATABASE_MIN_CONNECTIONS", default_min_connections),
                connect_timeout_secs: env_or("DATABASE_CONNECT_TIMEOUT", default_connect_timeout),
                idle_timeout_secs: env_or("DATABASE_IDLE_TIMEOUT", default_idle_timeout),
            },
            auth,
            security: SecurityConfig {
                cors_origins: std::env::var("CORS_ORIGINS")
                    .unwrap_or_else(|_| default_cors_origins()),
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                max_body_size: default_max_body_size(),
                static_dir: default_static_dir(),
            },
            database: DatabaseConfig {
                url: None,
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
            },
            auth: AuthConfig {
                session_ttl_hours: default_session_ttl_hours(),
                min_password_length: default_min_password_length(),
            },
            security: SecurityConfig {
                cors_origins: default_cors_origins(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(session_ttl_hours: i64) -> AuthConfig {
        AuthConfig {
            session_ttl_hours,
            min_password_length: default_min_password_length(),
        }
    }

    #[test]
    fn test_session_ttl_bounds() {
        assert!(auth(default_session_ttl_hours()).validate().is_ok());
        assert!(auth(MAX_SESSION_TTL_HOURS).validate().is_ok());
        assert!(auth(0).validate().is_err());
        assert!(auth(-1).validate().is_err());
        assert!(auth(10_000_000_000).validate().is_err());
    }
}
