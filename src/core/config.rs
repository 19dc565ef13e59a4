//! Environment-driven configuration.
//!
//! Everything is read once at startup. A missing required variable aborts
//! the boot with a message naming it; optional variables fall back to the
//! defaults listed next to each section.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub storage: StorageConfig,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env(),
            storage: StorageConfig::from_env(),
            rate_limit: RateLimitConfig::from_env()?,
        })
    }
}

fn required(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("{} must be set", name))
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|e| format!("Invalid {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}

fn secs_or(name: &str, default_secs: u64) -> Result<Duration, String> {
    Ok(Duration::from_secs(parse_or(name, default_secs)?))
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

impl AppConfig {
    const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024; // 10MB

    fn from_env() -> Result<Self, String> {
        // Comma-separated origin list; "*" anywhere in it means allow any
        let cors_allowed_origins = var_or("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: var_or("HOST", "127.0.0.1"),
            port: parse_or("PORT", 3000)?,
            cors_allowed_origins,
            max_request_body_size: parse_or("MAX_REQUEST_BODY_SIZE", Self::DEFAULT_BODY_LIMIT)?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, String> {
        Ok(Self {
            url: required("DATABASE_URL")?,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
            min_connections: parse_or("DB_MIN_CONNECTIONS", 1)?,
            acquire_timeout: secs_or("DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            idle_timeout: secs_or("DB_IDLE_TIMEOUT_SECS", 600)?,
            max_lifetime: secs_or("DB_MAX_LIFETIME_SECS", 1800)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub jwt_leeway: Duration,
}

impl AuthConfig {
    fn from_env() -> Result<Self, String> {
        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters".to_string());
        }

        Ok(Self {
            jwt_secret,
            token_ttl: secs_or("TOKEN_TTL_SECS", 24 * 3600)?,
            jwt_leeway: secs_or("JWT_LEEWAY", 60)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl SwaggerConfig {
    fn from_env() -> Self {
        Self {
            // Empty credentials count as unset; both halves are needed
            username: env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty()),
            password: env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty()),
            title: var_or("SWAGGER_TITLE", "KampusCare API"),
            version: var_or("SWAGGER_VERSION", env!("CARGO_PKG_VERSION")),
            description: var_or(
                "SWAGGER_DESCRIPTION",
                "API documentation for the KampusCare facility damage report service",
            ),
        }
    }

    /// "username:password" when basic auth for the docs UI is configured
    pub fn credentials(&self) -> Option<String> {
        Some(format!(
            "{}:{}",
            self.username.as_ref()?,
            self.password.as_ref()?
        ))
    }
}

/// Local blob storage for uploaded evidence images
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory uploaded files are written to
    pub root_dir: String,
    /// Base URL uploaded files are served from
    pub base_url: String,
}

impl StorageConfig {
    fn from_env() -> Self {
        Self {
            root_dir: var_or("STORAGE_ROOT_DIR", "./uploads"),
            base_url: var_or("STORAGE_BASE_URL", "http://localhost:3000"),
        }
    }
}

/// Fixed-window limiter guarding submit, assign and login.
/// Defaults to one request per minute, matching the cool-down copy.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitConfig {
    fn from_env() -> Result<Self, String> {
        Ok(Self {
            max_requests: parse_or("RATE_LIMIT_MAX_REQUESTS", 1)?,
            window: secs_or("RATE_LIMIT_WINDOW_SECS", 60)?,
        })
    }
}
