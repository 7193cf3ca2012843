use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub limits: LimitsConfig,
    pub qr: QrConfig,
    /// Verification of tokens issued by the identity provider
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Origin of the public menu site; QR codes point below it.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Apply embedded migrations at startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Per-owner limit on authenticated routes (0 disables)
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// Per-IP limit on public menu routes (0 disables)
    #[serde(default = "default_public_rate_limit")]
    pub public_rate_limit_per_minute: u32,

    /// Emit Strict-Transport-Security (enable behind TLS only)
    #[serde(default)]
    pub hsts_enabled: bool,

    /// Take the client address from X-Forwarded-For / X-Real-IP.
    /// Only enable behind a reverse proxy that overwrites those headers.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: u32,

    #[serde(default = "default_max_restaurants_per_owner")]
    pub max_restaurants_per_owner: i64,

    #[serde(default = "default_max_qr_codes_per_menu")]
    pub max_qr_codes_per_menu: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QrConfig {
    /// PNG edge length when a request does not give one
    #[serde(default = "default_png_size")]
    pub default_png_size: u32,

    /// Codes rendered per blocking task during batch generation
    #[serde(default = "default_render_chunk_size")]
    pub render_chunk_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 secret of the identity provider
    pub jwt_secret: String,

    /// Expected `aud` claim; unchecked when empty
    #[serde(default)]
    pub audience: String,

    /// Clock skew tolerance in seconds
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    1_048_576
}
fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_run_migrations() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    120
}
fn default_public_rate_limit() -> u32 {
    300
}
fn default_max_batch_size() -> u32 {
    50
}
fn default_max_restaurants_per_owner() -> i64 {
    25
}
fn default_max_qr_codes_per_menu() -> i64 {
    500
}
fn default_png_size() -> u32 {
    512
}
fn default_render_chunk_size() -> usize {
    10
}
fn default_jwt_leeway() -> u64 {
    shared::jwt::DEFAULT_LEEWAY_SECS
}

impl DatabaseConfig {
    /// Pool settings for the persistence layer.
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with MB__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("MB").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for unit tests from embedded defaults plus overrides.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30
            max_body_size = 1048576
            public_base_url = "http://localhost:3000"

            [database]
            url = ""
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600
            run_migrations = false

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_minute = 120
            public_rate_limit_per_minute = 300
            hsts_enabled = false
            trust_proxy_headers = false

            [limits]
            max_batch_size = 50
            max_restaurants_per_owner = 25
            max_qr_codes_per_menu = 500

            [qr]
            default_png_size = 512
            render_chunk_size = 10

            [auth]
            jwt_secret = "test-secret"
            audience = ""
            leeway_secs = 30
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "MB__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "MB__AUTH__JWT_SECRET environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if !shared::validation::is_http_url(&self.server.public_base_url) {
            return Err(ConfigValidationError::InvalidValue(
                "public_base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.qr.render_chunk_size == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "render_chunk_size must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    /// Audience to enforce on incoming tokens.
    pub fn jwt_audience(&self) -> Option<&str> {
        Some(self.auth.audience.as_str()).filter(|a| !a.is_empty())
    }
}
