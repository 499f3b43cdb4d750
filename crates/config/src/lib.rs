use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "doorman.toml",
    "config/doorman.toml",
    "crates/config/doorman.toml",
    "../doorman.toml",
    "../config/doorman.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Per-call budget for store operations, so a slow store cannot
    /// hold a request indefinitely.
    #[serde(default = "DatabaseConfig::default_call_timeout")]
    pub call_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://doorman.db".to_string(),
            max_connections: 10,
            call_timeout_seconds: Self::default_call_timeout(),
        }
    }
}

impl DatabaseConfig {
    const fn default_call_timeout() -> u64 {
        5
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Token lifetime in minutes. Expiry is embedded in the signed
    /// payload and is the only end-of-life mechanism for a token.
    #[serde(default = "JwtConfig::default_expiration_minutes")]
    pub expiration_minutes: u64,
    /// PEM-encoded RSA private key used to sign tokens (PS256).
    #[serde(default)]
    pub private_key_pem: String,
    /// PEM-encoded RSA public key; sufficient on its own to validate
    /// tokens issued with the private key above.
    #[serde(default)]
    pub public_key_pem: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            expiration_minutes: Self::default_expiration_minutes(),
            private_key_pem: String::new(),
            public_key_pem: String::new(),
        }
    }
}

impl JwtConfig {
    const fn default_expiration_minutes() -> u64 {
        60
    }
}

/// Load the application configuration by combining defaults, an optional
/// configuration file, and environment overrides.
///
/// ```
/// use doorman_config::load;
///
/// std::env::remove_var("DOORMAN_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.database.url.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("database.url", defaults.database.url.clone())
        .unwrap()
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )
        .unwrap()
        .set_default(
            "database.call_timeout_seconds",
            i64::try_from(defaults.database.call_timeout_seconds).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default(
            "jwt.expiration_minutes",
            i64::try_from(defaults.jwt.expiration_minutes).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default("jwt.private_key_pem", defaults.jwt.private_key_pem.clone())
        .unwrap()
        .set_default("jwt.public_key_pem", defaults.jwt.public_key_pem.clone())
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("DOORMAN").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("DOORMAN_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via DOORMAN_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(
        database_url = %config.database.url,
        expiration_minutes = config.jwt.expiration_minutes,
        "loaded doorman configuration"
    );
    Ok(config)
}
