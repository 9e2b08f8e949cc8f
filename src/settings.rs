use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    /// Public prefix prepended verbatim to stored image paths.
    #[serde(default = "default_static_url")]
    pub static_url: String,

    #[serde(default = "default_media_root")]
    pub media_root: String,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
}

/// The slice of configuration the naming/URL derivation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSettings {
    pub static_url: String,
    pub upload_dir: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        MediaSettings {
            static_url: default_static_url(),
            upload_dir: default_upload_dir(),
        }
    }
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Project-Admin".to_string()
}
fn default_max_connections() -> u32 {
    10
}
fn default_static_url() -> String {
    "/static/".to_string()
}
fn default_media_root() -> String {
    "media".to_string()
}
fn default_upload_dir() -> String {
    "public/images/projects/".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.static_url.is_empty() {
            errors.push("STATIC_URL cannot be empty");
        }
        if self.db_max_connections == 0 {
            errors.push("DB_MAX_CONNECTIONS must be positive");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn media(&self) -> MediaSettings {
        MediaSettings {
            static_url: self.static_url.clone(),
            upload_dir: self.upload_dir.clone(),
        }
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

fn redact(value: &str) -> &str {
    if value.is_empty() { "[MISSING]" } else { "[REDACTED]" }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("database_url", &redact(&self.database_url))
            .field("db_max_connections", &self.db_max_connections)
            .field("static_url", &self.static_url)
            .field("media_root", &self.media_root)
            .field("upload_dir", &self.upload_dir)
            .finish()
    }
}
