use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub elasticsearch: ElasticsearchSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub batch: BatchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElasticsearchSettings {
    pub url: String,
    #[serde(default = "default_index")]
    pub index: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

fn default_index() -> String {
    "company_profiles".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Top-K bound on every candidate query.
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Edit bound handed to the index's fuzzy name queries.
    #[serde(default = "default_name_fuzzy_max_edits")]
    pub name_fuzzy_max_edits: u8,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            candidate_limit: default_candidate_limit(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            name_fuzzy_max_edits: default_name_fuzzy_max_edits(),
        }
    }
}

fn default_candidate_limit() -> usize { 10 }
fn default_max_retries() -> u32 { 3 }
fn default_retry_backoff_ms() -> u64 { 200 }
fn default_name_fuzzy_max_edits() -> u8 { 2 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    /// Normalized edit distance at which a name contributes nothing.
    #[serde(default = "default_name_distance_threshold")]
    pub name_distance_threshold: f64,
}

fn default_name_distance_threshold() -> f64 { 1.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_domain_weight")]
    pub domain: f64,
    #[serde(default = "default_phone_weight")]
    pub phone: f64,
    #[serde(default = "default_facebook_weight")]
    pub facebook: f64,
    #[serde(default = "default_name_max_weight")]
    pub name_max: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            domain: default_domain_weight(),
            phone: default_phone_weight(),
            facebook: default_facebook_weight(),
            name_max: default_name_max_weight(),
        }
    }
}

fn default_domain_weight() -> f64 { 10.0 }
fn default_phone_weight() -> f64 { 8.0 }
fn default_facebook_weight() -> f64 { 6.0 }
fn default_name_max_weight() -> f64 { 5.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct BatchSettings {
    #[serde(default = "default_batch_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_batch_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            concurrency: default_batch_concurrency(),
            timeout_secs: default_batch_timeout_secs(),
        }
    }
}

fn default_batch_concurrency() -> usize { 8 }
fn default_batch_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with MATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with MATCH__)
            // e.g., MATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply conventional environment overrides for the index connection.
/// The unprefixed `ELASTICSEARCH_*` names win over both the file and
/// the `MATCH__`-prefixed forms, matching common deployment setups.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let es_url = env::var("ELASTICSEARCH_URL").ok();
    let es_username = env::var("ELASTICSEARCH_USERNAME").ok();
    let es_password = env::var("ELASTICSEARCH_PASSWORD").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = es_url {
        builder = builder.set_override("elasticsearch.url", url)?;
    }
    if let Some(username) = es_username {
        builder = builder.set_override("elasticsearch.username", username)?;
    }
    if let Some(password) = es_password {
        builder = builder.set_override("elasticsearch.password", password)?;
    }

    builder.build()
}
