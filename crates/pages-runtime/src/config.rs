//! Backend configuration from the environment

use thiserror::Error;

use pages_publish::backend::DEFAULT_BUCKET;

/// Missing or malformed environment configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Read a variable, treating blank as unset
pub fn env_var(name: &'static str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn require_var(name: &'static str) -> Result<String, ConfigError> {
    env_var(name).ok_or(ConfigError::Missing(name))
}

/// Hosted backend connection settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project root URL, also the public store root
    pub url: String,

    /// Public key, sent as `apikey` on every request
    pub anon_key: String,

    /// Privileged key for server-side writes; falls back to the anon key
    pub service_key: Option<String>,

    pub bucket: String,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            service_key: None,
            bucket: DEFAULT_BUCKET.into(),
        }
    }

    pub fn with_service_key(mut self, key: impl Into<String>) -> Self {
        self.service_key = Some(key.into());
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// `SUPABASE_URL`, `SUPABASE_ANON_KEY`, optional `SUPABASE_SERVICE_KEY`
    /// and `STORAGE_BUCKET`
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = require_var("SUPABASE_URL")?;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                var: "SUPABASE_URL",
                value: url,
            });
        }

        let mut config = Self::new(url, require_var("SUPABASE_ANON_KEY")?);
        config.service_key = env_var("SUPABASE_SERVICE_KEY");
        if let Some(bucket) = env_var("STORAGE_BUCKET") {
            config.bucket = bucket;
        }
        Ok(config)
    }

    /// Key used for storage and table writes
    pub fn write_key(&self) -> &str {
        self.service_key.as_deref().unwrap_or(&self.anon_key)
    }
}
