//! Server configuration

use std::time::Duration;

use pages_publish::backend::DEFAULT_BUCKET;
use pages_runtime::config::{ConfigError, env_var};

/// 10 images of 3 MiB, one 50 MiB video and 10 MiB for the other fields
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 94_371_840;

/// Which backend the server talks to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Supabase,
}

impl BackendKind {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "supabase" => Ok(BackendKind::Supabase),
            _ => Err(ConfigError::Invalid {
                var: "PAGES_BACKEND",
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Supabase => "supabase",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub backend: BackendKind,
    /// Public store root; asset URLs are derived from it
    pub store_root_url: Option<String>,
    pub bucket: String,
    /// Memory backend: the one accepted bearer token and its owner
    pub dev_session: Option<(String, String)>,
    pub contact_delay: Duration,
    pub static_dir: String,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            backend: BackendKind::Memory,
            store_root_url: None,
            bucket: DEFAULT_BUCKET.into(),
            dev_session: None,
            contact_delay: Duration::from_millis(1000),
            static_dir: "static".into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend = match env_var("PAGES_BACKEND") {
            Some(value) => BackendKind::parse(&value)?,
            None => defaults.backend,
        };

        let dev_session = match (env_var("DEV_ACCESS_TOKEN"), env_var("DEV_USER_ID")) {
            (Some(token), Some(user)) => Some((token, user)),
            (Some(_), None) => return Err(ConfigError::Missing("DEV_USER_ID")),
            _ => None,
        };

        Ok(Self {
            bind_addr: env_var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            backend,
            store_root_url: env_var("STORE_ROOT_URL"),
            bucket: env_var("STORAGE_BUCKET").unwrap_or(defaults.bucket),
            dev_session,
            contact_delay: Duration::from_millis(parse_var("CONTACT_DELAY_MS", 1000)?),
            static_dir: env_var("STATIC_DIR").unwrap_or(defaults.static_dir),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }

    /// Store root for the memory backend, which serves its own `/assets`
    pub fn local_store_root(&self) -> String {
        self.store_root_url.clone().unwrap_or_else(|| {
            let port = self.bind_addr.rsplit(':').next().unwrap_or("3000");
            format!("http://localhost:{port}")
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env_var(name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { var: name, value }),
    }
}
