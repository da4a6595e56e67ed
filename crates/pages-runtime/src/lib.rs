//! # pages-runtime
//!
//! Hosted backend integrations for the landing page pipeline.
//!
//! ## Backends
//!
//! - **Supabase** (default): storage, REST tables and auth over HTTP
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pages_runtime::{SupabaseBackend, SupabaseConfig};
//!
//! let backend = Arc::new(SupabaseBackend::new(SupabaseConfig::from_env()?));
//! let publisher = Publisher::new(backend.clone(), backend.clone());
//! let resolver = PageResolver::new(backend.clone(), backend.asset_base());
//! ```

pub mod config;

#[cfg(feature = "supabase")]
pub mod supabase;

pub use config::{ConfigError, SupabaseConfig};

#[cfg(feature = "supabase")]
pub use supabase::SupabaseBackend;
