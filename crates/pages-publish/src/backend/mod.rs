//! Backend Integration
//!
//! The external collaborators of the pipeline and resolver: a path-addressed
//! object store, a record store with filtered single-row queries, and the
//! session service. Each is a trait so the hosted backend and the in-memory
//! implementations are interchangeable.

mod memory;

pub use memory::{MemoryObjectStore, MemoryRecordStore, StaticSessions, StoredObject};

use async_trait::async_trait;
use bytes::Bytes;

use pages_core::{LandingPageRecord, NewLandingPage, UserId, UserIdentity};

use crate::error::StoreResult;

/// Bucket used for page assets unless configured otherwise
pub const DEFAULT_BUCKET: &str = "landing_page_assets";

/// Cache lifetime attached to uploaded objects, in seconds
pub const CACHE_CONTROL_SECS: u32 = 3600;

/// Options for a single object write
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    pub content_type: String,
    /// Replace an existing object at the same key
    pub overwrite: bool,
    pub cache_control_secs: u32,
}

impl WriteOptions {
    /// Create-only write, the only mode the pipeline uses
    pub fn create(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            overwrite: false,
            cache_control_secs: CACHE_CONTROL_SECS,
        }
    }
}

/// Path-addressed binary storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` under `key`; returns the stored key
    async fn write(&self, key: &str, bytes: Bytes, options: WriteOptions) -> StoreResult<String>;

    /// Read an object back, for stores that serve their own objects
    async fn read(&self, key: &str) -> StoreResult<StoredObject>;

    /// Backend name
    fn name(&self) -> &str;
}

/// Structured page records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a page; the store assigns `id` and `created_at`
    async fn insert(&self, page: NewLandingPage) -> StoreResult<LandingPageRecord>;

    /// Exactly one row with `slug` and `is_public = true`
    async fn select_public(&self, slug: &str) -> StoreResult<LandingPageRecord>;

    /// All pages of `owner`, newest first
    async fn list_by_owner(&self, owner: &UserId) -> StoreResult<Vec<LandingPageRecord>>;

    /// Backend name
    fn name(&self) -> &str;
}

/// Resolves an access token to the signed-in user
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// `None` is the explicit "not authenticated" outcome
    async fn current_user(&self, access_token: &str) -> StoreResult<Option<UserIdentity>>;
}

/// Validate a store-relative key
pub fn check_key(key: &str) -> StoreResult<()> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if bad {
        return Err(crate::error::StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
