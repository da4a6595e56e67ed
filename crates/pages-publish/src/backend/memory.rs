//! In-memory Backend
//!
//! For development and tests. Same contract as the hosted backend: create-only
//! object writes, unique slugs, public-only single-row lookup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use pages_core::{LandingPageRecord, NewLandingPage, UserId, UserIdentity};

use super::{ObjectStore, RecordStore, SessionProvider, WriteOptions, check_key};
use crate::error::{StoreError, StoreResult};

/// An object held by [`MemoryObjectStore`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Object store backed by a map
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    /// Writes whose key contains this fragment fail
    fail_matching: Option<String>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every write whose key contains `fragment`
    pub fn failing_on(fragment: impl Into<String>) -> Self {
        Self {
            fail_matching: Some(fragment.into()),
            ..Self::default()
        }
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn write(&self, key: &str, bytes: Bytes, options: WriteOptions) -> StoreResult<String> {
        check_key(key)?;
        if self.fail_matching.as_deref().is_some_and(|f| key.contains(f)) {
            return Err(StoreError::Backend(format!("simulated failure writing {key}")));
        }

        let mut objects = self.objects.write().await;
        if !options.overwrite && objects.contains_key(key) {
            return Err(StoreError::Conflict(key.to_string()));
        }
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: options.content_type,
            },
        );
        Ok(key.to_string())
    }

    async fn read(&self, key: &str) -> StoreResult<StoredObject> {
        check_key(key)?;
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Record store backed by a vector
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<RwLock<Vec<LandingPageRecord>>>,
    reject_inserts: bool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every insert fails with a backend error
    pub fn rejecting_inserts() -> Self {
        Self {
            reject_inserts: true,
            ..Self::default()
        }
    }

    /// Seed a record directly, bypassing the unique-slug check
    pub async fn put(&self, record: LandingPageRecord) {
        self.records.write().await.push(record);
    }

    pub async fn all(&self) -> Vec<LandingPageRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, page: NewLandingPage) -> StoreResult<LandingPageRecord> {
        if self.reject_inserts {
            return Err(StoreError::Backend("insert rejected".into()));
        }

        let mut records = self.records.write().await;
        if records.iter().any(|r| r.slug == page.slug) {
            return Err(StoreError::Conflict(format!("slug {}", page.slug)));
        }
        let record = LandingPageRecord::from_new(page, Uuid::new_v4(), Utc::now());
        records.push(record.clone());
        Ok(record)
    }

    async fn select_public(&self, slug: &str) -> StoreResult<LandingPageRecord> {
        let records = self.records.read().await;
        let mut matches = records.iter().filter(|r| r.slug == slug && r.is_public);
        match (matches.next(), matches.count()) {
            (None, _) => Err(StoreError::NoRows),
            (Some(record), 0) => Ok(record.clone()),
            (Some(_), rest) => Err(StoreError::MultipleRows(rest + 1)),
        }
    }

    async fn list_by_owner(&self, owner: &UserId) -> StoreResult<Vec<LandingPageRecord>> {
        let mut pages: Vec<LandingPageRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| &r.user_id == owner)
            .cloned()
            .collect();
        pages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pages)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Fixed token → user table
#[derive(Clone, Default)]
pub struct StaticSessions {
    users: HashMap<String, UserIdentity>,
}

impl StaticSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, token: impl Into<String>, user: UserIdentity) -> Self {
        self.users.insert(token.into(), user);
        self
    }
}

#[async_trait]
impl SessionProvider for StaticSessions {
    async fn current_user(&self, access_token: &str) -> StoreResult<Option<UserIdentity>> {
        Ok(self.users.get(access_token).cloned())
    }
}
