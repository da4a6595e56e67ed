//! Supabase Backend
//!
//! Object store, record store and session provider over the hosted REST
//! APIs (`/storage/v1`, `/rest/v1`, `/auth/v1`).

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::Deserialize;
use tracing::{debug, warn};

use pages_core::model::PAGES_TABLE;
use pages_core::{AssetUrlBase, LandingPageRecord, NewLandingPage, UserId, UserIdentity};
use pages_publish::backend::{
    ObjectStore, RecordStore, SessionProvider, StoredObject, WriteOptions, check_key,
};
use pages_publish::{StoreError, StoreResult};

use crate::config::SupabaseConfig;

/// Hosted backend client
#[derive(Clone)]
pub struct SupabaseBackend {
    client: Client,
    config: SupabaseConfig,
}

#[derive(Default, Deserialize)]
struct StorageErrorBody {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Default, Deserialize)]
struct RestErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Unique-violation code returned by the REST layer
const UNIQUE_VIOLATION: &str = "23505";

impl SupabaseBackend {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Public asset base for this project and bucket
    pub fn asset_base(&self) -> AssetUrlBase {
        AssetUrlBase::for_bucket(&self.config.url, &self.config.bucket)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.config.write_key();
        request
            .header("apikey", &self.config.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {key}"))
    }

    async fn send(request: RequestBuilder) -> StoreResult<Response> {
        request.send().await.map_err(|e| StoreError::Network(e.to_string()))
    }

    async fn rest_error(response: Response) -> StoreError {
        let status = response.status();
        let body: RestErrorBody = response.json().await.unwrap_or_default();
        if body.code == UNIQUE_VIOLATION || status == StatusCode::CONFLICT {
            return StoreError::Conflict(body.message);
        }
        StoreError::Backend(format!("{status}: {}", body.message))
    }

    async fn select(&self, filters: &[(&str, String)]) -> StoreResult<Vec<LandingPageRecord>> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".into())];
        query.extend(filters.iter().cloned());

        let request = self
            .authorized(self.client.get(self.endpoint(&format!("/rest/v1/{PAGES_TABLE}"))))
            .query(&query);
        let response = Self::send(request).await?;
        if !response.status().is_success() {
            return Err(Self::rest_error(response).await);
        }
        response.json().await.map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl ObjectStore for SupabaseBackend {
    async fn write(&self, key: &str, bytes: Bytes, options: WriteOptions) -> StoreResult<String> {
        check_key(key)?;
        let url = self.endpoint(&format!("/storage/v1/object/{}/{}", self.config.bucket, key));
        let size = bytes.len();

        let request = self
            .authorized(self.client.post(url))
            .header("x-upsert", if options.overwrite { "true" } else { "false" })
            .header(header::CACHE_CONTROL, options.cache_control_secs.to_string())
            .header(header::CONTENT_TYPE, &options.content_type)
            .body(bytes);
        let response = Self::send(request).await?;

        let status = response.status();
        if status.is_success() {
            debug!(key = %key, size_bytes = size, "Stored object");
            return Ok(key.to_string());
        }

        let body: StorageErrorBody = response.json().await.unwrap_or_default();
        let duplicate =
            body.error.eq_ignore_ascii_case("duplicate") || body.message.contains("already exists");
        if status == StatusCode::CONFLICT || duplicate {
            return Err(StoreError::Conflict(key.to_string()));
        }
        warn!(key = %key, %status, error = %body.error, "Object write rejected");
        Err(StoreError::Backend(format!("{status}: {} {}", body.error, body.message)))
    }

    async fn read(&self, key: &str) -> StoreResult<StoredObject> {
        check_key(key)?;
        let url = self.endpoint(&format!(
            "/storage/v1/object/public/{}/{}",
            self.config.bucket, key
        ));
        let response = Self::send(self.client.get(url)).await?;

        match response.status() {
            status if status.is_success() => {
                let content_type = response
                    .headers()
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = response.bytes().await.map_err(|e| StoreError::Network(e.to_string()))?;
                Ok(StoredObject { bytes, content_type })
            }
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                Err(StoreError::NotFound(key.to_string()))
            }
            status => Err(StoreError::Backend(status.to_string())),
        }
    }

    fn name(&self) -> &str {
        "supabase"
    }
}

#[async_trait]
impl RecordStore for SupabaseBackend {
    async fn insert(&self, page: NewLandingPage) -> StoreResult<LandingPageRecord> {
        let request = self
            .authorized(self.client.post(self.endpoint(&format!("/rest/v1/{PAGES_TABLE}"))))
            .header("Prefer", "return=representation")
            .json(&page);
        let response = Self::send(request).await?;
        if !response.status().is_success() {
            return Err(Self::rest_error(response).await);
        }

        let mut rows: Vec<LandingPageRecord> =
            response.json().await.map_err(|e| StoreError::Backend(e.to_string()))?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(StoreError::NoRows),
            n => Err(StoreError::MultipleRows(n)),
        }
    }

    async fn select_public(&self, slug: &str) -> StoreResult<LandingPageRecord> {
        let mut rows = self
            .select(&[("slug", format!("eq.{slug}")), ("is_public", "eq.true".into())])
            .await?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(StoreError::NoRows),
            n => Err(StoreError::MultipleRows(n)),
        }
    }

    async fn list_by_owner(&self, owner: &UserId) -> StoreResult<Vec<LandingPageRecord>> {
        self.select(&[
            ("user_id", format!("eq.{owner}")),
            ("order", "created_at.desc".into()),
        ])
        .await
    }

    fn name(&self) -> &str {
        "supabase"
    }
}

#[async_trait]
impl SessionProvider for SupabaseBackend {
    async fn current_user(&self, access_token: &str) -> StoreResult<Option<UserIdentity>> {
        let request = self
            .client
            .get(self.endpoint("/auth/v1/user"))
            .header("apikey", &self.config.anon_key)
            .header(header::AUTHORIZATION, format!("Bearer {access_token}"));
        let response = Self::send(request).await?;

        match response.status() {
            status if status.is_success() => {
                let user: AuthUser = response
                    .json()
                    .await
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
                let identity = UserIdentity::new(user.id);
                Ok(Some(match user.email {
                    Some(email) => identity.with_email(email),
                    None => identity,
                }))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => Err(StoreError::Backend(format!("session lookup: {status}"))),
        }
    }
}
