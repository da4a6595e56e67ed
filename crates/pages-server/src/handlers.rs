//! JSON API Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pages_core::render::page_path;
use pages_core::text::improve_description;
use pages_core::{
    AssetRejection, ColorPalette, ContactForm, ContactMessage, PageError, PageSummary, PublicPage,
    RejectReason, UserIdentity, ValidationError,
};
use pages_publish::StoreError;

use crate::auth::CurrentUser;
use crate::state::AppState;
use crate::upload::{PageUpload, UploadError};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub backend: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Error half of every JSON handler
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

/// Map the authoring/view taxonomy onto HTTP
pub fn page_error(err: &PageError) -> ApiError {
    let (status, code) = match err {
        PageError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
        PageError::Upload { .. } => (StatusCode::BAD_GATEWAY, "UPLOAD_FAILED"),
        PageError::Persist(_) => (StatusCode::BAD_GATEWAY, "PERSIST_FAILED"),
        PageError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        PageError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG"),
    };
    api_error(status, err.user_message(), code)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadWarning {
    pub file_name: String,
    pub message: String,
    #[serde(flatten)]
    pub reason: RejectReason,
}

impl From<AssetRejection> for UploadWarning {
    fn from(rejection: AssetRejection) -> Self {
        Self {
            message: rejection.user_message(),
            file_name: rejection.file_name,
            reason: rejection.reason,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePageResponse {
    pub slug: String,
    pub url: String,
    pub warnings: Vec<UploadWarning>,
}

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImproveResponse {
    pub improved: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub sent: bool,
}

// ============================================================================
// Contact delivery (shared with the HTML form)
// ============================================================================

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("page not found")]
    NotFound,

    #[error("contact form disabled for this page")]
    Disabled,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("delivery failed: {0}")]
    Delivery(#[from] StoreError),
}

impl ContactError {
    pub fn user_message(&self) -> String {
        match self {
            ContactError::NotFound => PageError::NotFound(String::new()).user_message(),
            ContactError::Disabled => "Esta página não aceita mensagens.".into(),
            ContactError::Invalid(e) => e.user_message(),
            ContactError::Delivery(_) => {
                "Ocorreu um erro ao enviar a sua mensagem. Tente novamente.".into()
            }
        }
    }

    fn into_api(self) -> ApiError {
        let (status, code) = match &self {
            ContactError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ContactError::Disabled => (StatusCode::FORBIDDEN, "CONTACT_DISABLED"),
            ContactError::Invalid(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION"),
            ContactError::Delivery(_) => (StatusCode::BAD_GATEWAY, "DELIVERY_FAILED"),
        };
        api_error(status, self.user_message(), code)
    }
}

/// Validate a visitor message against the page and hand it to the notifier
pub async fn deliver_contact(
    state: &AppState,
    slug: &str,
    form: ContactForm,
) -> Result<ContactMessage, ContactError> {
    let record = state
        .resolver
        .resolve(slug)
        .await
        .map_err(|_| ContactError::NotFound)?;
    if !record.cta_contact_form_enabled {
        return Err(ContactError::Disabled);
    }

    let message = ContactMessage::new(form, record.user_id.as_str(), record.title, record.slug)?;
    state.notifier.send(&message).await?;
    Ok(message)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        backend: state.backend.clone(),
    })
}

/// Who is signed in; 401 sends the client to the login route
pub async fn current_session(CurrentUser(user): CurrentUser) -> Json<UserIdentity> {
    Json(user)
}

/// Dashboard listing, newest first
pub async fn list_pages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<PageSummary>>, ApiError> {
    let records = state.records.list_by_owner(&user.id).await.map_err(|e| {
        tracing::warn!(owner_id = %user.id, error = %e, "Listing pages failed");
        api_error(StatusCode::BAD_GATEWAY, "Não foi possível carregar as páginas.", "BACKEND")
    })?;

    Ok(Json(records.iter().map(|r| r.summary()).collect()))
}

/// Multipart page creation
pub async fn create_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatePageResponse>), ApiError> {
    let upload = PageUpload::from_multipart(&mut multipart).await.map_err(|e| {
        let code = match e {
            UploadError::Multipart(_) => "BAD_MULTIPART",
            UploadError::Benefits(_) => "BAD_BENEFITS",
        };
        api_error(StatusCode::BAD_REQUEST, e.to_string(), code)
    })?;

    let (form, rejections) = upload
        .into_form()
        .map_err(|e| page_error(&PageError::Validation(e)))?;
    for rejection in &rejections {
        tracing::info!(file = %rejection.file_name, reason = ?rejection.reason, "Image skipped");
    }

    let draft = form.draft().map_err(|e| page_error(&PageError::Validation(e)))?;
    let published = state.publisher.submit(&user, &draft).await.map_err(|e| {
        tracing::error!(owner_id = %user.id, error = %e, "Page submission failed");
        page_error(&e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePageResponse {
            url: page_path(&published.slug),
            slug: published.slug,
            warnings: rejections.into_iter().map(UploadWarning::from).collect(),
        }),
    ))
}

/// Public page view model
pub async fn get_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicPage>, ApiError> {
    state
        .resolver
        .resolve_page(&slug)
        .await
        .map(Json)
        .map_err(|e| page_error(&e))
}

/// Visitor contact message (JSON)
pub async fn send_contact(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactResponse>, ApiError> {
    deliver_contact(&state, &slug, form)
        .await
        .map_err(ContactError::into_api)?;
    Ok(Json(ContactResponse { sent: true }))
}

/// Rule-based description clean-up
pub async fn improve_text(
    Json(payload): Json<ImproveRequest>,
) -> Result<Json<ImproveResponse>, ApiError> {
    let improved = improve_description(&payload.text, &mut rand::rng())
        .ok_or_else(|| page_error(&PageError::Validation(ValidationError::EmptyDescription)))?;
    Ok(Json(ImproveResponse { improved }))
}

/// A fresh complementary palette
pub async fn generate_palette() -> Json<ColorPalette> {
    Json(ColorPalette::generate(&mut rand::rng()))
}

/// Stored objects, when this server is the object store
pub async fn serve_asset(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let Some(objects) = state.local_assets.as_ref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match objects.read(&key).await {
        Ok(object) => (
            [
                (header::CONTENT_TYPE, object.content_type),
                (header::CACHE_CONTROL, "max-age=3600".to_string()),
            ],
            object.bytes,
        )
            .into_response(),
        Err(StoreError::NotFound(_) | StoreError::InvalidKey(_)) => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Asset read failed");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}
