//! API Client

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use thiserror::Error;

use pages_core::{AuthState, PageSummary, SelectedFile, UserIdentity};

use crate::files::WebFile;
use crate::submission::Submission;

/// localStorage key of the bearer token
const TOKEN_KEY: &str = "pages_access_token";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No token, or the server no longer accepts it
    #[error("Sessão não encontrada. Por favor, inicie sessão novamente.")]
    Unauthorized,

    #[error("{0}")]
    Failed(String),
}

/// One skipped image reported by the server
#[derive(Clone, Debug, Deserialize)]
pub struct UploadWarning {
    pub file_name: String,
    pub message: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreatedPage {
    pub slug: String,
    pub url: String,
    #[serde(default)]
    pub warnings: Vec<UploadWarning>,
}

// ============================================================================
// Token storage
// ============================================================================

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn stored_token() -> Option<String> {
    storage()?.get_item(TOKEN_KEY).ok()?.filter(|t| !t.trim().is_empty())
}

pub fn store_token(token: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(TOKEN_KEY, token.trim());
    }
}

pub fn clear_token() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

// ============================================================================
// Requests
// ============================================================================

fn url(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{origin}{path}")
}

async fn failure(response: reqwest::Response) -> ApiError {
    if response.status() == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }
    let data: serde_json::Value = response.json().await.unwrap_or_default();
    ApiError::Failed(
        data["error"]
            .as_str()
            .unwrap_or("Ocorreu um erro desconhecido.")
            .to_string(),
    )
}

/// Who owns `token`; `NotAuthenticated` when the server does not accept it
pub async fn current_session(token: &str) -> Result<AuthState, ApiError> {
    let response = reqwest::Client::new()
        .get(url("/api/session"))
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| ApiError::Failed(e.to_string()))?;

    let user = match response.status() {
        s if s.is_success() => Some(
            response
                .json::<UserIdentity>()
                .await
                .map_err(|e| ApiError::Failed(e.to_string()))?,
        ),
        StatusCode::UNAUTHORIZED => None,
        _ => return Err(failure(response).await),
    };
    Ok(AuthState::from_lookup(user))
}

/// The signed-in author's pages, newest first
pub async fn list_pages(token: &str) -> Result<Vec<PageSummary>, ApiError> {
    let response = reqwest::Client::new()
        .get(url("/api/pages"))
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| ApiError::Failed(e.to_string()))?;

    if response.status().is_success() {
        response.json().await.map_err(|e| ApiError::Failed(e.to_string()))
    } else {
        Err(failure(response).await)
    }
}

async fn file_part(file: &WebFile) -> Result<Part, ApiError> {
    let bytes = file.bytes().await.map_err(ApiError::Failed)?;
    Part::bytes(bytes)
        .file_name(file.name().to_string())
        .mime_str(file.mime_type())
        .map_err(|e| ApiError::Failed(e.to_string()))
}

/// Upload a page in one multipart request
pub async fn create_page(
    token: &str,
    submission: Submission<WebFile>,
) -> Result<CreatedPage, ApiError> {
    let mut form = Form::new();
    for (name, value) in submission.fields {
        form = form.text(name, value);
    }
    for image in &submission.images {
        form = form.part("images", file_part(image).await?);
    }
    if let Some(video) = &submission.video {
        form = form.part("video", file_part(video).await?);
    }

    let response = reqwest::Client::new()
        .post(url("/api/pages"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .map_err(|e| ApiError::Failed(e.to_string()))?;

    if response.status().is_success() {
        response.json().await.map_err(|e| ApiError::Failed(e.to_string()))
    } else {
        Err(failure(response).await)
    }
}
