//! Bearer-token session extractor
//!
//! Every authoring route takes a [`CurrentUser`]; the identity is resolved
//! once per request and handed to the pipeline explicitly.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};

use pages_core::UserIdentity;
use pages_core::session::LOGIN_ROUTE;

use crate::handlers::{ApiError, api_error};
use crate::state::AppState;

/// The signed-in author
#[derive(Clone, Debug)]
pub struct CurrentUser(pub UserIdentity);

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn unauthorized() -> ApiError {
    api_error(
        StatusCode::UNAUTHORIZED,
        format!("Utilizador não autenticado. Inicie sessão em {LOGIN_ROUTE}."),
        "NOT_AUTHENTICATED",
    )
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(unauthorized)?;

        match state.sessions.current_user(token).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => Err(unauthorized()),
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed");
                Err(api_error(
                    StatusCode::BAD_GATEWAY,
                    "Não foi possível validar a sessão.",
                    "SESSION_UNAVAILABLE",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }
}
