//! Session Identity
//!
//! The authenticated author is resolved once, when the form is mounted, and
//! then passed explicitly to whatever needs it. Nothing reads ambient session
//! state.

use serde::{Deserialize, Serialize};

/// Owner identifier as issued by the auth service
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The signed-in author
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Outcome of the one session lookup made at form mount
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthState {
    Authenticated(UserIdentity),
    /// No valid session; the author is sent to the login route
    NotAuthenticated,
}

impl AuthState {
    pub fn from_lookup(user: Option<UserIdentity>) -> Self {
        user.map_or(AuthState::NotAuthenticated, AuthState::Authenticated)
    }
}

/// Where unauthenticated authors are sent
pub const LOGIN_ROUTE: &str = "/auth/login";
