//! Credential exchange and session probing.

use yatra_catalog::normalize::normalize_categories;
use yatra_core::{BackendError, BookingBackend, CoreError, SessionToken};
use yatra_shared::models::{AuthResponse, Credentials, Registration};

use crate::error::{SessionError, SessionResult};

/// A logged-in user.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: SessionToken,
    pub user_id: Option<String>,
    pub message: String,
}

pub async fn authenticate(
    backend: &dyn BookingBackend,
    credentials: &Credentials,
) -> SessionResult<AuthSession> {
    if credentials.email.trim().is_empty() || credentials.password.expose().is_empty() {
        return Err(CoreError::ValidationError("Email and password are required.".into()).into());
    }

    let response = backend.login(credentials).await?;
    into_session(response, "Login successful")
}

pub async fn register(
    backend: &dyn BookingBackend,
    registration: &Registration,
) -> SessionResult<AuthSession> {
    if registration.name.trim().is_empty() {
        return Err(CoreError::ValidationError("Name is required.".into()).into());
    }
    if registration.email.trim().is_empty() || registration.password.expose().is_empty() {
        return Err(CoreError::ValidationError("Email and password are required.".into()).into());
    }

    let response = backend.register(registration).await?;
    into_session(response, "Registration successful")
}

fn into_session(response: AuthResponse, success_message: &str) -> SessionResult<AuthSession> {
    let user_id = response.user_id();
    let AuthResponse { token, message, .. } = response;

    match token {
        Some(token) if !token.expose().is_empty() => {
            tracing::info!(user_id = ?user_id, "Authenticated");
            Ok(AuthSession {
                token,
                user_id,
                message: message.unwrap_or_else(|| success_message.to_string()),
            })
        }
        _ => {
            let message = message.unwrap_or_else(|| "Authentication failed".to_string());
            tracing::warn!(%message, "Backend issued no token");
            Err(SessionError::Backend(BackendError::Rejected(message)))
        }
    }
}

/// Checks that `token` is still accepted and returns the star categories.
///
/// An explicit `"success": false` from `/categories` means the session is no
/// longer valid.
pub async fn probe(
    backend: &dyn BookingBackend,
    token: Option<&SessionToken>,
    fallback_categories: &[String],
) -> SessionResult<Vec<String>> {
    let Some(token) = token else {
        return Err(SessionError::Unauthorized);
    };

    let response = backend.categories(Some(token)).await?;
    if response.success == Some(false) {
        tracing::info!("Session probe rejected");
        return Err(SessionError::Unauthorized);
    }
    Ok(normalize_categories(&response, fallback_categories))
}
