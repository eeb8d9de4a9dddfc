//! Password recovery route handlers.
//!
//! A mock three-step wizard: request a code, verify it, choose a new
//! password. The wizard state lives in the session and nothing else is
//! persisted - no accounts exist, and the "email" is a line in the
//! server log carrying the verification code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::{RecoveryState, session_keys};

// =============================================================================
// Form Types
// =============================================================================

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Verification code form data.
#[derive(Debug, Deserialize)]
pub struct VerifyCodeForm {
    pub code: String,
}

/// Reset password form data.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Map a message key from the redirect query to display text.
fn message_text(key: &str) -> Option<&'static str> {
    match key {
        "invalid_code" => Some("Invalid code. Please check it and try again."),
        "password_mismatch" => Some("Passwords do not match. Please try again."),
        "code_sent" => Some("We've sent a verification code to your email."),
        "password_reset" => Some("Your password has been updated. You can now sign in."),
        _ => None,
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Email step template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Code verification step template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/verify_code.html")]
pub struct VerifyCodeTemplate {
    pub email: String,
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// New password step template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub email: String,
    pub error: Option<&'static str>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Read the wizard state from the session.
async fn recovery_state(session: &Session) -> Option<RecoveryState> {
    session
        .get::<RecoveryState>(session_keys::RECOVERY)
        .await
        .ok()
        .flatten()
}

/// Display whichever wizard step the session is on.
#[instrument(skip(session))]
pub async fn show(session: Session, Query(query): Query<MessageQuery>) -> Response {
    let error = query.error.as_deref().and_then(message_text);
    let success = query.success.as_deref().and_then(message_text);

    match recovery_state(&session).await {
        None => ForgotPasswordTemplate { error, success }.into_response(),
        Some(RecoveryState::AwaitingCode { email, .. }) => VerifyCodeTemplate {
            email,
            error,
            success,
        }
        .into_response(),
        Some(RecoveryState::AwaitingPassword { email }) => {
            ResetPasswordTemplate { email, error }.into_response()
        }
    }
}

/// Step 1: accept an email address and "send" a verification code.
///
/// The code is random per attempt and only ever written to the server
/// log, since no mail delivery exists in this storefront.
#[instrument(skip(session, form))]
pub async fn send_code(session: Session, Form(form): Form<ForgotPasswordForm>) -> Redirect {
    let code = format!("{:06}", rand::rng().random_range(0..1_000_000));
    tracing::info!("Mock recovery code for {}: {code}", form.email);

    let state = RecoveryState::AwaitingCode {
        email: form.email,
        code,
    };
    if let Err(e) = session.insert(session_keys::RECOVERY, &state).await {
        tracing::error!("Failed to save recovery state: {e}");
    }

    Redirect::to("/auth/forgot-password?success=code_sent")
}

/// Step 2: check the submitted code against the session.
#[instrument(skip(session, form))]
pub async fn verify_code(session: Session, Form(form): Form<VerifyCodeForm>) -> Redirect {
    let Some(RecoveryState::AwaitingCode { email, code }) = recovery_state(&session).await else {
        // No code outstanding; back to the start of the wizard
        return Redirect::to("/auth/forgot-password");
    };

    if form.code.trim() != code {
        return Redirect::to("/auth/forgot-password?error=invalid_code");
    }

    let state = RecoveryState::AwaitingPassword { email };
    if let Err(e) = session.insert(session_keys::RECOVERY, &state).await {
        tracing::error!("Failed to save recovery state: {e}");
    }

    Redirect::to("/auth/forgot-password")
}

/// Step 3: accept the new password and finish the wizard.
#[instrument(skip(session, form))]
pub async fn reset_password(session: Session, Form(form): Form<ResetPasswordForm>) -> Redirect {
    let Some(RecoveryState::AwaitingPassword { .. }) = recovery_state(&session).await else {
        return Redirect::to("/auth/forgot-password");
    };

    if form.password != form.password_confirm {
        return Redirect::to("/auth/forgot-password?error=password_mismatch");
    }

    // Nothing to update: accounts are not persisted in this storefront.
    if let Err(e) = session.remove::<RecoveryState>(session_keys::RECOVERY).await {
        tracing::error!("Failed to clear recovery state: {e}");
    }

    Redirect::to("/auth/forgot-password?success=password_reset")
}
