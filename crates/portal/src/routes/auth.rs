//! Authentication route handlers.
//!
//! One form does both login and registration: an email the API does not know
//! is registered on the spot.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::services::auth::{AuthService, LoginOutcome};
use crate::state::AppState;
use crate::views::ShellView;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub shell: ShellView,
    pub error: Option<String>,
    /// Email to pre-fill after a failed attempt.
    pub email: String,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login page, or send a logged-in user to their home view.
pub async fn login_page(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Response {
    if let Some(user) = user {
        return Redirect::to(user.home_path()).into_response();
    }

    LoginTemplate {
        shell: ShellView::new(&state.config().shell, None),
        error: None,
        email: String::new(),
    }
    .into_response()
}

/// Handle login form submission.
///
/// On failure the form is shown again with the email kept and the password
/// cleared.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let password = SecretString::from(form.password);

    match AuthService::new(state.api())
        .login_or_register(&form.email, &password)
        .await
    {
        Ok(outcome) => {
            if matches!(outcome, LoginOutcome::Registered(_)) {
                tracing::info!("Signed in a newly registered user");
            }
            let user = outcome.into_user();
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.user_id, Some(user.email.as_str()));
            Ok(Redirect::to(user.home_path()).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            Ok(LoginTemplate {
                shell: ShellView::new(&state.config().shell, None),
                error: Some(e.user_message().into_owned()),
                email: form.email.trim().to_string(),
            }
            .into_response())
        }
    }
}

/// End the session and return to the login page.
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
