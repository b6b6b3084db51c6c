use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use validator::Validate;
use weatherpredict_app::ports::authentication::SignUpOutcome;

use crate::{
    AppState,
    notification::{Notification, take_flash},
    routes::first_validation_message,
    session::{CurrentSession, store_session},
    views,
};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CredentialsForm {
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl CredentialsForm {
    fn check(&self) -> Result<(), String> {
        self.validate()
            .map_err(|errors| first_validation_message(&errors, &["email", "password"]))
    }
}

fn auth_error(email: &str, title: &str, description: &str) -> Response {
    let notification = Notification::error(title, description);
    views::auth::render(email, Some(&notification)).into_response()
}

pub async fn auth_page(CurrentSession(session): CurrentSession, jar: CookieJar) -> Response {
    if session.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    let (jar, notification) = take_flash(jar);
    (jar, views::auth::render("", notification.as_ref())).into_response()
}

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    if let Err(message) = form.check() {
        return auth_error(&form.email, "Error", &message);
    }
    match state
        .app
        .session_sign_in_use_case
        .sign_in(&form.email, &form.password)
        .await
    {
        Ok(session) => {
            let jar = store_session(jar, &session, state.secure_cookies);
            (jar, Redirect::to("/dashboard")).into_response()
        }
        Err(e) => auth_error(&form.email, "Sign in failed", &e.to_string()),
    }
}

pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> Response {
    if let Err(message) = form.check() {
        return auth_error(&form.email, "Error", &message);
    }
    match state
        .app
        .session_sign_in_use_case
        .sign_up(&form.email, &form.password)
        .await
    {
        Ok(SignUpOutcome::SignedIn(session)) => {
            let jar = store_session(jar, &session, state.secure_cookies);
            (jar, Redirect::to("/dashboard")).into_response()
        }
        Ok(SignUpOutcome::ConfirmationRequired) => {
            let notification = Notification::success(
                "Check your email",
                "Confirm your email address, then sign in.",
            );
            views::auth::render(&form.email, Some(&notification)).into_response()
        }
        Err(e) => auth_error(&form.email, "Sign up failed", &e.to_string()),
    }
}
