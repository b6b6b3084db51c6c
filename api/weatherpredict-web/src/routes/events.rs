use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;
use weatherpredict_app::workflow::events::create::EventForm;

use crate::{
    AppState,
    notification::{Notification, set_flash, take_flash},
    routes::first_validation_message,
    session::{CurrentSession, session_token},
    views::{self, create_event::FormValues},
};

/// Accepted `datetime-local` shapes, with and without seconds.
const EVENT_DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateEventForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Event title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Event date and time are required"))]
    pub event_date: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
}

impl CreateEventForm {
    fn values(&self) -> FormValues<'_> {
        FormValues {
            title: &self.title,
            description: &self.description,
            event_date: &self.event_date,
            location: &self.location,
        }
    }

    fn to_event_form(&self) -> Result<EventForm, String> {
        self.validate().map_err(|errors| {
            first_validation_message(&errors, &["title", "event_date", "location"])
        })?;
        let event_date = parse_event_date(&self.event_date)
            .ok_or_else(|| format!("Invalid event date '{}'", self.event_date))?;
        Ok(EventForm {
            title: self.title.clone(),
            description: self.description.clone(),
            event_date,
            location: self.location.clone(),
        })
    }

    fn rerender(&self, message: &str) -> Response {
        let notification = Notification::error("Error", message);
        views::create_event::render(&self.values(), Some(&notification)).into_response()
    }
}

pub fn parse_event_date(raw: &str) -> Option<NaiveDateTime> {
    EVENT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
}

pub async fn create_event_page(CurrentSession(session): CurrentSession, jar: CookieJar) -> Response {
    if session.is_none() {
        return Redirect::to("/auth").into_response();
    }
    let (jar, notification) = take_flash(jar);
    let html = views::create_event::render(&FormValues::default(), notification.as_ref());
    (jar, html).into_response()
}

pub async fn create_event(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CreateEventForm>,
) -> Response {
    let Some(token) = session_token(&jar) else {
        return Redirect::to("/auth").into_response();
    };
    let account = match state.app.session_resolve_use_case.current_user(&token).await {
        Ok(Some(account)) => account,
        Ok(None) => return Redirect::to("/auth").into_response(),
        Err(e) => {
            log::warn!("Could not verify user before creating event: {}", e);
            return Redirect::to("/auth").into_response();
        }
    };

    let event_form = match form.to_event_form() {
        Ok(event_form) => event_form,
        Err(message) => return form.rerender(&message),
    };

    match state
        .app
        .event_create_use_case
        .create_event(account.account_id, event_form)
        .await
    {
        Ok(_) => {
            let jar = set_flash(
                jar,
                &Notification::success("Event created!", "Weather prediction has been generated."),
            );
            (jar, Redirect::to("/dashboard")).into_response()
        }
        Err(e) => form.rerender(e.message()),
    }
}
