use std::convert::Infallible;

use axum::{
    extract::State,
    response::{
        IntoResponse, Redirect, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use axum_extra::extract::cookie::CookieJar;
use futures_util::{Stream, stream};
use maud::Markup;
use weatherpredict_app::domain::session::SessionEvent;

use crate::{
    AppState, ServiceError,
    notification::{Notification, take_flash},
    session::{CurrentSession, clear_session, session_token},
    views,
};

pub async fn dashboard_page(CurrentSession(session): CurrentSession, jar: CookieJar) -> Response {
    if session.is_none() {
        return Redirect::to("/auth").into_response();
    }
    let (jar, notification) = take_flash(jar);
    (jar, views::dashboard::render_shell(notification.as_ref())).into_response()
}

pub async fn dashboard_events(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
) -> Result<Markup, ServiceError> {
    let session = session.ok_or(ServiceError::Unauthorized("Not signed in".to_string()))?;
    let html = match state
        .app
        .dashboard_load_use_case
        .load_dashboard(session.account.account_id)
        .await
    {
        Ok(cards) => views::dashboard::render_events(&cards, None),
        Err(e) => {
            let notification = Notification::error("Error loading events", e.message());
            let cards = e.into_partial_cards();
            views::dashboard::render_events(&cards, Some(&notification))
        }
    };
    Ok(html)
}

/// Changes to the browser's own session, for as long as the page keeps the
/// stream open. Other sessions of the same account are not reported.
pub async fn session_events(
    CurrentSession(session): CurrentSession,
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServiceError> {
    let session = session.ok_or(ServiceError::Unauthorized("Not signed in".to_string()))?;
    let subscription = state
        .app
        .session_resolve_use_case
        .watch(&session.session_id);
    log::debug!(
        "Session stream opened for session {} of account {}",
        session.session_id,
        session.account.account_id
    );

    let events = stream::unfold(subscription, |mut subscription| async move {
        let event = subscription.recv().await?;
        let name = match &event {
            SessionEvent::SignedIn { .. } => "signed_in",
            SessionEvent::SignedOut { .. } => "signed_out",
        };
        let sse = Event::default()
            .event(name)
            .data(event.account_id().to_string());
        Some((Ok::<_, Infallible>(sse), subscription))
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = session_token(&jar) {
        if let Err(e) = state.app.session_sign_out_use_case.sign_out(&token).await {
            log::warn!("Clearing local session after failed sign-out: {}", e);
        }
    }
    (clear_session(jar), Redirect::to("/")).into_response()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::{StatusCode, header::LOCATION};
    use futures_util::StreamExt;
    use weatherpredict_app::ports::authentication::AuthenticationPort;

    use crate::{
        testing::{TestApp, body_text, get, post_form, set_cookies},
        views::dashboard::{LOADING_TEXT, PENDING_TEXT},
    };

    #[tokio::test]
    async fn test_unauthenticated_dashboard_redirects_before_loading() {
        let app = TestApp::new();
        app.events.set_list_failure(Some("should not be reached"));

        let response = app.send(get("/dashboard", None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/auth");

        let response = app
            .send(get("/dashboard", Some("sb-access-token=unknown")))
            .await;
        assert_eq!(response.headers()[LOCATION], "/auth");

        let response = app.send(get("/dashboard/events", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_shell_renders_loading_state() {
        let app = TestApp::new();
        let (_, cookie) = app.signed_in();
        let response = app.send(get("/dashboard", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(LOADING_TEXT));
        assert!(body.contains("/dashboard/session-events"));
        assert!(body.contains(r#"action="/sign-out""#));
    }

    #[tokio::test]
    async fn test_empty_state() {
        let app = TestApp::new();
        let (_, cookie) = app.signed_in();
        let body = body_text(app.send(get("/dashboard/events", Some(&cookie))).await).await;
        assert!(body.contains("No events yet"));
    }

    #[tokio::test]
    async fn test_events_error_shows_notification() {
        let app = TestApp::new();
        let (_, cookie) = app.signed_in();
        app.events.set_list_failure(Some("connection refused"));

        let response = app.send(get("/dashboard/events", Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Error loading events"));
        assert!(body.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_prediction_error_keeps_events_pending() {
        let app = TestApp::new();
        let (account, cookie) = app.signed_in();
        app.create_event(account.account_id, "Picnic").await;
        app.predictions.set_list_failure(Some("timeout"));

        let body = body_text(app.send(get("/dashboard/events", Some(&cookie))).await).await;
        assert!(body.contains("Error loading events"));
        assert!(body.contains("Picnic"));
        assert!(body.contains(PENDING_TEXT));
        assert!(!body.contains("°C"));
    }

    #[tokio::test]
    async fn test_sign_out_clears_cookie_and_lands_on_landing() {
        let app = TestApp::new();
        let (_, cookie) = app.signed_in();

        let response = app.send(post_form("/sign-out", Some(&cookie), "")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/");
        let cookies = set_cookies(&response);
        for name in ["sb-access-token=", "sb-refresh-token="] {
            assert!(cookies
                .iter()
                .any(|c| c.starts_with(name) && c.contains("Max-Age=0")));
        }
        assert_eq!(app.auth.active_sessions(), 0);

        let response = app.send(get("/dashboard", Some(&cookie))).await;
        assert_eq!(response.headers()[LOCATION], "/auth");
    }

    #[tokio::test]
    async fn test_sign_out_without_session_still_redirects() {
        let app = TestApp::new();
        let response = app
            .send(post_form("/sign-out", Some("sb-access-token=stale"), ""))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/");
    }

    #[tokio::test]
    async fn test_session_stream_ignores_other_sessions() {
        let app = TestApp::new();
        let (account, _) = app.signed_in();
        let (laptop, laptop_cookie) = app.open_session(&account);
        let (_, phone_cookie) = app.open_session(&account);

        let response = app
            .send(get("/dashboard/session-events", Some(&laptop_cookie)))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/event-stream");
        let mut body = response.into_body().into_data_stream();

        let response = app.send(post_form("/sign-out", Some(&phone_cookie), "")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(
            tokio::time::timeout(Duration::from_millis(200), body.next())
                .await
                .is_err(),
            "another session's sign-out reached this stream"
        );
        let response = app.send(get("/dashboard", Some(&laptop_cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);

        app.auth.sign_out(&laptop.access_token).await.unwrap();
        let frame = tokio::time::timeout(Duration::from_secs(5), body.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let frame = String::from_utf8(frame.to_vec()).unwrap();
        assert!(frame.contains("event: signed_out"));
        assert!(frame.contains(&account.account_id.to_string()));
    }
}
