use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{HeaderValue, Request, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use weatherpredict_app::{
    domain::session::{Session, SessionToken},
    ports::authentication::AuthError,
};

use crate::AppState;

pub const SESSION_COOKIE: &str = "sb-access-token";
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

/// The session behind the request's cookie, resolved locally. Handlers
/// redirect when it is absent; it never rejects.
pub struct CurrentSession(pub Option<Session>);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        app: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&CookieJar::from_headers(&parts.headers)) else {
            return Ok(CurrentSession(None));
        };
        let session = app
            .app
            .session_resolve_use_case
            .current_session(&token)
            .await;
        Ok(CurrentSession(session))
    }
}

fn cookie_token(jar: &CookieJar, name: &str) -> Option<SessionToken> {
    jar.get(name)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
        .map(SessionToken::new)
}

pub fn session_token(jar: &CookieJar) -> Option<SessionToken> {
    cookie_token(jar, SESSION_COOKIE)
}

pub fn refresh_token(jar: &CookieJar) -> Option<SessionToken> {
    cookie_token(jar, REFRESH_COOKIE)
}

fn session_cookie(name: &'static str, value: &SessionToken, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value.as_str().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub fn store_session(jar: CookieJar, session: &Session, secure: bool) -> CookieJar {
    let jar = jar.add(session_cookie(SESSION_COOKIE, &session.access_token, secure));
    match &session.refresh_token {
        Some(refresh_token) => jar.add(session_cookie(REFRESH_COOKIE, refresh_token, secure)),
        None => jar,
    }
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_COOKIE).path("/"))
}

/// Trades the refresh cookie for a new session when the access token is
/// missing or no longer valid. Handlers further down see the new tokens and
/// the browser gets them with the response.
pub async fn refresh_expired_session(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(refresh) = refresh_token(&jar) else {
        return next.run(Request::from_parts(parts, body)).await;
    };
    let resolve = &state.app.session_resolve_use_case;
    if let Some(token) = session_token(&jar) {
        if resolve.current_session(&token).await.is_some() {
            return next.run(Request::from_parts(parts, body)).await;
        }
    }

    match resolve.refresh(&refresh).await {
        Ok(session) => {
            let jar = store_session(jar, &session, state.secure_cookies);
            let cookie_header = jar
                .iter()
                .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
                .collect::<Vec<_>>()
                .join("; ");
            if let Ok(value) = HeaderValue::from_str(&cookie_header) {
                parts.headers.insert(header::COOKIE, value);
            }
            let response = next.run(Request::from_parts(parts, body)).await;
            if sets_cookie(&response, SESSION_COOKIE) {
                return response;
            }
            (jar, response).into_response()
        }
        Err(AuthError::Unavailable(_)) => next.run(Request::from_parts(parts, body)).await,
        Err(_) => {
            let response = next.run(Request::from_parts(parts, body)).await;
            (clear_session(jar), response).into_response()
        }
    }
}

fn sets_cookie(response: &Response, name: &str) -> bool {
    let prefix = format!("{}=", name);
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}
