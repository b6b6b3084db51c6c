use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use chrono::NaiveDate;
use tower::ServiceExt;
use weatherpredict_app::{
    build_application,
    domain::{
        AccountId, SortOrder,
        event::{Event, EventRepository, NewEvent},
        forecast::RandomWeatherPredictor,
        session::{Account, Session},
    },
};
use weatherpredict_memory::{
    InMemoryAuthenticationService, InMemoryEventRepository, InMemoryPredictionRepository,
};

use crate::{
    AppState, router,
    session::{REFRESH_COOKIE, SESSION_COOKIE},
};

pub struct TestApp {
    pub router: Router,
    pub auth: Arc<InMemoryAuthenticationService>,
    pub events: Arc<InMemoryEventRepository>,
    pub predictions: Arc<InMemoryPredictionRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let auth = Arc::new(InMemoryAuthenticationService::new());
        let events = Arc::new(InMemoryEventRepository::new());
        let predictions = Arc::new(InMemoryPredictionRepository::new());
        let app = build_application(
            events.clone(),
            predictions.clone(),
            auth.clone(),
            Arc::new(RandomWeatherPredictor::new()),
        );
        let router = router(AppState {
            app: Arc::new(app),
            secure_cookies: false,
        });
        Self {
            router,
            auth,
            events,
            predictions,
        }
    }

    /// A fresh account with an open session, and the `Cookie` header value
    /// carrying it.
    pub fn signed_in(&self) -> (Account, String) {
        let account = self.auth.seed_account("ada@example.com", "hunter22").unwrap();
        let (_, cookie) = self.open_session(&account);
        (account, cookie)
    }

    /// Another session for `account`, as a second browser would hold it.
    pub fn open_session(&self, account: &Account) -> (Session, String) {
        let session = self.auth.issue_session(account);
        let mut cookie = format!("{}={}", SESSION_COOKIE, session.access_token.as_str());
        if let Some(refresh_token) = &session.refresh_token {
            cookie.push_str(&format!("; {}={}", REFRESH_COOKIE, refresh_token.as_str()));
        }
        (session, cookie)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn create_event(&self, owner: AccountId, title: &str) -> Event {
        self.events
            .insert_event(NewEvent {
                user_id: owner,
                title: title.to_string(),
                description: String::new(),
                event_date: NaiveDate::from_ymd_opt(2025, 8, 1)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
                location: "Riverside".to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn events_of(&self, owner: AccountId) -> Vec<Event> {
        self.events
            .list_events_by_owner(&owner, SortOrder::Ascending)
            .await
            .unwrap()
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}
