use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use weatherpredict_app::{
    domain::{
        AccountId,
        session::{
            Account, Session, SessionEvent, SessionId, SessionNotifier, SessionSubscription,
            SessionToken,
        },
    },
    ports::authentication::{AuthError, AuthenticationPort, SignUpOutcome},
};

use crate::{SupabaseClient, error::SupabaseError};

const JWT_AUDIENCE: &str = "authenticated";
const USER_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub aud: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserBody> for Account {
    fn from(user: UserBody) -> Self {
        Account {
            account_id: AccountId(user.id),
            email: user.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: UserBody,
}

impl TokenBody {
    fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .or_else(|| {
                self.expires_in
                    .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
            })
    }
}

#[derive(Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshCredentials<'a> {
    refresh_token: &'a str,
}

pub struct SupabaseAuthenticationService {
    client: SupabaseClient,
    decoding_key: DecodingKey,
    validation: Validation,
    /// Same checks minus expiry, for telling which session a stale token
    /// belonged to.
    identity_validation: Validation,
    user_cache: moka::sync::Cache<String, Account>,
    notifier: SessionNotifier,
}

impl SupabaseAuthenticationService {
    pub fn new(client: SupabaseClient) -> Self {
        let decoding_key = DecodingKey::from_secret(client.config().jwt_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[JWT_AUDIENCE]);
        let mut identity_validation = validation.clone();
        identity_validation.validate_exp = false;
        Self {
            client,
            decoding_key,
            validation,
            identity_validation,
            user_cache: moka::sync::Cache::builder()
                .max_capacity(1000)
                .time_to_live(USER_CACHE_TTL)
                .build(),
            notifier: SessionNotifier::new(),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.client.config().url, path)
    }

    /// Checks signature, expiry and audience of an access token without a
    /// network round-trip.
    pub fn decode_token(&self, token: &SessionToken) -> Option<Session> {
        let data = decode::<Claims>(token.as_str(), &self.decoding_key, &self.validation)
            .inspect_err(|e| log::debug!("Rejected access token: {}", e))
            .ok()?;
        session_from_claims(token, data.claims)
    }

    /// Like [`Self::decode_token`] but also accepts expired tokens.
    fn identify_token(&self, token: &SessionToken) -> Option<Session> {
        let data =
            decode::<Claims>(token.as_str(), &self.decoding_key, &self.identity_validation).ok()?;
        session_from_claims(token, data.claims)
    }

    fn session_from_body(&self, body: TokenBody) -> Session {
        let access_token = SessionToken::new(body.access_token.clone());
        let session_id = self
            .identify_token(&access_token)
            .map(|session| session.session_id)
            .unwrap_or_else(|| SessionId::new(body.access_token.as_str()));
        Session {
            session_id,
            expires_at: body.expires_at(),
            access_token,
            refresh_token: body.refresh_token.map(SessionToken::new),
            account: body.user.into(),
        }
    }

    async fn password_grant(&self, email: &str, password: &str) -> Result<Session, SupabaseError> {
        let response = self
            .client
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.client.config().anon_key)
            .json(&PasswordCredentials { email, password })
            .send()
            .await?;
        let body: TokenBody = SupabaseClient::read_json(response).await?;
        Ok(self.session_from_body(body))
    }

    async fn refresh_grant(&self, refresh_token: &SessionToken) -> Result<Session, SupabaseError> {
        let response = self
            .client
            .http
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.client.config().anon_key)
            .json(&RefreshCredentials {
                refresh_token: refresh_token.as_str(),
            })
            .send()
            .await?;
        let body: TokenBody = SupabaseClient::read_json(response).await?;
        Ok(self.session_from_body(body))
    }

    async fn register(&self, email: &str, password: &str) -> Result<SignUpOutcome, SupabaseError> {
        let response = self
            .client
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.client.config().anon_key)
            .json(&PasswordCredentials { email, password })
            .send()
            .await?;
        let body: serde_json::Value = SupabaseClient::read_json(response).await?;
        // without auto-confirm the body is the bare user and no session exists yet
        if body.get("access_token").is_some() {
            let token: TokenBody =
                serde_json::from_value(body).map_err(|e| SupabaseError::Decode(e.to_string()))?;
            Ok(SignUpOutcome::SignedIn(self.session_from_body(token)))
        } else {
            Ok(SignUpOutcome::ConfirmationRequired)
        }
    }

    async fn fetch_user(&self, token: &SessionToken) -> Result<Option<Account>, SupabaseError> {
        let response = self
            .client
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.client.config().anon_key)
            .bearer_auth(token.as_str())
            .send()
            .await?;
        match response.status().as_u16() {
            401 | 403 => Ok(None),
            _ => {
                let user: UserBody = SupabaseClient::read_json(response).await?;
                Ok(Some(user.into()))
            }
        }
    }

    async fn logout(&self, token: &SessionToken) -> Result<(), SupabaseError> {
        let response = self
            .client
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.client.config().anon_key)
            .bearer_auth(token.as_str())
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(SupabaseError::from_response(status, &body))
    }
}

/// Tokens minted without a `session_id` claim are their own session.
fn session_from_claims(token: &SessionToken, claims: Claims) -> Option<Session> {
    let account_id = Uuid::parse_str(&claims.sub).ok()?;
    let session_id = claims
        .session_id
        .unwrap_or_else(|| token.as_str().to_string());
    Some(Session {
        session_id: SessionId::new(session_id),
        access_token: token.clone(),
        refresh_token: None,
        account: Account {
            account_id: AccountId(account_id),
            email: claims.email,
        },
        expires_at: DateTime::from_timestamp(claims.exp, 0),
    })
}

#[async_trait::async_trait]
impl AuthenticationPort for SupabaseAuthenticationService {
    async fn get_session(&self, token: &SessionToken) -> Option<Session> {
        self.decode_token(token)
    }

    async fn get_user(&self, token: &SessionToken) -> Result<Option<Account>, AuthError> {
        if let Some(account) = self.user_cache.get(token.as_str()) {
            return Ok(Some(account));
        }
        let account = self.fetch_user(token).await?;
        if let Some(account) = &account {
            self.user_cache
                .insert(token.as_str().to_string(), account.clone());
        }
        Ok(account)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let session = self.password_grant(email, password).await?;
        self.user_cache.insert(
            session.access_token.as_str().to_string(),
            session.account.clone(),
        );
        self.notifier.publish(SessionEvent::signed_in(&session));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let outcome = self.register(email, password).await?;
        if let SignUpOutcome::SignedIn(session) = &outcome {
            self.notifier.publish(SessionEvent::signed_in(session));
        }
        Ok(outcome)
    }

    async fn refresh_session(&self, refresh_token: &SessionToken) -> Result<Session, AuthError> {
        let session = self.refresh_grant(refresh_token).await?;
        self.user_cache.insert(
            session.access_token.as_str().to_string(),
            session.account.clone(),
        );
        self.notifier.publish(SessionEvent::signed_in(&session));
        Ok(session)
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError> {
        let session = self.identify_token(token).or_else(|| {
            self.user_cache.get(token.as_str()).map(|account| Session {
                session_id: SessionId::new(token.as_str()),
                access_token: token.clone(),
                refresh_token: None,
                account,
                expires_at: None,
            })
        });
        self.user_cache.invalidate(token.as_str());

        let result = self.logout(token).await;
        if let Some(session) = &session {
            self.notifier.publish(SessionEvent::signed_out(session));
        }
        result.map_err(AuthError::from)
    }

    fn subscribe(&self, session_id: &SessionId) -> SessionSubscription {
        self.notifier.subscribe(session_id)
    }
}
