use chrono::{DateTime, Duration, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
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

const PASSWORD_HASH_COST: u32 = 8;
const MIN_PASSWORD_LENGTH: usize = 6;
const SESSION_LIFETIME_HOURS: i64 = 1;
const REFRESH_LIFETIME_DAYS: i64 = 7;

struct StoredAccount {
    account: Account,
    password_hash: String,
}

struct RefreshGrant {
    session_id: SessionId,
    account: Account,
    expires_at: DateTime<Utc>,
}

/// Email/password accounts and bearer sessions held in memory. Messages
/// mirror the hosted auth service so the UI behaves the same on both
/// backends.
pub struct InMemoryAuthenticationService {
    accounts: DashMap<String, StoredAccount>,
    sessions: DashMap<String, Session>,
    refresh_tokens: DashMap<String, RefreshGrant>,
    notifier: SessionNotifier,
}

impl InMemoryAuthenticationService {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            sessions: DashMap::new(),
            refresh_tokens: DashMap::new(),
            notifier: SessionNotifier::new(),
        }
    }

    /// Registers an account directly, bypassing the password length check.
    pub fn seed_account(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let password_hash = bcrypt::hash(password, PASSWORD_HASH_COST)
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;
        self.register(email, password_hash)
    }

    /// Opens a session for an existing account without a password check.
    pub fn issue_session(&self, account: &Account) -> Session {
        self.open_session(SessionId::new(uuid::Uuid::new_v4().to_string()), account)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    fn register(&self, email: &str, password_hash: String) -> Result<Account, AuthError> {
        match self.accounts.entry(normalize_email(email)) {
            Entry::Occupied(_) => Err(AuthError::Rejected("User already registered".to_string())),
            Entry::Vacant(slot) => {
                let account = Account {
                    account_id: AccountId::new(),
                    email: Some(email.to_string()),
                };
                slot.insert(StoredAccount {
                    account: account.clone(),
                    password_hash,
                });
                Ok(account)
            }
        }
    }

    fn open_session(&self, session_id: SessionId, account: &Account) -> Session {
        let now = Utc::now();
        self.purge_expired(now);

        let refresh_token = uuid::Uuid::new_v4().simple().to_string();
        self.refresh_tokens.insert(
            refresh_token.clone(),
            RefreshGrant {
                session_id: session_id.clone(),
                account: account.clone(),
                expires_at: now + Duration::days(REFRESH_LIFETIME_DAYS),
            },
        );
        let session = Session {
            session_id,
            access_token: SessionToken::new(uuid::Uuid::new_v4().simple().to_string()),
            refresh_token: Some(SessionToken::new(refresh_token)),
            account: account.clone(),
            expires_at: Some(now + Duration::hours(SESSION_LIFETIME_HOURS)),
        };
        self.sessions
            .insert(session.access_token.as_str().to_string(), session.clone());
        self.notifier.publish(SessionEvent::signed_in(&session));
        session
    }

    fn purge_expired(&self, now: DateTime<Utc>) {
        self.sessions.retain(|_, session| !session.is_expired(now));
        self.refresh_tokens.retain(|_, grant| grant.expires_at > now);
    }

    fn live_session(&self, token: &SessionToken) -> Option<Session> {
        let session = self.sessions.get(token.as_str())?.clone();
        if session.is_expired(Utc::now()) {
            self.sessions.remove(token.as_str());
            return None;
        }
        Some(session)
    }
}

impl Default for InMemoryAuthenticationService {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_HASH_COST))
        .await
        .map_err(|e| AuthError::Unavailable(e.to_string()))?
        .map_err(|e| AuthError::Unavailable(e.to_string()))
}

async fn verify_password(password: &str, password_hash: String) -> Result<bool, AuthError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AuthError::Unavailable(e.to_string()))?
        .map_err(|e| AuthError::Unavailable(e.to_string()))
}

#[async_trait::async_trait]
impl AuthenticationPort for InMemoryAuthenticationService {
    async fn get_session(&self, token: &SessionToken) -> Option<Session> {
        self.live_session(token)
    }

    async fn get_user(&self, token: &SessionToken) -> Result<Option<Account>, AuthError> {
        Ok(self.live_session(token).map(|session| session.account))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let invalid = || AuthError::InvalidCredentials("Invalid login credentials".to_string());
        let (account, password_hash) = self
            .accounts
            .get(&normalize_email(email))
            .map(|stored| (stored.account.clone(), stored.password_hash.clone()))
            .ok_or_else(invalid)?;
        if !verify_password(password, password_hash).await? {
            return Err(invalid());
        }
        Ok(self.issue_session(&account))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Rejected(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        let password_hash = hash_password(password).await?;
        let account = self.register(email, password_hash)?;
        log::info!("Registered in-memory account {}", account.account_id);
        Ok(SignUpOutcome::SignedIn(self.issue_session(&account)))
    }

    async fn refresh_session(&self, refresh_token: &SessionToken) -> Result<Session, AuthError> {
        let grant = self
            .refresh_tokens
            .remove(refresh_token.as_str())
            .map(|(_, grant)| grant)
            .filter(|grant| grant.expires_at > Utc::now())
            .ok_or_else(|| {
                AuthError::Rejected("Invalid Refresh Token: Refresh Token Not Found".to_string())
            })?;
        self.sessions
            .retain(|_, session| session.session_id != grant.session_id);
        Ok(self.open_session(grant.session_id, &grant.account))
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError> {
        match self.sessions.remove(token.as_str()) {
            Some((_, session)) => {
                self.refresh_tokens
                    .retain(|_, grant| grant.session_id != session.session_id);
                self.notifier.publish(SessionEvent::signed_out(&session));
                Ok(())
            }
            None => Err(AuthError::Rejected("Session not found".to_string())),
        }
    }

    fn subscribe(&self, session_id: &SessionId) -> SessionSubscription {
        self.notifier.subscribe(session_id)
    }
}
