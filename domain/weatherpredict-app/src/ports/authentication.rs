use crate::domain::session::{Account, Session, SessionId, SessionSubscription, SessionToken};

#[async_trait::async_trait]
pub trait AuthenticationPort {
    /// Resolves a session from the token alone, without asking the
    /// authentication service.
    async fn get_session(&self, token: &SessionToken) -> Option<Session>;
    /// Verifies the token with the authentication service.
    async fn get_user(&self, token: &SessionToken) -> Result<Option<Account>, AuthError>;
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;
    /// Exchanges a refresh token for a new access token of the same session.
    async fn refresh_session(&self, refresh_token: &SessionToken) -> Result<Session, AuthError>;
    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError>;
    fn subscribe(&self, session_id: &SessionId) -> SessionSubscription;
}

#[derive(Debug)]
pub enum SignUpOutcome {
    SignedIn(Session),
    ConfirmationRequired,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    InvalidCredentials(String),
    Rejected(String),
    Unavailable(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidCredentials(msg)
            | AuthError::Rejected(msg)
            | AuthError::Unavailable(msg) => write!(f, "{}", msg),
        }
    }
}
