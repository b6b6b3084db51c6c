use std::sync::Arc;

use crate::{
    domain::session::{Account, Session, SessionId, SessionSubscription, SessionToken},
    ports::authentication::{AuthError, AuthenticationPort},
};

#[async_trait::async_trait]
pub trait ResolveSessionUseCase {
    /// The session behind `token`, or `None` if there is none or it expired.
    async fn current_session(&self, token: &SessionToken) -> Option<Session>;
    /// The account behind `token` as confirmed by the authentication service.
    async fn current_user(&self, token: &SessionToken) -> Result<Option<Account>, AuthError>;
    /// Trades a refresh token for a fresh session once the access token expired.
    async fn refresh(&self, refresh_token: &SessionToken) -> Result<Session, AuthError>;
    fn watch(&self, session_id: &SessionId) -> SessionSubscription;
}

pub struct ResolveSessionUseCaseImpl<A: AuthenticationPort> {
    authentication_port: Arc<A>,
}

impl<A: AuthenticationPort> ResolveSessionUseCaseImpl<A> {
    pub fn new(authentication_port: Arc<A>) -> Self {
        Self {
            authentication_port,
        }
    }
}

#[async_trait::async_trait]
impl<A: AuthenticationPort + Send + Sync + 'static> ResolveSessionUseCase
    for ResolveSessionUseCaseImpl<A>
{
    async fn current_session(&self, token: &SessionToken) -> Option<Session> {
        let session = self.authentication_port.get_session(token).await?;
        if session.is_expired(chrono::Utc::now()) {
            log::debug!(
                "Session for account {} has expired",
                session.account.account_id
            );
            return None;
        }
        Some(session)
    }

    async fn current_user(&self, token: &SessionToken) -> Result<Option<Account>, AuthError> {
        self.authentication_port.get_user(token).await
    }

    async fn refresh(&self, refresh_token: &SessionToken) -> Result<Session, AuthError> {
        match self.authentication_port.refresh_session(refresh_token).await {
            Ok(session) => {
                log::info!(
                    "Refreshed session {} for account {}",
                    session.session_id,
                    session.account.account_id
                );
                Ok(session)
            }
            Err(e) => {
                log::info!("Could not refresh session: {}", e);
                Err(e)
            }
        }
    }

    fn watch(&self, session_id: &SessionId) -> SessionSubscription {
        self.authentication_port.subscribe(session_id)
    }
}
