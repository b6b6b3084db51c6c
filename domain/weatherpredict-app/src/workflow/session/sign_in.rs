use std::sync::Arc;

use crate::{
    domain::session::Session,
    ports::authentication::{AuthError, AuthenticationPort, SignUpOutcome},
};

#[async_trait::async_trait]
pub trait SignInUseCase {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;
}

pub struct SignInUseCaseImpl<A: AuthenticationPort> {
    authentication_port: Arc<A>,
}

impl<A: AuthenticationPort> SignInUseCaseImpl<A> {
    pub fn new(authentication_port: Arc<A>) -> Self {
        Self {
            authentication_port,
        }
    }
}

#[async_trait::async_trait]
impl<A: AuthenticationPort + Send + Sync + 'static> SignInUseCase for SignInUseCaseImpl<A> {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        match self
            .authentication_port
            .sign_in_with_password(email, password)
            .await
        {
            Ok(session) => {
                log::info!("Account {} signed in", session.account.account_id);
                Ok(session)
            }
            Err(e) => {
                log::warn!("Sign-in failed: {}", e);
                Err(e)
            }
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        match self.authentication_port.sign_up(email, password).await {
            Ok(outcome) => {
                match &outcome {
                    SignUpOutcome::SignedIn(session) => {
                        log::info!("Account {} signed up", session.account.account_id)
                    }
                    SignUpOutcome::ConfirmationRequired => {
                        log::info!("Sign-up pending email confirmation")
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                log::warn!("Sign-up failed: {}", e);
                Err(e)
            }
        }
    }
}
