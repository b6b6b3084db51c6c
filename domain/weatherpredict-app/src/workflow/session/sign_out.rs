use std::sync::Arc;

use crate::{
    domain::session::SessionToken,
    ports::authentication::{AuthError, AuthenticationPort},
};

#[async_trait::async_trait]
pub trait SignOutUseCase {
    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError>;
}

pub struct SignOutUseCaseImpl<A: AuthenticationPort> {
    authentication_port: Arc<A>,
}

impl<A: AuthenticationPort> SignOutUseCaseImpl<A> {
    pub fn new(authentication_port: Arc<A>) -> Self {
        Self {
            authentication_port,
        }
    }
}

#[async_trait::async_trait]
impl<A: AuthenticationPort + Send + Sync + 'static> SignOutUseCase for SignOutUseCaseImpl<A> {
    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError> {
        if let Err(e) = self.authentication_port.sign_out(token).await {
            log::warn!("Remote sign-out failed: {}", e);
            return Err(e);
        }
        Ok(())
    }
}
