use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::domain::AccountId;

const SESSION_EVENT_CAPACITY: usize = 64;

/// Opaque bearer token issued by the authentication service.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Identity of one signed-in session. Stays the same when the access token
/// is refreshed, so two devices of the same account never share one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub account_id: AccountId,
    pub email: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub session_id: SessionId,
    pub access_token: SessionToken,
    /// Exchanged for a new access token once `expires_at` has passed.
    pub refresh_token: Option<SessionToken>,
    pub account: Account,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// A change to one session. A refreshed access token is announced as
/// `SignedIn` for the same session.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    SignedIn {
        session_id: SessionId,
        account_id: AccountId,
    },
    SignedOut {
        session_id: SessionId,
        account_id: AccountId,
    },
}

impl SessionEvent {
    pub fn signed_in(session: &Session) -> Self {
        SessionEvent::SignedIn {
            session_id: session.session_id.clone(),
            account_id: session.account.account_id,
        }
    }

    pub fn signed_out(session: &Session) -> Self {
        SessionEvent::SignedOut {
            session_id: session.session_id.clone(),
            account_id: session.account.account_id,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        match self {
            SessionEvent::SignedIn { session_id, .. }
            | SessionEvent::SignedOut { session_id, .. } => session_id,
        }
    }

    pub fn account_id(&self) -> AccountId {
        match self {
            SessionEvent::SignedIn { account_id, .. }
            | SessionEvent::SignedOut { account_id, .. } => *account_id,
        }
    }
}

/// Fan-out of session changes to every live subscription.
#[derive(Clone)]
pub struct SessionNotifier {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: SessionEvent) {
        log::debug!(
            "Session event for account {} (session {}): {}",
            event.account_id(),
            event.session_id(),
            match &event {
                SessionEvent::SignedIn { .. } => "signed in",
                SessionEvent::SignedOut { .. } => "signed out",
            }
        );
        // no receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self, session_id: &SessionId) -> SessionSubscription {
        SessionSubscription {
            session_id: session_id.clone(),
            receiver: self.sender.subscribe(),
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Changes to one session. Dropping the subscription unsubscribes.
pub struct SessionSubscription {
    session_id: SessionId,
    receiver: broadcast::Receiver<SessionEvent>,
}

impl SessionSubscription {
    /// Waits for the next event concerning this session. Returns `None` once
    /// the notifier is gone.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.session_id() == &self.session_id => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!(
                        "Subscription for session {} lagged, skipped {} events",
                        self.session_id,
                        skipped
                    );
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
