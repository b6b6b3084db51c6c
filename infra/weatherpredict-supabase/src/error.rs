use thiserror::Error;
use weatherpredict_app::{
    domain::{RepoCreateError, RepoError},
    ports::authentication::AuthError,
};

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response. `message` is the backend's own wording.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("unexpected response from backend: {0}")]
    Decode(String),

    #[error("backend returned no row for {0}")]
    EmptyResponse(&'static str),
}

/// Error body shapes used by GoTrue and PostgREST.
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
    code: Option<serde_json::Value>,
    error_code: Option<String>,
}

impl SupabaseError {
    pub(crate) fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let code = parsed.error_code.or_else(|| match parsed.code {
            Some(serde_json::Value::String(code)) => Some(code),
            _ => None,
        });
        let message = parsed
            .message
            .or(parsed.msg)
            .or(parsed.error_description)
            .or(parsed.error)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.trim().to_string()
                }
            });
        SupabaseError::Api {
            status: status.as_u16(),
            code,
            message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SupabaseError::Api { status, .. } => Some(*status),
            SupabaseError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

impl From<SupabaseError> for RepoError {
    fn from(error: SupabaseError) -> Self {
        RepoError::StorageError(error.to_string())
    }
}

impl From<SupabaseError> for RepoCreateError {
    fn from(error: SupabaseError) -> Self {
        match &error {
            SupabaseError::Api {
                code: Some(code), ..
            } if code == UNIQUE_VIOLATION => RepoCreateError::Conflict(error.to_string()),
            _ => RepoCreateError::StorageError(error.to_string()),
        }
    }
}

impl From<SupabaseError> for AuthError {
    fn from(error: SupabaseError) -> Self {
        match error.status() {
            Some(400) | Some(401) | Some(403) | Some(422) => {
                let invalid_credentials = matches!(
                    &error,
                    SupabaseError::Api { code: Some(code), .. }
                        if code == "invalid_credentials" || code == "invalid_grant"
                );
                if invalid_credentials {
                    AuthError::InvalidCredentials(error.to_string())
                } else {
                    AuthError::Rejected(error.to_string())
                }
            }
            _ => AuthError::Unavailable(error.to_string()),
        }
    }
}
