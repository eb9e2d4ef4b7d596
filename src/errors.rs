use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

/// Failure of a single relay request. Every variant renders as
/// `{ "ok": false, "error": <code or provider message> }`.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("invalid_input")]
    InvalidInput,
    #[error("missing_api_key")]
    MissingApiKey,
    /// Carries the machine readable code, e.g. `missing_from_or_to`.
    #[error("{0}")]
    MissingConfiguration(&'static str),
    #[error("{0}")]
    AuthFailure(String),
    #[error("{0}")]
    SendFailed(String),
    #[error("{0}")]
    AppendFailed(String),
    /// Vision bodies that are not JSON at all.
    #[error("{0}")]
    UnreadableIntake(String),
}

#[derive(Serialize, Debug, PartialEq)]
pub struct RelayReply {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayReply {
    pub fn success() -> Self {
        RelayReply {
            ok: true,
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        RelayReply {
            ok: false,
            error: Some(error),
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput => StatusCode::BAD_REQUEST,
            RelayError::SendFailed(_) => StatusCode::BAD_GATEWAY,
            RelayError::MissingApiKey
            | RelayError::MissingConfiguration(_)
            | RelayError::AuthFailure(_)
            | RelayError::AppendFailed(_)
            | RelayError::UnreadableIntake(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            RelayError::InvalidInput | RelayError::UnreadableIntake(_) => {}
            RelayError::MissingApiKey
            | RelayError::MissingConfiguration(_)
            | RelayError::AuthFailure(_) => {
                log::error!("Relay is misconfigured: {}", self)
            }
            RelayError::SendFailed(_) | RelayError::AppendFailed(_) => {
                log::error!("Provider rejected relay request: {}", self)
            }
        }

        HttpResponse::build(self.status_code()).json(RelayReply::failure(self.to_string()))
    }
}
