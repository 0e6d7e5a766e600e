use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::{model, schema::ErrorBody};

use super::routes::WaitlistError;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("waitlist error: {0}")]
    Waitlist(#[from] WaitlistError),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::Waitlist(WaitlistError::Validation(er)) => (
                StatusCode::BAD_REQUEST,
                InvalidInput {
                    message: er.message.clone(),
                    field: er.field.clone(),
                },
            ),
            Error::Waitlist(WaitlistError::AlreadyInWaitlist)
            | Error::Waitlist(WaitlistError::Store(model::Error::ConstraintViolation { .. })) => {
                (StatusCode::CONFLICT, DuplicateEmail)
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The part of an error that is safe to show to the client.
#[derive(Debug, Clone, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("{message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },
    #[display("Email already in waitlist")]
    DuplicateEmail,
    #[display("Something went wrong. Please try again.")]
    ServiceError,
}

impl ClientError {
    pub fn body(&self) -> ErrorBody {
        let field = match self {
            ClientError::InvalidInput { field, .. } => field.clone(),
            _ => None,
        };

        ErrorBody {
            message: self.to_string(),
            field,
        }
    }
}
