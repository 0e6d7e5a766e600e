use std::{future::Future, time::Duration};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::{
    model,
    schema::{CountResponse, NewWaitlistEntry, ValidationError, WaitlistEntry},
    web::WebResult,
    AppState,
};

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum WaitlistError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("email is already in the waitlist")]
    AlreadyInWaitlist,

    #[error("store error: {0}")]
    Store(#[from] model::Error),
    #[error("store call did not finish within {0:?}")]
    StoreTimeout(Duration),
}

impl From<JsonRejection> for WaitlistError {
    fn from(rejection: JsonRejection) -> Self {
        WaitlistError::Validation(ValidationError::new(None, rejection.body_text()))
    }
}

// ###################################
// ->   API
// ###################################
#[tracing::instrument(name = "Adding a new waitlist entry", skip_all)]
pub async fn waitlist_create(
    State(app_state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> WebResult<(StatusCode, Json<WaitlistEntry>)> {
    let Json(payload) = payload.map_err(WaitlistError::from)?;
    let new_entry = NewWaitlistEntry::try_from(&payload)
        .and_then(NewWaitlistEntry::validate)
        .map_err(WaitlistError::from)?;
    let email = &new_entry.email;

    // Early duplicate check, the unique index has the final word in `create_entry`.
    if with_store_timeout(&app_state, app_state.store.find_by_email(email))
        .await?
        .is_some()
    {
        return Err(WaitlistError::AlreadyInWaitlist.into());
    }

    let entry = with_store_timeout(&app_state, app_state.store.create_entry(email)).await?;
    info!(entry_id = entry.id, "SUCCESS");

    Ok((StatusCode::CREATED, Json(entry)))
}

#[tracing::instrument(name = "Counting waitlist entries", skip_all)]
pub async fn waitlist_count(State(app_state): State<AppState>) -> WebResult<Json<CountResponse>> {
    let count = with_store_timeout(&app_state, app_state.store.count_all()).await?;

    Ok(Json(CountResponse {
        count: count.saturating_add(app_state.display_offset),
    }))
}

// ###################################
// ->   HELPERS
// ###################################

/// Bounds a store call by the configured timeout.
/// An elapsed timeout drops the future, an insert either committed before that or not at all.
async fn with_store_timeout<T>(
    app_state: &AppState,
    store_call: impl Future<Output = model::Result<T>>,
) -> Result<T, WaitlistError> {
    let timeout = app_state.store_timeout;

    tokio::time::timeout(timeout, store_call)
        .await
        .map_err(|_| WaitlistError::StoreTimeout(timeout))?
        .map_err(WaitlistError::Store)
}
