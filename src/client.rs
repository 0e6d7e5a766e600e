//! A small HTTP client for the waitlist API.
//! Input is validated with the same `schema` rules the server uses, so an invalid email never
//! leaves the process.

use reqwest::{Client, StatusCode, Url};

use crate::schema::{
    CountResponse, ErrorBody, NewWaitlistEntry, ValidationError, WaitlistEntry,
    API_WAITLIST_COUNT_PATH, API_WAITLIST_PATH,
};

#[derive(Debug, Clone)]
pub struct WaitlistClient {
    http_client: Client,
    base_url: Url,
}

impl WaitlistClient {
    pub fn new<S: AsRef<str>>(base_url: S, timeout: std::time::Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(WaitlistClient {
            http_client,
            base_url,
        })
    }

    /// Validates `email` locally and submits it.
    pub async fn join<S: AsRef<str>>(&self, email: S) -> Result<WaitlistEntry> {
        let valid = NewWaitlistEntry::new(email.as_ref()).validate()?;
        let body = NewWaitlistEntry::new(valid.email.into_inner());

        let resp = self
            .http_client
            .post(self.url(API_WAITLIST_PATH)?)
            .json(&body)
            .send()
            .await?;

        match resp.status() {
            StatusCode::CREATED => Ok(resp.json().await?),
            StatusCode::CONFLICT => {
                let body: ErrorBody = resp.json().await?;
                Err(Error::AlreadyInWaitlist(body.message))
            }
            StatusCode::BAD_REQUEST => Err(Error::Rejected(resp.json().await?)),
            status => Err(Error::UnexpectedStatus(status)),
        }
    }

    /// The displayed number of entries, offset included.
    pub async fn count(&self) -> Result<i64> {
        let resp = self
            .http_client
            .get(self.url(API_WAITLIST_COUNT_PATH)?)
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(Error::UnexpectedStatus(resp.status()));
        }

        let CountResponse { count } = resp.json().await?;
        Ok(count)
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::UrlParsing(e.to_string()))
    }
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    AlreadyInWaitlist(String),
    #[error("server rejected the input: {}", .0.message)]
    Rejected(ErrorBody),
    #[error("unexpected response status: {0}")]
    UnexpectedStatus(StatusCode),

    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
