//! The persistence gateway for waitlist entries.
//! Handlers only ever see the `WaitlistStore` trait, the concrete store is picked at startup.

mod memory;
mod postgres;

pub use memory::InMemoryWaitlistStore;
pub use postgres::PgWaitlistStore;

use async_trait::async_trait;

use crate::schema::{ValidEmail, WaitlistEntry};

#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Inserts a new entry, the store assigns `id` and `created_at`.
    /// Returns `Error::ConstraintViolation` if an entry with the same email (case-insensitive) exists.
    async fn create_entry(&self, email: &ValidEmail) -> Result<WaitlistEntry>;

    /// Case-insensitive lookup. Absence is `Ok(None)`.
    async fn find_by_email(&self, email: &ValidEmail) -> Result<Option<WaitlistEntry>>;

    async fn count_all(&self) -> Result<i64>;
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("an entry with email '{email}' already exists")]
    ConstraintViolation { email: String },

    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
