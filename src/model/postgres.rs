use async_trait::async_trait;
use sqlx::postgres::PgDatabaseError;

use super::{Error, Result, WaitlistStore};
use crate::{
    database::DbManager,
    schema::{ValidEmail, WaitlistEntry},
};

/// SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone, Debug)]
pub struct PgWaitlistStore {
    database_mgr: DbManager,
}

impl PgWaitlistStore {
    pub fn new(database_mgr: DbManager) -> Self {
        Self { database_mgr }
    }
}

#[async_trait]
impl WaitlistStore for PgWaitlistStore {
    #[tracing::instrument(name = "Inserting waitlist entry", skip_all)]
    async fn create_entry(&self, email: &ValidEmail) -> Result<WaitlistEntry> {
        let query_result = sqlx::query_as::<_, WaitlistEntry>(
            r#"
            INSERT INTO waitlist_entries (email)
            VALUES ($1)
            RETURNING id, email, created_at
        "#,
        )
        .bind(email.as_ref())
        .fetch_one(self.database_mgr.db())
        .await;

        // The unique index on LOWER(email) is the authority on duplicates,
        // a concurrent insert that slipped past the handler's lookup ends up here.
        query_result.map_err(|er| match er {
            sqlx::Error::Database(ref db_er)
                if db_er
                    .try_downcast_ref::<PgDatabaseError>()
                    .is_some_and(|pg_er| pg_er.code() == UNIQUE_VIOLATION) =>
            {
                Error::ConstraintViolation {
                    email: email.to_string(),
                }
            }
            _ => er.into(),
        })
    }

    async fn find_by_email(&self, email: &ValidEmail) -> Result<Option<WaitlistEntry>> {
        let entry = sqlx::query_as::<_, WaitlistEntry>(
            r#"SELECT id, email, created_at FROM waitlist_entries
        WHERE LOWER(email) = LOWER($1)"#,
        )
        .bind(email.as_ref())
        .fetch_optional(self.database_mgr.db())
        .await?;

        Ok(entry)
    }

    async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM waitlist_entries")
            .fetch_one(self.database_mgr.db())
            .await?;

        Ok(count)
    }
}
