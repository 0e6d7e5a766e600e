use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;

use crate::config::{AppConfig, DbConfig};

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    /// Creates the pool and brings the schema up to date.
    pub async fn init(config: &AppConfig) -> Result<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");
        let db = init_pool(&config.db_config).await?;
        sqlx::migrate!("./migrations").run(&db).await?;

        Ok(Self { db })
    }

    /// Creates a fresh, uniquely named database and migrates it.
    /// Used by integration tests so that every test gets an empty table.
    pub async fn test_init(config: &AppConfig) -> Result<Self> {
        let mut db_config = config.db_config.clone();
        db_config.db_name = uuid::Uuid::new_v4().to_string();

        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;
        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;

        let db = init_pool(&db_config).await?;
        sqlx::migrate!("./migrations").run(&db).await?;

        Ok(Self { db })
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

async fn init_pool(db_config: &DbConfig) -> Result<PgPool> {
    // Tests sometimes fail if there is more than 1 max connection.
    let max_cons = if cfg!(test) { 1 } else { 5 };

    PgPoolOptions::new()
        .max_connections(max_cons)
        .acquire_timeout(Duration::from_millis(500))
        .connect_with(db_config.connection_options())
        .await
        .map_err(|ex| Error::FailToCreatePool(ex.to_string()))
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(String),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("sqlx migration error: {0}")]
    SqlxMigrate(#[from] sqlx::migrate::MigrateError),
}
