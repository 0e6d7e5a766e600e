//! The same contract against the Postgres store.
//! Needs a running database as described by `config/base.toml` + `config/local.toml`:
//! `cargo test -- --ignored`

use std::sync::Arc;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use waitlist::schema::WaitlistEntry;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn db_create_persists_the_entry() -> Result<()> {
    let app = TestApp::spawn_with_db().await?;

    let res = app.post_waitlist_email("alice@example.com").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let entry: WaitlistEntry = res.json().await?;
    assert_eq!(entry.email, "alice@example.com");
    assert!(entry.id >= 1);

    assert_eq!(app.store.count_all().await?, 1);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn db_duplicates_are_rejected_regardless_of_case() -> Result<()> {
    let app = TestApp::spawn_with_db().await?;

    let res = app.post_waitlist_email("alice@example.com").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    for dup in ["alice@example.com", "Alice@Example.com"] {
        let res = app.post_waitlist_email(dup).await?;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: Value = res.json().await?;
        assert_eq!(body, json!({ "message": "Email already in waitlist" }));
    }

    assert_eq!(app.get_count().await?, app.display_offset + 1);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running postgres instance"]
async fn db_concurrent_duplicates_yield_one_201() -> Result<()> {
    let app = Arc::new(TestApp::spawn_with_db().await?);

    let handles = (0..5)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                app.post_waitlist_email("race@example.com")
                    .await
                    .map(|res| res.status())
            })
        })
        .collect::<Vec<_>>();

    let mut created = 0;
    for handle in handles {
        let status = handle.await??;
        assert!(
            status == StatusCode::CREATED || status == StatusCode::CONFLICT,
            "unexpected status: {status}"
        );
        if status == StatusCode::CREATED {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(app.store.count_all().await?, 1);

    Ok(())
}
