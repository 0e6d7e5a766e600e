use std::{sync::Arc, time::Duration};

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use waitlist::{
    config::{get_or_init_config, StoreKind, WaitlistConfig},
    model::InMemoryWaitlistStore,
    schema::{ErrorBody, WaitlistEntry},
    App, WaitlistClient,
};

use crate::helpers::{BlindLookupStore, BrokenStore, HangingStore, TestApp};

#[tokio::test]
async fn waitlist_create_returns_201_with_entry() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_waitlist_email("alice@example.com").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await?;
    assert_eq!(body["email"], "alice@example.com");
    assert!(body["id"].is_i64(), "id missing: {body}");
    assert!(body["createdAt"].is_string(), "createdAt missing: {body}");

    let entry: WaitlistEntry = serde_json::from_value(body)?;
    assert_eq!(app.store.count_all().await?, 1);
    assert_eq!(
        app.store
            .find_by_email(&waitlist::schema::ValidEmail::parse(&entry.email)?)
            .await?,
        Some(entry)
    );

    Ok(())
}

#[tokio::test]
async fn waitlist_scenario_create_duplicate_and_count() -> Result<()> {
    let waitlist_config = WaitlistConfig {
        display_offset: 1243,
        store_timeout_millis: 2000,
        store: StoreKind::Memory,
    };
    let app =
        TestApp::spawn_with_config(Arc::new(InMemoryWaitlistStore::new()), &waitlist_config)
            .await?;

    let res = app.post_waitlist_email("alice@example.com").await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let entry: WaitlistEntry = res.json().await?;
    assert_eq!(entry.id, 1);
    assert_eq!(entry.email, "alice@example.com");

    let res = app.post_waitlist_email("alice@example.com").await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "message": "Email already in waitlist" }));

    assert_eq!(app.get_count().await?, 1244);

    Ok(())
}

#[tokio::test]
async fn waitlist_create_duplicate_ignores_case() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_waitlist_email("alice@example.com").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app.post_waitlist_email("ALICE@Example.COM").await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(app.store.count_all().await?, 1);

    Ok(())
}

#[tokio::test]
async fn waitlist_create_returns_400_for_invalid_emails() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        ("not-an-email", "Missing at symbol"),
        ("", "Empty email"),
        ("a@", "Missing domain"),
        ("bad-email", "Plain word"),
        ("@example.com", "Missing subject"),
        ("alice@localhost", "Single label domain"),
        ("a@b", "Single letter domain"),
        ("a!b@example.com", "Disallowed local part character"),
    ];

    for (email, description) in cases {
        let res = app.post_waitlist_email(email).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "The API did not return a 400 BAD REQUEST for: {description}"
        );

        let body: ErrorBody = res.json().await?;
        assert_eq!(body.field.as_deref(), Some("email"), "{description}");
        assert_eq!(body.message, "Please enter a valid email address");
    }

    assert_eq!(app.store.count_all().await?, 0);

    Ok(())
}

#[tokio::test]
async fn waitlist_create_returns_400_for_malformed_bodies() -> Result<()> {
    let app = TestApp::spawn().await?;

    let cases = [
        (json!({}), Some("email"), "Missing email"),
        (json!({ "email": null }), Some("email"), "Null email"),
        (json!({ "email": 42 }), Some("email"), "Number email"),
        (json!(["alice@example.com"]), None, "Array body"),
    ];

    for (body, expected_field, description) in cases {
        let res = app.post_waitlist(&body).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Wrong status for: {description}"
        );
        let body: ErrorBody = res.json().await?;
        assert_eq!(body.field.as_deref(), expected_field, "{description}");
        assert!(!body.message.is_empty());
    }

    // Not JSON at all
    let res = app
        .http_client
        .post(format!("{}/api/waitlist", app.base_url()))
        .header("Content-Type", "application/json")
        .body("{ this is not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["message"].is_string());

    assert_eq!(app.store.count_all().await?, 0);

    Ok(())
}

#[tokio::test]
async fn waitlist_concurrent_duplicates_yield_one_201() -> Result<()> {
    let app = Arc::new(TestApp::spawn().await?);

    let handles = (0..10)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                app.post_waitlist_email("race@example.com")
                    .await
                    .map(|res| res.status())
            })
        })
        .collect::<Vec<_>>();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await??);
    }

    let created = statuses
        .iter()
        .filter(|st| **st == StatusCode::CREATED)
        .count();
    let conflicts = statuses
        .iter()
        .filter(|st| **st == StatusCode::CONFLICT)
        .count();
    assert_eq!(created, 1, "{statuses:?}");
    assert_eq!(conflicts, 9, "{statuses:?}");
    assert_eq!(app.store.count_all().await?, 1);

    Ok(())
}

#[tokio::test]
async fn waitlist_constraint_violation_after_lookup_is_a_409() -> Result<()> {
    let app = TestApp::spawn_with_store(Arc::new(BlindLookupStore::default())).await?;

    let res = app.post_waitlist_email("alice@example.com").await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app.post_waitlist_email("alice@example.com").await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "message": "Email already in waitlist" }));

    Ok(())
}

#[tokio::test]
async fn waitlist_count_reports_entries_plus_offset() -> Result<()> {
    let app = TestApp::spawn().await?;
    assert_eq!(app.get_count().await?, app.display_offset);

    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        let res = app.post_waitlist_email(email).await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let first = app.get_count().await?;
    let second = app.get_count().await?;
    assert_eq!(first, app.display_offset + 3);
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn waitlist_store_failures_are_a_generic_500() -> Result<()> {
    let app = TestApp::spawn_with_store(Arc::new(BrokenStore)).await?;

    let create = app.post_waitlist_email("alice@example.com").await?;
    let count = app
        .http_client
        .get(format!("{}/api/waitlist/count", app.base_url()))
        .send()
        .await?;

    for res in [create, count] {
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorBody = res.json().await?;
        assert_eq!(body.field, None);
        assert!(
            !body.message.to_lowercase().contains("pool"),
            "internal details leaked: {}",
            body.message
        );
    }

    Ok(())
}

#[tokio::test]
async fn waitlist_store_timeout_is_a_500() -> Result<()> {
    let waitlist_config = WaitlistConfig {
        display_offset: 0,
        store_timeout_millis: 100,
        store: StoreKind::Memory,
    };
    let app = TestApp::spawn_with_config(Arc::new(HangingStore), &waitlist_config).await?;

    let create = app.post_waitlist_email("alice@example.com").await?;
    assert_eq!(create.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let count = app
        .http_client
        .get(format!("{}/api/waitlist/count", app.base_url()))
        .send()
        .await?;
    assert_eq!(count.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

#[tokio::test]
async fn app_built_with_memory_store_needs_no_database() -> Result<()> {
    let mut config = get_or_init_config().clone();
    config.net_config.app_port = 0;
    config.waitlist_config.store = StoreKind::Memory;

    let app = App::build_from_config(&config).await?;
    let addr = app.local_addr()?;
    tokio::spawn(waitlist::serve(app));

    let client = WaitlistClient::new(format!("http://{addr}"), Duration::from_secs(5))?;
    let entry = client.join("alice@example.com").await?;
    assert_eq!(entry.id, 1);
    assert_eq!(
        client.count().await?,
        config.waitlist_config.display_offset + 1
    );

    Ok(())
}
