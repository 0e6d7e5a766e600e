//! In-memory `WaitlistStore`, picked with `store = "memory"` or injected by tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{Error, Result, WaitlistStore};
use crate::schema::{ValidEmail, WaitlistEntry};

#[derive(Debug, Default)]
pub struct InMemoryWaitlistStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    entries: Vec<WaitlistEntry>,
}

impl InMemoryWaitlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored entries in insertion order.
    pub fn entries(&self) -> Vec<WaitlistEntry> {
        self.lock().entries.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock still holds consistent data: every mutation is a single push.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Inner {
    fn find(&self, email: &ValidEmail) -> Option<&WaitlistEntry> {
        let email = email.lowercase();
        self.entries
            .iter()
            .find(|entry| entry.email.to_lowercase() == email)
    }
}

#[async_trait]
impl WaitlistStore for InMemoryWaitlistStore {
    async fn create_entry(&self, email: &ValidEmail) -> Result<WaitlistEntry> {
        let mut inner = self.lock();
        if inner.find(email).is_some() {
            return Err(Error::ConstraintViolation {
                email: email.to_string(),
            });
        }

        inner.last_id += 1;
        let entry = WaitlistEntry {
            id: inner.last_id,
            email: email.to_string(),
            created_at: Utc::now(),
        };
        inner.entries.push(entry.clone());

        Ok(entry)
    }

    async fn find_by_email(&self, email: &ValidEmail) -> Result<Option<WaitlistEntry>> {
        Ok(self.lock().find(email).cloned())
    }

    async fn count_all(&self) -> Result<i64> {
        Ok(self.lock().entries.len() as i64)
    }
}
