use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::model::Contact;
use crate::store::KeyValueStore;

/// Default storage key for the persisted roster.
pub const ROSTER_KEY: &str = "InviteFriendsList";

/// The ordered roster of invitable contacts and its persistence.
///
/// Reads are synchronous so menu callbacks can project the roster without
/// awaiting. Mutations are serialized: each one holds `writes` until its full
/// re-save completes, so two concurrent mutations can never lose an update.
pub struct RosterStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    contacts: Mutex<Vec<Contact>>,
    writes: tokio::sync::Mutex<()>,
}

impl RosterStore {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            contacts: Mutex::new(Vec::new()),
            writes: tokio::sync::Mutex::new(()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Contact>> {
        self.contacts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Append the persisted roster, in stored order, to the in-memory one.
    /// A missing key leaves the roster untouched. Returns the number loaded.
    pub async fn load(&self) -> Result<usize, StoreError> {
        let _guard = self.writes.lock().await;
        let Some(raw) = self.store.get(&self.key).await? else {
            info!(key = %self.key, "no saved roster, starting empty");
            return Ok(0);
        };
        let saved: Vec<Contact> = serde_json::from_str(&raw)?;

        let mut entries = self.entries();
        let mut loaded = 0;
        for contact in saved {
            if entries.iter().any(|c| c.user_id == contact.user_id) {
                continue;
            }
            entries.push(contact);
            loaded += 1;
        }
        info!(count = loaded, "loaded roster");
        Ok(loaded)
    }

    /// Write the whole roster under the storage key.
    pub async fn save(&self) -> Result<(), StoreError> {
        let _guard = self.writes.lock().await;
        let snapshot = self.snapshot();
        self.persist(&snapshot).await
    }

    async fn persist(&self, contacts: &[Contact]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(contacts)?;
        self.store.set(&self.key, &raw).await?;
        debug!(count = contacts.len(), "roster saved");
        Ok(())
    }

    /// Apply `change` under the write lock and re-save when it reports a change.
    /// The in-memory change is kept even if the save fails.
    async fn mutate<F>(&self, change: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut Vec<Contact>) -> bool,
    {
        let _guard = self.writes.lock().await;
        let snapshot = {
            let mut entries = self.entries();
            if !change(&mut entries) {
                return Ok(false);
            }
            entries.clone()
        };
        self.persist(&snapshot).await?;
        Ok(true)
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Append `contact`. A contact whose user id is already rostered is not
    /// added again; returns whether the roster changed.
    pub async fn add(&self, contact: Contact) -> Result<bool, StoreError> {
        self.mutate(|entries| {
            if entries.iter().any(|c| c.user_id == contact.user_id) {
                return false;
            }
            entries.push(contact);
            true
        })
        .await
    }

    /// Remove the first entry with `contact`'s user id. Absent contacts are a no-op.
    pub async fn remove(&self, contact: &Contact) -> Result<bool, StoreError> {
        self.mutate(|entries| {
            match entries.iter().position(|c| c.user_id == contact.user_id) {
                Some(index) => {
                    entries.remove(index);
                    true
                }
                None => false,
            }
        })
        .await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.mutate(|entries| {
            entries.clear();
            true
        })
        .await?;
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn contains(&self, display_name: &str) -> bool {
        self.entries().iter().any(|c| c.display_name == display_name)
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.entries().iter().any(|c| c.user_id == user_id)
    }

    pub fn snapshot(&self) -> Vec<Contact> {
        self.entries().clone()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
