//! Storage seams for users and notification records, with in-memory versions.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::model::{Notification, User};

/// Read access to users, plus `save` for seeding and admin paths.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `StoreError::UserNotFound` when absent.
    async fn find_by_id(&self, id: &str) -> StoreResult<User>;

    async fn save(&self, user: User) -> StoreResult<()>;
}

/// Append-only history of dispatch attempts.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Upsert by id. Saving the same record twice leaves one record.
    async fn save(&self, notification: &Notification) -> StoreResult<()>;

    /// Fails with `StoreError::NotificationNotFound` when absent.
    async fn find_by_id(&self, id: &str) -> StoreResult<Notification>;

    /// A user's records, oldest `sent_at` first. Records stamped in the same
    /// second keep the order they were first saved in.
    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<Notification>>;

    async fn count(&self) -> StoreResult<usize>;
}

/// `HashMap`-backed user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `users`.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<User> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound {
                user_id: id.to_string(),
            })
    }

    async fn save(&self, user: User) -> StoreResult<()> {
        self.users.write().await.insert(user.id.clone(), user);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct NotificationTable {
    records: HashMap<String, Notification>,
    ordered: Vec<String>,
}

/// `HashMap`-backed notification store that remembers insertion order.
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    table: RwLock<NotificationTable>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record, in insertion order.
    pub async fn all(&self) -> Vec<Notification> {
        let table = self.table.read().await;
        table
            .ordered
            .iter()
            .filter_map(|id| table.records.get(id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn save(&self, notification: &Notification) -> StoreResult<()> {
        let mut table = self.table.write().await;
        let id = notification.id().to_string();
        if !table.records.contains_key(&id) {
            table.ordered.push(id.clone());
        }
        table.records.insert(id, notification.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> StoreResult<Notification> {
        self.table
            .read()
            .await
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotificationNotFound { id: id.to_string() })
    }

    async fn find_by_user(&self, user_id: &str) -> StoreResult<Vec<Notification>> {
        let table = self.table.read().await;
        let mut history: Vec<Notification> = table
            .ordered
            .iter()
            .filter_map(|id| table.records.get(id))
            .filter(|n| n.user_id() == user_id)
            .cloned()
            .collect();
        history.sort_by_key(Notification::sent_at);
        Ok(history)
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.table.read().await.records.len())
    }
}
