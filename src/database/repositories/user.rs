//! User repository implementation

use crate::database::store::DocumentStore;
use crate::models::user::{SettingKey, SettingValue, UserRecord, UserSettings};
use crate::utils::errors::HomeworkBuddyError;

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    store: DocumentStore,
}

impl UserRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Get the user record, creating it with default settings if absent
    ///
    /// The document is only written when the user was created.
    pub async fn get_or_create_user(&self, user_id: &str) -> Result<UserRecord, HomeworkBuddyError> {
        self.store.update(|doc| doc.user_entry(user_id).clone()).await
    }

    /// Find user by id without creating it
    pub async fn find(&self, user_id: &str) -> Result<Option<UserRecord>, HomeworkBuddyError> {
        let doc = self.store.read().await?;
        Ok(doc.user(user_id).cloned())
    }

    /// Settings of a user, creating the user if needed
    pub async fn get_settings(&self, user_id: &str) -> Result<UserSettings, HomeworkBuddyError> {
        Ok(self.get_or_create_user(user_id).await?.settings)
    }

    /// All users with their records, ordered by id
    pub async fn get_all_users(&self) -> Result<Vec<(String, UserRecord)>, HomeworkBuddyError> {
        let doc = self.store.read().await?;
        Ok(doc.users.into_iter().collect())
    }

    pub async fn count_users(&self) -> Result<usize, HomeworkBuddyError> {
        Ok(self.store.read().await?.users.len())
    }

    /// Flip a boolean setting and return its new value
    pub async fn toggle_setting(&self, user_id: &str, key: SettingKey) -> Result<bool, HomeworkBuddyError> {
        if key == SettingKey::DefaultNotificationTime {
            return Err(HomeworkBuddyError::InvalidInput(format!(
                "Setting {} is not a flag",
                key.as_str()
            )));
        }

        self.store
            .update(|doc| {
                let settings = &mut doc.user_entry(user_id).settings;
                let next = !settings.flag(key).unwrap_or(false);
                settings.apply(key, SettingValue::Flag(next)).map(|_| next)
            })
            .await?
    }

    /// Set a setting to the given value
    pub async fn update_setting(&self, user_id: &str, key: SettingKey, value: SettingValue) -> Result<(), HomeworkBuddyError> {
        // Validate before touching the document so a bad value never creates a user
        UserSettings::for_new_user().apply(key, value)?;

        self.store
            .update(|doc| doc.user_entry(user_id).settings.apply(key, value))
            .await?
    }
}
