//! Database service layer
//!
//! This module provides a high-level interface to database operations

use std::sync::Arc;
use crate::database::{DocumentStore, HomeworkRepository, SubjectRepository, UserRepository};
use crate::models::*;
use crate::utils::clock::Clock;
use crate::utils::errors::HomeworkBuddyError;

/// Totals reported by the admin stats command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemStats {
    pub users: usize,
    pub homework: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub subjects: SubjectRepository,
    pub homework: HomeworkRepository,
}

impl DatabaseService {
    pub fn new(store: DocumentStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            subjects: SubjectRepository::new(store.clone()),
            homework: HomeworkRepository::new(store, clock),
        }
    }

    /// Subject names by id for one user, read in a single load
    pub async fn subject_names(&self, user_id: &str) -> Result<std::collections::BTreeMap<String, String>, HomeworkBuddyError> {
        Ok(self
            .subjects
            .get_subjects(user_id)
            .await?
            .into_iter()
            .map(|Subject { id, name }| (id, name))
            .collect())
    }

    /// Get system statistics
    pub async fn get_system_stats(&self) -> Result<SystemStats, HomeworkBuddyError> {
        Ok(SystemStats {
            users: self.users.count_users().await?,
            homework: self.homework.count_homework().await?,
        })
    }
}
