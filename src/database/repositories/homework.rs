//! Homework repository implementation

use std::sync::Arc;
use chrono::{Days, NaiveDate};
use tracing::{debug, info};
use crate::database::store::DocumentStore;
use crate::models::homework::{CreateHomeworkRequest, Homework, HomeworkStatus};
use crate::utils::clock::Clock;
use crate::utils::errors::HomeworkBuddyError;
use crate::utils::helpers::{generate_uuid, week_bounds};

#[derive(Clone)]
pub struct HomeworkRepository {
    store: DocumentStore,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for HomeworkRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomeworkRepository")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl HomeworkRepository {
    pub fn new(store: DocumentStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Store a new pending homework item
    ///
    /// The subject must still exist when the item is written; the check runs
    /// under the store lock so a concurrent subject delete cannot slip in.
    pub async fn add_homework(&self, user_id: &str, request: CreateHomeworkRequest) -> Result<Homework, HomeworkBuddyError> {
        self.store
            .update(|doc| {
                let Some(user) = doc
                    .user_mut(user_id)
                    .filter(|user| user.subjects.contains_key(&request.subject_id))
                else {
                    return Err(HomeworkBuddyError::SubjectNotFound { subject_id: request.subject_id });
                };

                let mut id = generate_uuid();
                while user.homework.iter().any(|hw| hw.id == id) {
                    id = generate_uuid();
                }

                let homework = Homework {
                    id,
                    subject_id: request.subject_id,
                    deadline_date: request.deadline_date,
                    text: request.text,
                    photo_ref: request.photo_ref,
                    status: HomeworkStatus::Pending,
                    notification_time: request.notification_time,
                };
                user.homework.push(homework.clone());
                Ok(homework)
            })
            .await?
    }

    /// Homework due in the week `week_offset` weeks away from the current one, by deadline
    pub async fn get_homework_for_week(&self, user_id: &str, week_offset: i64) -> Result<Vec<Homework>, HomeworkBuddyError> {
        let (start, end) = week_bounds(self.clock.today(), week_offset)?;
        let doc = self.store.read().await?;

        let mut homework: Vec<Homework> = doc
            .user(user_id)
            .map(|user| {
                user.homework
                    .iter()
                    .filter(|hw| hw.deadline_date >= start && hw.deadline_date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        homework.sort_by_key(|hw| hw.deadline_date);
        Ok(homework)
    }

    /// All homework of a user, by deadline
    pub async fn get_all_homework(&self, user_id: &str) -> Result<Vec<Homework>, HomeworkBuddyError> {
        let doc = self.store.read().await?;
        let mut homework = doc.user(user_id).map(|user| user.homework.clone()).unwrap_or_default();
        homework.sort_by_key(|hw| hw.deadline_date);
        Ok(homework)
    }

    /// Find homework by id
    pub async fn find(&self, user_id: &str, homework_id: &str) -> Result<Option<Homework>, HomeworkBuddyError> {
        let doc = self.store.read().await?;
        Ok(doc
            .user(user_id)
            .and_then(|user| user.homework.iter().find(|hw| hw.id == homework_id))
            .cloned())
    }

    pub async fn mark_done(&self, user_id: &str, homework_id: &str) -> Result<bool, HomeworkBuddyError> {
        self.modify(user_id, homework_id, |hw| hw.status = HomeworkStatus::Done).await
    }

    pub async fn update_text(&self, user_id: &str, homework_id: &str, text: &str) -> Result<bool, HomeworkBuddyError> {
        let text = text.to_string();
        self.modify(user_id, homework_id, move |hw| hw.text = Some(text)).await
    }

    pub async fn delete(&self, user_id: &str, homework_id: &str) -> Result<bool, HomeworkBuddyError> {
        self.store
            .update(|doc| {
                let Some(user) = doc.user_mut(user_id) else {
                    return false;
                };
                let before = user.homework.len();
                user.homework.retain(|hw| hw.id != homework_id);
                user.homework.len() != before
            })
            .await
    }

    /// Remove homework of every user whose deadline lies more than `weeks` weeks in the past
    ///
    /// All removals are written with a single save. Returns the number of removed items.
    pub async fn delete_older_than(&self, weeks: u32) -> Result<usize, HomeworkBuddyError> {
        let cutoff = self
            .clock
            .today()
            .checked_sub_days(Days::new(u64::from(weeks) * 7))
            .unwrap_or(NaiveDate::MIN);

        let removed = self
            .store
            .update(|doc| {
                let mut removed = 0;
                for user in doc.users.values_mut() {
                    let before = user.homework.len();
                    user.homework.retain(|hw| hw.deadline_date >= cutoff);
                    removed += before - user.homework.len();
                }
                removed
            })
            .await?;

        info!(cutoff = %cutoff, removed = removed, "Old homework cleaned up");
        Ok(removed)
    }

    /// Total number of stored homework items across all users
    pub async fn count_homework(&self) -> Result<usize, HomeworkBuddyError> {
        let doc = self.store.read().await?;
        Ok(doc.users.values().map(|user| user.homework.len()).sum())
    }

    async fn modify<F>(&self, user_id: &str, homework_id: &str, change: F) -> Result<bool, HomeworkBuddyError>
    where
        F: FnOnce(&mut Homework),
    {
        let found = self
            .store
            .update(|doc| {
                match doc
                    .user_mut(user_id)
                    .and_then(|user| user.homework.iter_mut().find(|hw| hw.id == homework_id))
                {
                    Some(hw) => {
                        change(hw);
                        true
                    }
                    None => false,
                }
            })
            .await?;

        if !found {
            debug!(user_id = user_id, homework_id = homework_id, "Homework not found");
        }
        Ok(found)
    }
}
