//! Subject repository implementation

use tracing::debug;
use crate::database::store::DocumentStore;
use crate::models::subject::{Subject, SubjectRecord};
use crate::utils::errors::HomeworkBuddyError;
use crate::utils::helpers::generate_uuid;

#[derive(Clone)]
#[derive(Debug)]
pub struct SubjectRepository {
    store: DocumentStore,
}

impl SubjectRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Subjects of a user, sorted by name
    pub async fn get_subjects(&self, user_id: &str) -> Result<Vec<Subject>, HomeworkBuddyError> {
        let doc = self.store.read().await?;
        let mut subjects: Vec<Subject> = doc
            .user(user_id)
            .map(|user| {
                user.subjects
                    .iter()
                    .map(|(id, record)| Subject { id: id.clone(), name: record.name.clone() })
                    .collect()
            })
            .unwrap_or_default();

        subjects.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.id.cmp(&b.id)));
        Ok(subjects)
    }

    /// Find subject by id
    pub async fn find(&self, user_id: &str, subject_id: &str) -> Result<Option<Subject>, HomeworkBuddyError> {
        let doc = self.store.read().await?;
        Ok(doc
            .user(user_id)
            .and_then(|user| user.subjects.get(subject_id))
            .map(|record| Subject { id: subject_id.to_string(), name: record.name.clone() }))
    }

    /// Add a subject under a fresh id
    pub async fn add_subject(&self, user_id: &str, name: &str) -> Result<Subject, HomeworkBuddyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HomeworkBuddyError::InvalidInput("Subject name cannot be empty".to_string()));
        }

        self.store
            .update(|doc| {
                let user = doc.user_entry(user_id);
                let mut id = generate_uuid();
                while user.subjects.contains_key(&id) {
                    id = generate_uuid();
                }
                user.subjects.insert(id.clone(), SubjectRecord { name: name.to_string() });
                Subject { id, name: name.to_string() }
            })
            .await
    }

    /// Delete a subject together with all homework that references it
    ///
    /// Returns false if the user or subject does not exist.
    pub async fn delete_subject(&self, user_id: &str, subject_id: &str) -> Result<bool, HomeworkBuddyError> {
        self.store
            .update(|doc| {
                let Some(user) = doc.user_mut(user_id) else {
                    return false;
                };
                if user.subjects.remove(subject_id).is_none() {
                    return false;
                }

                let before = user.homework.len();
                user.homework.retain(|hw| hw.subject_id != subject_id);
                debug!(
                    user_id = user_id,
                    subject_id = subject_id,
                    removed_homework = before - user.homework.len(),
                    "Subject deleted"
                );
                true
            })
            .await
    }

    /// Number of homework items that reference the subject
    pub async fn homework_count(&self, user_id: &str, subject_id: &str) -> Result<usize, HomeworkBuddyError> {
        let doc = self.store.read().await?;
        Ok(doc
            .user(user_id)
            .map(|user| user.homework.iter().filter(|hw| hw.subject_id == subject_id).count())
            .unwrap_or(0))
    }
}
