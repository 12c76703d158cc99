//! Subject model

use serde::{Deserialize, Serialize};

/// Subject as persisted under its id in the owner's `subjects` object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRecord {
    pub name: String,
}

/// Subject with its id, as handed out by the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
}
