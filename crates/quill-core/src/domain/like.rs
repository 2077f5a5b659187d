use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A like record. Keyed by `(user_id, post_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: Uuid, post_id: Uuid) -> Self {
        Self {
            user_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}
