//! Authenticated caller identity passed into every service operation

use uuid::Uuid;

/// The user on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    /// Verified email from the session, if the identity provider supplied one
    pub email: Option<String>,
}

impl Caller {
    pub fn new(user_id: Uuid, email: Option<String>) -> Self {
        Self { user_id, email }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
