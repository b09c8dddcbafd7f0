use super::{AssetReference, UserId};

/// The slice of a user profile the avatar lifecycle reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    /// Url and asset id are always set together.
    pub avatar: Option<AssetReference>,
    /// Bumped on every avatar write, used for optimistic concurrency.
    pub version: i64,
}

impl UserProfile {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            avatar: None,
            version: 0,
        }
    }

    pub fn with_avatar(mut self, avatar: AssetReference) -> Self {
        self.avatar = Some(avatar);
        self
    }
}
