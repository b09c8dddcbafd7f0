use thiserror::Error;

/// Errors surfaced by avatar operations.
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("user not found")]
    UserNotFound,
    #[error("no file provided")]
    NoFileProvided,
    #[error("avatar payload exceeds limit")]
    PayloadTooLarge,
    #[error("unsupported media type")]
    UnsupportedMediaType,
    /// The asset store was unreachable or rejected the request.
    #[error("asset store error: {0}")]
    Dependency(String),
    /// The profile could not be written.
    #[error("profile persistence error: {0}")]
    Persistence(String),
}

impl AvatarError {
    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::Dependency(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}

/// Errors returned by a [`ProfileStore`](super::ports::outbound::ProfileStore).
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    /// The stored avatar version advanced since the profile was read.
    #[error("avatar version conflict")]
    VersionConflict,
    #[error("profile not found")]
    NotFound,
    #[error("{0}")]
    Storage(String),
}

/// Errors returned by an [`AssetStore`](super::ports::outbound::AssetStore).
#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("{0}")]
    Unavailable(String),
    #[error("rejected: {0}")]
    Rejected(String),
}
