use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, StreamExt};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{
    models::{AssetReference, AvatarFile, StoreOptions, UserId, UserProfile},
    ports::{
        inbound::AvatarService,
        outbound::{AssetStore, ProfileStore},
    },
    services::UserLocks,
    AssetStoreError, AvatarError, ProfileStoreError,
};

const MAX_AVATAR_SIZE: usize = 5 * 1024 * 1024;
const MAX_VERSION_ATTEMPTS: usize = 3;
const MAX_CONCURRENT_STORES: usize = 4;

pub struct AvatarServiceImpl<P, A> {
    profiles: Arc<P>,
    assets: Arc<A>,
    folder: String,
    locks: UserLocks,
}

impl<P, A> AvatarServiceImpl<P, A> {
    pub fn new(profiles: Arc<P>, assets: Arc<A>, folder: impl Into<String>) -> Self {
        Self {
            profiles,
            assets,
            folder: folder.into(),
            locks: UserLocks::new(),
        }
    }

    fn store_options(&self, user_id: &UserId) -> StoreOptions {
        StoreOptions {
            folder: self.folder.clone(),
            public_id: format!("user-{user_id}-{}", Uuid::new_v4().simple()),
            overwrite: false,
        }
    }
}

fn validate_files(files: &[AvatarFile]) -> Result<(), AvatarError> {
    if files.is_empty() {
        return Err(AvatarError::NoFileProvided);
    }

    for file in files {
        if file.is_empty() {
            return Err(AvatarError::NoFileProvided);
        }

        if file.len() > MAX_AVATAR_SIZE {
            return Err(AvatarError::PayloadTooLarge);
        }

        if let Some(content_type) = file.content_type.as_deref() {
            if !content_type.starts_with("image/") {
                return Err(AvatarError::UnsupportedMediaType);
            }
        }
    }

    Ok(())
}

impl<P: ProfileStore, A: AssetStore> AvatarServiceImpl<P, A> {
    async fn find_profile(&self, user_id: &UserId) -> Result<UserProfile, AvatarError> {
        self.profiles
            .find_by_id(user_id)
            .await
            .map_err(|err| AvatarError::persistence(err.to_string()))?
            .ok_or(AvatarError::UserNotFound)
    }

    /// Shared by upload and replace: store, persist, then clean up whatever
    /// the new reference superseded. Holds the user's lock throughout.
    async fn commit_avatar(
        &self,
        user_id: &UserId,
        files: Vec<AvatarFile>,
    ) -> Result<AssetReference, AvatarError> {
        let _guard = self.locks.lock(*user_id).await;

        let profile = self.find_profile(user_id).await?;
        validate_files(&files)?;

        let (avatar, extras) = self.store_files(user_id, &files).await?;

        let superseded = match self.persist(profile, &avatar).await {
            Ok(superseded) => superseded,
            Err(err) => {
                tracing::error!(%user_id, asset_id = %avatar.asset_id, "failed to persist avatar: {}", err);
                self.destroy_quietly(user_id, &avatar.asset_id, "compensation")
                    .await;
                self.discard_extras(user_id, &extras).await;
                return Err(err);
            }
        };

        self.discard_extras(user_id, &extras).await;

        match superseded.as_ref().map(AssetReference::known_asset_id) {
            Some(Some(old_id)) if old_id != avatar.asset_id => {
                self.destroy_quietly(user_id, old_id, "superseded").await;
            }
            Some(None) => {
                tracing::info!(%user_id, "superseded avatar had no asset id, nothing to destroy");
            }
            _ => {}
        }

        Ok(avatar)
    }

    /// Stores every file with bounded concurrency. The first file's reference
    /// is returned as the avatar, the others as extras to discard.
    async fn store_files(
        &self,
        user_id: &UserId,
        files: &[AvatarFile],
    ) -> Result<(AssetReference, Vec<AssetReference>), AvatarError> {
        let stores = files
            .iter()
            .map(|file| self.store_one(user_id, file))
            .collect::<Vec<_>>();

        let mut results = stream::iter(stores)
            .buffered(MAX_CONCURRENT_STORES)
            .collect::<Vec<_>>()
            .await
            .into_iter();

        let primary = results.next().ok_or(AvatarError::NoFileProvided)?;
        let extras = results
            .filter_map(|result| match result {
                Ok(reference) => Some(reference),
                Err(err) => {
                    tracing::warn!(%user_id, "failed to store extra avatar file: {}", err);
                    None
                }
            })
            .collect::<Vec<_>>();

        match primary {
            Ok(avatar) => Ok((avatar, extras)),
            Err(err) => {
                self.discard_extras(user_id, &extras).await;
                Err(AvatarError::dependency(err.to_string()))
            }
        }
    }

    async fn store_one(
        &self,
        user_id: &UserId,
        file: &AvatarFile,
    ) -> Result<AssetReference, AssetStoreError> {
        let options = self.store_options(user_id);
        let reference = self.assets.store(file, &options).await?;
        let stored_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();

        // Enough to let an external sweep match orphans to users.
        tracing::info!(
            %user_id,
            asset_id = %reference.asset_id,
            %stored_at,
            "stored avatar asset"
        );

        Ok(reference)
    }

    /// Writes `avatar` onto the profile, re-reading and retrying on version
    /// conflicts. Returns the reference the write replaced.
    async fn persist(
        &self,
        mut profile: UserProfile,
        avatar: &AssetReference,
    ) -> Result<Option<AssetReference>, AvatarError> {
        for attempt in 1..=MAX_VERSION_ATTEMPTS {
            match self
                .profiles
                .update_avatar(&profile.id, profile.version, avatar)
                .await
            {
                Ok(()) => return Ok(profile.avatar),
                Err(ProfileStoreError::VersionConflict) if attempt < MAX_VERSION_ATTEMPTS => {
                    tracing::warn!(user_id = %profile.id, attempt, "avatar version conflict, retrying");
                    profile = self.find_profile(&profile.id).await?;
                }
                Err(ProfileStoreError::VersionConflict) => break,
                Err(ProfileStoreError::NotFound) => return Err(AvatarError::UserNotFound),
                Err(ProfileStoreError::Storage(msg)) => return Err(AvatarError::persistence(msg)),
            }
        }

        Err(AvatarError::persistence(format!(
            "avatar version still conflicting after {MAX_VERSION_ATTEMPTS} attempts"
        )))
    }

    async fn discard_extras(&self, user_id: &UserId, extras: &[AssetReference]) {
        for extra in extras {
            self.destroy_quietly(user_id, &extra.asset_id, "extra file")
                .await;
        }
    }

    /// Best-effort delete. Failures are logged and never returned.
    async fn destroy_quietly(&self, user_id: &UserId, asset_id: &str, reason: &str) {
        match self.assets.destroy(asset_id).await {
            Ok(()) => tracing::debug!(%user_id, asset_id, reason, "destroyed avatar asset"),
            Err(err) => tracing::warn!(
                %user_id,
                asset_id,
                reason,
                "failed to destroy avatar asset: {}",
                err
            ),
        }
    }
}

#[async_trait]
impl<P: ProfileStore, A: AssetStore> AvatarService for AvatarServiceImpl<P, A> {
    #[instrument(skip_all, fields(user_id = %user_id, files = files.len()))]
    async fn upload_avatar(
        &self,
        user_id: &UserId,
        files: Vec<AvatarFile>,
    ) -> Result<AssetReference, AvatarError> {
        self.commit_avatar(user_id, files).await
    }

    #[instrument(skip_all, fields(user_id = %user_id))]
    async fn get_avatar(&self, user_id: &UserId) -> Result<Option<AssetReference>, AvatarError> {
        Ok(self.find_profile(user_id).await?.avatar)
    }

    #[instrument(skip_all, fields(user_id = %user_id, files = files.len()))]
    async fn replace_avatar(
        &self,
        user_id: &UserId,
        files: Vec<AvatarFile>,
    ) -> Result<AssetReference, AvatarError> {
        self.commit_avatar(user_id, files).await
    }
}
