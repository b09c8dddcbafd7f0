//! In-memory port implementations for testing.
//!
//! Both stores can share a [`Journal`] so tests can assert the relative order
//! of profile writes and asset calls.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::{
    models::{AssetReference, AvatarFile, StoreOptions, UserId, UserProfile},
    ports::outbound::{AssetStore, ProfileStore},
    AssetStoreError, ProfileStoreError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ProfileRead(UserId),
    ProfileUpdated(UserId, String),
    Stored(String),
    Destroyed(String),
}

#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    pub fn record(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, event: &Event) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

/// Profile store backed by a HashMap, with injectable failures.
#[derive(Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
    update_failures: Arc<Mutex<VecDeque<ProfileStoreError>>>,
    /// Writes applied by "another process" right before the next update.
    foreign_writes: Arc<Mutex<VecDeque<AssetReference>>>,
    journal: Journal,
}

#[allow(dead_code)]
impl InMemoryProfileStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.profiles.lock().unwrap().insert(profile.id, profile);
        self
    }

    /// The next update fails with `error`.
    pub fn fail_next_update(&self, error: ProfileStoreError) {
        self.update_failures.lock().unwrap().push_back(error);
    }

    /// Before the next update, another writer sets `avatar` and bumps the version.
    pub fn interleave_foreign_write(&self, avatar: AssetReference) {
        self.foreign_writes.lock().unwrap().push_back(avatar);
    }

    pub fn profile(&self, user_id: &UserId) -> Option<UserProfile> {
        self.profiles.lock().unwrap().get(user_id).cloned()
    }

    pub fn update_count(&self) -> usize {
        self.journal
            .events()
            .iter()
            .filter(|e| matches!(e, Event::ProfileUpdated(..)))
            .count()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError> {
        self.journal.record(Event::ProfileRead(*user_id));
        Ok(self.profile(user_id))
    }

    async fn update_avatar(
        &self,
        user_id: &UserId,
        expected_version: i64,
        avatar: &AssetReference,
    ) -> Result<(), ProfileStoreError> {
        if let Some(error) = self.update_failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(user_id)
            .ok_or(ProfileStoreError::NotFound)?;

        if let Some(foreign) = self.foreign_writes.lock().unwrap().pop_front() {
            profile.avatar = Some(foreign);
            profile.version += 1;
        }

        if profile.version != expected_version {
            return Err(ProfileStoreError::VersionConflict);
        }

        profile.avatar = Some(avatar.clone());
        profile.version += 1;
        self.journal
            .record(Event::ProfileUpdated(*user_id, avatar.asset_id.clone()));

        Ok(())
    }
}

/// Asset store that records calls. Asset ids are `asset-<file name>`.
#[derive(Clone, Default)]
pub struct RecordingAssetStore {
    stored: Arc<Mutex<Vec<StoreOptions>>>,
    destroyed: Arc<Mutex<Vec<String>>>,
    failing_files: Arc<Mutex<HashSet<String>>>,
    fail_destroy: Arc<Mutex<bool>>,
    store_delay: Option<Duration>,
    journal: Journal,
}

#[allow(dead_code)]
impl RecordingAssetStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    /// Sleep inside every store call so concurrent callers interleave.
    pub fn with_store_delay(mut self, delay: Duration) -> Self {
        self.store_delay = Some(delay);
        self
    }

    pub fn fail_store_for(&self, file_name: &str) {
        self.failing_files
            .lock()
            .unwrap()
            .insert(file_name.to_string());
    }

    pub fn fail_destroys(&self) {
        *self.fail_destroy.lock().unwrap() = true;
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    pub fn store_count(&self) -> usize {
        self.stored.lock().unwrap().len()
    }

    pub fn store_options(&self) -> Vec<StoreOptions> {
        self.stored.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn reference_for(file_name: &str) -> AssetReference {
        AssetReference::new(
            format!("https://cdn.test/{file_name}"),
            format!("asset-{file_name}"),
        )
    }
}

#[async_trait]
impl AssetStore for RecordingAssetStore {
    async fn store(
        &self,
        file: &AvatarFile,
        options: &StoreOptions,
    ) -> Result<AssetReference, AssetStoreError> {
        self.stored.lock().unwrap().push(options.clone());

        if let Some(delay) = self.store_delay {
            tokio::time::sleep(delay).await;
        }

        let file_name = file.file_name.clone().unwrap_or_default();
        if self.failing_files.lock().unwrap().contains(&file_name) {
            return Err(AssetStoreError::Unavailable("connection reset".to_string()));
        }

        let reference = Self::reference_for(&file_name);
        self.journal.record(Event::Stored(reference.asset_id.clone()));
        Ok(reference)
    }

    async fn destroy(&self, asset_id: &str) -> Result<(), AssetStoreError> {
        self.destroyed.lock().unwrap().push(asset_id.to_string());
        self.journal.record(Event::Destroyed(asset_id.to_string()));

        if *self.fail_destroy.lock().unwrap() {
            return Err(AssetStoreError::Rejected("rate limited".to_string()));
        }

        Ok(())
    }
}
