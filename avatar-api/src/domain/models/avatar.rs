use bytes::Bytes;
use serde::Serialize;

/// A published asset: its public url and the remote store's handle.
///
/// An empty `asset_id` marks an avatar recorded before handles were kept.
/// Its url is still served, but the asset is never destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetReference {
    pub url: String,
    pub asset_id: String,
}

impl AssetReference {
    pub fn new(url: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            asset_id: asset_id.into(),
        }
    }

    pub fn url_only(url: impl Into<String>) -> Self {
        Self::new(url, String::new())
    }

    /// The remote handle, if one was recorded.
    pub fn known_asset_id(&self) -> Option<&str> {
        Some(self.asset_id.as_str()).filter(|id| !id.is_empty())
    }
}

/// One uploaded file as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarFile {
    pub bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl AvatarFile {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: None,
            content_type: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Placement of a new asset in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub folder: String,
    pub public_id: String,
    pub overwrite: bool,
}
