//! Server-reported file records and the on-disk naming rules for downloads.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::STAGING_PREFIX;

/// A file available for download, as reported by a listing.
///
/// The checksum is kept as the raw descriptor string so listings can be
/// echoed back unchanged; it is parsed when the file is downloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Server-side identifier used by download and acknowledge.
    #[serde(rename = "fileid", alias = "id")]
    pub id: i64,
    /// Name of the file in the destination directory.
    pub name: String,
    /// Checksum descriptor in `<algorithm>:<hex-digest>` form.
    #[serde(default)]
    pub checksum: String,
    /// Size in bytes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: i64,
    /// Advisory expiration timestamp.
    #[serde(default, deserialize_with = "null_as_default")]
    pub expires: String,
    /// Key/value tags the file was published with.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: HashMap<String, String>,
    /// Opaque server metadata, passed through untouched.
    #[serde(default, deserialize_with = "null_as_default")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FileInfo {
    /// Creates a record with the given identity and checksum and no tags or metadata.
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            checksum: checksum.into(),
            size: 0,
            expires: String::new(),
            tags: HashMap::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Decodes an explicit JSON `null` as the type's default.
///
/// Servers encode empty collections as `null`; `#[serde(default)]` alone only
/// covers absent keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns true if `name` is a single, plain relative filename.
///
/// Rejects empty names, path separators, `.`/`..`, absolute paths and NUL bytes
/// so a server-provided name can never escape the destination directory.
#[must_use]
pub fn is_safe_file_name(name: &str) -> bool {
    if name.is_empty() || name.contains('\0') || name.contains('/') || name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Path a download is written to while it is still unverified.
#[must_use]
pub fn staging_path(dest_dir: &Path, name: &str) -> PathBuf {
    dest_dir.join(format!("{STAGING_PREFIX}{name}"))
}

/// Path a verified download is committed to.
#[must_use]
pub fn final_path(dest_dir: &Path, name: &str) -> PathBuf {
    dest_dir.join(name)
}
