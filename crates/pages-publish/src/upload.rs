//! Upload sources and object key layout.
//!
//! Keys are `{owner}/images/{millis}-{name}` and `{owner}/videos/{millis}-{name}`
//! with whitespace runs in the file name replaced by `_`. Images of one
//! submission share a timestamp, so repeated names in a batch get a `-N`
//! suffix before the extension.

use std::collections::HashSet;
use std::sync::LazyLock;

use bytes::Bytes;
use regex::Regex;

use pages_core::{SelectedFile, UserId};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));

/// A selected file whose contents can be handed to an object store
pub trait UploadSource: SelectedFile + Send + Sync {
    fn bytes(&self) -> Bytes;
}

/// Folder under the owner's prefix
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetFolder {
    Images,
    Videos,
}

impl AssetFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetFolder::Images => "images",
            AssetFolder::Videos => "videos",
        }
    }
}

/// File name with whitespace runs replaced by `_`
pub fn sanitize_file_name(name: &str) -> String {
    WHITESPACE.replace_all(name, "_").into_owned()
}

/// Sanitized names for one upload batch, unique within the batch.
///
/// `image.jpg`, `image.jpg` becomes `image.jpg`, `image-1.jpg`.
pub fn batch_file_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let clean = sanitize_file_name(name);
            if seen.insert(clean.clone()) {
                return clean;
            }
            let (stem, ext) = match clean.rsplit_once('.') {
                Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
                _ => (clean.as_str(), None),
            };
            let renamed = (1..)
                .map(|n| match ext {
                    Some(ext) => format!("{stem}-{n}.{ext}"),
                    None => format!("{stem}-{n}"),
                })
                .find(|candidate| seen.insert(candidate.clone()));
            renamed.unwrap_or(clean)
        })
        .collect()
}

/// Store key for one uploaded asset
pub fn object_key(owner: &UserId, folder: AssetFolder, millis: u64, file_name: &str) -> String {
    format!(
        "{}/{}/{}-{}",
        owner.as_str(),
        folder.as_str(),
        millis,
        sanitize_file_name(file_name)
    )
}

/// A file held in memory, as received in a multipart request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl LocalFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl SelectedFile for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.content_type
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl UploadSource for LocalFile {
    fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_layout() {
        let owner = UserId::new("u-1");
        assert_eq!(
            object_key(&owner, AssetFolder::Images, 1_700_000_000_000, "sala de  estar.jpg"),
            "u-1/images/1700000000000-sala_de_estar.jpg"
        );
        assert_eq!(
            object_key(&owner, AssetFolder::Videos, 5, "tour.mp4"),
            "u-1/videos/5-tour.mp4"
        );
    }

    #[test]
    fn test_batch_names_are_unique() {
        let names = batch_file_names([
            "image.jpg",
            "sala.jpg",
            "image.jpg",
            "image.jpg",
            "image-1.jpg",
            "LEIA ME",
        ]);
        assert_eq!(
            names,
            vec![
                "image.jpg",
                "sala.jpg",
                "image-1.jpg",
                "image-2.jpg",
                "image-1-1.jpg",
                "LEIA_ME"
            ]
        );
        assert_eq!(batch_file_names([".env", ".env"]), vec![".env", ".env-1"]);
    }

    #[test]
    fn test_local_file_size() {
        let file = LocalFile::new("a.jpg", "image/jpeg", vec![0u8; 42]);
        assert_eq!(file.size(), 42);
    }
}
