//! Asset References
//!
//! Value objects for image and video files that were selected in the form
//! but not uploaded yet, plus the preview-handle registry that owns every
//! display reference handed out for them.
//!
//! Preview handles are a scarce client resource (object URLs in a browser).
//! Each one is acquired through a [`PreviewRegistry`] and must come back to
//! it, either individually when the asset is removed or in a single sweep
//! when the form goes away. Dropping the registry performs that sweep.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// Maximum number of images in one gallery
pub const MAX_GALLERY_IMAGES: usize = 10;

/// Maximum size of a single gallery image (3 MiB)
pub const MAX_IMAGE_BYTES: u64 = 3 * 1024 * 1024;

/// Image types accepted by the gallery
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// The only accepted video type
pub const VIDEO_MIME_TYPE: &str = "video/mp4";

/// Maximum size of an uploaded video (50 MiB)
pub const MAX_VIDEO_BYTES: u64 = 50 * 1024 * 1024;

/// Opaque token, unique per selection event within one form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(u64);

impl AssetId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset-{}", self.0)
    }
}

/// Monotonic id source owned by a form
#[derive(Clone, Debug, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> AssetId {
        let id = AssetId(self.next);
        self.next += 1;
        id
    }

    pub fn next_raw(&mut self) -> u64 {
        self.next_id().0
    }
}

/// What kind of asset a reference points at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
}

/// A raw file picked by the user.
///
/// Implemented by `web_sys::File` wrappers in the browser and by in-memory
/// buffers on the server.
pub trait SelectedFile {
    /// File name as reported by the picker
    fn name(&self) -> &str;

    /// MIME type as reported by the picker
    fn mime_type(&self) -> &str;

    /// Size in bytes
    fn size(&self) -> u64;
}

/// Revocable display reference for a not-yet-uploaded file
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewHandle(String);

impl PreviewHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creates and revokes preview handles for one kind of file.
pub trait PreviewAllocator<F> {
    /// Create a display reference for `file`
    fn allocate(&mut self, file: &F) -> PreviewHandle;

    /// Release a reference created by [`allocate`](Self::allocate)
    fn revoke(&mut self, handle: &PreviewHandle);
}

/// Allocator for contexts that never display previews (server-side form
/// reconstruction). Handles are plain tokens and revocation is a no-op.
#[derive(Clone, Debug, Default)]
pub struct DetachedPreviews {
    issued: u64,
}

impl<F: SelectedFile> PreviewAllocator<F> for DetachedPreviews {
    fn allocate(&mut self, file: &F) -> PreviewHandle {
        self.issued += 1;
        PreviewHandle::new(format!("detached:{}:{}", self.issued, file.name()))
    }

    fn revoke(&mut self, _handle: &PreviewHandle) {}
}

/// Per-form registry of outstanding preview handles.
pub struct PreviewRegistry<F, P: PreviewAllocator<F>> {
    allocator: P,
    outstanding: Vec<PreviewHandle>,
    _file: PhantomData<fn(&F)>,
}

impl<F, P: PreviewAllocator<F>> PreviewRegistry<F, P> {
    pub fn new(allocator: P) -> Self {
        Self {
            allocator,
            outstanding: Vec::new(),
            _file: PhantomData,
        }
    }

    /// Acquire a handle for `file` and record it as outstanding
    pub fn acquire(&mut self, file: &F) -> PreviewHandle {
        let handle = self.allocator.allocate(file);
        self.outstanding.push(handle.clone());
        handle
    }

    /// Release one handle. Releasing an unknown or already released handle
    /// does nothing.
    pub fn release(&mut self, handle: &PreviewHandle) {
        if let Some(pos) = self.outstanding.iter().position(|h| h == handle) {
            self.outstanding.swap_remove(pos);
            self.allocator.revoke(handle);
        }
    }

    /// Release every outstanding handle
    pub fn release_all(&mut self) {
        let handles = std::mem::take(&mut self.outstanding);
        if !handles.is_empty() {
            tracing::debug!(count = handles.len(), "Releasing preview handles");
        }
        for handle in &handles {
            self.allocator.revoke(handle);
        }
    }

    /// Number of handles not yet released
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    pub fn allocator(&self) -> &P {
        &self.allocator
    }
}

impl<F, P: PreviewAllocator<F>> Drop for PreviewRegistry<F, P> {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// A selected file pending upload
#[derive(Clone, Debug)]
pub struct AssetReference<F> {
    id: AssetId,
    kind: AssetKind,
    file: F,
    preview: PreviewHandle,
    order: usize,
}

impl<F> AssetReference<F> {
    pub fn new(
        id: AssetId,
        kind: AssetKind,
        file: F,
        preview: PreviewHandle,
        order: usize,
    ) -> Self {
        Self {
            id,
            kind,
            file,
            preview,
            order,
        }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    pub fn file(&self) -> &F {
        &self.file
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    /// Current gallery position
    pub fn order(&self) -> usize {
        self.order
    }

    /// Give up the reference, keeping the raw file
    pub fn into_file(self) -> F {
        self.file
    }

    pub(crate) fn set_order(&mut self, order: usize) {
        self.order = order;
    }
}

/// Why a candidate file was refused
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// The gallery already holds [`MAX_GALLERY_IMAGES`]
    CapacityReached,
    UnsupportedType { mime: String },
    TooLarge { size: u64 },
}

/// Per-file warning produced by a partially accepted batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRejection {
    pub file_name: String,
    #[serde(flatten)]
    pub reason: RejectReason,
}

impl AssetRejection {
    pub fn user_message(&self) -> String {
        match &self.reason {
            RejectReason::CapacityReached => {
                format!(
                    "Limite de {} imagens atingido: {} ignorado.",
                    MAX_GALLERY_IMAGES, self.file_name
                )
            }
            RejectReason::UnsupportedType { .. } => {
                format!("Ficheiro {} inválido. Apenas JPG/PNG.", self.file_name)
            }
            RejectReason::TooLarge { .. } => {
                format!("Ficheiro {} excede o tamanho máximo de 3MB.", self.file_name)
            }
        }
    }
}

impl fmt::Display for AssetRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

/// Test doubles shared by the crate's unit tests
#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, Debug)]
    pub struct FakeFile {
        pub name: String,
        pub mime: String,
        pub size: u64,
    }

    impl FakeFile {
        pub fn jpeg(name: &str, size: u64) -> Self {
            Self {
                name: name.into(),
                mime: "image/jpeg".into(),
                size,
            }
        }

        pub fn of(name: &str, mime: &str, size: u64) -> Self {
            Self {
                name: name.into(),
                mime: mime.into(),
                size,
            }
        }
    }

    impl SelectedFile for FakeFile {
        fn name(&self) -> &str {
            &self.name
        }

        fn mime_type(&self) -> &str {
            &self.mime
        }

        fn size(&self) -> u64 {
            self.size
        }
    }

    /// Records every allocation and revocation
    #[derive(Clone, Default)]
    pub struct CountingPreviews {
        pub log: Rc<RefCell<PreviewLog>>,
    }

    #[derive(Default, Debug)]
    pub struct PreviewLog {
        pub allocated: Vec<PreviewHandle>,
        pub revoked: Vec<PreviewHandle>,
    }

    impl PreviewAllocator<FakeFile> for CountingPreviews {
        fn allocate(&mut self, file: &FakeFile) -> PreviewHandle {
            let mut log = self.log.borrow_mut();
            let handle = PreviewHandle::new(format!("blob:{}:{}", log.allocated.len(), file.name));
            log.allocated.push(handle.clone());
            handle
        }

        fn revoke(&mut self, handle: &PreviewHandle) {
            self.log.borrow_mut().revoked.push(handle.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_registry_release_is_idempotent() {
        let previews = CountingPreviews::default();
        let log = previews.log.clone();
        let mut registry = PreviewRegistry::new(previews);

        let handle = registry.acquire(&FakeFile::jpeg("a.jpg", 10));
        registry.release(&handle);
        registry.release(&handle);

        assert_eq!(registry.outstanding(), 0);
        assert_eq!(log.borrow().revoked.len(), 1);
    }

    #[test]
    fn test_registry_drop_sweeps_outstanding_handles() {
        let previews = CountingPreviews::default();
        let log = previews.log.clone();
        {
            let mut registry = PreviewRegistry::new(previews);
            registry.acquire(&FakeFile::jpeg("a.jpg", 10));
            registry.acquire(&FakeFile::jpeg("b.jpg", 10));
        }
        let log = log.borrow();
        assert_eq!(log.allocated.len(), 2);
        assert_eq!(log.revoked.len(), 2);
    }

    #[test]
    fn test_id_sequence_is_unique() {
        let mut ids = IdSequence::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "asset-0");
    }
}
