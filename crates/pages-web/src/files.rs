//! Browser files and their object-URL previews

use pages_core::{PreviewAllocator, PreviewHandle, SelectedFile};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList, Url};

/// A `File` from an `<input type="file">`, with its metadata read once
#[derive(Clone, Debug)]
pub struct WebFile {
    file: File,
    name: String,
    mime_type: String,
    size: u64,
}

impl WebFile {
    pub fn new(file: File) -> Self {
        // Blob sizes are whole non-negative byte counts
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = file.size() as u64;
        Self {
            name: file.name(),
            mime_type: file.type_(),
            size,
            file,
        }
    }

    /// Every file of a picker's `FileList`, in selection order
    pub fn from_list(list: Option<FileList>) -> Vec<Self> {
        let Some(list) = list else {
            return Vec::new();
        };
        (0..list.length()).filter_map(|i| list.get(i)).map(Self::new).collect()
    }

    pub fn raw(&self) -> &File {
        &self.file
    }

    /// Read the whole file into memory
    pub async fn bytes(&self) -> Result<Vec<u8>, String> {
        let buffer = JsFuture::from(self.file.array_buffer())
            .await
            .map_err(|e| describe(&e))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

impl SelectedFile for WebFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// `URL.createObjectURL` / `URL.revokeObjectURL`
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectUrlPreviews;

impl PreviewAllocator<WebFile> for ObjectUrlPreviews {
    fn allocate(&mut self, file: &WebFile) -> PreviewHandle {
        match Url::create_object_url_with_blob(file.raw()) {
            Ok(url) => PreviewHandle::new(url),
            Err(e) => {
                web_sys::console::warn_1(&e);
                PreviewHandle::new("")
            }
        }
    }

    fn revoke(&mut self, handle: &PreviewHandle) {
        if !handle.as_str().is_empty() {
            let _ = Url::revoke_object_url(handle.as_str());
        }
    }
}

/// Generator for the improver and palette, seeded from the clock
pub fn rng() -> SmallRng {
    SmallRng::seed_from_u64(js_sys::Date::now().to_bits())
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
