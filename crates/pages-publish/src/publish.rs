//! Upload & Persist Pipeline
//!
//! ```text
//! PageDraft ──► images (concurrent) ──► video ──► slug ──► insert
//!                    │                     │                  │
//!                    └──── any failure aborts; earlier keys are logged
//!                          as orphans and left in the store ──┘
//! ```
//!
//! The draft is borrowed, never consumed, so a failed submission can be
//! retried from the same form state.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pages_core::form::{DraftVideo, PageDraft};
use pages_core::slug::derive_slug;
use pages_core::{
    LandingPageRecord, NewLandingPage, PageError, Result, UploadedAssetMetadata, UserIdentity,
};

use crate::backend::{ObjectStore, RecordStore, WriteOptions};
use crate::clock::{Clock, SystemClock};
use crate::upload::{AssetFolder, UploadSource, batch_file_names, object_key};

/// Outcome of a successful submission
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublishedPage {
    pub slug: String,
    pub record: LandingPageRecord,
}

/// Drives one submission from draft to stored record
#[derive(Clone)]
pub struct Publisher {
    objects: Arc<dyn ObjectStore>,
    records: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl Publisher {
    pub fn new(objects: Arc<dyn ObjectStore>, records: Arc<dyn RecordStore>) -> Self {
        Self {
            objects,
            records,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Upload every asset of `draft`, then write one public record owned by
    /// `owner`. Returns the new slug.
    pub async fn submit<F: UploadSource>(
        &self,
        owner: &UserIdentity,
        draft: &PageDraft<'_, F>,
    ) -> Result<PublishedPage> {
        let started = Instant::now();
        info!(
            owner_id = %owner.id,
            title = %draft.title,
            images = draft.images.len(),
            "Submitting page"
        );

        let images = self.upload_images(owner, draft).await?;
        let mut uploaded: Vec<String> = images.iter().map(|m| m.path.clone()).collect();

        let video_storage_path = match &draft.video {
            DraftVideo::File(file) => match self.upload(owner, AssetFolder::Videos, *file).await {
                Ok(key) => {
                    uploaded.push(key.clone());
                    Some(key)
                }
                Err(e) => {
                    log_orphans(&uploaded);
                    return Err(e);
                }
            },
            DraftVideo::None | DraftVideo::Url(_) => None,
        };
        let video_embed_url = match &draft.video {
            DraftVideo::Url(url) => Some(url.clone()),
            DraftVideo::None | DraftVideo::File(_) => None,
        };

        let slug = derive_slug(&draft.title, self.clock.now_millis());

        let page = NewLandingPage {
            user_id: owner.id.clone(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            description_professional_ai: draft.description_professional_ai.clone(),
            slug: slug.clone(),
            images_gallery: (!images.is_empty()).then_some(images),
            video_embed_url,
            video_storage_path,
            benefits_features: (!draft.benefits.is_empty()).then(|| draft.benefits.clone()),
            cta_button_text: draft.cta_button_text.clone(),
            cta_contact_form_enabled: true,
            is_public: true,
            color_palette: draft.palette.clone(),
            calendly_link: draft.calendly_link.clone(),
        };

        let record = match self.records.insert(page).await {
            Ok(record) => record,
            Err(e) => {
                warn!(slug = %slug, error = %e, "Page insert failed");
                log_orphans(&uploaded);
                return Err(PageError::Persist(e.to_string()));
            }
        };

        info!(
            slug = %slug,
            owner_id = %owner.id,
            assets = uploaded.len(),
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Page published"
        );

        Ok(PublishedPage { slug, record })
    }

    /// Upload all gallery images concurrently. Waits for every sibling so the
    /// keys left behind by a failed batch are known.
    async fn upload_images<F: UploadSource>(
        &self,
        owner: &UserIdentity,
        draft: &PageDraft<'_, F>,
    ) -> Result<Vec<UploadedAssetMetadata>> {
        let millis = self.clock.now_millis();
        let names = batch_file_names(draft.images.iter().map(|image| image.file.name()));
        let uploads = draft.images.iter().zip(names).map(|(image, name)| async move {
            let key = object_key(&owner.id, AssetFolder::Images, millis, &name);
            let key = self.write(key, image.file).await?;
            Ok::<_, PageError>(UploadedAssetMetadata {
                path: key,
                name: image.file.name().to_string(),
                size: image.file.size(),
                mime_type: image.file.mime_type().to_string(),
                order: image.order,
            })
        });

        let mut images = Vec::with_capacity(draft.images.len());
        let mut first_error = None;
        for result in join_all(uploads).await {
            match result {
                Ok(meta) => images.push(meta),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(_) => {}
            }
        }

        if let Some(e) = first_error {
            let orphans: Vec<String> = images.into_iter().map(|m| m.path).collect();
            log_orphans(&orphans);
            return Err(e);
        }
        Ok(images)
    }

    async fn upload<F: UploadSource>(
        &self,
        owner: &UserIdentity,
        folder: AssetFolder,
        file: &F,
    ) -> Result<String> {
        let key = object_key(&owner.id, folder, self.clock.now_millis(), file.name());
        self.write(key, file).await
    }

    async fn write<F: UploadSource>(&self, key: String, file: &F) -> Result<String> {
        let options = WriteOptions::create(file.mime_type());

        match self.objects.write(&key, file.bytes(), options).await {
            Ok(stored) => {
                info!(key = %stored, size_bytes = file.size(), "Uploaded asset");
                Ok(stored)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Asset upload failed");
                Err(PageError::Upload {
                    file: file.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

fn log_orphans(keys: &[String]) {
    if !keys.is_empty() {
        warn!(
            count = keys.len(),
            keys = ?keys,
            "Submission aborted; uploaded objects left orphaned"
        );
    }
}
