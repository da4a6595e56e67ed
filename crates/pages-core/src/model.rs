//! Domain Models
//!
//! Durable page records as stored in the `pages` table, plus the metadata
//! written for every uploaded gallery image.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::palette::ColorPalette;
use crate::session::UserId;

/// Table holding page records
pub const PAGES_TABLE: &str = "pages";

/// Fallback call-to-action label
pub const DEFAULT_CTA_TEXT: &str = "Contactar Agora";

/// One uploaded gallery image
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAssetMetadata {
    /// Store-relative key
    pub path: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Gallery position at submit time
    pub order: u32,
}

/// Persisted benefit entry (the form's local id is not stored)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub text: String,
}

/// Insert payload for a new page. `id` and `created_at` are assigned by the
/// record store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewLandingPage {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub description_professional_ai: Option<String>,
    pub slug: String,
    pub images_gallery: Option<Vec<UploadedAssetMetadata>>,
    pub video_embed_url: Option<String>,
    pub video_storage_path: Option<String>,
    pub benefits_features: Option<Vec<BenefitFeature>>,
    pub cta_button_text: String,
    pub cta_contact_form_enabled: bool,
    pub is_public: bool,
    pub color_palette: ColorPalette,
    pub calendly_link: Option<String>,
}

/// A stored page
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandingPageRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_professional_ai: Option<String>,
    pub slug: String,
    #[serde(default)]
    pub images_gallery: Option<Vec<UploadedAssetMetadata>>,
    #[serde(default)]
    pub video_embed_url: Option<String>,
    #[serde(default)]
    pub video_storage_path: Option<String>,
    #[serde(default)]
    pub benefits_features: Option<Vec<BenefitFeature>>,
    #[serde(default)]
    pub cta_button_text: Option<String>,
    #[serde(default)]
    pub cta_contact_form_enabled: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub color_palette: Option<ColorPalette>,
    #[serde(default)]
    pub calendly_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LandingPageRecord {
    /// Materialise an insert payload with store-assigned fields
    pub fn from_new(page: NewLandingPage, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: page.user_id,
            title: page.title,
            description: Some(page.description),
            description_professional_ai: page.description_professional_ai,
            slug: page.slug,
            images_gallery: page.images_gallery,
            video_embed_url: page.video_embed_url,
            video_storage_path: page.video_storage_path,
            benefits_features: page.benefits_features,
            cta_button_text: Some(page.cta_button_text),
            cta_contact_form_enabled: page.cta_contact_form_enabled,
            is_public: page.is_public,
            color_palette: Some(page.color_palette),
            calendly_link: page.calendly_link,
            created_at,
        }
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            title: self.title.clone(),
            slug: self.slug.clone(),
            is_public: self.is_public,
            created_at: self.created_at,
        }
    }
}

/// Dashboard listing entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    pub slug: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}
