//! Public page view model.
//!
//! Turns a stored [`LandingPageRecord`] into what a visitor sees: resolved
//! asset URLs, gallery in stored order, embeddable video, defaults for
//! anything an older record left empty.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{BenefitFeature, LandingPageRecord};
use crate::palette::ColorPalette;
use crate::video::embed_url;

/// Submit label on the visitor contact form when the record has none
pub const DEFAULT_CONTACT_CTA: &str = "Enviar Mensagem";

/// Public route prefix for pages
pub const PAGE_ROUTE_PREFIX: &str = "/lp/";

const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

static WEB_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://[^\s/?#]+\S*$").expect("static pattern"));

/// Absolute `http`/`https` link, the only kind placed in a public `href`
pub fn is_web_link(url: &str) -> bool {
    WEB_LINK.is_match(url.trim())
}

/// Public page path for `slug`
pub fn page_path(slug: &str) -> String {
    format!("{PAGE_ROUTE_PREFIX}{slug}")
}

/// Public base URL for stored objects.
///
/// Full asset URL is this base followed by the stored relative path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetUrlBase(String);

impl AssetUrlBase {
    /// Hosted object store layout: `{root}/storage/v1/object/public/{bucket}/`
    pub fn for_bucket(store_root: &str, bucket: &str) -> Self {
        Self(format!(
            "{}/storage/v1/object/public/{}/",
            store_root.trim_end_matches('/'),
            bucket.trim_matches('/')
        ))
    }

    /// Any other prefix, normalised to end with `/`
    pub fn from_prefix(prefix: &str) -> Self {
        Self(format!("{}/", prefix.trim_end_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.0, path.trim_start_matches('/'))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    pub name: String,
    pub order: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageVideo {
    /// Player iframe
    Embed { url: String },
    /// Uploaded mp4
    File { url: String },
}

/// Everything the public renderer needs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicPage {
    pub slug: String,
    pub title: String,
    pub owner_id: String,
    pub description: Option<String>,
    pub paragraphs: Vec<String>,
    pub gallery: Vec<GalleryImage>,
    pub video: Option<PageVideo>,
    pub benefits: Vec<BenefitFeature>,
    pub cta_button_text: String,
    pub contact_form_enabled: bool,
    pub palette: ColorPalette,
    pub calendly_link: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Creation date in Portuguese long form
    pub created_on: String,
}

impl PublicPage {
    pub fn from_record(record: &LandingPageRecord, assets: &AssetUrlBase) -> Self {
        let description = non_blank(record.description_professional_ai.as_deref())
            .or_else(|| non_blank(record.description.as_deref()))
            .map(str::to_string);

        let paragraphs = description
            .as_deref()
            .map(|d| {
                d.split('\n')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut images = record.images_gallery.clone().unwrap_or_default();
        images.sort_by_key(|img| img.order);
        let gallery = images
            .into_iter()
            .map(|img| GalleryImage {
                url: assets.url_for(&img.path),
                name: img.name,
                order: img.order,
            })
            .collect();

        let video = non_blank(record.video_embed_url.as_deref())
            .map(|url| PageVideo::Embed { url: embed_url(url) })
            .or_else(|| {
                non_blank(record.video_storage_path.as_deref())
                    .map(|path| PageVideo::File { url: assets.url_for(path) })
            });

        let benefits = record
            .benefits_features
            .iter()
            .flatten()
            .filter(|b| !b.text.trim().is_empty())
            .cloned()
            .collect();

        Self {
            slug: record.slug.clone(),
            title: record.title.clone(),
            owner_id: record.user_id.to_string(),
            description,
            paragraphs,
            gallery,
            video,
            benefits,
            cta_button_text: non_blank(record.cta_button_text.as_deref())
                .unwrap_or(DEFAULT_CONTACT_CTA)
                .to_string(),
            contact_form_enabled: record.cta_contact_form_enabled,
            palette: record.color_palette.clone().unwrap_or_default(),
            calendly_link: non_blank(record.calendly_link.as_deref())
                .map(str::trim)
                .filter(|link| is_web_link(link))
                .map(str::to_string),
            created_at: record.created_at,
            created_on: format_date_pt(record.created_at),
        }
    }

    pub fn path(&self) -> String {
        page_path(&self.slug)
    }
}

/// `18 de outubro de 2026`
pub fn format_date_pt(at: DateTime<Utc>) -> String {
    let month = MONTHS_PT[at.month0() as usize];
    format!("{} de {} de {}", at.day(), month, at.year())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::model::UploadedAssetMetadata;
    use crate::session::UserId;

    fn record() -> LandingPageRecord {
        LandingPageRecord {
            id: Uuid::nil(),
            user_id: UserId::new("owner-1"),
            title: "Loja".into(),
            description: Some("texto original".into()),
            description_professional_ai: None,
            slug: "loja-abc123".into(),
            images_gallery: None,
            video_embed_url: None,
            video_storage_path: None,
            benefits_features: None,
            cta_button_text: None,
            cta_contact_form_enabled: true,
            is_public: true,
            color_palette: None,
            calendly_link: None,
            created_at: Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap(),
        }
    }

    fn image(order: u32) -> UploadedAssetMetadata {
        UploadedAssetMetadata {
            path: format!("owner-1/images/1-{order}.jpg"),
            name: format!("{order}.jpg"),
            size: 100,
            mime_type: "image/jpeg".into(),
            order,
        }
    }

    fn base() -> AssetUrlBase {
        AssetUrlBase::for_bucket("https://store.example/", "landing_page_assets")
    }

    #[test]
    fn test_asset_url_derivation() {
        assert_eq!(
            base().url_for("owner-1/images/1-a.jpg"),
            "https://store.example/storage/v1/object/public/landing_page_assets/owner-1/images/1-a.jpg"
        );
        assert_eq!(
            AssetUrlBase::from_prefix("http://localhost:3000/assets").url_for("/k"),
            "http://localhost:3000/assets/k"
        );
    }

    #[test]
    fn test_gallery_sorted_by_stored_order() {
        let mut rec = record();
        rec.images_gallery = Some(vec![image(0), image(2), image(1)]);
        let page = PublicPage::from_record(&rec, &base());
        let orders: Vec<u32> = page.gallery.iter().map(|g| g.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert!(page.gallery[1].url.ends_with("owner-1/images/1-1.jpg"));
    }

    #[test]
    fn test_professional_description_preferred() {
        let mut rec = record();
        rec.description_professional_ai = Some("Texto melhorado.\n\nSegundo parágrafo.".into());
        let page = PublicPage::from_record(&rec, &base());
        assert_eq!(page.paragraphs, vec!["Texto melhorado.", "Segundo parágrafo."]);

        rec.description_professional_ai = Some("   ".into());
        let page = PublicPage::from_record(&rec, &base());
        assert_eq!(page.description.as_deref(), Some("texto original"));
    }

    #[test]
    fn test_short_video_url_is_embedded() {
        let mut rec = record();
        rec.video_embed_url = Some("youtu.be/abc123".into());
        let page = PublicPage::from_record(&rec, &base());
        assert_eq!(
            page.video,
            Some(PageVideo::Embed {
                url: "https://youtube.com/embed/abc123".into()
            })
        );
    }

    #[test]
    fn test_uploaded_video_uses_asset_base() {
        let mut rec = record();
        rec.video_storage_path = Some("owner-1/videos/1-v.mp4".into());
        let page = PublicPage::from_record(&rec, &base());
        assert!(matches!(
            page.video,
            Some(PageVideo::File { ref url }) if url.ends_with("/owner-1/videos/1-v.mp4")
        ));
    }

    #[test]
    fn test_web_link_schemes() {
        assert!(is_web_link("https://calendly.com/loja/30min"));
        assert!(is_web_link("HTTP://calendly.com"));
        assert!(!is_web_link("javascript:alert(document.cookie)"));
        assert!(!is_web_link("data:text/html,<script>alert(1)</script>"));
        assert!(!is_web_link("calendly.com/loja"));
        assert!(!is_web_link("https://"));
    }

    #[test]
    fn test_script_booking_link_is_not_rendered() {
        let mut rec = record();
        rec.calendly_link = Some("javascript:alert(document.cookie)".into());
        assert_eq!(PublicPage::from_record(&rec, &base()).calendly_link, None);

        rec.calendly_link = Some(" https://calendly.com/loja ".into());
        assert_eq!(
            PublicPage::from_record(&rec, &base()).calendly_link.as_deref(),
            Some("https://calendly.com/loja")
        );
    }

    #[test]
    fn test_defaults_for_sparse_record() {
        let page = PublicPage::from_record(&record(), &base());
        assert_eq!(page.palette, ColorPalette::default());
        assert_eq!(page.cta_button_text, DEFAULT_CONTACT_CTA);
        assert_eq!(page.created_on, "18 de outubro de 2026");
        assert_eq!(page.path(), "/lp/loja-abc123");
        assert!(page.video.is_none());
    }
}
