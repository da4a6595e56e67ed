//! Public Page Resolver
//!
//! Slug → public record. Every backend outcome other than exactly one public
//! row is reported as NotFound; the cause is only logged.

use std::sync::Arc;

use tracing::debug;

use pages_core::{AssetUrlBase, LandingPageRecord, PageError, PublicPage, Result};

use crate::backend::RecordStore;

#[derive(Clone)]
pub struct PageResolver {
    records: Arc<dyn RecordStore>,
    assets: AssetUrlBase,
}

impl PageResolver {
    pub fn new(records: Arc<dyn RecordStore>, assets: AssetUrlBase) -> Self {
        Self { records, assets }
    }

    /// The single public record for `slug`
    pub async fn resolve(&self, slug: &str) -> Result<LandingPageRecord> {
        self.records.select_public(slug).await.map_err(|e| {
            debug!(slug = %slug, cause = %e, "Slug lookup failed");
            PageError::NotFound(slug.to_string())
        })
    }

    /// Resolve and build the visitor view model
    pub async fn resolve_page(&self, slug: &str) -> Result<PublicPage> {
        let record = self.resolve(slug).await?;
        Ok(PublicPage::from_record(&record, &self.assets))
    }

    pub fn asset_base(&self) -> &AssetUrlBase {
        &self.assets
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use pages_core::{ColorPalette, NewLandingPage, UploadedAssetMetadata, UserId};

    use super::*;
    use crate::backend::MemoryRecordStore;

    fn record(slug: &str, is_public: bool, orders: &[u32]) -> LandingPageRecord {
        let images = orders
            .iter()
            .map(|order| UploadedAssetMetadata {
                path: format!("u/images/{order}.jpg"),
                name: format!("{order}.jpg"),
                size: 1,
                mime_type: "image/png".into(),
                order: *order,
            })
            .collect();
        let page = NewLandingPage {
            user_id: UserId::new("u"),
            title: "Loja".into(),
            description: "Olá".into(),
            description_professional_ai: None,
            slug: slug.into(),
            images_gallery: Some(images),
            video_embed_url: None,
            video_storage_path: None,
            benefits_features: None,
            cta_button_text: "Contactar Agora".into(),
            cta_contact_form_enabled: true,
            is_public,
            color_palette: ColorPalette::default(),
            calendly_link: None,
        };
        LandingPageRecord::from_new(page, Uuid::new_v4(), Utc::now())
    }

    fn resolver(store: &MemoryRecordStore) -> PageResolver {
        PageResolver::new(
            Arc::new(store.clone()),
            AssetUrlBase::for_bucket("https://store.example", "landing_page_assets"),
        )
    }

    #[tokio::test]
    async fn test_private_page_is_not_found() {
        let store = MemoryRecordStore::new();
        store.put(record("privada-000001", false, &[])).await;

        let err = resolver(&store).resolve("privada-000001").await.unwrap_err();
        assert!(matches!(err, PageError::NotFound(ref slug) if slug == "privada-000001"));
    }

    #[tokio::test]
    async fn test_duplicate_rows_are_not_found() {
        let store = MemoryRecordStore::new();
        store.put(record("dup-000001", true, &[])).await;
        store.put(record("dup-000001", true, &[])).await;

        assert!(matches!(
            resolver(&store).resolve("dup-000001").await,
            Err(PageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resolved_page_sorts_gallery_and_builds_urls() {
        let store = MemoryRecordStore::new();
        store.put(record("loja-000001", true, &[0, 2, 1])).await;

        let page = resolver(&store).resolve_page("loja-000001").await.unwrap();
        let orders: Vec<u32> = page.gallery.iter().map(|g| g.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(
            page.gallery[0].url,
            "https://store.example/storage/v1/object/public/landing_page_assets/u/images/0.jpg"
        );
    }
}
