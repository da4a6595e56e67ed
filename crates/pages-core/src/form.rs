//! Form Aggregate State
//!
//! Owns every authoring field of one page plus the gallery, the video choice
//! and the preview registry backing both. All mutation goes through here so
//! that preview handles are released on every path that drops an asset.
//!
//! Submission never consumes the form: [`FormState::draft`] borrows it, so a
//! failed upload or insert can be retried from the same in-memory state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::asset::{
    AssetId, AssetKind, AssetReference, AssetRejection, IdSequence, PreviewAllocator,
    PreviewRegistry, SelectedFile,
};
use crate::error::ValidationError;
use crate::gallery::Gallery;
use crate::model::{BenefitFeature, DEFAULT_CTA_TEXT};
use crate::palette::{ColorChannel, ColorPalette, PaletteMode};
use crate::render;
use crate::text;
use crate::video::{self, VideoChoice, VideoMode};

/// Number of empty benefit rows a new form starts with
pub const INITIAL_BENEFITS: usize = 5;

/// One benefit row as edited in the form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitItem {
    /// Local token, never persisted
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl BenefitItem {
    fn empty(id: u64) -> Self {
        Self {
            id,
            text: String::new(),
            icon: None,
        }
    }

    /// Persisted shape, or `None` when the text is blank
    pub fn to_feature(&self) -> Option<BenefitFeature> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }
        let icon = self.icon.as_deref().map(str::trim).filter(|i| !i.is_empty());
        Some(BenefitFeature {
            icon: icon.map(str::to_string),
            text: text.to_string(),
        })
    }
}

/// Validated, borrowed snapshot of a form ready for the upload pipeline
#[derive(Debug)]
pub struct PageDraft<'a, F> {
    pub title: String,
    pub description: String,
    pub description_professional_ai: Option<String>,
    /// Gallery images in final order
    pub images: Vec<DraftImage<'a, F>>,
    pub video: DraftVideo<'a, F>,
    pub benefits: Vec<BenefitFeature>,
    pub cta_button_text: String,
    pub palette: ColorPalette,
    pub calendly_link: Option<String>,
}

#[derive(Debug)]
pub struct DraftImage<'a, F> {
    pub file: &'a F,
    pub order: u32,
}

#[derive(Debug)]
pub enum DraftVideo<'a, F> {
    None,
    /// Link stored verbatim
    Url(String),
    File(&'a F),
}

/// All authoring state for one page
pub struct FormState<F, P: PreviewAllocator<F>> {
    title: String,
    description: String,
    description_professional: Option<String>,
    gallery: Gallery<F>,
    video: VideoChoice<F>,
    benefits: Vec<BenefitItem>,
    cta_text: String,
    palette: ColorPalette,
    palette_mode: PaletteMode,
    calendly_link: String,
    ids: IdSequence,
    previews: PreviewRegistry<F, P>,
}

impl<F: SelectedFile, P: PreviewAllocator<F>> FormState<F, P> {
    pub fn new(allocator: P) -> Self {
        let mut ids = IdSequence::new();
        let benefits = (0..INITIAL_BENEFITS)
            .map(|_| BenefitItem::empty(ids.next_raw()))
            .collect();

        Self {
            title: String::new(),
            description: String::new(),
            description_professional: None,
            gallery: Gallery::new(),
            video: VideoChoice::None,
            benefits,
            cta_text: DEFAULT_CTA_TEXT.to_string(),
            palette: ColorPalette::default(),
            palette_mode: PaletteMode::Manual,
            calendly_link: String::new(),
            ids,
            previews: PreviewRegistry::new(allocator),
        }
    }

    // ========================================================================
    // Text fields
    // ========================================================================

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Editing the description discards any previous improved version
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.description_professional = None;
    }

    /// Improved text produced elsewhere (a client that already ran the improver)
    pub fn set_description_professional(&mut self, text: Option<String>) {
        self.description_professional = text.filter(|t| !t.trim().is_empty());
    }

    /// Replace both description fields with the improved text
    pub fn improve_description<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&str, ValidationError> {
        let improved = text::improve_description(&self.description, rng)
            .ok_or(ValidationError::EmptyDescription)?;
        self.description.clone_from(&improved);
        let stored = self.description_professional.insert(improved);
        Ok(stored.as_str())
    }

    pub fn set_cta_text(&mut self, text: impl Into<String>) {
        self.cta_text = text.into();
    }

    pub fn set_calendly_link(&mut self, link: impl Into<String>) {
        self.calendly_link = link.into();
    }

    // ========================================================================
    // Gallery
    // ========================================================================

    /// Add a multi-select; see [`Gallery::add`]
    pub fn add_images<I: IntoIterator<Item = F>>(&mut self, files: I) -> Vec<AssetRejection> {
        self.gallery.add(files, &mut self.ids, &mut self.previews)
    }

    pub fn remove_image(&mut self, index: usize) -> Option<F> {
        self.gallery.remove(index, &mut self.previews)
    }

    pub fn remove_image_id(&mut self, id: AssetId) -> Option<F> {
        self.gallery.remove_id(id, &mut self.previews)
    }

    /// Drag gesture; returns the replaced order for undo
    pub fn reorder_images(&mut self, from: AssetId, to: AssetId) -> Option<Vec<AssetId>> {
        self.gallery.reorder(from, to)
    }

    pub fn restore_order(&mut self, order: &[AssetId]) -> bool {
        self.gallery.apply_order(order)
    }

    // ========================================================================
    // Video
    // ========================================================================

    /// Switch mode, dropping whatever the previous mode held
    pub fn set_video_mode(&mut self, mode: VideoMode) {
        if mode == self.video.mode() {
            return;
        }
        self.release_video();
        self.video = match mode {
            VideoMode::None => VideoChoice::None,
            VideoMode::Url => VideoChoice::Url(String::new()),
            VideoMode::Upload => VideoChoice::Upload(None),
        };
    }

    pub fn set_video_url(&mut self, url: impl Into<String>) {
        self.release_video();
        self.video = VideoChoice::Url(url.into());
    }

    /// Select a video file. A rejected file leaves upload mode with no file.
    pub fn choose_video_file(&mut self, file: F) -> Result<(), ValidationError> {
        self.release_video();
        if let Err(e) = video::check_video_file(&file) {
            self.video = VideoChoice::Upload(None);
            return Err(e);
        }
        let preview = self.previews.acquire(&file);
        let asset = AssetReference::new(self.ids.next_id(), AssetKind::Video, file, preview, 0);
        self.video = VideoChoice::Upload(Some(asset));
        Ok(())
    }

    pub fn clear_video(&mut self) {
        self.release_video();
        self.video = VideoChoice::None;
    }

    fn release_video(&mut self) {
        if let Some(asset) = self.video.file() {
            self.previews.release(asset.preview());
        }
    }

    // ========================================================================
    // Benefits
    // ========================================================================

    pub fn add_benefit(&mut self) -> u64 {
        let id = self.ids.next_raw();
        self.benefits.push(BenefitItem::empty(id));
        id
    }

    pub fn remove_benefit(&mut self, index: usize) -> Option<BenefitItem> {
        (index < self.benefits.len()).then(|| self.benefits.remove(index))
    }

    pub fn set_benefit_text(&mut self, index: usize, text: impl Into<String>) -> bool {
        self.benefits.get_mut(index).map(|b| b.text = text.into()).is_some()
    }

    pub fn set_benefit_icon(&mut self, index: usize, icon: impl Into<String>) -> bool {
        let icon = icon.into();
        self.benefits
            .get_mut(index)
            .map(|b| b.icon = (!icon.trim().is_empty()).then_some(icon))
            .is_some()
    }

    // ========================================================================
    // Palette
    // ========================================================================

    pub fn set_palette_mode(&mut self, mode: PaletteMode) {
        self.palette_mode = mode;
    }

    pub fn set_color(&mut self, channel: ColorChannel, value: impl Into<String>) {
        self.palette.set(channel, value);
    }

    /// Replace the whole palette with a generated triple
    pub fn generate_palette<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &ColorPalette {
        self.palette_mode = PaletteMode::Auto;
        self.palette = ColorPalette::generate(rng);
        &self.palette
    }

    // ========================================================================
    // Submission and lifecycle
    // ========================================================================

    /// Validate and snapshot the form for submission
    pub fn draft(&self) -> Result<PageDraft<'_, F>, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let video = match &self.video {
            VideoChoice::None | VideoChoice::Upload(None) => DraftVideo::None,
            VideoChoice::Url(_) => match self.video.url() {
                None => DraftVideo::None,
                Some(url) if video::is_supported_video_url(url) => DraftVideo::Url(url.to_string()),
                Some(url) => return Err(ValidationError::InvalidVideoUrl(url.to_string())),
            },
            VideoChoice::Upload(Some(asset)) => {
                video::check_video_file(asset.file())?;
                DraftVideo::File(asset.file())
            }
        };

        let images = self
            .gallery
            .iter()
            .map(|asset| DraftImage {
                file: asset.file(),
                order: u32::try_from(asset.order()).unwrap_or(u32::MAX),
            })
            .collect();

        let cta = self.cta_text.trim();
        let calendly = self.calendly_link.trim();
        if !calendly.is_empty() && !render::is_web_link(calendly) {
            return Err(ValidationError::InvalidCalendlyLink(calendly.to_string()));
        }

        Ok(PageDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            description_professional_ai: self.description_professional.clone(),
            images,
            video,
            benefits: self.benefits.iter().filter_map(BenefitItem::to_feature).collect(),
            cta_button_text: if cta.is_empty() { DEFAULT_CTA_TEXT } else { cta }.to_string(),
            palette: self.palette.clone(),
            calendly_link: (!calendly.is_empty()).then(|| calendly.to_string()),
        })
    }

    /// Release every outstanding preview handle and drop all assets.
    ///
    /// Called on unmount; dropping the form has the same effect.
    pub fn teardown(&mut self) {
        self.gallery.clear(&mut self.previews);
        self.video = VideoChoice::None;
        self.previews.release_all();
    }
}

impl<F, P: PreviewAllocator<F>> FormState<F, P> {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn description_professional(&self) -> Option<&str> {
        self.description_professional.as_deref()
    }

    pub fn gallery(&self) -> &Gallery<F> {
        &self.gallery
    }

    pub fn video(&self) -> &VideoChoice<F> {
        &self.video
    }

    pub fn benefits(&self) -> &[BenefitItem] {
        &self.benefits
    }

    pub fn cta_text(&self) -> &str {
        &self.cta_text
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn palette_mode(&self) -> PaletteMode {
        self.palette_mode
    }

    pub fn calendly_link(&self) -> &str {
        &self.calendly_link
    }

    /// Preview handles not yet released
    pub fn outstanding_previews(&self) -> usize {
        self.previews.outstanding()
    }
}
