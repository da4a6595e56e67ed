//! Owned multipart payload built from a validated draft.
//!
//! The draft borrows the form; the payload owns cheap clones of the files so
//! it can cross the `await` that reads and uploads them.

use pages_core::{DraftVideo, PageDraft};

/// Fields and files of `POST /api/pages`, in gallery order
#[derive(Clone, Debug)]
pub struct Submission<F> {
    pub fields: Vec<(&'static str, String)>,
    pub images: Vec<F>,
    pub video: Option<F>,
}

impl<F: Clone> Submission<F> {
    pub fn from_draft(draft: &PageDraft<'_, F>) -> Self {
        let mut fields = vec![
            ("title", draft.title.clone()),
            ("description", draft.description.clone()),
            ("cta_button_text", draft.cta_button_text.clone()),
            ("color_primary", draft.palette.primary.clone()),
            ("color_secondary", draft.palette.secondary.clone()),
            ("color_accent", draft.palette.accent.clone()),
        ];

        if let Some(text) = &draft.description_professional_ai {
            fields.push(("description_professional_ai", text.clone()));
        }
        if let Some(link) = &draft.calendly_link {
            fields.push(("calendly_link", link.clone()));
        }
        if !draft.benefits.is_empty() {
            // Vec<BenefitFeature> always serializes
            fields.push(("benefits", serde_json::to_string(&draft.benefits).unwrap_or_default()));
        }

        let video = match &draft.video {
            DraftVideo::None => {
                fields.push(("video_choice", "none".into()));
                None
            }
            DraftVideo::Url(url) => {
                fields.push(("video_choice", "url".into()));
                fields.push(("video_url", url.clone()));
                None
            }
            DraftVideo::File(file) => {
                fields.push(("video_choice", "upload".into()));
                Some((*file).clone())
            }
        };

        let mut images: Vec<_> = draft.images.iter().collect();
        images.sort_by_key(|img| img.order);

        Self {
            fields,
            images: images.into_iter().map(|img| img.file.clone()).collect(),
            video,
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }
}
