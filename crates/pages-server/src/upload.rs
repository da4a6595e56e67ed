//! Multipart page submissions.
//!
//! The browser posts the whole form in one request. The fields are collected
//! first and then replayed into a [`FormState`], so the server applies the
//! same gallery and video rules as the client regardless of part order.

use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use thiserror::Error;

use pages_core::{
    AssetRejection, BenefitFeature, ColorChannel, DetachedPreviews, FormState, ValidationError,
    VideoMode,
};
use pages_publish::LocalFile;

/// Form state rebuilt from a request
pub type ServerForm = FormState<LocalFile, DetachedPreviews>;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("benefits must be a JSON array of {{icon?, text}}: {0}")]
    Benefits(#[from] serde_json::Error),
}

/// Raw fields of one submission
#[derive(Debug, Default)]
pub struct PageUpload {
    pub title: String,
    pub description: String,
    pub description_professional_ai: Option<String>,
    pub cta_button_text: Option<String>,
    pub calendly_link: String,
    pub colors: Vec<(ColorChannel, String)>,
    pub video_choice: VideoMode,
    pub video_url: String,
    pub video: Option<LocalFile>,
    pub benefits: Vec<BenefitFeature>,
    /// In gallery order
    pub images: Vec<LocalFile>,
}

impl PageUpload {
    pub async fn from_multipart(multipart: &mut Multipart) -> Result<Self, UploadError> {
        let mut upload = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "images" => upload.images.extend(read_file(field).await?),
                "video" => upload.video = read_file(field).await?,
                "title" => upload.title = field.text().await?,
                "description" => upload.description = field.text().await?,
                "description_professional_ai" => {
                    upload.description_professional_ai = Some(field.text().await?);
                }
                "cta_button_text" => upload.cta_button_text = Some(field.text().await?),
                "calendly_link" => upload.calendly_link = field.text().await?,
                "color_primary" => upload.colors.push((ColorChannel::Primary, field.text().await?)),
                "color_secondary" => {
                    upload.colors.push((ColorChannel::Secondary, field.text().await?));
                }
                "color_accent" => upload.colors.push((ColorChannel::Accent, field.text().await?)),
                "video_choice" => upload.video_choice = VideoMode::parse(&field.text().await?),
                "video_url" => upload.video_url = field.text().await?,
                "benefits" => {
                    let raw = field.text().await?;
                    if !raw.trim().is_empty() {
                        upload.benefits = serde_json::from_str(&raw)?;
                    }
                }
                other => tracing::debug!(field = %other, "Ignoring unknown multipart field"),
            }
        }

        Ok(upload)
    }

    /// Replay the fields into a form. Image rejections come back as
    /// warnings; a rejected video file is an error.
    pub fn into_form(self) -> Result<(ServerForm, Vec<AssetRejection>), ValidationError> {
        let mut form = ServerForm::new(DetachedPreviews::default());

        form.set_title(self.title);
        form.set_description(self.description);
        form.set_description_professional(self.description_professional_ai);
        if let Some(cta) = self.cta_button_text {
            form.set_cta_text(cta);
        }
        form.set_calendly_link(self.calendly_link);
        for (channel, value) in self.colors {
            if !value.trim().is_empty() {
                form.set_color(channel, value.trim());
            }
        }

        for (index, benefit) in self.benefits.into_iter().enumerate() {
            if index >= form.benefits().len() {
                form.add_benefit();
            }
            form.set_benefit_text(index, benefit.text);
            if let Some(icon) = benefit.icon {
                form.set_benefit_icon(index, icon);
            }
        }

        let warnings = form.add_images(self.images);

        match self.video_choice {
            VideoMode::None => {}
            VideoMode::Url => form.set_video_url(self.video_url),
            VideoMode::Upload => match self.video {
                Some(file) => form.choose_video_file(file)?,
                None => form.set_video_mode(VideoMode::Upload),
            },
        }

        Ok((form, warnings))
    }
}

/// File part, or `None` for the empty part browsers send when nothing was
/// picked
async fn read_file(field: Field<'_>) -> Result<Option<LocalFile>, MultipartError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field.bytes().await?;

    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(LocalFile::new(file_name, content_type, bytes)))
}

#[cfg(test)]
mod tests {
    use pages_core::form::DraftVideo;

    use super::*;

    fn jpeg(name: &str, size: usize) -> LocalFile {
        LocalFile::new(name, "image/jpeg", vec![0u8; size])
    }

    #[test]
    fn test_into_form_applies_rules() {
        let upload = PageUpload {
            title: "Apartamento T3".into(),
            benefits: (0..7)
                .map(|i| BenefitFeature {
                    icon: None,
                    text: format!("b{i}"),
                })
                .collect(),
            images: vec![jpeg("a.jpg", 10), jpeg("grande.jpg", 4 * 1024 * 1024)],
            colors: vec![
                (ColorChannel::Accent, "#000000".into()),
                (ColorChannel::Primary, " ".into()),
            ],
            video_choice: VideoMode::Url,
            video_url: "vimeo.com/1".into(),
            ..PageUpload::default()
        };

        let (form, warnings) = upload.into_form().unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].file_name, "grande.jpg");
        assert_eq!(form.gallery().len(), 1);
        assert_eq!(form.benefits().len(), 7);
        assert_eq!(form.palette().accent, "#000000");
        assert_eq!(form.palette().primary, "#3B82F6");

        let draft = form.draft().unwrap();
        assert!(matches!(draft.video, DraftVideo::Url(ref url) if url == "vimeo.com/1"));
        assert_eq!(draft.benefits.len(), 7);
    }

    #[test]
    fn test_bad_video_file_is_validation_error() {
        let upload = PageUpload {
            title: "Loja".into(),
            video_choice: VideoMode::Upload,
            video: Some(LocalFile::new("clip.mov", "video/quicktime", vec![1u8])),
            ..PageUpload::default()
        };
        assert!(matches!(upload.into_form(), Err(ValidationError::UnsupportedVideoType(_))));
    }
}
