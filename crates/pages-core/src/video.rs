//! Video rules: accepted link hosts, uploaded file limits and embed URL
//! normalisation for the public page.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::asset::{AssetReference, MAX_VIDEO_BYTES, SelectedFile, VIDEO_MIME_TYPE};
use crate::error::ValidationError;

static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be|vimeo\.com)/.+")
        .expect("static pattern")
});

/// The author's video selection mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoMode {
    #[default]
    None,
    Url,
    Upload,
}

impl VideoMode {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "url" => VideoMode::Url,
            "upload" => VideoMode::Upload,
            _ => VideoMode::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoMode::None => "none",
            VideoMode::Url => "url",
            VideoMode::Upload => "upload",
        }
    }
}

/// Video state held by the form
#[derive(Debug, Default)]
pub enum VideoChoice<F> {
    #[default]
    None,
    /// Link as typed by the author
    Url(String),
    /// Upload mode, with the selected file once one passes validation
    Upload(Option<AssetReference<F>>),
}

impl<F> VideoChoice<F> {
    pub fn mode(&self) -> VideoMode {
        match self {
            VideoChoice::None => VideoMode::None,
            VideoChoice::Url(_) => VideoMode::Url,
            VideoChoice::Upload(_) => VideoMode::Upload,
        }
    }

    /// Trimmed link when in URL mode and not blank
    pub fn url(&self) -> Option<&str> {
        match self {
            VideoChoice::Url(url) if !url.trim().is_empty() => Some(url.trim()),
            _ => None,
        }
    }

    pub fn file(&self) -> Option<&AssetReference<F>> {
        match self {
            VideoChoice::Upload(Some(asset)) => Some(asset),
            _ => None,
        }
    }
}

/// YouTube or Vimeo link, with or without scheme and `www.`
pub fn is_supported_video_url(url: &str) -> bool {
    VIDEO_URL.is_match(url.trim())
}

/// Reject anything that is not an mp4 of at most 50 MiB
pub fn check_video_file<F: SelectedFile>(file: &F) -> Result<(), ValidationError> {
    if file.mime_type() != VIDEO_MIME_TYPE {
        return Err(ValidationError::UnsupportedVideoType(file.mime_type().to_string()));
    }
    if file.size() > MAX_VIDEO_BYTES {
        return Err(ValidationError::VideoTooLarge {
            size: file.size(),
            limit: MAX_VIDEO_BYTES,
        });
    }
    Ok(())
}

/// Turn a share link into an embeddable player URL.
///
/// `youtu.be/ID` and `youtube.com/watch?v=ID` become `youtube.com/embed/ID`,
/// `vimeo.com/ID` becomes `player.vimeo.com/video/ID`. Links that are already
/// embeddable, or from other hosts, pass through with only a scheme added.
pub fn embed_url(raw: &str) -> String {
    let raw = raw.trim();
    let url = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };

    if url.contains("youtu.be/") {
        return url
            .replacen("www.youtu.be/", "youtu.be/", 1)
            .replacen("youtu.be/", "youtube.com/embed/", 1);
    }

    if url.contains("youtube.com/watch") {
        if let Some(id) = youtube_watch_id(&url) {
            return format!("https://youtube.com/embed/{id}");
        }
        return url;
    }

    if url.contains("vimeo.com/") && !url.contains("player.vimeo.com/") {
        return url
            .replacen("www.vimeo.com/", "vimeo.com/", 1)
            .replacen("vimeo.com/", "player.vimeo.com/video/", 1);
    }

    url
}

fn youtube_watch_id(url: &str) -> Option<&str> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("v="))
        .filter(|id| !id.is_empty())
}
