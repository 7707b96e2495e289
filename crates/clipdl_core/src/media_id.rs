use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

const THUMBNAIL_HOST: &str = "https://img.youtube.com/vi";

/// Recognised URL shapes, tried in order. Each captures an 11-character id.
static URL_SHAPES: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"youtube\.com/watch\?v=([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"youtube\.com/embed/([A-Za-z0-9_-]{11})",
        r"youtube\.com/shorts/([A-Za-z0-9_-]{11})",
    ]
    .map(|pattern| Regex::new(pattern).expect("static media id pattern"))
});

/// Identifier of a single media item, as embedded in its public URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaId(String);

impl MediaId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the media identifier from a watch, short-link, embed or shorts URL.
pub fn extract_media_id(input: &str) -> Option<MediaId> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    URL_SHAPES.iter().find_map(|shape| {
        shape
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|id| MediaId(id.as_str().to_owned()))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailQuality {
    MaxRes,
    High,
}

/// Preview image for a media id. Starts at max resolution and falls back to
/// the high-quality variant at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    media_id: MediaId,
    quality: ThumbnailQuality,
}

impl Thumbnail {
    pub fn new(media_id: MediaId) -> Self {
        Self {
            media_id,
            quality: ThumbnailQuality::MaxRes,
        }
    }

    pub fn media_id(&self) -> &MediaId {
        &self.media_id
    }

    pub fn quality(&self) -> ThumbnailQuality {
        self.quality
    }

    pub fn url(&self) -> String {
        let file = match self.quality {
            ThumbnailQuality::MaxRes => "maxresdefault.jpg",
            ThumbnailQuality::High => "hqdefault.jpg",
        };
        format!("{THUMBNAIL_HOST}/{}/{file}", self.media_id)
    }

    /// Records a failed image load. Returns `true` when a fallback URL is now
    /// available; a failure of the fallback itself is final.
    pub fn on_load_failed(&mut self) -> bool {
        match self.quality {
            ThumbnailQuality::MaxRes => {
                self.quality = ThumbnailQuality::High;
                true
            }
            ThumbnailQuality::High => false,
        }
    }
}
