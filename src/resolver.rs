//! YouTube URL to thumbnail URL resolution
//!
//! Three forms are recognised, tried in order, and the first match wins:
//! - `watch?v=<id>` (id runs until `&` or end of string)
//! - `youtu.be/<id>` (id runs until `?` or end of string)
//! - `youtube.com/embed/<id>` (id runs until `?` or end of string)
//!
//! Nothing here touches the network; the image is not checked upstream.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};

static VIDEO_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"v=([^&]+)").expect("valid regex"),
        Regex::new(r"youtu\.be/([^?]+)").expect("valid regex"),
        Regex::new(r"youtube\.com/embed/([^?]+)").expect("valid regex"),
    ]
});

/// Extract the video id from a watch, short-link or embed URL
pub fn extract_video_id(video_url: &str) -> Option<&str> {
    VIDEO_ID_PATTERNS.iter().find_map(|re| {
        re.captures(video_url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    })
}

/// Build the max-resolution thumbnail URL for a video id
pub fn thumbnail_url_for(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}

/// Resolve a video URL to its thumbnail image URL
pub fn resolve(video_url: &str) -> Result<String> {
    extract_video_id(video_url)
        .map(thumbnail_url_for)
        .ok_or(AppError::InvalidUrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &str = "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg";

    #[test]
    fn test_watch_url() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            EXPECTED
        );
    }

    #[test]
    fn test_watch_url_stops_at_ampersand() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s&list=PL1").unwrap(),
            EXPECTED
        );
    }

    #[test]
    fn test_short_url_stops_at_query() {
        assert_eq!(resolve("https://youtu.be/dQw4w9WgXcQ").unwrap(), EXPECTED);
        assert_eq!(resolve("https://youtu.be/dQw4w9WgXcQ?si=abc").unwrap(), EXPECTED);
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            resolve("https://www.youtube.com/embed/dQw4w9WgXcQ").unwrap(),
            EXPECTED
        );
        assert_eq!(
            resolve("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1").unwrap(),
            EXPECTED
        );
    }

    #[test]
    fn test_all_forms_agree_for_same_id() {
        let urls = [
            "https://www.youtube.com/watch?v=abc123",
            "https://youtu.be/abc123",
            "https://www.youtube.com/embed/abc123",
        ];
        let resolved: Vec<_> = urls.iter().map(|u| resolve(u).unwrap()).collect();
        assert!(resolved.iter().all(|r| r == &resolved[0]));
        assert_eq!(resolved[0], "https://img.youtube.com/vi/abc123/maxresdefault.jpg");
    }

    #[test]
    fn test_first_pattern_wins() {
        // The v= parameter takes priority over the short-link path
        assert_eq!(extract_video_id("https://youtu.be/short?v=long"), Some("long"));
    }

    #[test]
    fn test_unresolvable_urls() {
        for url in [
            "",
            "https://example.com/video",
            "https://vimeo.com/12345",
            "https://www.youtube.com/",
            "youtu.be/",
        ] {
            assert!(matches!(resolve(url), Err(AppError::InvalidUrl)), "{url}");
        }
    }
}
