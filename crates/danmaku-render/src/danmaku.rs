//! Danmaku data model
//!
//! Comments arrive from the scraping layer as plain values. They are
//! immutable once built; display-time state lives in
//! [`StyledDanmaku`](crate::StyledDanmaku).

use serde::{Deserialize, Serialize};

/// Where a comment is shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DanmakuLocation {
    /// Pinned to the top edge
    Top,
    /// Pinned to the bottom edge
    Bottom,
    /// Scrolls across the screen
    Normal,
}

impl Default for DanmakuLocation {
    fn default() -> Self {
        DanmakuLocation::Normal
    }
}

/// A single comment as received from a stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Danmaku {
    /// Unique identifier
    pub id: String,
    /// Source the comment was fetched from
    pub provider_id: String,
    /// Emission time relative to the start of the video
    pub play_time_millis: i64,
    /// Author identifier as reported by the provider
    pub sender_id: String,
    /// Lane classifier
    #[serde(default)]
    pub location: DanmakuLocation,
    /// Comment text
    pub text: String,
    /// Packed `0xRRGGBB` color
    #[serde(default)]
    pub color: u32,
}

impl Danmaku {
    pub fn new(
        id: impl Into<String>,
        provider_id: impl Into<String>,
        play_time_millis: i64,
        sender_id: impl Into<String>,
        location: DanmakuLocation,
        text: impl Into<String>,
        color: u32,
    ) -> Self {
        Self {
            id: id.into(),
            provider_id: provider_id.into(),
            play_time_millis,
            sender_id: sender_id.into(),
            location,
            text: text.into(),
            color,
        }
    }
}

/// A comment plus viewer-specific presentation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanmakuPresentation {
    pub danmaku: Danmaku,
    /// Sent by the current viewer
    #[serde(default)]
    pub is_self: bool,
}

impl DanmakuPresentation {
    pub fn new(danmaku: Danmaku, is_self: bool) -> Self {
        Self { danmaku, is_self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_from_json() {
        let json = r#"{
            "danmaku": {
                "id": "42",
                "provider_id": "girigiri",
                "play_time_millis": 75000,
                "sender_id": "7",
                "location": "TOP",
                "text": "hello",
                "color": 16711680
            },
            "is_self": true
        }"#;

        let presentation: DanmakuPresentation = serde_json::from_str(json).unwrap();
        assert!(presentation.is_self);
        assert_eq!(presentation.danmaku.location, DanmakuLocation::Top);
        assert_eq!(presentation.danmaku.color, 0xFF0000);
        assert_eq!(presentation.danmaku.play_time_millis, 75000);
    }

    #[test]
    fn test_presentation_defaults() {
        let json = r#"{
            "danmaku": {
                "id": "1",
                "provider_id": "nyafun",
                "play_time_millis": 0,
                "sender_id": "1",
                "text": "plain"
            }
        }"#;

        let presentation: DanmakuPresentation = serde_json::from_str(json).unwrap();
        assert!(!presentation.is_self);
        assert_eq!(presentation.danmaku.location, DanmakuLocation::Normal);
        assert_eq!(presentation.danmaku.color, 0);
    }
}
