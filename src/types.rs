//! Common types used throughout Quiet Thoughts
//!
//! This module contains shared type definitions, type aliases,
//! and small enums used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// Store-assigned post identifier
pub type PostId = String;

// ============================================================================
// Media
// ============================================================================

/// Kind of media attached to a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Resource type segment used in media URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Rendering context a media URL is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaVariant {
    /// Inline in the scrolling feed
    #[default]
    Feed,
    /// Post detail page or modal
    Detail,
    /// Blurred placeholder while loading (images)
    Thumbnail,
    /// Still frame shown before playback (videos)
    Poster,
}

// ============================================================================
// Log Level
// ============================================================================

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
