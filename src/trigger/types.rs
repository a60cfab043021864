//! Trigger configuration and sentinel geometry

use serde::{Deserialize, Serialize};

/// Default distance below the viewport at which the sentinel counts as visible
pub const DEFAULT_ROOT_MARGIN_PX: f64 = 200.0;

/// Default fraction of the sentinel that must intersect
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Visibility settings for the sentinel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Pixels the viewport is grown by, on both ends, so pages load before
    /// the user reaches the bottom
    pub root_margin_px: f64,
    /// Minimum intersecting fraction of the sentinel, in `[0, 1]`
    pub threshold: f64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            root_margin_px: DEFAULT_ROOT_MARGIN_PX,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl TriggerConfig {
    /// Create a config
    pub fn new(root_margin_px: f64, threshold: f64) -> Self {
        Self {
            root_margin_px,
            threshold,
        }
    }

    /// Check whether the sentinel counts as visible in this viewport
    pub fn is_visible(&self, viewport: Viewport, sentinel: SentinelRect) -> bool {
        let top = viewport.top - self.root_margin_px;
        let bottom = viewport.top + viewport.height + self.root_margin_px;

        if sentinel.height <= 0.0 {
            return sentinel.top >= top && sentinel.top <= bottom;
        }

        let overlap = sentinel.bottom().min(bottom) - sentinel.top.max(top);
        if overlap <= 0.0 {
            return false;
        }
        overlap / sentinel.height >= self.threshold
    }
}

/// Visible vertical window of the scroll container, in document pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Scroll offset
    pub top: f64,
    /// Window height
    pub height: f64,
}

impl Viewport {
    /// Create a viewport
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }
}

/// Vertical extent of the sentinel marker, in document pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentinelRect {
    /// Offset of the sentinel's top edge
    pub top: f64,
    /// Sentinel height, zero for a bare marker
    pub height: f64,
}

impl SentinelRect {
    /// Create a sentinel rect
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Offset of the bottom edge
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}
