//! Sentinel visibility sources

use super::types::{SentinelRect, TriggerConfig, Viewport};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Source of sentinel visibility reports
#[async_trait]
pub trait SentinelObserver: Send {
    /// Wait for the next report.
    ///
    /// `None` means the sentinel is gone and observation has ended. Must be
    /// cancel-safe: dropping the future must not lose a report.
    async fn next_visibility(&mut self) -> Option<bool>;
}

/// Raw visibility reports, e.g. from a platform observer
#[async_trait]
impl SentinelObserver for mpsc::Receiver<bool> {
    async fn next_visibility(&mut self) -> Option<bool> {
        self.recv().await
    }
}

/// One layout snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Viewport at the time of the snapshot
    pub viewport: Viewport,
    /// Sentinel position, `None` once it was removed from the list
    pub sentinel: Option<SentinelRect>,
}

impl Frame {
    /// Snapshot with the sentinel in place
    pub fn new(viewport: Viewport, sentinel: SentinelRect) -> Self {
        Self {
            viewport,
            sentinel: Some(sentinel),
        }
    }

    /// Snapshot after the sentinel was removed
    pub fn removed(viewport: Viewport) -> Self {
        Self {
            viewport,
            sentinel: None,
        }
    }
}

/// Turns scroll/layout frames into visibility reports using the trigger's
/// margin and threshold
#[derive(Debug)]
pub struct ViewportObserver {
    frames: mpsc::Receiver<Frame>,
    config: TriggerConfig,
}

impl ViewportObserver {
    /// Create an observer over a frame channel
    pub fn new(frames: mpsc::Receiver<Frame>, config: TriggerConfig) -> Self {
        Self { frames, config }
    }

    /// Create an observer together with the sender feeding it
    pub fn channel(config: TriggerConfig, capacity: usize) -> (mpsc::Sender<Frame>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx, config))
    }

    /// Visibility settings in use
    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }
}

#[async_trait]
impl SentinelObserver for ViewportObserver {
    async fn next_visibility(&mut self) -> Option<bool> {
        let frame = self.frames.recv().await?;
        let sentinel = frame.sentinel?;
        Some(self.config.is_visible(frame.viewport, sentinel))
    }
}
