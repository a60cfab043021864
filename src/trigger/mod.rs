//! Scroll trigger module
//!
//! Calls `load_more` when a sentinel placed after the last post comes into
//! view.
//!
//! # Overview
//!
//! - `TriggerConfig` - proximity margin and intersection threshold
//! - `ScrollTrigger` - fires once per transition into view, gated by the
//!   paginator's state
//! - `SentinelObserver` - injected visibility source (`mpsc::Receiver<bool>`,
//!   `ViewportObserver` over layout frames)
//! - `attach` / `TriggerHandle` - background task driving a `Paginator`

mod detector;
mod driver;
mod observer;
mod types;

pub use detector::ScrollTrigger;
pub use driver::{attach, TriggerHandle};
pub use observer::{Frame, SentinelObserver, ViewportObserver};
pub use types::{
    SentinelRect, TriggerConfig, Viewport, DEFAULT_ROOT_MARGIN_PX, DEFAULT_THRESHOLD,
};

#[cfg(test)]
mod tests;
