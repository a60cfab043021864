//! Media resolver trait and the passthrough implementation

use crate::types::{MediaKind, MediaVariant};
use std::fmt::Debug;

/// Turns a stored media reference into a URL
pub trait MediaResolver: Send + Sync + Debug {
    /// Resolve `reference` for the given kind and rendering variant.
    ///
    /// Returns `None` when no URL can be produced.
    fn resolve(&self, reference: &str, kind: MediaKind, variant: MediaVariant) -> Option<String>;
}

/// Uses references verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl MediaResolver for PassthroughResolver {
    fn resolve(&self, reference: &str, _kind: MediaKind, _variant: MediaVariant) -> Option<String> {
        if reference.is_empty() {
            None
        } else {
            Some(reference.to_string())
        }
    }
}
