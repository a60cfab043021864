//! Media module
//!
//! Resolves opaque media references on posts into fully-formed URLs.
//!
//! # Overview
//!
//! - `MediaResolver` - capability injected into store adapters
//! - `PassthroughResolver` - references are already URLs
//! - `CloudinaryResolver` - builds transformation URLs per rendering variant

mod cloudinary;
mod resolver;

pub use cloudinary::{extract_public_id, sizes_attribute, CloudinaryResolver};
pub use resolver::{MediaResolver, PassthroughResolver};
