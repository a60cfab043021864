//! Cloudinary delivery URLs
//!
//! Builds `https://res.cloudinary.com/{cloud}/{type}/upload/{transformation}/{public_id}`
//! URLs with a fixed transformation per rendering variant.

use super::resolver::MediaResolver;
use crate::types::{MediaKind, MediaVariant};
use once_cell::sync::Lazy;
use regex::Regex;

const DELIVERY_HOST: &str = "https://res.cloudinary.com";

/// Widths offered in responsive `srcset` attributes
const SRCSET_WIDTHS: [u32; 4] = [400, 600, 800, 1200];

static PUBLIC_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"cloudinary\.com/[^/]+/(?:image|video)/upload/(?:v\d+/)?(.*?)(?:\.[^./]+)?$")
        .expect("public id pattern is valid")
});

/// Resolver producing Cloudinary transformation URLs
#[derive(Debug, Clone)]
pub struct CloudinaryResolver {
    cloud_name: String,
}

impl CloudinaryResolver {
    /// Create a resolver for a cloud
    pub fn new(cloud_name: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
        }
    }

    /// Cloud name this resolver targets
    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    /// Build a delivery URL for a public id
    pub fn url(&self, public_id: &str, kind: MediaKind, variant: MediaVariant) -> String {
        let (transformation, extension) = transformation(kind, variant);
        format!(
            "{DELIVERY_HOST}/{}/{}/upload/{transformation}/{public_id}{extension}",
            self.cloud_name,
            kind.as_str()
        )
    }

    /// Responsive `srcset` value covering the standard widths
    pub fn srcset(&self, public_id: &str, kind: MediaKind) -> String {
        if public_id.is_empty() {
            return String::new();
        }

        SRCSET_WIDTHS
            .iter()
            .map(|width| {
                format!(
                    "{DELIVERY_HOST}/{}/{}/upload/c_limit,dpr_auto,f_auto,q_auto,w_{width}/{public_id} {width}w",
                    self.cloud_name,
                    kind.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl MediaResolver for CloudinaryResolver {
    fn resolve(&self, reference: &str, kind: MediaKind, variant: MediaVariant) -> Option<String> {
        if reference.is_empty() {
            return None;
        }

        let is_absolute = reference.starts_with("http://") || reference.starts_with("https://");
        if is_absolute && !reference.contains("cloudinary.com/") {
            return Some(reference.to_string());
        }

        let public_id = extract_public_id(reference);
        if public_id.is_empty() {
            return None;
        }
        Some(self.url(public_id, kind, variant))
    }
}

/// Transformation segment and file extension for a kind/variant pair.
///
/// Variants that make no sense for a kind fall back to its feed rendering.
fn transformation(kind: MediaKind, variant: MediaVariant) -> (&'static str, &'static str) {
    match (kind, variant) {
        (MediaKind::Image, MediaVariant::Detail) => {
            ("c_limit,dpr_auto,f_auto,h_600,q_auto,w_800", "")
        }
        (MediaKind::Image, MediaVariant::Thumbnail) => (
            "c_fill,e_blur:300,f_auto,g_auto,h_200,q_auto:low,w_300",
            "",
        ),
        (MediaKind::Image, MediaVariant::Feed | MediaVariant::Poster) => {
            ("c_fill,dpr_auto,f_auto,g_auto,h_400,q_auto,w_600", "")
        }
        (MediaKind::Video, MediaVariant::Detail) => (
            "ac_aac,br_2m,c_limit,h_600,q_auto,vc_h264,w_800",
            ".mp4",
        ),
        (MediaKind::Video, MediaVariant::Poster) => {
            ("c_fill,g_auto,h_400,w_600/f_auto,q_auto", ".jpg")
        }
        (MediaKind::Video, MediaVariant::Feed | MediaVariant::Thumbnail) => (
            "ac_aac,br_1m,c_fill,g_auto,h_400,q_auto,vc_h264,w_600",
            ".mp4",
        ),
    }
}

/// Extract the public id from a Cloudinary delivery URL.
///
/// Strips the version segment and file extension. Input that is not a
/// Cloudinary URL is returned unchanged.
pub fn extract_public_id(url: &str) -> &str {
    PUBLIC_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map_or(url, |m| m.as_str())
}

/// `sizes` attribute matching the feed's responsive breakpoints
pub fn sizes_attribute() -> &'static str {
    "(max-width: 640px) 100vw, (max-width: 768px) 90vw, (max-width: 1024px) 80vw, 800px"
}
