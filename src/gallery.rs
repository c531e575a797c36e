//! Built-in hero image gallery.
//!
//! Picking a gallery entry assigns its full-size reference straight to the
//! hero slot; no ingestion happens.

use serde::Serialize;

use crate::error::{AdminError, Result};

/// One selectable hero image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    pub label: &'static str,
    pub thumb: &'static str,
    pub full: &'static str,
}

/// Hero images offered as one-click choices.
pub const HERO_GALLERY: &[GalleryImage] = &[
    GalleryImage {
        label: "Gym floor",
        thumb: "https://images.unsplash.com/photo-1534438327276-14e5300c3a48?w=200&q=60",
        full: "https://images.unsplash.com/photo-1534438327276-14e5300c3a48?w=1200&q=80",
    },
    GalleryImage {
        label: "Outdoor run",
        thumb: "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=200&q=60",
        full: "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=1200&q=80",
    },
    GalleryImage {
        label: "Free weights",
        thumb: "https://images.unsplash.com/photo-1517836357463-d25dfeac3438?w=200&q=60",
        full: "https://images.unsplash.com/photo-1517836357463-d25dfeac3438?w=1200&q=80",
    },
    GalleryImage {
        label: "Functional training",
        thumb: "https://images.unsplash.com/photo-1599058917212-d750089bc07e?w=200&q=60",
        full: "https://images.unsplash.com/photo-1599058917212-d750089bc07e?w=1200&q=80",
    },
    GalleryImage {
        label: "Yoga studio",
        thumb: "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=200&q=60",
        full: "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=1200&q=80",
    },
    GalleryImage {
        label: "Boxing",
        thumb: "https://images.unsplash.com/photo-1549719386-74dfcbf7dbed?w=200&q=60",
        full: "https://images.unsplash.com/photo-1549719386-74dfcbf7dbed?w=1200&q=80",
    },
];

/// Default profile picture reference.
pub const DEFAULT_PROFILE_IMAGE: &str =
    "https://images.unsplash.com/photo-1567013127542-490d757e51fc?w=400&q=80";

/// Look up a gallery entry by index.
pub fn get(index: usize) -> Result<&'static GalleryImage> {
    HERO_GALLERY
        .get(index)
        .ok_or(AdminError::GalleryIndexOutOfRange {
            index,
            max_idx: HERO_GALLERY.len() - 1,
        })
}

/// Index of the gallery entry whose full reference matches `image`.
#[must_use]
pub fn position_of(image: &str) -> Option<usize> {
    HERO_GALLERY.iter().position(|g| g.full == image)
}
