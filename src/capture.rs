//! Contract for the camera-based color-capture feature.
//!
//! Webcam access and image processing are host concerns; the core only
//! defines what it needs back: a color classification for a sampled region.
//! Calibration state is opaque configuration that the host persists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A region of an image buffer to sample.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageRegion<'a> {
    /// Tightly-packed 8-bit RGB pixel data, row-major.
    pub pixels: &'a [u8],
    /// Width of the full image in pixels.
    pub width: u32,
    /// Height of the full image in pixels.
    pub height: u32,
    /// Region to sample within the image.
    pub shape: RegionShape,
}

/// Shape of a sampled region.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum RegionShape {
    /// Axis-aligned rectangle.
    Rect {
        /// Left edge, in pixels.
        x: u32,
        /// Top edge, in pixels.
        y: u32,
        /// Width in pixels.
        w: u32,
        /// Height in pixels.
        h: u32,
    },
    /// Circle, for round sticker overlays.
    Circle {
        /// Center X, in pixels.
        cx: u32,
        /// Center Y, in pixels.
        cy: u32,
        /// Radius in pixels.
        r: u32,
    },
}

/// Result of classifying a sampled region.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Name of the matched calibrated color (e.g. `"yellow"`).
    pub color_name: String,
    /// Match confidence from 0.0 to 1.0.
    pub confidence: f32,
}

/// Classifies image regions into calibrated sticker colors.
///
/// Implemented by the host's capture subsystem.
pub trait ColorSampler {
    /// Samples `region` and returns the best-matching calibrated color.
    fn classify(&self, region: &ImageRegion<'_>) -> Classification;
}

/// Inclusive hue/saturation/value range for one calibrated color.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct HsvRange {
    /// Hue bounds in degrees, 0..360.
    pub hue: [f32; 2],
    /// Saturation bounds, 0..1.
    pub saturation: [f32; 2],
    /// Value bounds, 0..1.
    pub value: [f32; 2],
}

/// Per-color calibration ranges, keyed by color name.
///
/// Loaded and saved by the host; the core treats this as opaque configuration
/// and it has no effect on puzzle-state correctness.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
pub struct CalibrationRanges(pub BTreeMap<String, HsvRange>);
