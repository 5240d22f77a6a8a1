//! Serializable icon settings.
//!
//! [`IconSettings`] captures everything the form collects in a format that
//! can be serialized to JSON and sent across a frontend/backend boundary.
//!
//! # Example
//!
//! ```
//! use monogram_renderer::{CanvasSize, FileFormat, IconSettings};
//!
//! let settings = IconSettings::new()
//!     .with_text("Ab")
//!     .with_text_color("#ff0000")
//!     .with_file_format(FileFormat::Png)
//!     .with_canvas_size(CanvasSize::Px128);
//!
//! let json = settings.to_json().unwrap();
//! let restored = IconSettings::from_json(&json).unwrap();
//! assert_eq!(settings, restored);
//! ```

use serde::{Deserialize, Serialize};

use crate::fonts;

// ============================================================================
// FileFormat
// ============================================================================

/// The selectable output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Webp,
}

impl FileFormat {
    /// The filename extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Webp => "webp",
        }
    }

    /// The standard MIME type for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Webp => "image/webp",
        }
    }

    /// Returns true for the pixel-grid formats.
    pub fn is_raster(&self) -> bool {
        !matches!(self, Self::Svg)
    }
}

// ============================================================================
// CanvasSize
// ============================================================================

/// The five selectable square canvas sizes.
///
/// Modeled as an enum so an out-of-catalog size cannot be represented;
/// serializes as the pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(into = "u32", try_from = "u32")]
pub enum CanvasSize {
    Px64,
    #[default]
    Px128,
    Px256,
    Px360,
    Px512,
}

impl CanvasSize {
    /// All selectable sizes, smallest first.
    pub const ALL: [CanvasSize; 5] = [
        Self::Px64,
        Self::Px128,
        Self::Px256,
        Self::Px360,
        Self::Px512,
    ];

    /// The side length in pixels.
    pub fn px(&self) -> u32 {
        match self {
            Self::Px64 => 64,
            Self::Px128 => 128,
            Self::Px256 => 256,
            Self::Px360 => 360,
            Self::Px512 => 512,
        }
    }
}

impl From<CanvasSize> for u32 {
    fn from(size: CanvasSize) -> u32 {
        size.px()
    }
}

impl TryFrom<u32> for CanvasSize {
    type Error = String;

    fn try_from(px: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.px() == px)
            .ok_or_else(|| format!("unsupported canvas size: {px}"))
    }
}

// ============================================================================
// IconSettings
// ============================================================================

/// Everything the form collects: text, colors, background policy, font,
/// output format, and canvas size.
///
/// This is plain serializable data. The invariants (sanitized text of at
/// most two characters, catalog font families) are enforced by
/// [`IconForm`](crate::IconForm)'s setters; settings deserialized from an
/// external source should be applied through
/// [`Configurable::apply_settings`](crate::Configurable::apply_settings)
/// to re-establish them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSettings {
    /// The icon text, at most two characters after sanitization.
    #[serde(default)]
    pub text: String,

    /// Text color as a 6-hex-digit string.
    pub text_color: String,

    /// Manual background color as a 6-hex-digit string. Ignored while
    /// `auto_background` is on.
    pub background_color: String,

    /// Whether the background is derived from the text color instead of
    /// taken from `background_color`.
    #[serde(default = "default_true")]
    pub auto_background: bool,

    /// Font family name, a member of the fixed catalog.
    pub font_family: String,

    /// Output format for export (and for the preview encoding).
    #[serde(default)]
    pub file_format: FileFormat,

    /// Square canvas side length.
    #[serde(default)]
    pub canvas_size: CanvasSize,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            text: String::new(),
            text_color: "#000000".to_string(),
            background_color: "#ffffff".to_string(),
            auto_background: true,
            font_family: fonts::GENERIC_SANS.to_string(),
            file_format: FileFormat::default(),
            canvas_size: CanvasSize::default(),
        }
    }
}

impl IconSettings {
    /// Creates settings with the defaults: empty text, black on white,
    /// auto background, generic sans-serif, PNG at 128px.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text. No sanitization happens here; use
    /// [`IconForm::set_text`](crate::IconForm::set_text) for user input.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = color.into();
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_auto_background(mut self, auto: bool) -> Self {
        self.auto_background = auto;
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    pub fn with_file_format(mut self, format: FileFormat) -> Self {
        self.file_format = format;
        self
    }

    pub fn with_canvas_size(mut self, size: CanvasSize) -> Self {
        self.canvas_size = size;
        self
    }

    /// Serializes the settings to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Tests
// ============================================================================
