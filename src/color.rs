//! Color math for icon backgrounds.
//!
//! Converts hex color strings to RGB and HSL, and derives the
//! "auto background" shade: a desaturated, lightness-shifted version of the
//! text color that contrasts with it without manual selection.

use palette::{Hsl, IntoColor, Srgb};

// ============================================================================
// Color Types
// ============================================================================

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// An HSL color with `h` in `[0, 360)` and `s`, `l` expressed as percentages.
///
/// Lightness is not clamped by construction; the auto-background derivation
/// stores its shifted value here verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslColor {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl HslColor {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Formats this color as a CSS `hsl(h, s%, l%)` string.
    pub fn to_css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }

    /// Resolves this color to RGB, clamping lightness and saturation into
    /// their valid ranges first.
    pub fn to_rgb(&self) -> Rgb {
        let hsl = Hsl::new(
            self.h,
            (self.s / 100.0).clamp(0.0, 1.0),
            (self.l / 100.0).clamp(0.0, 1.0),
        );
        let rgb: Srgb = hsl.into_color();
        Rgb::new(
            (rgb.red * 255.0).round() as u8,
            (rgb.green * 255.0).round() as u8,
            (rgb.blue * 255.0).round() as u8,
        )
    }
}

// ============================================================================
// Hex Conversions
// ============================================================================

/// Parses a 6-hex-digit color string, with or without a leading `#`.
///
/// Returns `None` for anything that is not exactly six hex digits. Callers
/// in the render path treat `None` as "fall back to the default color"
/// rather than surfacing an error.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Rgb::new(r, g, b))
}

/// Formats an RGB color as a lowercase `#rrggbb` string.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Converts a hex color string to HSL.
///
/// Achromatic input gives `h = s = 0`; hue is always normalized into
/// `[0, 360)`. Returns `None` for malformed input.
pub fn hex_to_hsl(hex: &str) -> Option<HslColor> {
    let rgb = hex_to_rgb(hex)?;
    let srgb = Srgb::new(
        rgb.r as f32 / 255.0,
        rgb.g as f32 / 255.0,
        rgb.b as f32 / 255.0,
    );
    let hsl: Hsl = srgb.into_color();
    Some(HslColor::new(
        hsl.hue.into_positive_degrees(),
        hsl.saturation * 100.0,
        hsl.lightness * 100.0,
    ))
}

// ============================================================================
// Auto Background
// ============================================================================

/// Derives the auto-background shade from a text color.
///
/// Saturation is halved and lightness is shifted by 20 points away from the
/// midpoint: down when above 50, up otherwise. The shifted lightness is
/// stored unclamped (for valid input the result stays within `[0, 100]`).
pub fn derive_auto_background(text_color: &str) -> Option<HslColor> {
    let hsl = hex_to_hsl(text_color)?;
    let l = if hsl.l > 50.0 { hsl.l - 20.0 } else { hsl.l + 20.0 };
    Some(HslColor::new(hsl.h, hsl.s * 0.5, l))
}

/// The auto-background shade resolved to RGB for raster fills.
pub fn auto_background_rgb(text_color: &str) -> Option<Rgb> {
    derive_auto_background(text_color).map(|hsl| hsl.to_rgb())
}

// ============================================================================
// Tests
// ============================================================================
