//! monogram-renderer: Text-monogram icon generation library
//!
//! This crate turns up to two characters of text, a color choice, and a
//! background policy into a small icon, exportable as PNG, JPEG, WebP, or
//! SVG. It is the core behind a single-screen form: a UI-binding layer
//! drives [`IconForm`]'s setters, reads the live [`RenderedPreview`], and
//! hands the [`ExportPayload`] to the host's download mechanism.
//!
//! # Example
//!
//! ```
//! use monogram_renderer::{CanvasSize, FileFormat, IconForm};
//!
//! let mut form = IconForm::new();
//! form.set_text("Ab");
//! form.set_text_color("#ff0000");        // auto background derives from this
//! form.set_canvas_size(CanvasSize::Px128);
//! form.set_file_format(FileFormat::Png);
//!
//! // The preview tracks every appearance-affecting change
//! let preview = form.preview();
//! assert_eq!(preview.format(), FileFormat::Png);
//!
//! // Export regenerates (or reuses) the payload on demand
//! let payload = form.export().unwrap();
//! assert_eq!(payload.download_name, "icon-Ab.png");
//! ```
//!
//! # Serializable Settings
//!
//! For frontend-backend communication, [`IconSettings`] round-trips as
//! JSON and re-enters a form through the [`Configurable`] trait, which
//! re-establishes the text and font invariants on the way in:
//!
//! ```
//! use monogram_renderer::{Configurable, IconForm, IconSettings};
//!
//! let json = IconForm::new().export_settings().to_json().unwrap();
//! let mut form = IconForm::new();
//! form.apply_settings(&IconSettings::from_json(&json).unwrap());
//! ```

mod color;
mod export;
mod fonts;
mod form;
mod render;
mod sanitize;
mod settings;

pub use color::{
    auto_background_rgb, derive_auto_background, hex_to_hsl, hex_to_rgb, rgb_to_hex, HslColor,
    Rgb,
};
pub use export::{export, ExportError, ExportPayload};
pub use fonts::{
    catalog, group_of, is_catalog_family, FontGroup, GENERIC_SANS, GENERIC_SERIF, SANS_FONTS,
    SERIF_FONTS,
};
pub use form::{Configurable, IconForm, Popover, RectPx, MAX_TEXT_CHARS};
pub use render::{
    render_bitmap, render_preview, vector_markup, RenderedPreview, VECTOR_FONT_SIZE,
};
pub use sanitize::{sanitize_svg, strip_markup, xml_escape};
pub use settings::{CanvasSize, FileFormat, IconSettings};
