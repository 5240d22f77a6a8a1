//! Form state: the settings owner that drives preview recomputation.
//!
//! [`IconForm`] holds the current [`IconSettings`] and the matching
//! [`RenderedPreview`]. Every appearance-affecting setter ends with an
//! explicit synchronous [`refresh_preview`](IconForm::refresh_preview)
//! call; there is no implicit dependency tracking. The file format setter
//! deliberately does not refresh (preserved original behavior).

use crate::export::{self, ExportError, ExportPayload};
use crate::render::{self, RenderedPreview};
use crate::sanitize::strip_markup;
use crate::settings::{CanvasSize, FileFormat, IconSettings};
use crate::fonts;

/// Maximum icon text length in characters, applied after sanitization.
pub const MAX_TEXT_CHARS: usize = 2;

// ============================================================================
// Popover
// ============================================================================

/// A rectangle in screen pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns true if the point lies within this rectangle.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && py >= self.y
            && px < self.x + self.width as i32
            && py < self.y + self.height as i32
    }
}

/// A stateless dismiss-on-outside-pointer capability.
///
/// The form owns one instance per color picker; each is parameterized only
/// by the screen region it governs and dismisses independently of the
/// other.
#[derive(Debug, Clone, Copy, Default)]
pub struct Popover {
    bounds: Option<RectPx>,
    open: bool,
}

impl Popover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the screen region this popover occupies. The UI layer updates
    /// this whenever the popover is laid out.
    pub fn set_bounds(&mut self, bounds: RectPx) {
        self.bounds = Some(bounds);
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Handles a pointer-down event. Closes the popover when the point
    /// falls outside its bound region (or when no region is bound).
    pub fn pointer_down(&mut self, x: i32, y: i32) {
        if !self.open {
            return;
        }
        let inside = self.bounds.is_some_and(|b| b.contains(x, y));
        if !inside {
            self.open = false;
        }
    }
}

// ============================================================================
// Configurable
// ============================================================================

/// Trait for types driven by an [`IconSettings`] value.
pub trait Configurable {
    /// Applies a settings snapshot, re-establishing invariants on the way
    /// in (text sanitization and truncation, font catalog membership).
    fn apply_settings(&mut self, settings: &IconSettings);

    /// Exports the current settings as an owned snapshot.
    fn export_settings(&self) -> IconSettings;
}

// ============================================================================
// IconForm
// ============================================================================

/// The interactive form: current settings, live preview, and the two color
/// picker popovers.
///
/// # Example
///
/// ```
/// use monogram_renderer::{FileFormat, IconForm};
///
/// let mut form = IconForm::new();
/// form.set_text("Ab");
/// form.set_text_color("#ff0000");
/// form.set_file_format(FileFormat::Png);
///
/// let payload = form.export().unwrap();
/// assert_eq!(payload.download_name, "icon-Ab.png");
/// ```
pub struct IconForm {
    settings: IconSettings,
    preview: RenderedPreview,

    /// Popover for the text color picker.
    pub text_color_picker: Popover,

    /// Popover for the manual background color picker.
    pub background_color_picker: Popover,
}

impl Default for IconForm {
    fn default() -> Self {
        Self::new()
    }
}

impl IconForm {
    /// Creates a form with default settings and an initial preview.
    pub fn new() -> Self {
        Self::with_settings(IconSettings::default())
    }

    /// Creates a form from a settings snapshot, enforcing invariants.
    pub fn with_settings(settings: IconSettings) -> Self {
        let defaults = IconSettings::default();
        let mut form = Self {
            settings: defaults.clone(),
            preview: render::render_preview(&defaults),
            text_color_picker: Popover::new(),
            background_color_picker: Popover::new(),
        };
        form.apply_settings(&settings);
        form
    }

    /// The current settings.
    pub fn settings(&self) -> &IconSettings {
        &self.settings
    }

    /// The current preview, always in sync with the appearance-affecting
    /// settings.
    pub fn preview(&self) -> &RenderedPreview {
        &self.preview
    }

    // ---- Setters ----

    /// Sets the icon text: markup is stripped first, then the result is
    /// truncated to [`MAX_TEXT_CHARS`] characters.
    pub fn set_text(&mut self, raw: &str) {
        self.settings.text = strip_markup(raw).chars().take(MAX_TEXT_CHARS).collect();
        self.refresh_preview();
    }

    /// Sets the text color from the color picker.
    pub fn set_text_color(&mut self, hex: &str) {
        self.settings.text_color = hex.to_string();
        self.refresh_preview();
    }

    /// Sets the manual background color from the color picker. Refreshes
    /// even while auto background is on, matching the original form.
    pub fn set_background_color(&mut self, hex: &str) {
        self.settings.background_color = hex.to_string();
        self.refresh_preview();
    }

    pub fn set_auto_background(&mut self, auto: bool) {
        self.settings.auto_background = auto;
        self.refresh_preview();
    }

    pub fn toggle_auto_background(&mut self) {
        let auto = self.settings.auto_background;
        self.set_auto_background(!auto);
    }

    /// Sets the font family. Names outside the fixed catalog are ignored.
    pub fn set_font_family(&mut self, family: &str) {
        if !fonts::is_catalog_family(family) {
            return;
        }
        self.settings.font_family = family.to_string();
        self.refresh_preview();
    }

    /// Sets the output format. Does not refresh the preview: the format
    /// only affects the preview encoding, and the original form left the
    /// preview untouched until the next appearance change.
    pub fn set_file_format(&mut self, format: FileFormat) {
        self.settings.file_format = format;
    }

    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        self.settings.canvas_size = size;
        self.refresh_preview();
    }

    /// Recomputes the preview from the current settings. Called by every
    /// appearance-affecting setter; also available to the UI layer after
    /// bulk updates.
    pub fn refresh_preview(&mut self) {
        self.preview = render::render_preview(&self.settings);
    }

    // ---- Pointer events ----

    /// Forwards a pointer-down event to both popovers; each dismisses
    /// independently when the point is outside its own region.
    pub fn pointer_down(&mut self, x: i32, y: i32) {
        self.text_color_picker.pointer_down(x, y);
        self.background_color_picker.pointer_down(x, y);
    }

    // ---- Export ----

    /// Produces the downloadable payload for the current settings.
    ///
    /// PNG and JPEG reuse the cached preview bytes when the preview is
    /// already encoded in the selected container; SVG and WebP regenerate
    /// from the settings, independently of the preview.
    pub fn export(&self) -> Result<ExportPayload, ExportError> {
        match self.settings.file_format {
            f @ (FileFormat::Png | FileFormat::Jpg) if self.preview.format() == f => Ok(
                export::payload_from_encoded(self.preview.bytes().to_vec(), &self.settings),
            ),
            _ => export::export(&self.settings),
        }
    }
}

impl Configurable for IconForm {
    fn apply_settings(&mut self, settings: &IconSettings) {
        self.set_text(&settings.text);
        self.set_text_color(&settings.text_color);
        self.set_background_color(&settings.background_color);
        self.set_auto_background(settings.auto_background);
        self.set_font_family(&settings.font_family);
        self.set_file_format(settings.file_format);
        self.set_canvas_size(settings.canvas_size);
    }

    fn export_settings(&self) -> IconSettings {
        self.settings.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_has_an_initial_preview() {
        let form = IconForm::new();
        assert!(!form.preview().bytes().is_empty());
        assert_eq!(form.preview().format(), FileFormat::Png);
    }

    #[test]
    fn text_is_sanitized_then_truncated() {
        let mut form = IconForm::new();

        form.set_text("abc");
        assert_eq!(form.settings().text, "ab");

        form.set_text("<b>a</b>");
        assert_eq!(form.settings().text, "a");

        form.set_text("<b>abc</b>");
        assert_eq!(form.settings().text, "ab");

        form.set_text("<br/>");
        assert_eq!(form.settings().text, "");
    }

    #[test]
    fn canvas_size_change_refreshes_preview() {
        let mut form = IconForm::new();
        let before = form.preview().clone();
        form.set_canvas_size(CanvasSize::Px64);
        assert_ne!(form.preview(), &before);
    }

    #[test]
    fn color_change_refreshes_preview_while_auto() {
        let mut form = IconForm::new();
        assert!(form.settings().auto_background);
        let before = form.preview().clone();
        form.set_text_color("#ff0000");
        assert_ne!(form.preview(), &before);
    }

    #[test]
    fn auto_toggle_refreshes_preview() {
        let mut form = IconForm::new();
        form.set_text_color("#ff0000");
        form.set_background_color("#0000ff");
        let auto = form.preview().clone();
        form.toggle_auto_background();
        assert!(!form.settings().auto_background);
        assert_ne!(form.preview(), &auto);
    }

    #[test]
    fn format_change_does_not_refresh_preview() {
        let mut form = IconForm::new();
        let before = form.preview().clone();
        form.set_file_format(FileFormat::Jpg);
        // Preview bytes unchanged until the next appearance change
        assert_eq!(form.preview(), &before);
        form.set_text_color("#ff0000");
        assert_eq!(form.preview().format(), FileFormat::Jpg);
    }

    #[test]
    fn non_catalog_font_is_ignored() {
        let mut form = IconForm::new();
        form.set_font_family("Comic Sans MS");
        assert_eq!(form.settings().font_family, "sans-serif");
        form.set_font_family("Lora");
        assert_eq!(form.settings().font_family, "Lora");
    }

    #[test]
    fn popovers_dismiss_independently() {
        let mut form = IconForm::new();
        form.text_color_picker.set_bounds(RectPx::new(0, 0, 100, 100));
        form.background_color_picker.set_bounds(RectPx::new(200, 0, 100, 100));
        form.text_color_picker.toggle();
        form.background_color_picker.toggle();

        // Inside the text picker, outside the background picker
        form.pointer_down(50, 50);
        assert!(form.text_color_picker.is_open());
        assert!(!form.background_color_picker.is_open());

        // Outside both
        form.pointer_down(500, 500);
        assert!(!form.text_color_picker.is_open());
    }

    #[test]
    fn popover_without_bounds_closes_on_any_pointer() {
        let mut popover = Popover::new();
        popover.toggle();
        popover.pointer_down(1, 1);
        assert!(!popover.is_open());
    }

    #[test]
    fn closed_popover_ignores_pointer_events() {
        let mut popover = Popover::new();
        popover.set_bounds(RectPx::new(0, 0, 10, 10));
        popover.pointer_down(100, 100);
        assert!(!popover.is_open());
        popover.toggle();
        assert!(popover.is_open());
    }

    #[test]
    fn rect_contains_edges() {
        let rect = RectPx::new(10, 10, 20, 20);
        assert!(rect.contains(10, 10));
        assert!(rect.contains(29, 29));
        assert!(!rect.contains(30, 30));
        assert!(!rect.contains(9, 15));
    }

    #[test]
    fn export_reuses_matching_preview_bytes() {
        let mut form = IconForm::new();
        form.set_text("A");
        let payload = form.export().unwrap();
        assert_eq!(payload.bytes, form.preview().bytes());
        assert_eq!(payload.download_name, "icon-A.png");
    }

    #[test]
    fn export_regenerates_for_svg() {
        let mut form = IconForm::new();
        form.set_text("A");
        form.set_file_format(FileFormat::Svg);
        let payload = form.export().unwrap();
        assert!(payload.bytes.starts_with(b"<svg"));
        assert_ne!(payload.bytes, form.preview().bytes());
    }

    #[test]
    fn configurable_roundtrip_enforces_invariants() {
        let snapshot = IconSettings::new()
            .with_text("<i>abcdef</i>")
            .with_text_color("#336699")
            .with_font_family("not-in-catalog")
            .with_file_format(FileFormat::Webp);

        let form = IconForm::with_settings(snapshot);
        let exported = form.export_settings();
        assert_eq!(exported.text, "ab");
        assert_eq!(exported.text_color, "#336699");
        assert_eq!(exported.font_family, "sans-serif");
        assert_eq!(exported.file_format, FileFormat::Webp);
    }

    #[test]
    fn end_to_end_red_monogram() {
        let mut form = IconForm::new();
        form.set_text("A");
        form.set_text_color("#ff0000");
        form.set_file_format(FileFormat::Png);
        form.set_canvas_size(CanvasSize::Px128);

        let decoded = image::load_from_memory(form.preview().bytes())
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.width(), 128);
        assert_eq!(decoded.height(), 128);
        let corner = decoded.get_pixel(0, 0);
        assert!(corner[0] > corner[1], "background should be red-derived");

        let payload = form.export().unwrap();
        assert_eq!(payload.download_name, "icon-A.png");
        assert_eq!(payload.bytes, form.preview().bytes());
    }
}
