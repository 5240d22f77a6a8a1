//! Icon rendering: raster bitmaps and vector markup.
//!
//! Both paths compose the same visual: a filled square canvas with the icon
//! text centered in bold. The raster path rasterizes a transparent text
//! layer with resvg and composites it over the background fill; the vector
//! path templates the composition as SVG markup.
//!
//! The two paths intentionally disagree on font size: raster text is
//! proportional (`canvas / 2`) while vector markup uses a fixed
//! [`VECTOR_FONT_SIZE`]. The WebP export reuses the fixed size as well.
//! Both quirks are preserved from the tool this crate reimplements.

use std::io::Cursor;
use std::sync::{Arc, LazyLock};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};

use crate::color;
use crate::sanitize::xml_escape;
use crate::settings::{FileFormat, IconSettings};

/// Font size used by the vector markup (and the WebP special case),
/// regardless of canvas size.
pub const VECTOR_FONT_SIZE: f32 = 100.0;

/// System fonts, loaded once and shared by every rasterization.
static FONTDB: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

// ============================================================================
// Background
// ============================================================================

/// Resolves the effective background fill for raster rendering.
///
/// Auto mode derives the shade from the text color; manual mode parses the
/// explicit background color. Malformed input falls back to opaque black,
/// the drawing surface's default fill.
fn background_fill(settings: &IconSettings) -> color::Rgb {
    let resolved = if settings.auto_background {
        color::auto_background_rgb(&settings.text_color)
    } else {
        color::hex_to_rgb(&settings.background_color)
    };
    resolved.unwrap_or(color::Rgb::new(0, 0, 0))
}

// ============================================================================
// Raster Path
// ============================================================================

/// Renders the icon as an RGBA bitmap at the selected canvas size.
///
/// `font_size` is `canvas / 2` for the preview and the PNG/JPEG exports,
/// and [`VECTOR_FONT_SIZE`] for the WebP export. Rendering never fails:
/// anything the text layer cannot produce (missing font, malformed color,
/// unparsable markup) degrades to the background fill alone.
pub fn render_bitmap(settings: &IconSettings, font_size: f32) -> RgbaImage {
    let size = settings.canvas_size.px();
    let bg = background_fill(settings);
    let mut canvas = RgbaImage::from_pixel(size, size, Rgba([bg.r, bg.g, bg.b, 255]));

    if let Some(text_layer) = rasterize(&text_markup(settings, font_size), size) {
        composite_over(&mut canvas, &text_layer, 0, 0);
    }

    canvas
}

/// Builds the transparent-background text layer for rasterization.
///
/// Coordinates are absolute so the layer composites 1:1 onto the fill.
fn text_markup(settings: &IconSettings, font_size: f32) -> String {
    let size = settings.canvas_size.px();
    let center = size as f32 / 2.0;
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}">"#,
            r#"<text x="{cx}" y="{cy}" dominant-baseline="middle" text-anchor="middle" "#,
            r#"fill="{fill}" font-size="{fs}px" font-weight="bold" font-family="{family}">{text}</text>"#,
            "</svg>",
        ),
        size = size,
        cx = center,
        cy = center,
        fill = xml_escape(&settings.text_color),
        fs = font_size,
        family = xml_escape(&settings.font_family),
        text = xml_escape(&settings.text),
    )
}

/// Rasterizes SVG markup to an RGBA image at exactly `size x size`.
///
/// Returns `None` if the markup cannot be parsed or the pixmap cannot be
/// allocated.
fn rasterize(markup: &str, size: u32) -> Option<RgbaImage> {
    let mut options = Options::default();
    options.fontdb = FONTDB.clone();

    let tree = Tree::from_str(markup, &options).ok()?;
    let mut pixmap = Pixmap::new(size, size)?;

    let svg_size = tree.size();
    let scale_x = size as f32 / svg_size.width();
    let scale_y = size as f32 / svg_size.height();
    let transform = Transform::from_scale(scale_x, scale_y);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Some(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();
    let mut img = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            if let Some(pixel) = pixmap.pixel(x, y) {
                // tiny_skia stores premultiplied alpha
                let (r, g, b, a) =
                    unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
                img.put_pixel(x, y, Rgba([r, g, b, a]));
            }
        }
    }

    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

/// Composites a source image onto a destination image at the specified
/// position, with source-over alpha blending.
fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for sy in 0..src.height() {
        for sx in 0..src.width() {
            let dx = x + sx as i32;
            let dy = y + sy as i32;

            if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
                continue;
            }

            let src_pixel = src.get_pixel(sx, sy);
            let dst_pixel = dest.get_pixel(dx as u32, dy as u32);
            let blended = alpha_blend(*src_pixel, *dst_pixel);
            dest.put_pixel(dx as u32, dy as u32, blended);
        }
    }
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// Vector Path
// ============================================================================

/// Builds the downloadable vector markup for the current settings.
///
/// Width and height equal the selected canvas size; the text sits at the
/// 50%/50% anchor with middle alignment at the fixed [`VECTOR_FONT_SIZE`].
/// In auto-background mode the rect is filled with the raw text color, not
/// the derived shade — the vector export intentionally mirrors the original
/// tool here and may diverge from the preview.
pub fn vector_markup(settings: &IconSettings) -> String {
    let size = settings.canvas_size.px();
    let background = if settings.auto_background {
        &settings.text_color
    } else {
        &settings.background_color
    };
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}">"#,
            r#"<rect width="100%" height="100%" fill="{bg}"/>"#,
            r#"<text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" "#,
            r#"fill="{fill}" font-size="{fs}px" font-weight="bold" font-family="{family}">{text}</text>"#,
            "</svg>",
        ),
        size = size,
        bg = xml_escape(background),
        fill = xml_escape(&settings.text_color),
        fs = VECTOR_FONT_SIZE,
        family = xml_escape(&settings.font_family),
        text = xml_escape(&settings.text),
    )
}

// ============================================================================
// Preview
// ============================================================================

/// A rendered preview: encoded image bytes tagged with their format.
///
/// Recomputed wholesale whenever an appearance-affecting setting changes;
/// never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPreview {
    format: FileFormat,
    bytes: Vec<u8>,
}

impl RenderedPreview {
    /// The format the bytes are encoded in.
    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// The encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The MIME type matching [`format`](Self::format).
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Renders the preview for the current settings.
///
/// The bitmap uses the proportional `canvas / 2` font size and is encoded
/// in the container matching the selected format; the SVG selection falls
/// back to a PNG-encoded preview, as the original canvas surface did.
pub fn render_preview(settings: &IconSettings) -> RenderedPreview {
    let size = settings.canvas_size.px();
    let bitmap = render_bitmap(settings, size as f32 / 2.0);

    let format = match settings.file_format {
        FileFormat::Svg => FileFormat::Png,
        raster => raster,
    };

    RenderedPreview {
        format,
        bytes: encode_raster(bitmap, format).unwrap_or_default(),
    }
}

/// Encodes an RGBA bitmap into the requested raster container.
///
/// JPEG has no alpha channel, so that path converts to RGB first.
pub(crate) fn encode_raster(
    bitmap: RgbaImage,
    format: FileFormat,
) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    let mut cursor = Cursor::new(&mut bytes);
    match format {
        FileFormat::Png => {
            DynamicImage::ImageRgba8(bitmap).write_to(&mut cursor, ImageFormat::Png)?
        }
        FileFormat::Jpg => DynamicImage::ImageRgba8(bitmap)
            .to_rgb8()
            .write_to(&mut cursor, ImageFormat::Jpeg)?,
        FileFormat::Webp => {
            DynamicImage::ImageRgba8(bitmap).write_to(&mut cursor, ImageFormat::WebP)?
        }
        FileFormat::Svg => {
            DynamicImage::ImageRgba8(bitmap).write_to(&mut cursor, ImageFormat::Png)?
        }
    }
    Ok(bytes)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CanvasSize;

    fn red_auto_settings() -> IconSettings {
        IconSettings::new()
            .with_text("A")
            .with_text_color("#ff0000")
            .with_canvas_size(CanvasSize::Px128)
    }

    #[test]
    fn bitmap_has_canvas_dimensions() {
        for size in CanvasSize::ALL {
            let settings = IconSettings::new().with_canvas_size(size);
            let bitmap = render_bitmap(&settings, size.px() as f32 / 2.0);
            assert_eq!(bitmap.width(), size.px());
            assert_eq!(bitmap.height(), size.px());
        }
    }

    #[test]
    fn manual_background_fills_the_canvas() {
        let settings = IconSettings::new()
            .with_auto_background(false)
            .with_background_color("#00ff00")
            .with_canvas_size(CanvasSize::Px64);
        let bitmap = render_bitmap(&settings, 32.0);

        assert_eq!(bitmap.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(bitmap.get_pixel(63, 63).0, [0, 255, 0, 255]);
    }

    #[test]
    fn auto_background_is_derived_from_text_color() {
        let bitmap = render_bitmap(&red_auto_settings(), 64.0);

        // Corner pixel is the red-derived dark desaturated shade,
        // hsl(0, 50%, 30%)
        let corner = bitmap.get_pixel(0, 0);
        assert!(corner[0] > corner[1], "red channel should dominate");
        assert_eq!(corner[1], corner[2]);
        assert!((110..=120).contains(&corner[0]), "r = {}", corner[0]);
        assert_eq!(corner[3], 255);
    }

    #[test]
    fn malformed_colors_fall_back_to_black() {
        let settings = IconSettings::new()
            .with_auto_background(false)
            .with_background_color("no-such-color")
            .with_canvas_size(CanvasSize::Px64);
        let bitmap = render_bitmap(&settings, 32.0);
        assert_eq!(bitmap.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn vector_markup_carries_canvas_size_and_text() {
        let markup = vector_markup(&red_auto_settings());
        assert!(markup.contains(r#"width="128""#));
        assert!(markup.contains(r#"height="128""#));
        assert!(markup.contains(">A</text>"));
        assert!(markup.contains(r#"text-anchor="middle""#));
        assert!(markup.contains(r#"dominant-baseline="middle""#));
    }

    #[test]
    fn vector_markup_font_size_is_fixed() {
        for size in [CanvasSize::Px64, CanvasSize::Px512] {
            let settings = red_auto_settings().with_canvas_size(size);
            let markup = vector_markup(&settings);
            assert!(markup.contains(r#"font-size="100px""#));
        }
    }

    #[test]
    fn vector_markup_background_follows_original_quirk() {
        // Auto mode: raw text color, not the derived shade
        let auto = vector_markup(&red_auto_settings());
        assert!(auto.contains(r##"fill="#ff0000"/>"##));

        let manual = vector_markup(
            &red_auto_settings()
                .with_auto_background(false)
                .with_background_color("#123456"),
        );
        assert!(manual.contains(r##"fill="#123456"/>"##));
    }

    #[test]
    fn vector_markup_escapes_text() {
        let settings = IconSettings::new().with_text("a&");
        let markup = vector_markup(&settings);
        assert!(markup.contains(">a&amp;</text>"));
    }

    #[test]
    fn preview_matches_selected_raster_format() {
        let settings = red_auto_settings().with_file_format(FileFormat::Webp);
        let preview = render_preview(&settings);
        assert_eq!(preview.format(), FileFormat::Webp);
        assert_eq!(&preview.bytes()[..4], b"RIFF");
        assert_eq!(&preview.bytes()[8..12], b"WEBP");
    }

    #[test]
    fn svg_preview_falls_back_to_png() {
        let settings = red_auto_settings().with_file_format(FileFormat::Svg);
        let preview = render_preview(&settings);
        assert_eq!(preview.format(), FileFormat::Png);
        assert_eq!(&preview.bytes()[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(preview.content_type(), "image/png");
    }

    #[test]
    fn preview_is_decodable_at_canvas_size() {
        let preview = render_preview(&red_auto_settings());
        let decoded = image::load_from_memory(preview.bytes()).unwrap();
        assert_eq!(decoded.width(), 128);
        assert_eq!(decoded.height(), 128);
    }

    #[test]
    fn jpeg_encoding_drops_alpha() {
        let bitmap = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 128]));
        let bytes = encode_raster(bitmap, FileFormat::Jpg).unwrap();
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    }
}
