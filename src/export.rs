//! Export encoding: turning rendered output into a downloadable payload.
//!
//! PNG and JPEG reuse the proportional-font bitmap; SVG regenerates the
//! vector markup independently of the preview and scrubs it as a whole;
//! WebP rasterizes at the fixed vector font size before encoding.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::render::{self, VECTOR_FONT_SIZE};
use crate::sanitize::sanitize_svg;
use crate::settings::{FileFormat, IconSettings};

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by the export path.
///
/// Rendering itself degrades silently; only byte-level encoding and file
/// I/O produce errors worth reporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The raster container encoder rejected the bitmap.
    #[error("failed to encode {format} image")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },

    /// Writing the payload to disk failed.
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// ExportPayload
// ============================================================================

/// The final downloadable artifact.
///
/// Carries both filename policies applied by the original tool: the host
/// download attribute uses the raw sanitized text (`download_name`), while
/// the payload identity URL-escapes it (`encoded_name`).
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    /// Encoded image bytes or markup text.
    pub bytes: Vec<u8>,

    /// `icon-<text>.<ext>` with the raw sanitized text.
    pub download_name: String,

    /// `icon-<urlencoded text>.<ext>`.
    pub encoded_name: String,

    /// MIME type matching the selected format.
    pub content_type: &'static str,
}

impl ExportPayload {
    fn new(bytes: Vec<u8>, text: &str, format: FileFormat) -> Self {
        let ext = format.extension();
        Self {
            bytes,
            download_name: format!("icon-{}.{}", text, ext),
            encoded_name: format!("icon-{}.{}", urlencoding::encode(text), ext),
            content_type: format.content_type(),
        }
    }

    /// Writes the payload into `dir` under its download name and returns
    /// the written path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.download_name);
        fs::write(&path, &self.bytes).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

// ============================================================================
// Export
// ============================================================================

/// Produces the downloadable payload for the current settings.
///
/// Regenerates everything from the settings snapshot; see
/// [`IconForm::export`](crate::IconForm::export) for the variant that
/// reuses the cached preview bytes on the raster paths.
pub fn export(settings: &IconSettings) -> Result<ExportPayload, ExportError> {
    let bytes = match settings.file_format {
        FileFormat::Svg => sanitize_svg(&render::vector_markup(settings)).into_bytes(),
        FileFormat::Webp => {
            // The webp-as-svg-path quirk: fixed font size, not canvas / 2
            let bitmap = render::render_bitmap(settings, VECTOR_FONT_SIZE);
            encode(bitmap, FileFormat::Webp)?
        }
        raster => {
            let size = settings.canvas_size.px();
            let bitmap = render::render_bitmap(settings, size as f32 / 2.0);
            encode(bitmap, raster)?
        }
    };

    Ok(ExportPayload::new(bytes, &settings.text, settings.file_format))
}

/// Builds a payload around already-encoded raster bytes (the cached
/// preview), skipping re-rendering.
pub(crate) fn payload_from_encoded(
    bytes: Vec<u8>,
    settings: &IconSettings,
) -> ExportPayload {
    ExportPayload::new(bytes, &settings.text, settings.file_format)
}

fn encode(bitmap: image::RgbaImage, format: FileFormat) -> Result<Vec<u8>, ExportError> {
    render::encode_raster(bitmap, format).map_err(|source| ExportError::Encode {
        format: format.extension(),
        source,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CanvasSize;

    fn settings(format: FileFormat) -> IconSettings {
        IconSettings::new()
            .with_text("A")
            .with_text_color("#ff0000")
            .with_canvas_size(CanvasSize::Px128)
            .with_file_format(format)
    }

    #[test]
    fn png_export_names_and_magic() {
        let payload = export(&settings(FileFormat::Png)).unwrap();
        assert_eq!(payload.download_name, "icon-A.png");
        assert_eq!(payload.encoded_name, "icon-A.png");
        assert_eq!(payload.content_type, "image/png");
        assert_eq!(&payload.bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn png_export_decodes_at_canvas_size_with_derived_background() {
        let payload = export(&settings(FileFormat::Png)).unwrap();
        let decoded = image::load_from_memory(&payload.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.width(), 128);
        assert_eq!(decoded.height(), 128);

        // Red-derived dark desaturated background in the corner
        let corner = decoded.get_pixel(0, 0);
        assert!(corner[0] > corner[1]);
        assert_eq!(corner[1], corner[2]);
    }

    #[test]
    fn jpeg_export_magic() {
        let payload = export(&settings(FileFormat::Jpg)).unwrap();
        assert_eq!(payload.download_name, "icon-A.jpg");
        assert_eq!(&payload.bytes[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn webp_export_magic() {
        let payload = export(&settings(FileFormat::Webp)).unwrap();
        assert_eq!(&payload.bytes[..4], b"RIFF");
        assert_eq!(&payload.bytes[8..12], b"WEBP");
        assert_eq!(payload.content_type, "image/webp");
    }

    #[test]
    fn svg_export_contains_markup() {
        let payload = export(&settings(FileFormat::Svg)).unwrap();
        let markup = String::from_utf8(payload.bytes).unwrap();
        assert!(markup.starts_with("<svg"));
        assert!(markup.contains(r#"width="128""#));
        assert!(markup.contains(r#"height="128""#));
        assert!(markup.contains(">A</text>"));
        assert_eq!(payload.content_type, "image/svg+xml");
    }

    #[test]
    fn svg_export_is_scrubbed_as_a_whole() {
        // Text injected directly into settings, bypassing the form's
        // sanitizing setter
        let mut s = settings(FileFormat::Svg);
        s.text = "<script>bad()</script>".to_string();
        let payload = export(&s).unwrap();
        let markup = String::from_utf8(payload.bytes).unwrap();
        assert!(!markup.contains("<script>"));
    }

    #[test]
    fn filenames_apply_both_escaping_policies() {
        let mut s = settings(FileFormat::Png);
        s.text = "é".to_string();
        let payload = export(&s).unwrap();
        assert_eq!(payload.download_name, "icon-é.png");
        assert_eq!(payload.encoded_name, "icon-%C3%A9.png");
    }

    #[test]
    fn empty_text_still_exports() {
        let mut s = settings(FileFormat::Png);
        s.text.clear();
        let payload = export(&s).unwrap();
        assert_eq!(payload.download_name, "icon-.png");
        assert!(!payload.bytes.is_empty());
    }

    #[test]
    fn write_to_dir_uses_download_name() {
        let payload = export(&settings(FileFormat::Png)).unwrap();
        let dir = std::env::temp_dir();
        let path = payload.write_to_dir(&dir).unwrap();
        assert!(path.ends_with("icon-A.png"));
        assert_eq!(fs::read(&path).unwrap(), payload.bytes);
        let _ = fs::remove_file(path);
    }
}
