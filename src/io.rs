// ============================================================================
// DOCUMENT I/O AND EXPORT — .sprite container, raster export
// ============================================================================

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{imageops, DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::canvas::{Color, PixelCanvas, MAX_CANVAS_DIM};
use crate::render::canvas_to_image;

/// Magic string identifying the v1 .sprite container.
const SPRITE_MAGIC_V1: &str = "SPR1";

/// Valid export scale range in percent.
pub const MIN_SCALE_PERCENT: u32 = 25;
pub const MAX_SCALE_PERCENT: u32 = 20_000;

// ============================================================================
// DOCUMENT MODEL
// ============================================================================

/// The persisted form of a canvas: flat ARGB ints plus an optional palette.
/// This is the value handed across the I/O boundary — background save/export
/// operates on it, never on the live canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteDocument {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<i32>,
    pub color_palette: Option<Vec<i32>>,
}

/// On-disk container. bincode writes the magic string first (8-byte length
/// prefix + 4 bytes), so a loader can identify the format from bytes 8..12
/// before committing to a full deserialize.
#[derive(Serialize, Deserialize)]
struct SpriteFileV1 {
    magic: String,
    document: SpriteDocument,
}

/// Error type for document and export operations.
#[derive(Debug)]
pub enum DocumentError {
    Io(std::io::Error),
    Serialize(String),
    /// Persisted data contradicts itself (magic, dimensions, pixel count).
    Corrupt(String),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::Io(e) => write!(f, "I/O error: {}", e),
            DocumentError::Serialize(e) => write!(f, "Serialization error: {}", e),
            DocumentError::Corrupt(e) => write!(f, "Corrupt document: {}", e),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<std::io::Error> for DocumentError {
    fn from(e: std::io::Error) -> Self {
        DocumentError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for DocumentError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        DocumentError::Serialize(e.to_string())
    }
}

impl From<image::ImageError> for DocumentError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => DocumentError::Io(io),
            other => DocumentError::Serialize(other.to_string()),
        }
    }
}

// ============================================================================
// CANVAS <-> DOCUMENT
// ============================================================================

/// Flatten the live canvas into a document value.
pub fn to_document(canvas: &PixelCanvas, id: &str, palette: Option<&[Color]>) -> SpriteDocument {
    SpriteDocument {
        id: id.to_string(),
        width: canvas.width(),
        height: canvas.height(),
        pixels: canvas.pixels().iter().map(|c| c.to_argb()).collect(),
        color_palette: palette.map(|p| p.iter().map(|c| c.to_argb()).collect()),
    }
}

/// Reconstruct a canvas from a document. Any mismatch between the declared
/// extent and the stored pixel count is rejected before a canvas exists, so
/// a failed load can never disturb live state.
pub fn from_document(doc: &SpriteDocument) -> Result<PixelCanvas, DocumentError> {
    validate_document(doc)?;
    let pixels = doc.pixels.iter().map(|v| Color::from_argb(*v)).collect();
    PixelCanvas::from_pixels(doc.width, doc.height, pixels)
        .map_err(|e| DocumentError::Corrupt(e.to_string()))
}

fn validate_document(doc: &SpriteDocument) -> Result<(), DocumentError> {
    if doc.width == 0 || doc.height == 0 || doc.width > MAX_CANVAS_DIM || doc.height > MAX_CANVAS_DIM {
        return Err(DocumentError::Corrupt(format!(
            "declared dimensions {}x{} out of range",
            doc.width, doc.height
        )));
    }
    let expected = (doc.width * doc.height) as usize;
    if doc.pixels.len() != expected {
        return Err(DocumentError::Corrupt(format!(
            "pixel count {} does not match {}x{}",
            doc.pixels.len(),
            doc.width,
            doc.height
        )));
    }
    Ok(())
}

// ============================================================================
// SAVE / LOAD
// ============================================================================

/// Serialize a document to `path`. The write is atomic: the container goes
/// to a temp file in the same directory first and is renamed into place, so
/// a failure mid-write leaves any existing file untouched.
pub fn save_document(doc: &SpriteDocument, path: &Path) -> Result<(), DocumentError> {
    let file = SpriteFileV1 {
        magic: SPRITE_MAGIC_V1.to_string(),
        document: doc.clone(),
    };
    write_atomic(path, |writer| {
        bincode::serialize_into(writer, &file).map_err(DocumentError::from)
    })
}

/// Load a document from `path`, verifying magic, dimensions and pixel count.
pub fn load_document(path: &Path) -> Result<SpriteDocument, DocumentError> {
    let raw = fs::read(path)?;
    if raw.len() < 12 {
        return Err(DocumentError::Corrupt("file too small".into()));
    }

    // bincode encodes a String as an 8-byte length prefix + UTF-8 data, so
    // the 4-char magic sits at bytes 8..12.
    let magic = std::str::from_utf8(&raw[8..12]).unwrap_or("");
    if magic != SPRITE_MAGIC_V1 {
        return Err(DocumentError::Corrupt(format!("unknown magic '{}'", magic)));
    }

    let file: SpriteFileV1 = bincode::deserialize(&raw)?;
    validate_document(&file.document)?;
    Ok(file.document)
}

// ============================================================================
// EXPORT
// ============================================================================

/// Supported flat export formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Bmp,
    Jpeg,
}

impl ExportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Bmp => "bmp",
            ExportFormat::Jpeg => "jpeg",
        }
    }

    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Png, ExportFormat::Bmp, ExportFormat::Jpeg]
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "bmp" => Some(ExportFormat::Bmp),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            _ => None,
        }
    }
}

/// Nearest-neighbor-scale the canvas into a flat image. `scale_percent` is
/// clamped into 25..=20000; 100 returns the canvas at its own size. Nearest
/// filtering is what keeps pixel-art edges hard — no smoothing.
pub fn export_raster(canvas: &PixelCanvas, scale_percent: u32) -> RgbaImage {
    let scale = scale_percent.clamp(MIN_SCALE_PERCENT, MAX_SCALE_PERCENT);
    let flat = canvas_to_image(canvas);
    if scale == 100 {
        return flat;
    }
    let out_w = ((canvas.width() as f64 * scale as f64 / 100.0).round() as u32).max(1);
    let out_h = ((canvas.height() as f64 * scale as f64 / 100.0).round() as u32).max(1);
    imageops::resize(&flat, out_w, out_h, imageops::FilterType::Nearest)
}

/// Scale and write the canvas to `path` in the given format. Atomic like
/// [`save_document`]; JPEG flattens alpha away since the format has none.
pub fn export_image(
    canvas: &PixelCanvas,
    scale_percent: u32,
    format: ExportFormat,
    quality: u8,
    path: &Path,
) -> Result<(), DocumentError> {
    let image = export_raster(canvas, scale_percent);
    write_atomic(path, |writer| {
        encode_image(&image, format, quality, writer).map_err(DocumentError::from)
    })
}

fn encode_image(
    image: &RgbaImage,
    format: ExportFormat,
    quality: u8,
    writer: &mut BufWriter<File>,
) -> Result<(), image::ImageError> {
    match format {
        ExportFormat::Png => {
            let encoder = PngEncoder::new(writer);
            #[allow(deprecated)]
            encoder.encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgba8,
            )?;
        }
        ExportFormat::Bmp => {
            let mut encoder = BmpEncoder::new(writer);
            encoder.encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgba8,
            )?;
        }
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(writer, quality);
            encoder.encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ColorType::Rgb8,
            )?;
        }
    }
    Ok(())
}

// ============================================================================
// ATOMIC WRITES
// ============================================================================

/// Run `encode` against a temp file next to `target`, fsync, then rename into
/// place. On any failure the temp file is removed and `target` is untouched.
fn write_atomic(
    target: &Path,
    encode: impl FnOnce(&mut BufWriter<File>) -> Result<(), DocumentError>,
) -> Result<(), DocumentError> {
    let tmp = temp_path(target);
    let result = (|| {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)?;
        let mut writer = BufWriter::new(file);
        encode(&mut writer)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp, target) {
        let _ = fs::remove_file(&tmp);
        return Err(DocumentError::Io(e));
    }
    Ok(())
}

/// First non-existing `<target>.tmp` / `<target>.tmpN` sibling.
fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("tmp{}", counter));
    }
    candidate
}
