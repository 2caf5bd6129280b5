// ============================================================================
// pixelpad CLI — headless batch processing via command-line arguments
// ============================================================================
//
// Usage examples:
//   pixelpad --input sprite.sprite --output sprite.png --scale 800
//   pixelpad -i icon.png -o icon.sprite                (format inferred from output ext)
//   pixelpad -i "sprites/*.sprite" --output-dir out/ --format png --scale 400
//   pixelpad -i photo.png -o thumb.jpeg --quality 85
//
// All processing runs synchronously on the current thread.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use uuid::Uuid;

use crate::canvas::PixelCanvas;
use crate::io::{self, ExportFormat, MAX_SCALE_PERCENT, MIN_SCALE_PERCENT};
use crate::render::image_to_canvas;
use crate::{log_err, log_info};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// pixelpad headless sprite processor.
///
/// Export sprite documents to flat images and convert rasters into sprite
/// documents — no GUI required.
#[derive(Parser, Debug)]
#[command(
    name = "pixelpad",
    about = "pixelpad headless sprite exporter",
    long_about = "Export .sprite documents to PNG/BMP/JPEG at any scale, or convert\n\
                  raster images into .sprite documents, without opening an editor.\n\n\
                  Example:\n  \
                  pixelpad --input sprite.sprite --output big.png --scale 800\n  \
                  pixelpad -i \"sprites/*.sprite\" --output-dir out/ --format png"
)]
pub struct CliArgs {
    /// Input file(s). Glob patterns accepted (e.g. "*.sprite", "icons/*.png").
    /// .sprite documents keep their palette; rasters load one pixel per cell.
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Output file path. Only valid for single-file input.
    /// For batch input use --output-dir instead.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing.
    /// Files are written here with the original stem and the target format's extension.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format: png, bmp, jpeg, sprite.
    /// When omitted, the format is inferred from --output's extension, defaulting to png.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Export scale percent (25–20000, nearest-neighbor).
    #[arg(short, long, default_value_t = 100, value_name = "25-20000")]
    pub scale: u32,

    /// JPEG quality (1–100, default 90).
    #[arg(short, long, default_value_t = 90, value_name = "1-100")]
    pub quality: u8,

    /// Print per-file timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output target format — the three raster encoders plus the document format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Raster(ExportFormat),
    Sprite,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Raster(f) => f.label(),
            OutputFormat::Sprite => "sprite",
        }
    }
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `0` = all files succeeded, `1` = one or more files failed.
pub fn run(args: CliArgs) -> ExitCode {
    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch processing.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    let format = match parse_format(args.format.as_deref(), args.output.as_deref()) {
        Ok(f) => f,
        Err(msg) => {
            eprintln!("error: {}", msg);
            return ExitCode::FAILURE;
        }
    };

    if !(MIN_SCALE_PERCENT..=MAX_SCALE_PERCENT).contains(&args.scale) {
        eprintln!(
            "warning: --scale {} outside {}..{}, clamping.",
            args.scale, MIN_SCALE_PERCENT, MAX_SCALE_PERCENT
        );
    }

    let mut failures = 0usize;
    for input in &inputs {
        let started = Instant::now();
        let target = match output_path_for(input, format, args.output.as_deref(), args.output_dir.as_deref()) {
            Ok(p) => p,
            Err(msg) => {
                eprintln!("{}: error: {}", input.display(), msg);
                failures += 1;
                continue;
            }
        };

        match process_one(input, &target, format, args.scale, args.quality) {
            Ok(()) => {
                log_info!("Processed {} -> {}", input.display(), target.display());
                if args.verbose {
                    println!(
                        "{} -> {} ({} ms)",
                        input.display(),
                        target.display(),
                        started.elapsed().as_millis()
                    );
                }
            }
            Err(msg) => {
                log_err!("Failed {}: {}", input.display(), msg);
                eprintln!("{}: error: {}", input.display(), msg);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        eprintln!("{} of {} file(s) failed.", failures, inputs.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into concrete files.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pattern in patterns {
        let mut matched = false;
        if let Ok(paths) = glob::glob(pattern) {
            for path in paths.flatten() {
                if path.is_file() {
                    files.push(path);
                    matched = true;
                }
            }
        }
        // A literal path with glob metacharacters in its name still works.
        if !matched {
            let p = PathBuf::from(pattern);
            if p.is_file() {
                files.push(p);
            }
        }
    }
    files
}

fn parse_format(format: Option<&str>, output: Option<&Path>) -> Result<OutputFormat, String> {
    if let Some(name) = format {
        return match name.to_ascii_lowercase().as_str() {
            "sprite" => Ok(OutputFormat::Sprite),
            other => ExportFormat::from_extension(other)
                .map(OutputFormat::Raster)
                .ok_or_else(|| format!("unknown format '{}' (png, bmp, jpeg, sprite)", other)),
        };
    }
    if let Some(path) = output
        && let Some(ext) = path.extension().and_then(|e| e.to_str())
    {
        if ext.eq_ignore_ascii_case("sprite") {
            return Ok(OutputFormat::Sprite);
        }
        if let Some(f) = ExportFormat::from_extension(ext) {
            return Ok(OutputFormat::Raster(f));
        }
    }
    Ok(OutputFormat::Raster(ExportFormat::Png))
}

fn output_path_for(
    input: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    output_dir: Option<&Path>,
) -> Result<PathBuf, String> {
    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir).map_err(|e| format!("cannot create {}: {}", dir.display(), e))?;
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_string());
        return Ok(dir.join(format!("{}.{}", stem, format.extension())));
    }
    if let Some(path) = output {
        return Ok(path.to_path_buf());
    }
    Ok(input.with_extension(format.extension()))
}

/// Load one input (document or raster), write it out in the target format.
fn process_one(
    input: &Path,
    target: &Path,
    format: OutputFormat,
    scale: u32,
    quality: u8,
) -> Result<(), String> {
    let (canvas, palette) = load_input(input)?;
    match format {
        OutputFormat::Raster(f) => {
            io::export_image(&canvas, scale, f, quality, target).map_err(|e| e.to_string())
        }
        OutputFormat::Sprite => {
            let doc = io::to_document(&canvas, &Uuid::new_v4().to_string(), palette.as_deref());
            io::save_document(&doc, target).map_err(|e| e.to_string())
        }
    }
}

type LoadedInput = (PixelCanvas, Option<Vec<crate::canvas::Color>>);

fn load_input(input: &Path) -> Result<LoadedInput, String> {
    let is_sprite = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("sprite"));

    if is_sprite {
        let doc = io::load_document(input).map_err(|e| e.to_string())?;
        let canvas = io::from_document(&doc).map_err(|e| e.to_string())?;
        let palette = doc
            .color_palette
            .as_deref()
            .map(crate::components::palette::Palette::from_packed);
        Ok((canvas, palette))
    } else {
        let image = image::open(input)
            .map_err(|e| format!("cannot decode image: {}", e))?
            .into_rgba8();
        let canvas = image_to_canvas(&image).map_err(|e| e.to_string())?;
        Ok((canvas, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_inferred_from_output_extension() {
        assert_eq!(
            parse_format(None, Some(Path::new("out.bmp"))).unwrap(),
            OutputFormat::Raster(ExportFormat::Bmp)
        );
        assert_eq!(
            parse_format(None, Some(Path::new("out.sprite"))).unwrap(),
            OutputFormat::Sprite
        );
        assert_eq!(
            parse_format(None, None).unwrap(),
            OutputFormat::Raster(ExportFormat::Png)
        );
    }

    #[test]
    fn explicit_format_beats_extension() {
        assert_eq!(
            parse_format(Some("jpeg"), Some(Path::new("out.png"))).unwrap(),
            OutputFormat::Raster(ExportFormat::Jpeg)
        );
        assert!(parse_format(Some("webp"), None).is_err());
    }

    #[test]
    fn output_path_uses_stem_in_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let p = output_path_for(
            Path::new("art/hero.sprite"),
            OutputFormat::Raster(ExportFormat::Png),
            None,
            Some(dir.path()),
        )
        .unwrap();
        assert_eq!(p, dir.path().join("hero.png"));
    }

    #[test]
    fn output_path_defaults_to_sibling() {
        let p = output_path_for(
            Path::new("hero.sprite"),
            OutputFormat::Raster(ExportFormat::Png),
            None,
            None,
        )
        .unwrap();
        assert_eq!(p, PathBuf::from("hero.png"));
    }
}
