// ============================================================================
// RENDER PASS — pixel buffer to displayable RGBA image
// ============================================================================

use image::RgbaImage;
use rayon::prelude::*;

use crate::canvas::{Color, PixelCanvas};

/// Default checkerboard pair for transparent cells.
pub const CHECKER_LIGHT: Color = Color::rgb(0xc8, 0xc8, 0xc8);
pub const CHECKER_DARK: Color = Color::rgb(0x96, 0x96, 0x96);

/// Canvases at or above this extent on either axis use 16-cell checker
/// blocks; below it, every cell is its own block.
const LARGE_CHECKER_THRESHOLD: u32 = 32;
const LARGE_CHECKER_BLOCK: u32 = 16;

/// Checker block edge length in cells for a given canvas extent.
pub fn checker_block_size(width: u32, height: u32) -> u32 {
    if width.max(height) < LARGE_CHECKER_THRESHOLD {
        1
    } else {
        LARGE_CHECKER_BLOCK
    }
}

/// Produce the display image: transparent cells become one of the two checker
/// colors by block parity, every other cell passes through unchanged. Single
/// pass over the buffer, rows filled in parallel — this runs after every
/// pixel mutation during a stroke.
pub fn render_canvas(canvas: &PixelCanvas, checker1: Color, checker2: Color) -> RgbaImage {
    let w = canvas.width();
    let h = canvas.height();
    let block = checker_block_size(w, h);
    let pixels = canvas.pixels();

    let mut raw = vec![0u8; (w * h * 4) as usize];
    raw.par_chunks_mut(w as usize * 4)
        .enumerate()
        .for_each(|(row, out_row)| {
            let row = row as u32;
            for col in 0..w {
                let px = pixels[(row * w + col) as usize];
                let shown = if px.is_transparent() {
                    if ((row / block) + (col / block)) % 2 == 0 {
                        checker1
                    } else {
                        checker2
                    }
                } else {
                    px
                };
                let o = col as usize * 4;
                out_row[o] = shown.r;
                out_row[o + 1] = shown.g;
                out_row[o + 2] = shown.b;
                out_row[o + 3] = shown.a;
            }
        });

    RgbaImage::from_raw(w, h, raw).expect("buffer sized to extent")
}

/// Flat conversion with alpha preserved — the export path, no checkerboard.
pub fn canvas_to_image(canvas: &PixelCanvas) -> RgbaImage {
    let w = canvas.width();
    let h = canvas.height();
    let pixels = canvas.pixels();
    let mut raw = vec![0u8; (w * h * 4) as usize];
    for (i, px) in pixels.iter().enumerate() {
        let o = i * 4;
        raw[o] = px.r;
        raw[o + 1] = px.g;
        raw[o + 2] = px.b;
        raw[o + 3] = px.a;
    }
    RgbaImage::from_raw(w, h, raw).expect("buffer sized to extent")
}

/// Inverse of [`canvas_to_image`] — used by the CLI's raster import.
pub fn image_to_canvas(image: &RgbaImage) -> Result<PixelCanvas, crate::canvas::CanvasError> {
    let (w, h) = image.dimensions();
    PixelCanvas::check_dims(w, h)?;
    let pixels = image
        .pixels()
        .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
        .collect();
    PixelCanvas::from_pixels(w, h, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_canvas_uses_single_cell_checker() {
        assert_eq!(checker_block_size(16, 16), 1);
        assert_eq!(checker_block_size(31, 8), 1);
        assert_eq!(checker_block_size(32, 8), 16);
        assert_eq!(checker_block_size(8, 100), 16);
    }

    #[test]
    fn transparent_cells_alternate_checker_colors() {
        let c = PixelCanvas::new(4, 4).unwrap();
        let img = render_canvas(&c, CHECKER_LIGHT, CHECKER_DARK);
        // (0,0) block parity 0 -> light; (0,1) -> dark.
        assert_eq!(img.get_pixel(0, 0)[0], CHECKER_LIGHT.r);
        assert_eq!(img.get_pixel(1, 0)[0], CHECKER_DARK.r);
        assert_eq!(img.get_pixel(1, 1)[0], CHECKER_LIGHT.r);
    }

    #[test]
    fn large_canvas_checker_blocks_are_sixteen_cells() {
        let c = PixelCanvas::new(64, 64).unwrap();
        let img = render_canvas(&c, CHECKER_LIGHT, CHECKER_DARK);
        // Whole first block shares a color; the next block over differs.
        assert_eq!(img.get_pixel(15, 15)[0], CHECKER_LIGHT.r);
        assert_eq!(img.get_pixel(16, 0)[0], CHECKER_DARK.r);
        assert_eq!(img.get_pixel(16, 16)[0], CHECKER_LIGHT.r);
    }

    #[test]
    fn painted_cells_pass_through() {
        let mut c = PixelCanvas::new(4, 4).unwrap();
        let red = Color::rgb(255, 0, 0);
        c.set_pixel(2, 1, red);
        let img = render_canvas(&c, CHECKER_LIGHT, CHECKER_DARK);
        let p = img.get_pixel(1, 2);
        assert_eq!((p[0], p[1], p[2], p[3]), (255, 0, 0, 255));
    }

    #[test]
    fn canvas_image_round_trip() {
        let mut c = PixelCanvas::new(3, 2).unwrap();
        c.set_pixel(0, 1, Color::rgba(10, 20, 30, 40));
        c.set_pixel(1, 2, Color::rgb(200, 100, 50));
        let img = canvas_to_image(&c);
        assert_eq!(image_to_canvas(&img).unwrap(), c);
    }
}
