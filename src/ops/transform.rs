// ============================================================================
// TRANSFORM OPERATIONS — resize, flip, rotate, translate for the pixel grid
// ============================================================================

use crate::canvas::{CanvasError, Color, PixelCanvas};

/// Build a canvas of the new extent, copying every cell present in both the
/// old and new extents at the same (row, col). New cells start transparent;
/// cells outside the new extent are dropped.
pub fn resize(canvas: &PixelCanvas, new_width: u32, new_height: u32) -> Result<PixelCanvas, CanvasError> {
    let mut out = PixelCanvas::new(new_width, new_height)?;
    let copy_w = canvas.width().min(new_width);
    let copy_h = canvas.height().min(new_height);
    for row in 0..copy_h {
        for col in 0..copy_w {
            let px = canvas.get_pixel(row, col)?;
            out.set_pixel(row as i32, col as i32, px);
        }
    }
    Ok(out)
}

/// Rotate 90° clockwise. The result has swapped dimensions;
/// `dest(r, c) = src(h - 1 - c, r)`.
pub fn rotate90(canvas: &PixelCanvas) -> PixelCanvas {
    let w = canvas.width();
    let h = canvas.height();
    let src = canvas.pixels();
    let mut out = Vec::with_capacity(src.len());
    // New extent is h wide, w tall.
    for r in 0..w {
        for c in 0..h {
            out.push(src[((h - 1 - c) * w + r) as usize]);
        }
    }
    // Dimensions were validated when `canvas` was built; swapping keeps them valid.
    PixelCanvas::from_pixels(h, w, out).expect("rotated buffer length matches swapped extent")
}

/// Mirror along the vertical axis (left/right swap), in place.
pub fn flip_horizontal(canvas: &mut PixelCanvas) {
    let w = canvas.width();
    let h = canvas.height();
    for row in 0..h {
        for col in 0..w / 2 {
            let left = canvas.get_pixel(row, col).expect("in range");
            let right = canvas.get_pixel(row, w - 1 - col).expect("in range");
            canvas.set_pixel(row as i32, col as i32, right);
            canvas.set_pixel(row as i32, (w - 1 - col) as i32, left);
        }
    }
}

/// Mirror along the horizontal axis (top/bottom swap), in place.
pub fn flip_vertical(canvas: &mut PixelCanvas) {
    let w = canvas.width();
    let h = canvas.height();
    for row in 0..h / 2 {
        for col in 0..w {
            let top = canvas.get_pixel(row, col).expect("in range");
            let bottom = canvas.get_pixel(h - 1 - row, col).expect("in range");
            canvas.set_pixel(row as i32, col as i32, bottom);
            canvas.set_pixel((h - 1 - row) as i32, col as i32, top);
        }
    }
}

/// Bounding box of the non-transparent content as `(row0, col0, row1, col1)`,
/// inclusive. `None` for an empty canvas.
pub fn content_bounds(canvas: &PixelCanvas) -> Option<(u32, u32, u32, u32)> {
    let w = canvas.width();
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (i, px) in canvas.pixels().iter().enumerate() {
        if px.is_transparent() {
            continue;
        }
        let row = i as u32 / w;
        let col = i as u32 % w;
        bounds = Some(match bounds {
            None => (row, col, row, col),
            Some((r0, c0, r1, c1)) => (r0.min(row), c0.min(col), r1.max(row), c1.max(col)),
        });
    }
    bounds
}

/// Translate the whole buffer content by `(drow, dcol)`.
///
/// Edge policy: clamp. The delta is reduced so the bounding box of the
/// non-transparent content stays inside the canvas — moving content "past"
/// an edge parks it flush against that edge instead of destroying it.
/// Vacated cells become transparent. Returns the delta actually applied.
pub fn translate(canvas: &mut PixelCanvas, drow: i32, dcol: i32) -> (i32, i32) {
    let Some((r0, c0, r1, c1)) = content_bounds(canvas) else {
        return (0, 0);
    };
    let h = canvas.height();
    let w = canvas.width();
    let drow = drow.clamp(-(r0 as i32), (h - 1 - r1) as i32);
    let dcol = dcol.clamp(-(c0 as i32), (w - 1 - c1) as i32);
    if drow == 0 && dcol == 0 {
        return (0, 0);
    }

    let src = canvas.pixels().to_vec();
    canvas.fill(Color::TRANSPARENT);
    for row in 0..h as i32 {
        for col in 0..w as i32 {
            let px = src[(row as u32 * w + col as u32) as usize];
            if !px.is_transparent() {
                canvas.set_pixel(row + drow, col + dcol, px);
            }
        }
    }
    (drow, dcol)
}
