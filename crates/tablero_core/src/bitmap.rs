//! Pure bitmap editing for document previews: crop-rectangle geometry in
//! display space mapped back to source pixels, plus quarter-turn rotation.
//! No canvas and no IO; everything here is testable with plain buffers.

const BYTES_PER_PIXEL: usize = 4;

/// Minimum drag size (display px) below which a selection means "whole image".
const MIN_DRAG_SIZE: f64 = 5.0;
/// Minimum usable intersection (display px) before falling back to the
/// whole drawn area.
const MIN_INTERSECTION: f64 = 2.0;

/// An RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    /// A transparent buffer of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let at = self.offset(x, y);
        [
            self.pixels[at],
            self.pixels[at + 1],
            self.pixels[at + 2],
            self.pixels[at + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let at = self.offset(x, y);
        self.pixels[at..at + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }

    /// Copy out the given region, clamped to the image bounds.
    pub fn crop(&self, rect: PixelRect) -> RgbaImage {
        let x0 = rect.x.min(self.width.saturating_sub(1));
        let y0 = rect.y.min(self.height.saturating_sub(1));
        let w = rect.w.max(1).min(self.width - x0);
        let h = rect.h.max(1).min(self.height - y0);
        let mut out = RgbaImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                out.set_pixel(x, y, self.pixel(x0 + x, y0 + y));
            }
        }
        out
    }

    /// Quarter turn; width and height swap.
    pub fn rotate90(&self, rotation: Rotation) -> RgbaImage {
        let mut out = RgbaImage::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                let (nx, ny) = match rotation {
                    Rotation::Right => (self.height - 1 - y, x),
                    Rotation::Left => (y, self.width - 1 - x),
                };
                out.set_pixel(nx, ny, self.pixel(x, y));
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Left,
    Right,
}

/// A rectangle in display (canvas) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// A rectangle in source-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// How a source image is letterboxed into the display area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub draw_w: f64,
    pub draw_h: f64,
}

/// Scale-to-fit placement of a `source_w x source_h` image centered in a
/// `canvas_w x canvas_h` display area.
pub fn fit_draw_state(source_w: u32, source_h: u32, canvas_w: f64, canvas_h: f64) -> DrawState {
    let scale = (canvas_w / source_w as f64).min(canvas_h / source_h as f64);
    let draw_w = source_w as f64 * scale;
    let draw_h = source_h as f64 * scale;
    DrawState {
        scale,
        offset_x: (canvas_w - draw_w) / 2.0,
        offset_y: (canvas_h - draw_h) / 2.0,
        draw_w,
        draw_h,
    }
}

/// Normalize a drag gesture into a rectangle regardless of direction.
pub fn drag_rect(start: (f64, f64), point: (f64, f64)) -> Rect {
    Rect {
        x: start.0.min(point.0),
        y: start.1.min(point.1),
        w: (point.0 - start.0).abs(),
        h: (point.1 - start.1).abs(),
    }
}

/// Resolve a display-space selection into source pixels.
///
/// Tiny or missing selections mean "the whole drawn image"; otherwise the
/// selection is intersected with the drawn area and mapped through the
/// inverse scale. Degenerate intersections also fall back to the whole.
pub fn resolve_crop(draw: &DrawState, selection: Option<Rect>) -> PixelRect {
    let drawn = Rect {
        x: draw.offset_x,
        y: draw.offset_y,
        w: draw.draw_w,
        h: draw.draw_h,
    };
    let mut rect = match selection {
        Some(sel) if sel.w >= MIN_DRAG_SIZE && sel.h >= MIN_DRAG_SIZE => sel,
        _ => drawn,
    };

    let x0 = drawn.x.max(rect.x);
    let y0 = drawn.y.max(rect.y);
    let x1 = (drawn.x + drawn.w).min(rect.x + rect.w);
    let y1 = (drawn.y + drawn.h).min(rect.y + rect.h);
    rect = if x1 - x0 < MIN_INTERSECTION || y1 - y0 < MIN_INTERSECTION {
        drawn
    } else {
        Rect {
            x: x0,
            y: y0,
            w: x1 - x0,
            h: y1 - y0,
        }
    };

    let sx = (rect.x - drawn.x) / draw.scale;
    let sy = (rect.y - drawn.y) / draw.scale;
    let sw = rect.w / draw.scale;
    let sh = rect.h / draw.scale;
    PixelRect {
        x: sx.max(0.0).floor() as u32,
        y: sy.max(0.0).floor() as u32,
        w: (sw.floor() as u32).max(1),
        h: (sh.floor() as u32).max(1),
    }
}
