//! The drawing surface: a fixed-size buffer of packed pixels plus the
//! mutable drawing state (pen, clip rect, blend mode) every primitive reads.
//!
//! All primitives are clipping-tolerant: out-of-bounds or degenerate
//! geometry silently draws nothing. There is no error path in this module.

use crate::font::{CELL_ADVANCE, FONT_8X8, GLYPH_SIZE, SPACE_ADVANCE};
use crate::geometry::{Point, Rect};
use crate::pixel::{BlendMode, Pen};

/// Bytes per packed pixel, for transports copying the raw buffer.
pub const BYTES_PER_PIXEL: usize = 2;

/// A rectangular pixel buffer with row-major layout and stride == width.
///
/// The buffer is allocated once at construction and freed with the Surface;
/// there is no resizing. Drawing primitives mutate pixels in place; the
/// `pen`, clip and blend-mode setters mutate only drawing state.
pub struct Surface {
    data: Vec<Pen>,
    w: i32,
    h: i32,
    clip: Rect,
    blend: BlendMode,
    /// Current drawing color, used by all fill-style primitives.
    pub pen: Pen,
}

impl Surface {
    /// Allocate a surface of `w` x `h` pixels, cleared to zero, with the
    /// clip rect covering the full bounds and alpha blending selected.
    pub fn new(w: u32, h: u32) -> Self {
        let (w, h) = (w as i32, h as i32);
        Self {
            data: vec![Pen::default(); (w * h) as usize],
            w,
            h,
            clip: Rect::new(0, 0, w, h),
            blend: BlendMode::default(),
            pen: Pen::default(),
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.w
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.h
    }

    /// Pixels per row. Rows are contiguous, so this equals the width.
    #[inline]
    pub fn stride(&self) -> i32 {
        self.w
    }

    /// The buffer as packed pixels, for transports and tests.
    pub fn pixels(&self) -> &[Pen] {
        &self.data
    }

    /// The buffer as raw bytes, for transports uploading the framebuffer.
    pub fn as_bytes(&self) -> &[u8] {
        // Safety: Pen is a transparent u16 wrapper
        unsafe {
            std::slice::from_raw_parts(
                self.data.as_ptr() as *const u8,
                self.data.len() * BYTES_PER_PIXEL,
            )
        }
    }

    /// Select the compositing operator used by subsequent draws.
    pub fn blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    /// Restrict drawing to a rectangle. The request is intersected with the
    /// surface bounds so the clip can never extend past the buffer.
    pub fn clip(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.clip = Rect::new(0, 0, self.w, self.h).intersection(&Rect::new(x, y, w, h));
    }

    /// Remove any clip restriction.
    pub fn clip_reset(&mut self) {
        self.clip = Rect::new(0, 0, self.w, self.h);
    }

    pub fn clip_bounds(&self) -> Rect {
        self.clip
    }

    /// True if `(x, y)` lies within the surface itself (not the clip rect).
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.w && y < self.h
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> usize {
        (y * self.w + x) as usize
    }

    /// Fill the entire surface with the pen. Ignores the clip rect.
    pub fn clear(&mut self) {
        let (pen, blend) = (self.pen, self.blend);
        blend.fill(pen, &mut self.data);
    }

    /// Draw a single pixel. Checked against the surface bounds, not the
    /// clip rect - single-pixel draws deliberately bypass clipping.
    pub fn pixel(&mut self, x: i32, y: i32) {
        if self.contains(x, y) {
            let off = self.offset(x, y);
            let (pen, blend) = (self.pen, self.blend);
            blend.fill(pen, &mut self.data[off..off + 1]);
        }
    }

    /// Fill a rectangle, clamped to the clip rect, one fill call per row.
    pub fn rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let r = self.clip.intersection(&Rect::new(x, y, w, h));
        if r.empty() {
            return;
        }

        let row = r.w as usize;
        let stride = self.w as usize;
        let mut off = self.offset(r.x, r.y);
        let (pen, blend) = (self.pen, self.blend);

        for _ in 0..r.h {
            blend.fill(pen, &mut self.data[off..off + row]);
            off += stride;
        }
    }

    /// Draw a horizontal run of `l` pixels starting at `p`, truncated to
    /// the clip rect.
    pub fn pixel_span(&mut self, p: Point, l: i32) {
        // reject spans fully outside the clip rect
        if p.x + l < self.clip.x
            || p.x >= self.clip.x + self.clip.w
            || p.y < self.clip.y
            || p.y >= self.clip.y + self.clip.h
        {
            return;
        }

        // clamp span horizontally
        let mut x = p.x;
        let mut l = l;
        if x < self.clip.x {
            l += x - self.clip.x;
            x = self.clip.x;
        }
        if x + l >= self.clip.x + self.clip.w {
            l = self.clip.x + self.clip.w - x;
        }
        // a fully-clipped span must never reach the operator as a huge
        // unsigned count
        if l <= 0 {
            return;
        }

        let off = self.offset(x, p.y);
        let (pen, blend) = (self.pen, self.blend);
        blend.fill(pen, &mut self.data[off..off + l as usize]);
    }

    /// Fill a circle via the midpoint algorithm, emitting horizontal spans
    /// per step. Spans at the vertical midline (`last_oy == 0`) and at the
    /// horizontal endpoints (`ox == 0`) are skipped to avoid drawing pixels
    /// twice, which matters for alpha blending.
    pub fn circle(&mut self, p: Point, radius: i32) {
        let bounds = Rect::new(p.x - radius, p.y - radius, radius * 2, radius * 2);
        if !bounds.intersects(&self.clip) {
            return;
        }

        let mut ox = radius;
        let mut oy = 0;
        let mut err = -radius;

        while ox >= oy {
            let last_oy = oy;

            err += oy;
            oy += 1;
            err += oy;

            self.pixel_span(Point::new(p.x - ox, p.y + last_oy), ox * 2 + 1);
            if last_oy != 0 {
                self.pixel_span(Point::new(p.x - ox, p.y - last_oy), ox * 2 + 1);
            }

            if err >= 0 && ox != last_oy {
                self.pixel_span(Point::new(p.x - last_oy, p.y + ox), last_oy * 2 + 1);
                if ox != 0 {
                    self.pixel_span(Point::new(p.x - last_oy, p.y - ox), last_oy * 2 + 1);
                }

                err -= ox;
                ox -= 1;
                err -= ox;
            }
        }
    }

    /// Draw text with no wrap width.
    pub fn text(&mut self, t: &str, x: i32, y: i32) {
        self.text_wrapped(t, x, y, i32::MAX);
    }

    /// Draw text, wrapping whole words once the next word would cross
    /// `wrap` pixels from `x`. Glyph bits are tested against the surface
    /// bounds per pixel, like [`pixel`](Self::pixel), not batch-clipped.
    pub fn text_wrapped(&mut self, t: &str, x: i32, y: i32, wrap: i32) {
        let bytes = t.as_bytes();
        let mut co = 0; // character offset
        let mut lo = 0; // line offset once wrapped

        for (i, &ch) in bytes.iter().enumerate() {
            let glyph = &FONT_8X8[usize::from(ch & 0x7f)];
            for (cy, &row) in glyph.iter().enumerate() {
                for cx in 0..GLYPH_SIZE {
                    let (px, py) = (x + cx + co, y + cy as i32 + lo);
                    if row & (1 << cx) != 0 && self.contains(px, py) {
                        let off = self.offset(px, py);
                        let (pen, blend) = (self.pen, self.blend);
                        blend.fill(pen, &mut self.data[off..off + 1]);
                    }
                }
            }

            // look ahead for the next space so we can decide whether the
            // upcoming word still fits on this line
            if ch == b' ' {
                let next = bytes[i + 1..]
                    .iter()
                    .position(|&c| c == b' ')
                    .map_or(bytes.len(), |j| i + 1 + j);
                let word_px = ((next - i + 1) as i32).saturating_mul(CELL_ADVANCE);
                if co.saturating_add(word_px) > wrap {
                    co = 0;
                    lo += CELL_ADVANCE;
                } else {
                    co += SPACE_ADVANCE;
                }
            } else {
                co += CELL_ADVANCE;
            }
        }
    }

    /// Copy a rectangle of `source` to `to`, through the current blend mode
    /// in copy/blend span shape. The destination is clipped and the source
    /// offset shifted by the same amount.
    pub fn blit(&mut self, source: &Surface, from: Rect, to: Point) {
        // clamp the requested source rect to the source surface so the row
        // slices below can never run out of bounds
        let from = Rect::new(0, 0, source.w, source.h).intersection(&from);
        let dr = self.clip.intersection(&Rect::new(to.x, to.y, from.w, from.h));
        if dr.empty() {
            return;
        }

        let left = dr.x - to.x;
        let top = dr.y - to.y;

        let row = dr.w as usize;
        let mut dest_off = self.offset(dr.x, dr.y);
        let mut src_off = source.offset(from.x + left, from.y + top);
        let blend = self.blend;

        for _ in 0..dr.h {
            blend.span(
                &source.data[src_off..src_off + row],
                &mut self.data[dest_off..dest_off + row],
            );
            dest_off += self.w as usize;
            src_off += source.w as usize;
        }
    }
}
