//! Packed pixel format and the per-row compositing operators.
//!
//! A pixel is 16 bits holding four 4-bit channels in `gggg bbbb aaaa rrrr`
//! order. The layout is chosen so that two adjacent pixels form one 32-bit
//! word (for fast fills) and so that the three color nibbles can be spread
//! into non-adjacent byte lanes and blended in a single fused
//! subtract-multiply-add.

// ============================================================================
// Pen
// ============================================================================

/// A packed 16-bit pixel / drawing color.
///
/// Channels are 4-bit (0-15). Constructors taking 8-bit values mask to the
/// low nibble - they do NOT rescale 0-255 down to 0-15.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pen {
    pub v: u16,
}

impl Pen {
    /// Fully opaque pen from r/g/b nibbles.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self::with_alpha(r, g, b, 0xf)
    }

    /// Pen with explicit 4-bit alpha.
    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        let (r, g, b, a) = (
            u16::from(r & 0xf),
            u16::from(g & 0xf),
            u16::from(b & 0xf),
            u16::from(a & 0xf),
        );
        Self {
            v: r | (a << 4) | (b << 8) | (g << 12),
        }
    }

    /// Wrap an already-packed 16-bit value.
    pub fn from_raw(v: u16) -> Self {
        Self { v }
    }

    /// Pen from hue/saturation/value, all in [0, 1]. Fully opaque.
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let i = (h * 6.0).floor();
        let f = h * 6.0 - i;
        let v = v * 15.0;
        let p = (v * (1.0 - s)) as u8;
        let q = (v * (1.0 - f * s)) as u8;
        let t = (v * (1.0 - (1.0 - f) * s)) as u8;
        let v = v as u8;

        match (i as i32).rem_euclid(6) {
            0 => Self::new(v, t, p),
            1 => Self::new(q, v, p),
            2 => Self::new(p, v, t),
            3 => Self::new(p, q, v),
            4 => Self::new(t, p, v),
            _ => Self::new(v, p, q),
        }
    }

    #[inline]
    pub fn r(self) -> u8 {
        (self.v & 0xf) as u8
    }

    #[inline]
    pub fn a(self) -> u8 {
        ((self.v >> 4) & 0xf) as u8
    }

    #[inline]
    pub fn b(self) -> u8 {
        ((self.v >> 8) & 0xf) as u8
    }

    #[inline]
    pub fn g(self) -> u8 {
        ((self.v >> 12) & 0xf) as u8
    }
}

// ============================================================================
// Compositing operators
// ============================================================================

/// How a source pixel combines with the destination pixel already in the
/// buffer. Every drawing primitive routes its writes through the surface's
/// current mode.
///
/// Each mode has two call shapes matching the two primitive families:
/// [`fill`](Self::fill) repeats one pen over the destination (solid fills)
/// and [`span`](Self::span) advances through a source row (blits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Overwrite the destination, source alpha and all.
    Copy,
    /// Alpha-weighted mix of source into destination RGB. The destination's
    /// own alpha nibble is preserved unchanged.
    #[default]
    Alpha,
}

impl BlendMode {
    /// Write `dest.len()` copies of `pen` through this operator.
    #[inline]
    pub fn fill(self, pen: Pen, dest: &mut [Pen]) {
        match self {
            Self::Copy => copy_fill(pen, dest),
            Self::Alpha => alpha_fill(pen, dest),
        }
    }

    /// Write `dest.len()` pixels taken one-for-one from `src`.
    #[inline]
    pub fn span(self, src: &[Pen], dest: &mut [Pen]) {
        match self {
            Self::Copy => dest.copy_from_slice(&src[..dest.len()]),
            Self::Alpha => alpha_span(src, dest),
        }
    }
}

/// Opaque fill. For longer runs we nearly double throughput by storing two
/// packed pixels per 32-bit write; `align_to_mut` peels off the odd leading
/// and trailing pixel so the bulk writes are aligned.
fn copy_fill(pen: Pen, dest: &mut [Pen]) {
    if dest.is_empty() {
        return;
    }

    // Safety: Pen is a transparent u16 wrapper, so any u32 in the aligned
    // middle is exactly two pixels.
    let (head, words, tail) = unsafe { dest.align_to_mut::<u32>() };

    let dpen = (u32::from(pen.v) << 16) | u32::from(pen.v);
    for p in head {
        *p = pen;
    }
    for w in words {
        *w = dpen;
    }
    for p in tail {
        *p = pen;
    }
}

// Masks for the spread lane layout ---- gggg ---- bbbb ---- rrrr.
const LANES: u32 = 0x000f0f0f;
const ROUND_BIAS: u32 = 0x070707; // +7/16 per lane, rounds to nearest

/// Spread `gggg bbbb aaaa rrrr` into 32 bits with room above each color
/// nibble for the alpha multiply.
#[inline]
fn spread(v: u16) -> u32 {
    (u32::from(v) | ((u32::from(v) & 0xf000) << 4)) & LANES
}

/// Widen a pixel's 4-bit alpha to a 0-16 blend weight so that alpha 15
/// resolves to exactly the source color and alpha 0 leaves the destination
/// untouched.
#[inline]
fn blend_weight(v: u16) -> u32 {
    let a = (u32::from(v) & 0xf0) >> 4;
    a + (a >> 3)
}

/// Blend one spread-and-weighted source pixel onto `dest`.
///
/// The lane subtraction can borrow into the neighbouring lane but the low
/// nibble of each lane survives the multiply/shift intact, and the repack
/// masks the garbage away. Destination alpha is re-inserted verbatim.
#[inline]
fn alpha_pixel(s: u32, sa: u32, dest: &mut Pen) {
    let d = spread(dest.v);
    let da = u32::from(dest.v) & 0x00f0;

    let blended = d.wrapping_add(
        sa.wrapping_mul(s.wrapping_sub(d))
            .wrapping_add(ROUND_BIAS)
            >> 4,
    );

    dest.v = ((blended & 0x0f0f) | ((blended & 0xf0000) >> 4) | da) as u16;
}

/// Alpha fill: the source pen is unpacked once outside the loop.
fn alpha_fill(pen: Pen, dest: &mut [Pen]) {
    let s = spread(pen.v);
    let sa = blend_weight(pen.v);
    for d in dest {
        alpha_pixel(s, sa, d);
    }
}

/// Alpha span: the source advances per destination pixel, so its unpacked
/// value and weight are recomputed each step.
fn alpha_span(src: &[Pen], dest: &mut [Pen]) {
    for (d, p) in dest.iter_mut().zip(src) {
        alpha_pixel(spread(p.v), blend_weight(p.v), d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scalar model of the blend for one channel.
    fn blend_ref(s: u32, d: u32, a: u32) -> u32 {
        let w = (a + (a >> 3)) as i32;
        (d as i32 + ((w * (s as i32 - d as i32) + 7) >> 4)) as u32
    }

    #[test]
    fn test_pack_round_trip() {
        for r in 0..16u8 {
            for g in 0..16u8 {
                for b in (0..16u8).step_by(3) {
                    for a in (0..16u8).step_by(5) {
                        let p = Pen::with_alpha(r, g, b, a);
                        assert_eq!((p.r(), p.g(), p.b(), p.a()), (r, g, b, a));
                    }
                }
            }
        }
    }

    #[test]
    fn test_eight_bit_inputs_truncate() {
        // 0xf7 & 0xf == 7: masked, not rescaled
        let p = Pen::with_alpha(0xf7, 0x2a, 0xff, 0x13);
        assert_eq!((p.r(), p.g(), p.b(), p.a()), (7, 10, 15, 3));
    }

    #[test]
    fn test_default_alpha_opaque() {
        assert_eq!(Pen::new(1, 2, 3).a(), 0xf);
    }

    #[test]
    fn test_packed_layout() {
        let p = Pen::with_alpha(0x1, 0x2, 0x3, 0x4);
        // gggg bbbb aaaa rrrr
        assert_eq!(p.v, 0x2341);
    }

    #[test]
    fn test_copy_fill_every_length() {
        let pen = Pen::new(9, 3, 12);
        // Cover odd/even lengths and both buffer alignments
        for start in 0..2usize {
            for len in 0..9usize {
                let mut buf = vec![Pen::from_raw(0xffff); start + len + 1];
                BlendMode::Copy.fill(pen, &mut buf[start..start + len]);
                for (i, p) in buf.iter().enumerate() {
                    if i >= start && i < start + len {
                        assert_eq!(*p, pen, "start={} len={} i={}", start, len, i);
                    } else {
                        assert_eq!(p.v, 0xffff, "write outside span at i={}", i);
                    }
                }
            }
        }
    }

    #[test]
    fn test_copy_span() {
        let src: Vec<Pen> = (0..7).map(|i| Pen::new(i, i, i)).collect();
        let mut dest = vec![Pen::default(); 7];
        BlendMode::Copy.span(&src, &mut dest);
        assert_eq!(src, dest);
    }

    #[test]
    fn test_blend_identity_at_full_alpha() {
        let src = Pen::with_alpha(12, 5, 0, 15);
        for dv in [0x0000u16, 0xffff, 0x1234, 0x8ba6] {
            let mut d = Pen::from_raw(dv);
            let da = d.a();
            BlendMode::Alpha.fill(src, std::slice::from_mut(&mut d));
            assert_eq!((d.r(), d.g(), d.b()), (12, 5, 0));
            assert_eq!(d.a(), da, "destination alpha must be preserved");
        }
    }

    #[test]
    fn test_blend_noop_at_zero_alpha() {
        let src = Pen::with_alpha(15, 15, 15, 0);
        for dv in [0x0000u16, 0xffff, 0x4f21] {
            let mut d = Pen::from_raw(dv);
            BlendMode::Alpha.fill(src, std::slice::from_mut(&mut d));
            assert_eq!(d.v, dv);
        }
    }

    #[test]
    fn test_blend_matches_scalar_model() {
        // Exhaustive-ish sweep of the packed math against the per-channel model
        for a in 0..16u32 {
            for s in (0..16u32).step_by(3) {
                for d in (0..16u32).step_by(2) {
                    let src = Pen::with_alpha(s as u8, s as u8, s as u8, a as u8);
                    let mut dest = Pen::with_alpha(d as u8, d as u8, d as u8, 7);
                    BlendMode::Alpha.fill(src, std::slice::from_mut(&mut dest));

                    let want = blend_ref(s, d, a);
                    assert_eq!(
                        (u32::from(dest.r()), u32::from(dest.g()), u32::from(dest.b())),
                        (want, want, want),
                        "a={} s={} d={}",
                        a,
                        s,
                        d
                    );
                    assert_eq!(dest.a(), 7);
                }
            }
        }
    }

    #[test]
    fn test_blend_channels_independent() {
        // Channels far apart must not bleed into each other
        let src = Pen::with_alpha(15, 0, 15, 9);
        let mut dest = Pen::with_alpha(0, 15, 0, 3);
        BlendMode::Alpha.fill(src, std::slice::from_mut(&mut dest));
        assert_eq!(u32::from(dest.r()), blend_ref(15, 0, 9));
        assert_eq!(u32::from(dest.g()), blend_ref(0, 15, 9));
        assert_eq!(u32::from(dest.b()), blend_ref(15, 0, 9));
    }

    #[test]
    fn test_blend_span_advances_source() {
        let src = [Pen::with_alpha(15, 0, 0, 15), Pen::with_alpha(0, 15, 0, 0)];
        let mut dest = [Pen::new(0, 0, 15), Pen::new(0, 0, 15)];
        BlendMode::Alpha.span(&src, &mut dest);
        // first source is opaque red, second is fully transparent
        assert_eq!((dest[0].r(), dest[0].g(), dest[0].b()), (15, 0, 0));
        assert_eq!((dest[1].r(), dest[1].g(), dest[1].b()), (0, 0, 15));
    }

    #[test]
    fn test_empty_count_is_noop() {
        BlendMode::Copy.fill(Pen::new(1, 1, 1), &mut []);
        BlendMode::Alpha.fill(Pen::new(1, 1, 1), &mut []);
        BlendMode::Copy.span(&[], &mut []);
        BlendMode::Alpha.span(&[], &mut []);
    }

    #[test]
    fn test_from_hsv_primaries() {
        let red = Pen::from_hsv(0.0, 1.0, 1.0);
        assert_eq!((red.r(), red.g(), red.b()), (15, 0, 0));
        let green = Pen::from_hsv(1.0 / 3.0, 1.0, 1.0);
        assert_eq!(green.g(), 15);
        let grey = Pen::from_hsv(0.5, 0.0, 0.5);
        assert_eq!(grey.r(), grey.b());
    }
}
