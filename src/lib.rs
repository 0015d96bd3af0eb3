//! pocketfb: a software 2D rasterizer and framebuffer engine for handheld
//! displays with packed 4-bit-per-channel color.
//!
//! The engine is two pieces: the compositing core ([`pixel`]) defining the
//! packed pixel format and the per-row copy/alpha-blend operators, and the
//! rendering engine ([`surface`]) owning the buffer, clip rect, pen and
//! blend mode, with scanline-oriented primitives (rects, spans, circles,
//! bitmap text, blits) that all route through the active operator.
//! [`display`] presents finished frames through SDL2.

pub mod config;
pub mod display;
pub mod font;
pub mod geometry;
pub mod pixel;
pub mod surface;
pub mod util;

pub use geometry::{Point, Rect, Vec2};
pub use pixel::{BlendMode, Pen};
pub use surface::Surface;

/// Framebuffer dimensions of the target panel.
pub const SCREEN_WIDTH: u32 = 240;
pub const SCREEN_HEIGHT: u32 = 240;
