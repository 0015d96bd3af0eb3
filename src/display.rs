//! SDL2 presentation layer: the desktop stand-in for the handheld's display
//! controller. It consumes only the surface's buffer-access contract
//! (dimensions, stride, packed pixels) and owns the conversion from the
//! packed 4-bit format to the RGBA8888 texture the GPU wants.

use crate::surface::Surface;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width: u32,
    height: u32,
}

/// Streaming texture sized to the framebuffer, plus the staging buffer the
/// packed pixels are expanded into on every present.
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    staging: Vec<u8>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    KeyUp(Keycode),
}

/// Expand a 4-bit channel to 8 bits (0-15 -> 0-255).
#[inline]
fn expand(n: u8) -> u8 {
    n * 17
}

impl Display {
    /// Create a window of `width` x `height` physical pixels. The presented
    /// framebuffer is stretched to fill it, so an integer multiple of the
    /// surface size gives chunky scaled pixels.
    pub fn new(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self {
                canvas,
                event_pump,
                width,
                height,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Push a finished frame to the screen.
    ///
    /// Synchronous: when this returns, the buffer transfer is complete and
    /// the caller may immediately draw the next frame into `surface`. (On
    /// the real hardware this is an asynchronous DMA handoff the render
    /// loop has to poll before touching the framebuffer again.)
    pub fn present(&mut self, target: &mut RenderTarget, surface: &Surface) -> Result<(), String> {
        debug_assert_eq!(surface.width() as u32, target.width);
        debug_assert_eq!(surface.height() as u32, target.height);

        for (chunk, pen) in target.staging.chunks_exact_mut(4).zip(surface.pixels()) {
            // ABGR byte order = RGBA8888 little-endian
            chunk[0] = expand(pen.a());
            chunk[1] = expand(pen.b());
            chunk[2] = expand(pen.g());
            chunk[3] = expand(pen.r());
        }

        target
            .texture
            .update(None, &target.staging, (target.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                Event::KeyUp {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyUp(k)),
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a render target matching the framebuffer dimensions.
    pub fn new(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            staging: vec![0; (width * height * 4) as usize],
            width,
            height,
        })
    }
}
