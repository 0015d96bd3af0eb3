use pocketfb::config::DemoConfig;
use pocketfb::display::{Display, InputEvent, RenderTarget};
use pocketfb::util::{FpsCounter, Rng};
use pocketfb::{BlendMode, Pen, Point, Surface, Vec2, SCREEN_HEIGHT, SCREEN_WIDTH};

use sdl2::keyboard::Keycode;

struct Ball {
    position: Vec2,
    direction: Vec2,
    radius: i32,
    pen: Pen,
}

fn spawn_balls(count: usize, rng: &mut Rng, w: f32, h: f32) -> Vec<Ball> {
    (0..count)
        .map(|_| Ball {
            position: Vec2::new(rng.range_f32(0.0, w), rng.range_f32(0.0, h)),
            direction: Vec2::new(rng.range_f32(-1.0, 1.0), rng.range_f32(-1.0, 1.0)),
            radius: rng.range_i32(2, 6),
            pen: Pen::with_alpha(rng.next_u8(), rng.next_u8(), rng.next_u8(), 11),
        })
        .collect()
}

/// Parse command line arguments over the loaded config
fn parse_args(cfg: &mut DemoConfig) {
    let args: Vec<String> = std::env::args().collect();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => cfg.vsync = false,
            "--scale" | "-s" => {
                if i + 1 < args.len() {
                    if let Ok(s) = args[i + 1].parse::<u32>() {
                        cfg.scale = s.max(1);
                    }
                    i += 1;
                }
            },
            "--balls" | "-b" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<usize>() {
                        cfg.balls = n;
                    }
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: pocketfb [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --scale N, -s N   Window scale factor (default: 3)");
                println!("  --balls N, -b N   Number of balls (default: 64)");
                println!("  --no-vsync        Disable VSync for uncapped framerate");
                println!("  --help            Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }
}

fn main() -> Result<(), String> {
    let mut cfg = DemoConfig::load("demo.json").unwrap_or_default();
    parse_args(&mut cfg);

    let (mut display, texture_creator) = Display::new(
        "pocketfb",
        SCREEN_WIDTH * cfg.scale,
        SCREEN_HEIGHT * cfg.scale,
        cfg.vsync,
    )?;
    let mut target = RenderTarget::new(&texture_creator, SCREEN_WIDTH, SCREEN_HEIGHT)?;
    let mut screen = Surface::new(SCREEN_WIDTH, SCREEN_HEIGHT);

    let mut rng = Rng::new(cfg.seed);
    let mut balls = spawn_balls(
        cfg.balls,
        &mut rng,
        SCREEN_WIDTH as f32,
        SCREEN_HEIGHT as f32,
    );

    let mut fps = FpsCounter::new(60);
    let mut show_stats = true;

    'running: loop {
        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'running,
                InputEvent::KeyDown(Keycode::F) => show_stats = !show_stats,
                InputEvent::KeyDown(Keycode::R) => {
                    balls = spawn_balls(
                        cfg.balls,
                        &mut rng,
                        SCREEN_WIDTH as f32,
                        SCREEN_HEIGHT as f32,
                    );
                },
                _ => {},
            }
        }

        let (_dt, avg_fps) = fps.tick();

        screen.blend_mode(BlendMode::Copy);
        screen.pen = Pen::new(7, 2, 3);
        screen.clear();

        screen.blend_mode(BlendMode::Alpha);
        for ball in &mut balls {
            ball.position += ball.direction;

            if ball.position.x < 0.0 || ball.position.x >= screen.width() as f32 {
                ball.direction.x *= -1.0;
            }
            if ball.position.y < 0.0 || ball.position.y >= screen.height() as f32 {
                ball.direction.y *= -1.0;
            }

            screen.pen = ball.pen;
            screen.circle(Point::from(ball.position), ball.radius);
        }

        if show_stats {
            screen.pen = Pen::new(15, 15, 15);
            screen.text(&format!("fps: {:.0}", avg_fps), 4, 4);
            screen.text(&format!("ms: {:.2}", fps.avg_frame_time_ms()), 4, 14);
        }

        display.present(&mut target, &screen)?;
    }

    Ok(())
}
