//! Demo host: minifb window, software framebuffer, input polling
//!
//! Renders into a fixed 1280x800 logical framebuffer with 32-bit ARGB
//! pixels, scaled to the actual window size each frame with per-axis
//! nearest-neighbor sampling so resizing never distorts the simulation.

pub mod audio;
pub mod font;

use anyhow::Result;
use minifb::{Key, ScaleMode, Window, WindowOptions};

use redline_sim::{HeldKeys, SharedControls, SimulationSession, VehicleConfig};

use crate::engine::audio::{EngineAudio, EngineFeed, EnginePreset};
use crate::game::World;

pub const SCREEN_WIDTH: usize = 1280;
pub const SCREEN_HEIGHT: usize = 800;

/// Run the windowed demo until the window closes or Escape is pressed
pub fn run(
    config: VehicleConfig,
    seed: Option<u64>,
    preset: EnginePreset,
    volume: f32,
) -> Result<()> {
    let controls = SharedControls::new();
    let feed = EngineFeed::new(config.idle_rpm);
    let session = SimulationSession::with_sink(config, controls.clone(), Box::new(feed.clone()));
    let token = session.token();
    let mut world = World::new(session, seed);

    // Audio is a collaborator, not a requirement: the demo drives on
    // silently when no output device can be opened
    let audio = EngineAudio::new(feed.clone(), preset, token.clone());
    match &audio {
        Some(audio) => audio.set_volume(volume),
        None => tracing::warn!("Running without engine audio"),
    }

    let options = WindowOptions {
        resize: true,
        scale_mode: ScaleMode::AspectRatioStretch,
        ..Default::default()
    };
    let mut window = Window::new("Redline", SCREEN_WIDTH, SCREEN_HEIGHT, options)
        .map_err(|e| anyhow::anyhow!("Window creation failed: {}", e))?;
    window.set_target_fps(config.tick_rate as usize);

    tracing::info!("Engine initialized, entering drive loop");
    tracing::info!("Controls: Arrows=drive | A/Z=shift | Esc=quit");

    // Logical framebuffer plus an output buffer sized to the window
    let mut framebuffer = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];
    let mut out_w = SCREEN_WIDTH;
    let mut out_h = SCREEN_HEIGHT;
    let mut scaled_buf = vec![0u32; out_w * out_h];
    let mut frame_count: u64 = 0;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        // Track window size changes
        let (actual_w, actual_h) = window.get_size();
        if actual_w > 0 && actual_h > 0 && (actual_w != out_w || actual_h != out_h) {
            out_w = actual_w;
            out_h = actual_h;
            scaled_buf.resize(out_w * out_h, 0);
        }

        // Poll driving keys (continuous level state; the simulation turns
        // held shift keys into single press edges on its side)
        let held = HeldKeys {
            throttle: window.is_key_down(Key::Up),
            brake: window.is_key_down(Key::Down),
            steer_left: window.is_key_down(Key::Left),
            steer_right: window.is_key_down(Key::Right),
            shift_up: window.is_key_down(Key::A),
            shift_down: window.is_key_down(Key::Z),
        };
        controls.publish(held);
        feed.set_throttle(held.throttle);

        world.update();
        world.draw(&mut framebuffer);

        // Window title doubles as a coarse status line
        frame_count += 1;
        if frame_count % 30 == 0 {
            let state = world.session.state();
            let title = format!(
                "Redline | {:5.1} km/h | Gear {} | {:5.0} RPM",
                state.display_speed(world.session.config()),
                state.gear_label(),
                state.rpm,
            );
            window.set_title(&title);
        }

        // Scale to output size and present
        scale_to_size(&framebuffer, &mut scaled_buf, out_w, out_h);
        window
            .update_with_buffer(&scaled_buf, out_w, out_h)
            .map_err(|e| anyhow::anyhow!("Display error: {}", e))?;
    }

    world.session.shutdown();
    tracing::info!("Engine shutdown");
    Ok(())
}

/// Scale the logical framebuffer to any target size using per-axis
/// nearest-neighbor sampling
fn scale_to_size(src: &[u32], dst: &mut [u32], dst_w: usize, dst_h: usize) {
    for dy in 0..dst_h {
        let sy = (dy * SCREEN_HEIGHT) / dst_h;
        let dst_row = dy * dst_w;
        let src_row = sy * SCREEN_WIDTH;
        for dx in 0..dst_w {
            let sx = (dx * SCREEN_WIDTH) / dst_w;
            dst[dst_row + dx] = src[src_row + sx];
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
