//! Bottom-of-screen telemetry bar
//!
//! One gray strip, one line of text: position, display speed, gear label
//! and RPM. Drawn last so it always sits above the world.

use redline_sim::{VehicleConfig, VehicleState};

use crate::engine::font;
use crate::engine::{SCREEN_HEIGHT, SCREEN_WIDTH};

const BAR_HEIGHT: i32 = 28;
const BAR_COLOR: u32 = 0xFFB4B4B4;
const TEXT_COLOR: u32 = 0xFF101010;
const MARGIN_X: i32 = 16;

const HELP_LINE: &str = "Arrows: drive | A/Z: shift | Esc: quit";
const HELP_COLOR: u32 = 0xFFF0F0F0;

/// Telemetry line shown in the HUD bar
pub fn format_line(state: &VehicleState, config: &VehicleConfig) -> String {
    format!(
        "Coords: ({:5.1}, {:5.1}) | Speed: {:5.1}km/h | Gear: {} | RPM: {:.0}",
        state.position.0,
        state.position.1,
        state.display_speed(config),
        state.gear_label(),
        state.rpm,
    )
}

/// Draw the bar and its text into the logical framebuffer
pub fn draw(fb: &mut [u32], state: &VehicleState, config: &VehicleConfig) {
    let top = SCREEN_HEIGHT as i32 - BAR_HEIGHT;
    font::draw_rect(fb, 0, top, SCREEN_WIDTH as i32, BAR_HEIGHT, BAR_COLOR);

    let line = format_line(state, config);
    let text_y = top + (BAR_HEIGHT - font::GLYPH_HEIGHT) / 2;
    font::draw_text(fb, MARGIN_X, text_y, &line, TEXT_COLOR);
}

/// Control hint centered at the top, shadowed for contrast against
/// whatever the world puts behind it
pub fn draw_help(fb: &mut [u32]) {
    let x = (SCREEN_WIDTH as i32 - font::text_width(HELP_LINE)) / 2;
    font::draw_text_shadow(fb, x, 12, HELP_LINE, HELP_COLOR);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_formats_at_rest() {
        let config = VehicleConfig::default();
        let state = VehicleState::new(&config);
        assert_eq!(
            format_line(&state, &config),
            "Coords: (  0.0,   0.0) | Speed:   0.0km/h | Gear: N | RPM: 750"
        );
    }

    #[test]
    fn reversing_state_keeps_signs() {
        let config = VehicleConfig::default();
        let mut state = VehicleState::new(&config);
        state.position = (123.4, -56.7);
        state.speed = -2.0;
        state.gear = -1;
        state.rpm = 4200.0;
        assert_eq!(
            format_line(&state, &config),
            "Coords: (123.4, -56.7) | Speed: -18.0km/h | Gear: R1 | RPM: 4200"
        );
    }

    #[test]
    fn bar_covers_the_bottom_strip() {
        let config = VehicleConfig::default();
        let state = VehicleState::new(&config);
        let mut fb = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];
        draw(&mut fb, &state, &config);

        let top = SCREEN_HEIGHT - BAR_HEIGHT as usize;
        assert_eq!(fb[(SCREEN_HEIGHT - 1) * SCREEN_WIDTH], BAR_COLOR);
        assert_eq!(fb[top * SCREEN_WIDTH + SCREEN_WIDTH - 1], BAR_COLOR);
        // The row above the bar stays untouched
        assert_eq!(fb[(top - 1) * SCREEN_WIDTH], 0);
    }

    #[test]
    fn help_line_lands_centered_near_the_top() {
        let mut fb = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];
        draw_help(&mut fb);

        let mut min_x = SCREEN_WIDTH;
        let mut max_x = 0;
        for y in 0..24 {
            for x in 0..SCREEN_WIDTH {
                if fb[y * SCREEN_WIDTH + x] != 0 {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                }
            }
        }
        assert!(min_x < max_x, "nothing painted");
        let left = min_x as i32;
        let right = SCREEN_WIDTH as i32 - 1 - max_x as i32;
        assert!((left - right).abs() < 16, "off center: {} vs {}", left, right);
    }
}
