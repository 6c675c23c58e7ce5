//! World composition root: simulation session, tile map, camera, renderer
//!
//! `World::update` runs one simulation tick, resolves the resulting
//! movement against the wall tiles and trails the camera. `World::draw`
//! paints the visible slice of the world into the logical framebuffer:
//! grass, wall tiles, the rotated car sprite, HUD bar on top.

pub mod hud;
pub mod tilemap;

use redline_sim::{CameraFollower, SimulationSession};

use crate::engine::font;
use crate::engine::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::game::tilemap::{TileMap, TILE};

/// Car collision half extents: along the heading, across it
pub const CAR_HALF: (f64, f64) = (22.0, 14.0);

const VIEWPORT: (f64, f64) = (SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);

const GRASS_COLOR: u32 = 0xFF2E7D4F;
const WALL_COLOR: u32 = 0xFF8B8B8B;
const WALL_EDGE_COLOR: u32 = 0xFF6F6F6F;
const BODY_COLOR: u32 = 0xFFD32F2F;
const CABIN_COLOR: u32 = 0xFF5A1212;

pub struct World {
    pub session: SimulationSession,
    camera: CameraFollower,
    map: TileMap,
}

impl World {
    pub fn new(session: SimulationSession, seed: Option<u64>) -> Self {
        Self::from_parts(session, TileMap::generate(seed))
    }

    fn from_parts(session: SimulationSession, map: TileMap) -> Self {
        let mut camera = CameraFollower::new(session.config().camera_smoothing);
        camera.snap_to(session.state().position, VIEWPORT);
        Self {
            session,
            camera,
            map,
        }
    }

    /// One frame: tick the simulation, resolve wall collisions, trail the
    /// camera. Collisions clamp position only; speed is left alone so the
    /// car pushes against the wall instead of stalling.
    pub fn update(&mut self) {
        let before = self.session.state().position;
        self.session.tick();
        let after = self.session.state().position;

        let corrected = self.map.resolve_move(before, after, CAR_HALF);
        if corrected != after {
            self.session.apply_position_correction(corrected);
        }

        self.camera.follow(self.session.state().position, VIEWPORT);
    }

    /// Paint the frame into the logical framebuffer
    pub fn draw(&self, fb: &mut [u32]) {
        fb.fill(GRASS_COLOR);
        self.draw_walls(fb);
        self.draw_car(fb);
        hud::draw(fb, self.session.state(), self.session.config());
        hud::draw_help(fb);
    }

    fn draw_walls(&self, fb: &mut [u32]) {
        let half = self.map.tile_half().round() as i32;
        for &(wx, wy) in self.map.walls() {
            let (sx, sy) = self.to_screen((wx, wy));
            if sx < -TILE
                || sx > SCREEN_WIDTH as i32 + TILE
                || sy < -TILE
                || sy > SCREEN_HEIGHT as i32 + TILE
            {
                continue;
            }
            font::draw_rect(fb, sx - half, sy - half, TILE, TILE, WALL_COLOR);
            font::draw_rect_outline(fb, sx - half, sy - half, TILE, TILE, WALL_EDGE_COLOR);
        }
    }

    /// Rotated car sprite via inverse rotation sampling: for each screen
    /// pixel near the car, rotate it back into the car frame and test the
    /// body rectangle
    fn draw_car(&self, fb: &mut [u32]) {
        let state = self.session.state();
        let (cx, cy) = self.to_screen(state.position);
        let (sin, cos) = state.heading.to_radians().sin_cos();
        let (half_l, half_w) = CAR_HALF;
        let reach = (half_l * half_l + half_w * half_w).sqrt().ceil() as i32;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                // Screen y grows downward, world y upward
                let wx = f64::from(dx);
                let wy = -f64::from(dy);
                let u = wx * cos + wy * sin;
                let v = -wx * sin + wy * cos;
                if u.abs() <= half_l && v.abs() <= half_w {
                    let cabin =
                        u > -0.1 * half_l && u < 0.55 * half_l && v.abs() < 0.7 * half_w;
                    let color = if cabin { CABIN_COLOR } else { BODY_COLOR };
                    plot(fb, cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn to_screen(&self, world: (f64, f64)) -> (i32, i32) {
        let cam = self.camera.origin();
        let sx = (world.0 - cam.0).round() as i32;
        let sy = (VIEWPORT.1 - (world.1 - cam.1)).round() as i32;
        (sx, sy)
    }
}

fn plot(fb: &mut [u32], x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 || x >= SCREEN_WIDTH as i32 || y >= SCREEN_HEIGHT as i32 {
        return;
    }
    fb[y as usize * SCREEN_WIDTH + x as usize] = color;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use redline_sim::{HeldKeys, SharedControls, SimulationSession, VehicleConfig};

    fn test_world(walls: Vec<(f64, f64)>) -> (World, Arc<SharedControls>) {
        let config = VehicleConfig::default();
        let controls = SharedControls::new();
        let session = SimulationSession::new(config, controls.clone());
        let world = World::from_parts(session, TileMap::from_walls(walls));
        (world, controls)
    }

    fn drive_forward(controls: &SharedControls) {
        controls.publish(HeldKeys {
            throttle: true,
            shift_up: true,
            ..Default::default()
        });
    }

    #[test]
    fn new_world_centers_the_camera_on_the_car() {
        let (world, _controls) = test_world(Vec::new());
        assert_eq!(world.camera.origin(), (-640.0, -400.0));
        assert_eq!(world.session.ticks(), 0);
    }

    #[test]
    fn wall_stops_forward_progress_but_not_the_engine() {
        // Wall face at x = 118; the car nose (half length 22) parks at 96
        let (mut world, controls) = test_world(vec![(150.0, 0.0)]);
        drive_forward(&controls);

        for _ in 0..400 {
            world.update();
        }

        let state = world.session.state();
        assert!(state.position.0 > 80.0, "car never reached the wall");
        assert!(state.position.0 <= 96.0, "car penetrated the wall");
        assert!(state.speed > 0.0, "collision must not strip speed");
        assert_eq!(state.position.1, 0.0);
    }

    #[test]
    fn camera_trails_a_moving_car() {
        let (mut world, controls) = test_world(Vec::new());
        drive_forward(&controls);

        for _ in 0..200 {
            world.update();
        }

        let car_x = world.session.state().position.0;
        let desired_x = car_x - VIEWPORT.0 / 2.0;
        let cam_x = world.camera.origin().0;
        assert!(car_x > 100.0);
        assert!(cam_x > -640.0, "camera never moved");
        assert!(
            (cam_x - desired_x).abs() < 50.0,
            "camera {} too far behind {}",
            cam_x,
            desired_x
        );
    }

    #[test]
    fn draw_paints_grass_walls_car_and_hud() {
        let (world, _controls) = test_world(vec![(100.0, 0.0)]);
        let mut fb = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];
        world.draw(&mut fb);

        // Corner far from everything: grass
        assert_eq!(fb[0], GRASS_COLOR);
        // Car is centered at (640, 400); its midpoint is cabin, the nose body
        assert_eq!(fb[400 * SCREEN_WIDTH + 640], CABIN_COLOR);
        assert_eq!(fb[400 * SCREEN_WIDTH + 640 + 18], BODY_COLOR);
        // Wall tile centered 100 units to the right of the car
        assert_eq!(fb[400 * SCREEN_WIDTH + 740], WALL_COLOR);
        // HUD bar along the bottom
        assert_ne!(fb[(SCREEN_HEIGHT - 1) * SCREEN_WIDTH], GRASS_COLOR);
    }
}
