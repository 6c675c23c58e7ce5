//! Procedural wall-tile field and arcade collision
//!
//! The drivable area is seeded with columns of square wall tiles; every
//! fifth tile (on average) is skipped so the columns break into passages.
//! Collision is deliberately arcade-grade: each tick's movement is tested
//! one axis at a time against the wall boxes and the blocked axis reverts,
//! which lets the car slide along a wall it clips diagonally.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Edge length of one wall tile in world units
pub const TILE: i32 = 64;

const FIELD_EXTENT: i32 = 5000;
const COLUMN_START: i32 = 200;
const COLUMN_STEP: i32 = 210;

pub struct TileMap {
    /// Wall tile centers
    walls: Vec<(f64, f64)>,
    /// Half extent of a tile
    half: f64,
}

impl TileMap {
    /// Generate the wall field. A seed makes the layout reproducible,
    /// otherwise each run gets a fresh one.
    pub fn generate(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let half = f64::from(TILE) / 2.0;

        let mut walls = Vec::new();
        let mut x = COLUMN_START;
        while x < FIELD_EXTENT {
            let mut y = 0;
            while y < FIELD_EXTENT {
                // Four of five tiles stand; the gaps form the passages
                if rng.gen_range(0..5) > 0 {
                    walls.push((f64::from(x), f64::from(y)));
                }
                y += TILE;
            }
            x += COLUMN_STEP;
        }

        tracing::debug!("Tile map generated: {} wall tiles", walls.len());
        Self { walls, half }
    }

    /// Map with an explicit wall list, for scripted layouts in tests
    #[cfg(test)]
    pub fn from_walls(walls: Vec<(f64, f64)>) -> Self {
        Self {
            walls,
            half: f64::from(TILE) / 2.0,
        }
    }

    pub fn walls(&self) -> &[(f64, f64)] {
        &self.walls
    }

    pub fn tile_half(&self) -> f64 {
        self.half
    }

    /// Box-overlap test of a body centered at `center` against every wall
    pub fn collides(&self, center: (f64, f64), half: (f64, f64)) -> bool {
        self.walls.iter().any(|&(wx, wy)| {
            (center.0 - wx).abs() < half.0 + self.half
                && (center.1 - wy).abs() < half.1 + self.half
        })
    }

    /// Resolve one tick of movement axis by axis: a blocked axis keeps its
    /// old coordinate, the other may still advance
    pub fn resolve_move(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        half: (f64, f64),
    ) -> (f64, f64) {
        let x = if self.collides((to.0, from.1), half) {
            from.0
        } else {
            to.0
        };
        let y = if self.collides((x, to.1), half) {
            from.1
        } else {
            to.1
        };
        (x, y)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
