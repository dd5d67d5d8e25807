//! Procedural brick grids
//!
//! The grid shape is fixed per level number; hit points, colors, moving and
//! indestructible bricks and power-up drops are rolled from the session RNG.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Brick, PowerUpKind};
use crate::colors::BRICK_PALETTE;
use crate::consts::*;

/// Chance a brick is indestructible (level 4+)
const INDESTRUCTIBLE_CHANCE: f64 = 0.05;
/// Chance a brick below the third row moves sideways (level 5+)
const MOVING_CHANCE: f64 = 0.15;
/// Chance a breakable brick carries a power-up
const POWERUP_CHANCE: f64 = 0.10;

/// Rows and columns of the grid for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: u32,
    pub cols: u32,
}

impl GridLayout {
    pub fn brick_count(&self) -> usize {
        (self.rows * self.cols) as usize
    }
}

/// Grid dimensions: more rows every third level, as many columns as fit
pub fn grid_layout(level: u32, canvas_width: f32) -> GridLayout {
    let rows = (BASE_ROWS + level / 3).min(MAX_ROWS);
    let usable = canvas_width - 2.0 * BRICK_OFFSET_LEFT;
    let cols = (usable / (BRICK_WIDTH + BRICK_PADDING)).floor().max(0.0) as u32;
    GridLayout { rows, cols }
}

/// Build the brick grid for a level
pub fn generate_level(level: u32, canvas_width: f32, rng: &mut impl Rng) -> Vec<Brick> {
    let layout = grid_layout(level, canvas_width);
    let mut bricks = Vec::with_capacity(layout.brick_count());

    for row in 0..layout.rows {
        for col in 0..layout.cols {
            let pos = Vec2::new(
                BRICK_OFFSET_LEFT + col as f32 * (BRICK_WIDTH + BRICK_PADDING),
                BRICK_OFFSET_TOP + row as f32 * (BRICK_HEIGHT + BRICK_PADDING),
            );

            let (hit_points, color_index) = row_strength(level, row);

            let indestructible = level > 3 && rng.random_bool(INDESTRUCTIBLE_CHANCE);

            let move_speed = if level > 4 && row > 2 && rng.random_bool(MOVING_CHANCE) {
                rng.random_range(0.5..1.5)
            } else {
                0.0
            };

            let mut brick = Brick::new(pos, BRICK_PALETTE[color_index], hit_points, indestructible);
            brick.move_speed = move_speed;

            if !indestructible && rng.random_bool(POWERUP_CHANCE) {
                brick.power_up = PowerUpKind::ALL.choose(rng).copied();
            }

            bricks.push(brick);
        }
    }

    let special = bricks
        .iter()
        .filter(|b| b.indestructible || b.move_speed > 0.0 || b.power_up.is_some())
        .count();
    log::info!(
        "Level {}: {}x{} grid, {} special bricks",
        level,
        layout.rows,
        layout.cols,
        special
    );

    bricks
}

/// Hit points and palette index for a row: top rows toughen as levels rise
fn row_strength(level: u32, row: u32) -> (u8, usize) {
    let base = row as usize % BRICK_PALETTE.len();
    if row < 2 && level > 2 {
        (3, 5)
    } else if row < 4 && level > 1 {
        (2, (base + 1).min(4))
    } else {
        (1, base)
    }
}

/// True once every breakable brick is destroyed
pub fn level_cleared(bricks: &[Brick]) -> bool {
    !bricks.iter().any(|b| b.counts_for_clear() && b.is_live())
}
