//! Brick Breaker - a classic paddle, ball and bricks arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, power-ups, levels, game state)
//! - `input`: Mouse/keyboard events mapped to per-tick input
//! - `renderer`: Backend-agnostic frame building (triangles + text labels)
//! - `settings`: Canvas size, seed and quality preferences

pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use input::{Autopilot, InputEvent, InputState, Key};
pub use settings::{QualityPreset, Settings, SettingsError};

/// RGBA color with components in 0..=1
pub type Rgba = [f32; 4];

/// Build an opaque color from a `0xRRGGBB` literal
pub const fn rgb(hex: u32) -> Rgba {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Game configuration constants
///
/// Distances are logical canvas pixels, speeds are pixels per tick.
pub mod consts {
    /// Simulation rate (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u64 = 60;

    /// Default drawing surface
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Distance from the bottom of the canvas to the paddle's top edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 40.0;
    pub const PADDLE_SPEED: f32 = 8.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_START_SPEED: f32 = 5.0;
    /// Speed ceiling applied when a level is cleared
    pub const BALL_LEVEL_SPEED_CAP: f32 = 8.0;
    /// Gap between an attached ball and the paddle
    pub const BALL_ATTACH_GAP: f32 = 5.0;
    /// Max bounce angle off the paddle, measured from vertical (60°)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    pub const TRAIL_LENGTH: usize = 5;

    /// Ball speed ramp: +5% every 30 seconds of play within a level
    pub const SPEED_RAMP_INTERVAL_TICKS: u64 = 30 * TICKS_PER_SECOND;
    pub const SPEED_RAMP_FACTOR: f32 = 1.05;

    pub const STARTING_LIVES: u32 = 3;

    /// Brick grid layout
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_PADDING: f32 = 5.0;
    pub const BRICK_OFFSET_LEFT: f32 = 35.0;
    pub const BRICK_OFFSET_TOP: f32 = 80.0;
    pub const BASE_ROWS: u32 = 6;
    pub const MAX_ROWS: u32 = 10;
    /// Points per hit point of a destroyed brick
    pub const POINTS_PER_HIT_POINT: u64 = 10;

    /// Falling power-up capsule
    pub const POWERUP_WIDTH: f32 = 30.0;
    pub const POWERUP_HEIGHT: f32 = 20.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;

    /// Particle bursts
    pub const HIT_PARTICLES: usize = 4;
    pub const DESTROY_PARTICLES: usize = 12;
    pub const CELEBRATION_PARTICLES: usize = 50;
}

/// Colors shared by the simulation and the renderer
pub mod colors {
    use super::{Rgba, rgb};

    pub const RED: Rgba = rgb(0xff4444);
    pub const ORANGE: Rgba = rgb(0xff8844);
    pub const YELLOW: Rgba = rgb(0xffff44);
    pub const GREEN: Rgba = rgb(0x44ff44);
    pub const BLUE: Rgba = rgb(0x4444ff);
    pub const PURPLE: Rgba = rgb(0xff44ff);
    pub const WHITE: Rgba = rgb(0xffffff);

    /// Brick row palette; index 5 is reserved for 3-hit rows
    pub const BRICK_PALETTE: [Rgba; 6] = [RED, ORANGE, YELLOW, GREEN, BLUE, PURPLE];
    /// Level-clear confetti
    pub const CELEBRATION: [Rgba; 5] = [RED, GREEN, BLUE, YELLOW, PURPLE];

    pub const PADDLE: Rgba = rgb(0x007acc);
    pub const PADDLE_HIGHLIGHT: Rgba = rgb(0x4da6ff);
    pub const BALL: Rgba = WHITE;
}
