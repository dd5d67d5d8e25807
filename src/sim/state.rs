//! Game state and core simulation types
//!
//! Everything a session owns lives in [`GameState`]; update functions take it
//! by reference instead of reaching for globals.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::level::generate_level;
use super::particles::Particle;
use super::powerups::ActiveEffects;
use crate::colors;
use crate::consts::*;
use crate::settings::Settings;
use crate::Rgba;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Title screen, waiting for start input
    Menu,
    /// Active gameplay (including a ball waiting on the paddle)
    Playing,
    /// Game is paused
    Paused,
    /// Lives exhausted
    GameOver,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Keyboard movement per tick
    pub speed: f32,
    pub color: Rgba,
}

impl Paddle {
    /// Paddle centered horizontally near the bottom of the canvas
    pub fn new(canvas: Vec2) -> Self {
        Self {
            pos: Vec2::new(
                (canvas.x - PADDLE_WIDTH) / 2.0,
                canvas.y - PADDLE_BOTTOM_OFFSET,
            ),
            size: Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
            speed: PADDLE_SPEED,
            color: colors::PADDLE,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Follow the pointer, nudge by held keys (`steer` in -1..=1), then clamp
    pub fn steer(&mut self, pointer_x: Option<f32>, steer: f32, canvas_width: f32) {
        if let Some(x) = pointer_x {
            self.pos.x = x - self.size.x / 2.0;
        }
        self.pos.x += steer.clamp(-1.0, 1.0) * self.speed;
        self.clamp_to(canvas_width);
    }

    /// Keep the paddle inside [0, canvas_width - width]
    pub fn clamp_to(&mut self, canvas_width: f32) {
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
        }
        if self.pos.x + self.size.x > canvas_width {
            self.pos.x = (canvas_width - self.size.x).max(0.0);
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Center
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Speed used for launches and paddle bounces
    pub speed: f32,
    /// Riding the paddle, waiting for launch
    pub attached: bool,
    /// Recent positions (oldest first)
    pub trail: VecDeque<Vec2>,
}

impl Ball {
    /// Create a ball resting on the paddle
    pub fn attached_to(paddle: &Paddle) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            speed: BALL_START_SPEED,
            attached: true,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        };
        ball.follow(paddle);
        ball
    }

    /// Ride on top of the paddle's center
    pub fn follow(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(
            paddle.center().x,
            paddle.pos.y - self.radius - BALL_ATTACH_GAP,
        );
    }

    /// Release from the paddle with a small random horizontal drift
    pub fn launch(&mut self, rng: &mut impl Rng) {
        if self.attached {
            self.attached = false;
            self.vel = Vec2::new(rng.random_range(-1.0..1.0), -self.speed);
        }
    }

    /// Put the ball back on the paddle after a miss or level change
    pub fn reattach(&mut self, paddle: &Paddle) {
        self.attached = true;
        self.vel = Vec2::ZERO;
        self.clear_trail();
        self.follow(paddle);
    }

    /// Record current position to trail (call each tick when free)
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Bounding box of the ball
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.radius))
    }
}

/// Outcome of a ball striking a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickHit {
    /// Indestructible, or already destroyed
    Absorbed,
    /// Lost a hit point but still standing
    Damaged,
    /// Hit points reached zero on this hit
    Destroyed,
}

/// A brick entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Rgba,
    pub hit_points: u8,
    pub max_hit_points: u8,
    pub destroyed: bool,
    pub indestructible: bool,
    /// Power-up released on destruction
    pub power_up: Option<PowerUpKind>,
    /// Horizontal speed (0 = stationary)
    pub move_speed: f32,
    /// +1 right, -1 left
    pub move_dir: f32,
}

impl Brick {
    pub fn new(pos: Vec2, color: Rgba, hit_points: u8, indestructible: bool) -> Self {
        Self {
            pos,
            size: Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
            color,
            hit_points,
            max_hit_points: hit_points,
            destroyed: false,
            indestructible,
            power_up: None,
            move_speed: 0.0,
            move_dir: 1.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Collidable and drawn
    pub fn is_live(&self) -> bool {
        !self.destroyed
    }

    /// Returns true if this brick must be destroyed to clear the level
    pub fn counts_for_clear(&self) -> bool {
        !self.indestructible
    }

    /// Apply one hit
    pub fn hit(&mut self) -> BrickHit {
        if self.indestructible || self.destroyed {
            return BrickHit::Absorbed;
        }
        self.hit_points = self.hit_points.saturating_sub(1);
        if self.hit_points == 0 {
            self.destroyed = true;
            BrickHit::Destroyed
        } else {
            BrickHit::Damaged
        }
    }

    /// Points awarded for destroying this brick
    pub fn points(&self) -> u64 {
        POINTS_PER_HIT_POINT * self.max_hit_points as u64
    }

    /// Slide moving bricks, turning around at the canvas edges
    pub fn update(&mut self, canvas_width: f32) {
        if self.move_speed <= 0.0 || self.destroyed {
            return;
        }
        self.pos.x += self.move_speed * self.move_dir;
        if self.pos.x <= 0.0 || self.pos.x + self.size.x >= canvas_width {
            self.move_dir = -self.move_dir;
        }
        self.pos.x = self.pos.x.clamp(0.0, (canvas_width - self.size.x).max(0.0));
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Laser,
    Expand,
    MultiBall,
    Slow,
    ExtraLife,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Laser,
        PowerUpKind::Expand,
        PowerUpKind::MultiBall,
        PowerUpKind::Slow,
        PowerUpKind::ExtraLife,
    ];

    /// Capsule color (also the paddle tint for laser/expand)
    pub fn color(&self) -> Rgba {
        match self {
            PowerUpKind::Laser => colors::RED,
            PowerUpKind::Expand => colors::GREEN,
            PowerUpKind::MultiBall => colors::BLUE,
            PowerUpKind::Slow => colors::YELLOW,
            PowerUpKind::ExtraLife => colors::PURPLE,
        }
    }

    /// Short on-screen label
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Laser => "Laser Active",
            PowerUpKind::Expand => "Expanded Paddle",
            PowerUpKind::MultiBall => "Multi Ball",
            PowerUpKind::Slow => "Slow Ball",
            PowerUpKind::ExtraLife => "Extra Life",
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    pub fall_speed: f32,
    pub active: bool,
}

impl PowerUp {
    /// Capsule horizontally centered on `center`, top edge at its y
    pub fn spawn_at(center: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos: Vec2::new(center.x - POWERUP_WIDTH / 2.0, center.y),
            size: Vec2::new(POWERUP_WIDTH, POWERUP_HEIGHT),
            kind,
            fall_speed: POWERUP_FALL_SPEED,
            active: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Fall one tick; deactivate once below the canvas
    pub fn fall(&mut self, canvas_height: f32) {
        if !self.active {
            return;
        }
        self.pos.y += self.fall_speed;
        if self.pos.y > canvas_height {
            self.active = false;
        }
    }
}

/// Notifications for the host (score labels, toasts, logs)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum GameEvent {
    #[serde(rename = "gameScore")]
    Score { score: u64 },
    #[serde(rename = "gameLives")]
    Lives { lives: u32 },
    #[serde(rename = "gameLevel")]
    Level { level: u32 },
    #[serde(rename = "gamePhase")]
    Phase { phase: GamePhase },
    #[serde(rename = "powerUp")]
    PowerUp { kind: PowerUpKind, active: bool },
    #[serde(rename = "alert")]
    Alert { text: String },
}

impl GameEvent {
    /// JSON message in the shape the webview host expects
    pub fn to_host_message(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Drawing surface size
    pub canvas: Vec2,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Ticks played in the current level (drives the speed ramp)
    pub game_ticks: u64,
    /// Monotonic session clock for power-up expiry
    pub clock_ticks: u64,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub max_particles: usize,
    /// Spawn confetti on level clear
    pub celebrate: bool,
    /// Draw ball trails
    pub trails: bool,
    /// Skip decorative animation on the menu
    pub reduced_motion: bool,
    /// Pending host notifications
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session sitting at the title menu
    pub fn new(settings: &Settings) -> Self {
        let canvas = Vec2::new(settings.canvas_width, settings.canvas_height);
        let seed = settings.session_seed();
        let paddle = Paddle::new(canvas);
        let ball = Ball::attached_to(&paddle);

        let mut state = Self {
            canvas,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            game_ticks: 0,
            clock_ticks: 0,
            paddle,
            balls: vec![ball],
            bricks: Vec::new(),
            power_ups: Vec::new(),
            effects: ActiveEffects::default(),
            particles: Vec::new(),
            max_particles: settings.max_particles(),
            celebrate: settings.celebration_enabled(),
            trails: settings.effective_trails(),
            reduced_motion: settings.reduced_motion,
            events: Vec::new(),
        };

        log::info!("Brick Breaker session created with seed {}", seed);
        state.emit(GameEvent::Alert {
            text: "Brick Breaker Game loaded successfully!".to_string(),
        });
        state
    }

    /// Reset score/lives/level and rebuild every entity for a fresh game
    pub fn start_game(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.level = 1;
        self.game_ticks = 0;
        self.clock_ticks = 0;

        // Pending expiries belong to the previous game
        self.effects = ActiveEffects::default();
        self.power_ups.clear();
        self.particles.clear();

        self.paddle = Paddle::new(self.canvas);
        self.balls = vec![Ball::attached_to(&self.paddle)];
        self.bricks = generate_level(self.level, self.canvas.x, &mut self.rng);

        log::info!(
            "New game: level {} with {} bricks",
            self.level,
            self.bricks.len()
        );
        self.set_phase(GamePhase::Playing);
        self.emit_hud();
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.emit(GameEvent::Phase { phase });
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.emit(GameEvent::Score { score: self.score });
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Score, lives and level in one go (after resets)
    pub fn emit_hud(&mut self) {
        self.emit(GameEvent::Score { score: self.score });
        self.emit(GameEvent::Lives { lives: self.lives });
        self.emit(GameEvent::Level { level: self.level });
    }

    /// Take all pending host notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Live bricks that still block the level
    pub fn remaining_bricks(&self) -> usize {
        self.bricks
            .iter()
            .filter(|b| b.is_live() && b.counts_for_clear())
            .count()
    }

    pub fn any_ball_attached(&self) -> bool {
        self.balls.iter().any(|b| b.attached)
    }

    /// Fastest ball speed (for the HUD speed indicator)
    pub fn top_ball_speed(&self) -> f32 {
        self.balls.iter().map(|b| b.speed).fold(0.0, f32::max)
    }
}
