//! Frame building
//!
//! Turns a [`GameState`] into a backend-agnostic [`Frame`]: a colored
//! triangle list in canvas pixels plus text labels. Any 2D surface that can
//! fill triangles and draw text can present it.

pub mod shapes;
pub mod vertex;

use glam::Vec2;
use serde::Serialize;

use crate::consts::TICKS_PER_SECOND;
use crate::sim::{Ball, Brick, GamePhase, GameState, PowerUpKind};
use crate::{Rgba, colors as palette};
pub use vertex::Vertex;
use vertex::{colors, with_alpha};

/// Balls above this speed show the speed readout
const SPEED_INDICATOR_THRESHOLD: f32 = 5.5;
const MENU_DOTS: u32 = 50;
const BALL_SEGMENTS: u32 = 24;

/// Horizontal anchoring of a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text drawn on top of the geometry; `pos` is the baseline anchor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub pos: [f32; 2],
    /// Font size in pixels
    pub size: f32,
    pub color: Rgba,
    pub align: Align,
}

impl Label {
    fn new(text: impl Into<String>, pos: Vec2, size: f32, color: Rgba, align: Align) -> Self {
        Self {
            text: text.into(),
            pos: pos.to_array(),
            size,
            color,
            align,
        }
    }
}

/// Everything needed to present one frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Triangle list, back to front
    pub vertices: Vec<Vertex>,
    pub labels: Vec<Label>,
}

impl Frame {
    /// Raw vertex bytes for a GPU buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn has_label(&self, text: &str) -> bool {
        self.labels.iter().any(|l| l.text == text)
    }

    fn push(&mut self, vertices: Vec<Vertex>) {
        self.vertices.extend(vertices);
    }

    fn label(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: Rgba, align: Align) {
        self.labels.push(Label::new(text, pos, size, color, align));
    }
}

/// Build the frame for the current phase. `time_secs` only drives
/// decorative animation.
pub fn render(state: &GameState, time_secs: f32) -> Frame {
    let mut frame = Frame::default();
    frame.push(shapes::rect(Vec2::ZERO, state.canvas, colors::BACKGROUND));

    match state.phase {
        GamePhase::Menu => render_menu(&mut frame, state, time_secs),
        GamePhase::Playing => render_game(&mut frame, state),
        GamePhase::Paused => {
            render_game(&mut frame, state);
            render_pause(&mut frame, state);
        }
        GamePhase::GameOver => render_game_over(&mut frame, state),
    }

    frame
}

fn render_menu(frame: &mut Frame, state: &GameState, time_secs: f32) {
    let canvas = state.canvas;

    // Drifting dots; frozen when motion is reduced
    let time = if state.reduced_motion { 0.0 } else { time_secs };
    for i in 0..MENU_DOTS {
        let x = (i as f32 * 37.0 + time * 20.0).rem_euclid(canvas.x);
        let y = (i as f32 * 23.0 + time * 15.0).rem_euclid(canvas.y);
        frame.push(shapes::circle(Vec2::new(x, y), 2.0, colors::MENU_DOT, 8));
    }

    let mid = canvas / 2.0;
    frame.label("BRICK BREAKER", mid + Vec2::new(0.0, -80.0), 48.0, colors::TITLE, Align::Center);
    frame.label(
        "A Classic Arcade Game",
        mid + Vec2::new(0.0, -30.0),
        24.0,
        palette::WHITE,
        Align::Center,
    );
    frame.label(
        "Click or Press SPACE to Start",
        mid + Vec2::new(0.0, 40.0),
        28.0,
        palette::YELLOW,
        Align::Center,
    );
    frame.label(
        "Mouse: Move Paddle • Space/Click: Launch Ball • P: Pause",
        mid + Vec2::new(0.0, 100.0),
        16.0,
        colors::HINT,
        Align::Center,
    );
}

fn render_game(frame: &mut Frame, state: &GameState) {
    for brick in state.bricks.iter().filter(|b| b.is_live()) {
        render_brick(frame, brick);
    }

    for power_up in state.power_ups.iter().filter(|p| p.active) {
        frame.push(shapes::rect(power_up.pos, power_up.size, power_up.kind.color()));
        frame.push(shapes::rect_outline(power_up.pos, power_up.size, 2.0, palette::WHITE));
        let center = power_up.rect().center();
        frame.label(
            power_up_symbol(power_up.kind),
            center + Vec2::new(0.0, 5.0),
            14.0,
            palette::WHITE,
            Align::Center,
        );
    }

    for particle in &state.particles {
        let color = with_alpha(particle.color, particle.life);
        frame.push(shapes::circle(particle.pos, particle.size, color, 8));
    }

    render_paddle(frame, state);

    for ball in &state.balls {
        render_ball(frame, ball, state.trails);
    }

    render_hud(frame, state);
}

fn render_brick(frame: &mut Frame, brick: &Brick) {
    if brick.indestructible {
        frame.push(shapes::rect(brick.pos, brick.size, colors::INDESTRUCTIBLE));
        let mut x = 0.0;
        while x < brick.size.x {
            let width = 4.0_f32.min(brick.size.x - x);
            frame.push(shapes::rect(
                brick.pos + Vec2::new(x, 0.0),
                Vec2::new(width, brick.size.y),
                colors::INDESTRUCTIBLE_STRIPE,
            ));
            x += 8.0;
        }
        frame.push(shapes::rect_outline(brick.pos, brick.size, 3.0, colors::BRICK_BORDER));
        return;
    }

    // Damaged bricks fade out
    let intensity = brick.hit_points as f32 / brick.max_hit_points.max(1) as f32;
    frame.push(shapes::rect(brick.pos, brick.size, with_alpha(brick.color, intensity)));
    frame.push(shapes::rect(
        brick.pos,
        Vec2::new(brick.size.x, 3.0),
        with_alpha(palette::WHITE, intensity * 0.8),
    ));
    frame.push(shapes::rect_outline(brick.pos, brick.size, 1.0, colors::BRICK_BORDER));

    if brick.max_hit_points > 1 {
        frame.label(
            brick.hit_points.to_string(),
            brick.center() + Vec2::new(0.0, 4.0),
            12.0,
            palette::WHITE,
            Align::Center,
        );
    }
}

fn render_paddle(frame: &mut Frame, state: &GameState) {
    let paddle = &state.paddle;
    frame.push(shapes::rect(paddle.pos, paddle.size, paddle.color));
    if paddle.color == palette::PADDLE {
        frame.push(shapes::rect(
            paddle.pos,
            Vec2::new(paddle.size.x, paddle.size.y / 3.0),
            palette::PADDLE_HIGHLIGHT,
        ));
    }
}

fn render_ball(frame: &mut Frame, ball: &Ball, trails: bool) {
    if trails {
        frame.push(shapes::ball_trail(ball.trail.iter(), ball.radius, palette::BALL));
    }
    frame.push(shapes::circle(ball.pos, ball.radius, palette::BALL, BALL_SEGMENTS));
}

fn render_hud(frame: &mut Frame, state: &GameState) {
    let canvas = state.canvas;

    frame.label(
        format!("Score: {}", state.score),
        Vec2::new(10.0, 20.0),
        14.0,
        palette::WHITE,
        Align::Left,
    );
    frame.label(
        format!("Lives: {}  Level: {}", state.lives, state.level),
        Vec2::new(canvas.x / 2.0, 20.0),
        14.0,
        palette::WHITE,
        Align::Center,
    );

    if state.any_ball_attached() {
        frame.label(
            "Move mouse to control paddle",
            Vec2::new(canvas.x / 2.0, 50.0),
            16.0,
            palette::WHITE,
            Align::Center,
        );
        frame.label(
            "Click or press SPACE to launch ball",
            Vec2::new(canvas.x / 2.0, 75.0),
            16.0,
            palette::WHITE,
            Align::Center,
        );
    }

    frame.label(
        "Press P to pause",
        Vec2::new(canvas.x - 10.0, 20.0),
        12.0,
        colors::HINT,
        Align::Right,
    );

    let mut y = 40.0;
    for kind in state.effects.active_kinds() {
        let seconds = state
            .effects
            .get(kind)
            .map(|effect| effect.remaining(state.clock_ticks).div_ceil(TICKS_PER_SECOND))
            .unwrap_or(0);
        frame.label(
            format!("{} ({}s)", kind.label(), seconds),
            Vec2::new(10.0, y),
            12.0,
            kind.color(),
            Align::Left,
        );
        y += 20.0;
    }

    let speed = state.top_ball_speed();
    if speed > SPEED_INDICATOR_THRESHOLD {
        frame.label(
            format!("Speed: {:.1}x", speed),
            Vec2::new(10.0, y),
            12.0,
            colors::SPEED,
            Align::Left,
        );
    }
}

fn render_pause(frame: &mut Frame, state: &GameState) {
    let mid = state.canvas / 2.0;
    frame.push(shapes::rect(Vec2::ZERO, state.canvas, colors::OVERLAY));
    frame.label("PAUSED", mid + Vec2::new(0.0, -30.0), 48.0, palette::WHITE, Align::Center);
    frame.label(
        "Press P or ESC to resume",
        mid + Vec2::new(0.0, 20.0),
        20.0,
        palette::WHITE,
        Align::Center,
    );
    frame.label(
        "Press SPACE to resume",
        mid + Vec2::new(0.0, 50.0),
        20.0,
        palette::WHITE,
        Align::Center,
    );
}

fn render_game_over(frame: &mut Frame, state: &GameState) {
    let mid = state.canvas / 2.0;
    frame.push(shapes::rect(Vec2::ZERO, state.canvas, colors::OVERLAY));
    frame.label("GAME OVER", mid + Vec2::new(0.0, -80.0), 48.0, colors::GAME_OVER, Align::Center);
    frame.label(
        format!("Final Score: {}", state.score),
        mid + Vec2::new(0.0, -20.0),
        28.0,
        palette::WHITE,
        Align::Center,
    );
    frame.label(
        format!("Level Reached: {}", state.level),
        mid + Vec2::new(0.0, 20.0),
        28.0,
        palette::WHITE,
        Align::Center,
    );
    frame.label(
        "Click or Press SPACE to Restart",
        mid + Vec2::new(0.0, 70.0),
        20.0,
        palette::YELLOW,
        Align::Center,
    );
}

fn power_up_symbol(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::Laser => "L",
        PowerUpKind::Expand => "<>",
        PowerUpKind::MultiBall => "M",
        PowerUpKind::Slow => "S",
        PowerUpKind::ExtraLife => "+",
    }
}
