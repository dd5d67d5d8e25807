//! Input mapping
//!
//! Hosts feed raw mouse/keyboard events into [`InputState`]; once per frame
//! [`InputState::take_tick_input`] turns them into a [`TickInput`].

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::{GamePhase, GameState, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    A,
    D,
    Space,
    P,
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "KeyA" => Some(Key::A),
            "KeyD" => Some(Key::D),
            "Space" => Some(Key::Space),
            "KeyP" => Some(Key::P),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Raw events delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer position in canvas space
    MouseMove { x: f32, y: f32 },
    Click,
    KeyDown(Key),
    KeyUp(Key),
}

/// Held keys, last pointer position and one-shot actions since the last tick
#[derive(Debug, Clone)]
pub struct InputState {
    held: HashSet<Key>,
    pub mouse: Vec2,
    launch: bool,
    resume: bool,
    pause: bool,
}

impl InputState {
    /// Pointer starts at the canvas center so the paddle doesn't jump
    pub fn new(canvas: Vec2) -> Self {
        Self {
            held: HashSet::new(),
            mouse: canvas / 2.0,
            launch: false,
            resume: false,
            pause: false,
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::MouseMove { x, y } => self.mouse = Vec2::new(x, y),
            InputEvent::Click => self.launch = true,
            InputEvent::KeyDown(key) => {
                // Key repeat shouldn't retrigger one-shot actions
                let fresh = self.held.insert(key);
                if !fresh {
                    return;
                }
                match key {
                    Key::Space => {
                        self.launch = true;
                        self.resume = true;
                    }
                    Key::P | Key::Escape => self.pause = true,
                    _ => {}
                }
            }
            InputEvent::KeyUp(key) => {
                self.held.remove(&key);
            }
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// -1 when steering left, +1 right, 0 for neither or both
    pub fn steer(&self) -> f32 {
        let left = self.is_held(Key::Left) || self.is_held(Key::A);
        let right = self.is_held(Key::Right) || self.is_held(Key::D);
        match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    /// Input for the next tick; one-shot actions are consumed
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            pointer_x: Some(self.mouse.x),
            steer: self.steer(),
            launch: self.launch,
            resume: self.resume,
            pause: self.pause,
        };
        self.launch = false;
        self.resume = false;
        self.pause = false;
        input
    }
}

/// Plays the game by itself (demo runs and soak tests)
#[derive(Debug, Clone, Default)]
pub struct Autopilot;

impl Autopilot {
    /// Track the most urgent ball, grab power-ups when nothing is falling
    pub fn input(&self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();

        match state.phase {
            GamePhase::Menu | GamePhase::GameOver => {
                input.launch = true;
                return input;
            }
            GamePhase::Paused => {
                input.resume = true;
                return input;
            }
            GamePhase::Playing => {}
        }

        if state.any_ball_attached() {
            input.launch = true;
        }

        // Lowest descending ball is the one to save
        let threat = state
            .balls
            .iter()
            .filter(|b| !b.attached && b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let target = match threat {
            Some(ball) => {
                // Vary the contact point so the ball doesn't loop forever
                let time = state.clock_ticks as f32 * 0.01;
                let offset = time.sin() * 0.4 * state.paddle.size.x / 2.0;
                Some(ball.pos.x + offset)
            }
            None => state
                .power_ups
                .iter()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|p| p.rect().center().x)
                .or_else(|| state.balls.first().map(|b| b.pos.x)),
        };

        input.pointer_x = target;
        input
    }
}
