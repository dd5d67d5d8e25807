//! Power-up activation and expiry
//!
//! Timed effects store an expiry tick on the session clock instead of
//! scheduling callbacks, so a new game simply drops them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Ball, GameEvent, GameState, PowerUpKind};
use crate::colors;
use crate::consts::TICKS_PER_SECOND;

/// Paddle width multiplier while expanded
pub const EXPAND_FACTOR: f32 = 1.5;
/// Ball speed multiplier while slowed
pub const SLOW_FACTOR: f32 = 0.6;
/// Angle between the source ball and each extra multi-ball (radians)
pub const MULTIBALL_SPREAD: f32 = 0.5;

/// How long a timed effect lasts, `None` for instant effects
pub const fn duration_ticks(kind: PowerUpKind) -> Option<u64> {
    match kind {
        PowerUpKind::Laser => Some(10 * TICKS_PER_SECOND),
        PowerUpKind::Expand => Some(15 * TICKS_PER_SECOND),
        PowerUpKind::Slow => Some(8 * TICKS_PER_SECOND),
        PowerUpKind::MultiBall | PowerUpKind::ExtraLife => None,
    }
}

/// A running timed effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub activated_at: u64,
    pub expires_at: u64,
}

impl TimedEffect {
    pub fn remaining(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }
}

/// Active power-up effects (one slot per timed kind)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub laser: Option<TimedEffect>,
    pub expand: Option<TimedEffect>,
    pub slow: Option<TimedEffect>,
}

impl ActiveEffects {
    fn slot(&self, kind: PowerUpKind) -> Option<&Option<TimedEffect>> {
        match kind {
            PowerUpKind::Laser => Some(&self.laser),
            PowerUpKind::Expand => Some(&self.expand),
            PowerUpKind::Slow => Some(&self.slow),
            PowerUpKind::MultiBall | PowerUpKind::ExtraLife => None,
        }
    }

    fn slot_mut(&mut self, kind: PowerUpKind) -> Option<&mut Option<TimedEffect>> {
        match kind {
            PowerUpKind::Laser => Some(&mut self.laser),
            PowerUpKind::Expand => Some(&mut self.expand),
            PowerUpKind::Slow => Some(&mut self.slow),
            PowerUpKind::MultiBall | PowerUpKind::ExtraLife => None,
        }
    }

    pub fn get(&self, kind: PowerUpKind) -> Option<TimedEffect> {
        self.slot(kind).copied().flatten()
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.get(kind).is_some()
    }

    /// Active timed kinds in display order
    pub fn active_kinds(&self) -> Vec<PowerUpKind> {
        [PowerUpKind::Laser, PowerUpKind::Expand, PowerUpKind::Slow]
            .into_iter()
            .filter(|kind| self.is_active(*kind))
            .collect()
    }

    /// Color claimed by the most recently activated visual effect
    pub fn paddle_color(&self) -> crate::Rgba {
        let laser = self.laser.map(|e| (e.activated_at, PowerUpKind::Laser));
        let expand = self.expand.map(|e| (e.activated_at, PowerUpKind::Expand));
        match (laser, expand) {
            (Some(l), Some(e)) => {
                if e.0 >= l.0 {
                    e.1.color()
                } else {
                    l.1.color()
                }
            }
            (Some((_, kind)), None) | (None, Some((_, kind))) => kind.color(),
            (None, None) => colors::PADDLE,
        }
    }
}

/// Apply a collected power-up
pub fn activate(state: &mut GameState, kind: PowerUpKind) {
    let now = state.clock_ticks;

    match kind {
        PowerUpKind::ExtraLife => {
            state.lives += 1;
            state.emit(GameEvent::Lives { lives: state.lives });
        }
        PowerUpKind::MultiBall => spawn_multiball(state),
        PowerUpKind::Laser | PowerUpKind::Expand | PowerUpKind::Slow => {
            let Some(duration) = duration_ticks(kind) else {
                return;
            };
            let fresh = TimedEffect {
                activated_at: now,
                expires_at: now + duration,
            };
            let Some(slot) = state.effects.slot_mut(kind) else {
                return;
            };
            // Re-activation only replaces the timer; the effect is applied once
            let already_active = slot.replace(fresh).is_some();
            if !already_active {
                apply(state, kind);
            }
        }
    }

    state.paddle.color = state.effects.paddle_color();
    log::info!("Power-up {:?} activated at tick {}", kind, now);
    state.emit(GameEvent::PowerUp { kind, active: true });
}

/// Undo every timed effect whose expiry tick has passed
pub fn expire_due(state: &mut GameState) {
    let now = state.clock_ticks;

    for kind in [PowerUpKind::Laser, PowerUpKind::Expand, PowerUpKind::Slow] {
        let due = state
            .effects
            .get(kind)
            .is_some_and(|effect| effect.expires_at <= now);
        if !due {
            continue;
        }
        if let Some(slot) = state.effects.slot_mut(kind) {
            *slot = None;
        }
        revert(state, kind);
        state.paddle.color = state.effects.paddle_color();
        log::info!("Power-up {:?} expired at tick {}", kind, now);
        state.emit(GameEvent::PowerUp {
            kind,
            active: false,
        });
    }
}

fn apply(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Expand => {
            state.paddle.size.x *= EXPAND_FACTOR;
            state.paddle.clamp_to(state.canvas.x);
        }
        PowerUpKind::Slow => {
            for ball in &mut state.balls {
                ball.speed *= SLOW_FACTOR;
                ball.vel *= SLOW_FACTOR;
            }
        }
        // Laser is purely visual (paddle tint)
        _ => {}
    }
}

fn revert(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Expand => {
            state.paddle.size.x /= EXPAND_FACTOR;
            state.paddle.clamp_to(state.canvas.x);
        }
        PowerUpKind::Slow => {
            for ball in &mut state.balls {
                ball.speed /= SLOW_FACTOR;
                ball.vel /= SLOW_FACTOR;
            }
        }
        _ => {}
    }
}

/// Split the first free ball into three
fn spawn_multiball(state: &mut GameState) {
    let Some(source) = state.balls.iter().find(|b| !b.attached).cloned() else {
        log::debug!("Multi-ball collected with no ball in flight");
        return;
    };

    for spread in [MULTIBALL_SPREAD, -MULTIBALL_SPREAD] {
        let vel = Vec2::from_angle(spread).rotate(source.vel);
        state.balls.push(Ball { vel, ..source.clone() });
    }
    log::debug!("Multi-ball: {} balls in play", state.balls.len());
}
