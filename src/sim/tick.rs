//! Per-frame simulation tick
//!
//! Drives the menu → playing → paused → game-over state machine and, while
//! playing, advances every entity by one step.

use rand::Rng;

use super::collision::{
    ball_brick_contact, ball_fell_out, ball_paddle_collision, ball_wall_collision,
    keep_inside_walls, power_up_caught, resolve_brick_contact,
};
use super::level::{generate_level, level_cleared};
use super::particles::{spawn_burst, update_particles};
use super::powerups;
use super::state::{BrickHit, GameEvent, GamePhase, GameState, PowerUp, PowerUpKind};
use crate::colors;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Pointer x in canvas space; the paddle centers on it
    pub pointer_x: Option<f32>,
    /// Held arrow/A/D keys: -1 left, +1 right
    pub steer: f32,
    /// Click or space: start a game, or launch an attached ball
    pub launch: bool,
    /// Space while paused resumes
    pub resume: bool,
    /// P/Escape pause toggle
    pub pause: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Menu | GamePhase::GameOver => {
            if input.launch {
                state.start_game();
            }
        }
        GamePhase::Paused => {
            if input.pause || input.resume {
                state.set_phase(GamePhase::Playing);
            }
        }
        GamePhase::Playing => {
            if input.pause {
                state.set_phase(GamePhase::Paused);
                return;
            }
            update_playing(state, input);
        }
    }
}

fn update_playing(state: &mut GameState, input: &TickInput) {
    state.clock_ticks += 1;
    state.game_ticks += 1;

    state
        .paddle
        .steer(input.pointer_x, input.steer, state.canvas.x);

    if input.launch {
        for ball in state.balls.iter_mut().filter(|b| b.attached) {
            ball.launch(&mut state.rng);
        }
    }

    update_balls(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    // Gradual speed-up while a level drags on
    if state.game_ticks.is_multiple_of(SPEED_RAMP_INTERVAL_TICKS) {
        for ball in state.balls.iter_mut().filter(|b| !b.attached) {
            ball.speed *= SPEED_RAMP_FACTOR;
            log::debug!("Ball speed increased to {:.2}", ball.speed);
        }
    }

    for brick in state.bricks.iter_mut() {
        brick.update(state.canvas.x);
    }

    update_power_ups(state);
    powerups::expire_due(state);
    update_particles(&mut state.particles);

    if level_cleared(&state.bricks) {
        advance_level(state);
    }
}

/// Move balls and resolve their collisions; handle misses
fn update_balls(state: &mut GameState) {
    let mut points = 0;
    let mut missed = Vec::new();

    for (index, ball) in state.balls.iter_mut().enumerate() {
        if ball.attached {
            ball.follow(&state.paddle);
            continue;
        }

        ball.pos += ball.vel;
        ball.record_trail();

        ball_wall_collision(ball, state.canvas.x);

        if ball_fell_out(ball, state.canvas.y) {
            missed.push(index);
            continue;
        }

        ball_paddle_collision(ball, &state.paddle);

        // One brick per ball per tick
        let Some(contact) = ball_brick_contact(ball, &state.bricks) else {
            continue;
        };
        let brick = &mut state.bricks[contact.index];
        resolve_brick_contact(ball, brick, &contact);
        keep_inside_walls(ball, state.canvas.x);

        match brick.hit() {
            BrickHit::Absorbed => {}
            BrickHit::Damaged => {
                spawn_burst(
                    &mut state.particles,
                    &mut state.rng,
                    brick.center(),
                    brick.color,
                    HIT_PARTICLES,
                    state.max_particles,
                );
            }
            BrickHit::Destroyed => {
                points += brick.points();
                spawn_burst(
                    &mut state.particles,
                    &mut state.rng,
                    brick.center(),
                    brick.color,
                    HIT_PARTICLES + DESTROY_PARTICLES,
                    state.max_particles,
                );
                if let Some(kind) = brick.power_up {
                    state.power_ups.push(PowerUp::spawn_at(brick.center(), kind));
                }
            }
        }
    }

    if points > 0 {
        state.add_score(points);
    }

    if !missed.is_empty() {
        handle_misses(state, &missed);
    }
}

/// Drop lost balls; losing the last one costs a life
fn handle_misses(state: &mut GameState, missed: &[usize]) {
    if missed.len() < state.balls.len() {
        let mut index = 0;
        state.balls.retain(|_| {
            let keep = !missed.contains(&index);
            index += 1;
            keep
        });
        return;
    }

    state.balls.truncate(1);
    if let Some(ball) = state.balls.first_mut() {
        ball.reattach(&state.paddle);
    }

    state.lives = state.lives.saturating_sub(1);
    log::info!("Ball lost, {} lives left", state.lives);
    state.emit(GameEvent::Lives { lives: state.lives });

    if state.lives == 0 {
        state.set_phase(GamePhase::GameOver);
    }
}

/// Fall, catch on the paddle, or drop off the bottom
fn update_power_ups(state: &mut GameState) {
    let mut caught: Vec<PowerUpKind> = Vec::new();

    for power_up in state.power_ups.iter_mut() {
        power_up.fall(state.canvas.y);
        if power_up_caught(power_up, &state.paddle) {
            caught.push(power_up.kind);
            power_up.active = false;
        }
    }
    state.power_ups.retain(|p| p.active);

    for kind in caught {
        powerups::activate(state, kind);
    }
}

/// Board clear: next level, fresh grid, ball back on the paddle
fn advance_level(state: &mut GameState) {
    if state.celebrate {
        for _ in 0..CELEBRATION_PARTICLES {
            let pos = glam::Vec2::new(
                state.rng.random_range(0.0..state.canvas.x),
                state.rng.random_range(0.0..state.canvas.y),
            );
            let color = colors::CELEBRATION[state.rng.random_range(0..colors::CELEBRATION.len())];
            spawn_burst(
                &mut state.particles,
                &mut state.rng,
                pos,
                color,
                1,
                state.max_particles,
            );
        }
    }

    state.level += 1;
    state.bricks = generate_level(state.level, state.canvas.x, &mut state.rng);
    state.power_ups.clear();

    // Cap the unslowed speed
    let speed_cap = if state.effects.is_active(PowerUpKind::Slow) {
        BALL_LEVEL_SPEED_CAP * powerups::SLOW_FACTOR
    } else {
        BALL_LEVEL_SPEED_CAP
    };

    state.balls.truncate(1);
    if let Some(ball) = state.balls.first_mut() {
        ball.reattach(&state.paddle);
        ball.speed = ball.speed.min(speed_cap);
    }
    state.game_ticks = 0;

    log::info!("Level cleared! Now on level {}", state.level);
    state.emit(GameEvent::Level { level: state.level });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::Brick;
    use glam::Vec2;
    use proptest::prelude::*;

    fn launch() -> TickInput {
        TickInput {
            launch: true,
            ..Default::default()
        }
    }

    fn pause() -> TickInput {
        TickInput {
            pause: true,
            ..Default::default()
        }
    }

    fn playing_state() -> GameState {
        let mut state = GameState::new(&Settings::with_seed(12345));
        tick(&mut state, &launch());
        state.drain_events();
        state
    }

    #[test]
    fn test_menu_to_playing() {
        let mut state = GameState::new(&Settings::with_seed(12345));
        assert_eq!(state.phase, GamePhase::Menu);

        // Pause and idle input do nothing in the menu
        tick(&mut state, &pause());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Menu);

        tick(&mut state, &launch());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!((state.score, state.lives, state.level), (0, 3, 1));
        assert!(state.balls[0].attached);
    }

    #[test]
    fn test_launch_frees_ball() {
        let mut state = playing_state();
        tick(&mut state, &TickInput::default());
        assert!(state.balls[0].attached);
        tick(&mut state, &launch());
        assert!(!state.balls[0].attached);
        assert!(state.balls[0].vel.y < 0.0);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut state = playing_state();
        tick(&mut state, &pause());
        assert_eq!(state.phase, GamePhase::Paused);

        // Paused sessions don't advance
        let clock = state.clock_ticks;
        tick(&mut state, &launch());
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.clock_ticks, clock);

        tick(&mut state, &pause());
        assert_eq!(state.phase, GamePhase::Playing);

        tick(&mut state, &pause());
        let resume = TickInput {
            resume: true,
            ..Default::default()
        };
        tick(&mut state, &resume);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_life_lost_is_game_over() {
        let mut state = playing_state();
        state.lives = 1;
        tick(&mut state, &launch());
        state.balls[0].pos = Vec2::new(400.0, state.canvas.y + 20.0);
        state.balls[0].vel = Vec2::new(0.0, 5.0);
        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.balls[0].attached);
        assert!(state.balls[0].trail.is_empty());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Phase {
            phase: GamePhase::GameOver
        }));

        // Start input restarts from scratch
        tick(&mut state, &launch());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_miss_with_lives_left_reattaches() {
        let mut state = playing_state();
        tick(&mut state, &launch());
        state.balls[0].pos = Vec2::new(400.0, state.canvas.y + 20.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.balls[0].attached);
    }

    #[test]
    fn test_extra_ball_lost_costs_nothing() {
        let mut state = playing_state();
        tick(&mut state, &launch());
        let mut extra = state.balls[0].clone();
        extra.pos = Vec2::new(400.0, state.canvas.y + 20.0);
        extra.vel = Vec2::new(0.0, 5.0);
        state.balls.push(extra);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(!state.balls[0].attached);
    }

    #[test]
    fn test_destroying_brick_scores_once() {
        let mut state = playing_state();
        tick(&mut state, &launch());

        let mut brick = Brick::new(Vec2::new(300.0, 300.0), colors::RED, 2, false);
        brick.power_up = Some(PowerUpKind::ExtraLife);
        state.bricks = vec![
            brick,
            Brick::new(Vec2::new(35.0, 80.0), colors::BLUE, 1, false),
        ];

        // First hit: damaged, no score
        state.balls[0].pos = Vec2::new(337.0, 335.0);
        state.balls[0].vel = Vec2::new(0.0, -5.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 0);
        assert_eq!(state.bricks[0].hit_points, 1);
        assert!(state.balls[0].vel.y > 0.0);
        assert!(!state.particles.is_empty());

        // Second hit destroys it: 10 × max hit points
        state.balls[0].pos = Vec2::new(337.0, 335.0);
        state.balls[0].vel = Vec2::new(0.0, -5.0);
        tick(&mut state, &TickInput::default());
        assert!(state.bricks[0].destroyed);
        assert_eq!(state.score, 20);
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].pos.x, 337.5 - POWERUP_WIDTH / 2.0);

        // Destroyed brick is inert
        state.balls[0].pos = Vec2::new(337.0, 335.0);
        state.balls[0].vel = Vec2::new(0.0, -5.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 20);
        assert!(state.balls[0].vel.y < 0.0);
    }

    #[test]
    fn test_level_clear_advances() {
        let mut state = playing_state();
        tick(&mut state, &launch());
        state.balls[0].speed = 12.0;
        for brick in state.bricks.iter_mut() {
            brick.destroyed = true;
        }
        tick(&mut state, &TickInput::default());

        assert_eq!(state.level, 2);
        assert_eq!(state.bricks.len(), 54);
        assert!(state.bricks.iter().all(|b| !b.destroyed));
        assert!(state.balls[0].attached);
        assert_eq!(state.balls[0].speed, BALL_LEVEL_SPEED_CAP);
        assert_eq!(state.game_ticks, 0);
        // Clearing a level costs no life
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_brick_against_wall_keeps_ball_on_canvas() {
        let mut state = playing_state();
        tick(&mut state, &launch());

        let mut brick = Brick::new(Vec2::new(0.0, 300.0), colors::RED, 3, false);
        brick.move_speed = 1.0;
        brick.move_dir = -1.0;
        state.bricks = vec![brick];

        // Side contact pushes the ball toward the left wall
        state.balls[0].pos = Vec2::new(10.0, 312.5);
        state.balls[0].vel = Vec2::new(0.0, -0.5);
        tick(&mut state, &TickInput::default());

        assert_eq!(state.bricks[0].hit_points, 2);
        assert!(state.balls[0].pos.x >= 0.0);
        assert_eq!(state.balls[0].pos.x, BALL_RADIUS);
    }

    #[test]
    fn test_level_cap_survives_slow_expiry() {
        let mut state = playing_state();
        tick(&mut state, &launch());
        state.balls[0].speed = 12.0;
        powerups::activate(&mut state, PowerUpKind::Slow);

        for brick in state.bricks.iter_mut() {
            brick.destroyed = true;
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.level, 2);

        // Ball waits on the paddle while the slow timer runs out
        for _ in 0..500 {
            tick(&mut state, &TickInput::default());
        }
        assert!(!state.effects.is_active(PowerUpKind::Slow));
        assert!(state.balls[0].speed <= BALL_LEVEL_SPEED_CAP + 1e-4);
        assert!((state.balls[0].speed - BALL_LEVEL_SPEED_CAP).abs() < 1e-4);
    }

    #[test]
    fn test_power_up_caught_by_paddle() {
        let mut state = playing_state();
        let center = state.paddle.center();
        let top = state.paddle.pos.y - 21.0;
        state
            .power_ups
            .push(PowerUp::spawn_at(Vec2::new(center.x, top), PowerUpKind::Laser));
        tick(&mut state, &TickInput::default());
        assert!(state.power_ups.is_empty());
        assert!(state.effects.is_active(PowerUpKind::Laser));
        assert_eq!(state.paddle.color, colors::RED);
    }

    #[test]
    fn test_speed_ramp() {
        let mut state = playing_state();
        tick(&mut state, &launch());
        state.game_ticks = SPEED_RAMP_INTERVAL_TICKS - 1;
        tick(&mut state, &TickInput::default());
        assert!((state.balls[0].speed - BALL_START_SPEED * SPEED_RAMP_FACTOR).abs() < 1e-5);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(&Settings::with_seed(99999));
        let mut b = GameState::new(&Settings::with_seed(99999));
        let inputs = [
            launch(),
            TickInput {
                pointer_x: Some(250.0),
                ..Default::default()
            },
            launch(),
            TickInput {
                steer: 1.0,
                ..Default::default()
            },
        ];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.balls[0].pos, b.balls[0].pos);
        assert_eq!(a.paddle.pos, b.paddle.pos);
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_on_canvas(
            moves in proptest::collection::vec(
                (proptest::option::of(-200.0f32..1000.0), -1.0f32..=1.0),
                1..40,
            )
        ) {
            let mut state = playing_state();
            for (pointer_x, steer) in moves {
                tick(&mut state, &TickInput { pointer_x, steer, ..Default::default() });
                prop_assert!(state.paddle.pos.x >= 0.0);
                prop_assert!(state.paddle.pos.x <= state.canvas.x - state.paddle.size.x);
            }
        }
    }
}
