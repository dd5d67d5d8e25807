//! Collision detection and response
//!
//! Everything here is axis-aligned: the ball is tested by its bounding box,
//! and brick contacts resolve along the axis of least overlap.

use glam::Vec2;

use super::state::{Ball, Brick, Paddle, PowerUp};
use crate::consts::MAX_BOUNCE_ANGLE;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from its top-left corner and size
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) / 2.0
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// A ball/brick overlap and how to resolve it
#[derive(Debug, Clone, Copy)]
pub struct BrickContact {
    /// Index into the brick list
    pub index: usize,
    /// Face normal pointing from the brick toward the ball
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Bounce off the side and top walls
///
/// Returns true if the ball touched a wall this tick.
pub fn ball_wall_collision(ball: &mut Ball, canvas_width: f32) -> bool {
    let mut bounced = false;

    if ball.pos.x - ball.radius <= 0.0 || ball.pos.x + ball.radius >= canvas_width {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = ball
            .pos
            .x
            .clamp(ball.radius, (canvas_width - ball.radius).max(ball.radius));
        bounced = true;
    }

    if ball.pos.y - ball.radius <= 0.0 {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = ball.radius;
        bounced = true;
    }

    bounced
}

/// Pull the ball center back inside the side walls without touching velocity
///
/// Brick pushback runs after the wall bounce and can shove the ball past a
/// wall when a brick sits against it.
pub fn keep_inside_walls(ball: &mut Ball, canvas_width: f32) {
    ball.pos.x = ball
        .pos
        .x
        .clamp(ball.radius, (canvas_width - ball.radius).max(ball.radius));
}

/// The bottom edge is not a wall: the ball is lost once fully below it
pub fn ball_fell_out(ball: &Ball, canvas_height: f32) -> bool {
    ball.pos.y > canvas_height + ball.radius
}

/// Bounce off the paddle with an angle set by where the ball landed
///
/// Hitting the center sends the ball straight up; the edges send it out at
/// up to 60° from vertical. The ball is always sent upward.
pub fn ball_paddle_collision(ball: &mut Ball, paddle: &Paddle) -> bool {
    if !ball.rect().overlaps(&paddle.rect()) {
        return false;
    }

    let half_width = paddle.size.x / 2.0;
    let hit_offset = ((ball.pos.x - paddle.center().x) / half_width).clamp(-1.0, 1.0);
    let angle = hit_offset * MAX_BOUNCE_ANGLE;

    ball.vel = Vec2::new(ball.speed * angle.sin(), -(ball.speed * angle.cos()).abs());

    // Sit just above the paddle so the next tick doesn't hit again
    ball.pos.y = paddle.pos.y - ball.radius - 1.0;
    true
}

/// Find the first live brick the ball overlaps (iteration order wins ties)
pub fn ball_brick_contact(ball: &Ball, bricks: &[Brick]) -> Option<BrickContact> {
    let ball_rect = ball.rect();

    bricks
        .iter()
        .enumerate()
        .filter(|(_, brick)| brick.is_live())
        .find(|(_, brick)| ball_rect.overlaps(&brick.rect()))
        .map(|(index, brick)| {
            let bounds = brick.rect();
            let delta = ball.pos - bounds.center();
            let reach = bounds.half_extents() + Vec2::splat(ball.radius);
            let overlap = reach - delta.abs();

            if overlap.x < overlap.y {
                BrickContact {
                    index,
                    normal: Vec2::new(if delta.x > 0.0 { 1.0 } else { -1.0 }, 0.0),
                    penetration: overlap.x,
                }
            } else {
                BrickContact {
                    index,
                    normal: Vec2::new(0.0, if delta.y > 0.0 { 1.0 } else { -1.0 }),
                    penetration: overlap.y,
                }
            }
        })
}

/// Reflect off the contacted face and move the ball just outside it
pub fn resolve_brick_contact(ball: &mut Ball, brick: &Brick, contact: &BrickContact) {
    let bounds = brick.rect();
    ball.vel = reflect_velocity(ball.vel, contact.normal);

    if contact.normal.x > 0.0 {
        ball.pos.x = bounds.max.x + ball.radius;
    } else if contact.normal.x < 0.0 {
        ball.pos.x = bounds.min.x - ball.radius;
    } else if contact.normal.y > 0.0 {
        ball.pos.y = bounds.max.y + ball.radius;
    } else {
        ball.pos.y = bounds.min.y - ball.radius;
    }
}

/// Whether a falling capsule touches the paddle
pub fn power_up_caught(power_up: &PowerUp, paddle: &Paddle) -> bool {
    power_up.active && power_up.rect().overlaps(&paddle.rect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::consts::*;
    use crate::sim::state::PowerUpKind;
    use proptest::prelude::*;

    fn canvas() -> Vec2 {
        Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    fn free_ball(pos: Vec2, vel: Vec2) -> Ball {
        let mut ball = Ball::attached_to(&Paddle::new(canvas()));
        ball.attached = false;
        ball.pos = pos;
        ball.vel = vel;
        ball
    }

    #[test]
    fn test_left_wall_reflects() {
        let mut ball = free_ball(Vec2::new(BALL_RADIUS, 300.0), Vec2::new(3.0, -5.0));
        assert!(ball_wall_collision(&mut ball, CANVAS_WIDTH));
        assert_eq!(ball.vel.x, -3.0);
        assert_eq!(ball.vel.y, -5.0);
        assert_eq!(ball.pos.x, BALL_RADIUS);
    }

    #[test]
    fn test_right_wall_clamps() {
        let mut ball = free_ball(Vec2::new(CANVAS_WIDTH + 4.0, 300.0), Vec2::new(4.0, 2.0));
        assert!(ball_wall_collision(&mut ball, CANVAS_WIDTH));
        assert_eq!(ball.vel.x, -4.0);
        assert_eq!(ball.pos.x, CANVAS_WIDTH - BALL_RADIUS);
    }

    #[test]
    fn test_top_wall_reflects() {
        let mut ball = free_ball(Vec2::new(400.0, 3.0), Vec2::new(1.0, -5.0));
        assert!(ball_wall_collision(&mut ball, CANVAS_WIDTH));
        assert_eq!(ball.vel.y, 5.0);
        assert_eq!(ball.pos.y, BALL_RADIUS);
    }

    #[test]
    fn test_keep_inside_walls_leaves_velocity() {
        let mut ball = free_ball(Vec2::new(-BALL_RADIUS, 300.0), Vec2::new(-2.0, 1.0));
        keep_inside_walls(&mut ball, CANVAS_WIDTH);
        assert_eq!(ball.pos.x, BALL_RADIUS);
        assert_eq!(ball.vel, Vec2::new(-2.0, 1.0));

        ball.pos.x = CANVAS_WIDTH + 3.0;
        keep_inside_walls(&mut ball, CANVAS_WIDTH);
        assert_eq!(ball.pos.x, CANVAS_WIDTH - BALL_RADIUS);
    }

    #[test]
    fn test_bottom_is_not_a_wall() {
        let mut ball = free_ball(Vec2::new(400.0, 590.0), Vec2::new(0.0, 5.0));
        assert!(!ball_wall_collision(&mut ball, CANVAS_WIDTH));
        assert_eq!(ball.vel.y, 5.0);
        assert!(!ball_fell_out(&ball, CANVAS_HEIGHT));
        ball.pos.y = CANVAS_HEIGHT + BALL_RADIUS + 0.1;
        assert!(ball_fell_out(&ball, CANVAS_HEIGHT));
    }

    #[test]
    fn test_paddle_center_bounces_straight_up() {
        let paddle = Paddle::new(canvas());
        let mut ball = free_ball(
            Vec2::new(paddle.center().x, paddle.pos.y + 2.0),
            Vec2::new(0.0, 5.0),
        );
        assert!(ball_paddle_collision(&mut ball, &paddle));
        assert!(ball.vel.x.abs() < 1e-5);
        assert!((ball.vel.y + ball.speed).abs() < 1e-5);
        assert_eq!(ball.pos.y, paddle.pos.y - BALL_RADIUS - 1.0);
    }

    #[test]
    fn test_paddle_edge_bounces_at_sixty_degrees() {
        let paddle = Paddle::new(canvas());
        let mut ball = free_ball(
            Vec2::new(paddle.pos.x + paddle.size.x, paddle.pos.y + 2.0),
            Vec2::new(0.0, 5.0),
        );
        assert!(ball_paddle_collision(&mut ball, &paddle));
        let angle = ball.vel.x.atan2(-ball.vel.y);
        assert!((angle - MAX_BOUNCE_ANGLE).abs() < 1e-4);
        assert!((ball.vel.length() - ball.speed).abs() < 1e-4);
    }

    #[test]
    fn test_paddle_miss() {
        let paddle = Paddle::new(canvas());
        let mut ball = free_ball(Vec2::new(20.0, 200.0), Vec2::new(0.0, 5.0));
        assert!(!ball_paddle_collision(&mut ball, &paddle));
        assert_eq!(ball.vel, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_brick_contact_from_below() {
        let brick = Brick::new(Vec2::new(100.0, 100.0), colors::RED, 1, false);
        // Ball center just under the brick, moving up
        let mut ball = free_ball(Vec2::new(137.0, 130.0), Vec2::new(1.0, -5.0));
        let contact = ball_brick_contact(&ball, std::slice::from_ref(&brick)).unwrap();
        assert_eq!(contact.normal, Vec2::new(0.0, 1.0));
        resolve_brick_contact(&mut ball, &brick, &contact);
        assert_eq!(ball.vel, Vec2::new(1.0, 5.0));
        assert_eq!(ball.pos.y, 125.0 + BALL_RADIUS);
    }

    #[test]
    fn test_brick_contact_from_side() {
        let brick = Brick::new(Vec2::new(100.0, 100.0), colors::RED, 1, false);
        let mut ball = free_ball(Vec2::new(95.0, 112.0), Vec2::new(3.0, 1.0));
        let contact = ball_brick_contact(&ball, std::slice::from_ref(&brick)).unwrap();
        assert_eq!(contact.normal, Vec2::new(-1.0, 0.0));
        resolve_brick_contact(&mut ball, &brick, &contact);
        assert_eq!(ball.vel, Vec2::new(-3.0, 1.0));
        assert_eq!(ball.pos.x, 100.0 - BALL_RADIUS);
        // Resolved position no longer overlaps
        assert!(ball_brick_contact(&ball, std::slice::from_ref(&brick)).is_none());
    }

    #[test]
    fn test_destroyed_brick_is_not_collidable() {
        let mut first = Brick::new(Vec2::new(100.0, 100.0), colors::RED, 1, false);
        first.destroyed = true;
        let second = Brick::new(Vec2::new(100.0, 100.0), colors::BLUE, 1, false);
        let ball = free_ball(Vec2::new(137.0, 130.0), Vec2::new(0.0, -5.0));
        let contact = ball_brick_contact(&ball, &[first, second]).unwrap();
        assert_eq!(contact.index, 1);
    }

    #[test]
    fn test_first_brick_wins() {
        let a = Brick::new(Vec2::new(100.0, 100.0), colors::RED, 1, false);
        let b = Brick::new(Vec2::new(100.0, 100.0), colors::BLUE, 1, false);
        let ball = free_ball(Vec2::new(137.0, 130.0), Vec2::new(0.0, -5.0));
        assert_eq!(ball_brick_contact(&ball, &[a, b]).unwrap().index, 0);
        assert!(ball_brick_contact(&ball, &[]).is_none());
    }

    #[test]
    fn test_power_up_caught() {
        let paddle = Paddle::new(canvas());
        let above = Vec2::new(paddle.center().x, paddle.pos.y - 10.0);
        let mut p = PowerUp::spawn_at(above, PowerUpKind::Laser);
        assert!(power_up_caught(&p, &paddle));
        p.active = false;
        assert!(!power_up_caught(&p, &paddle));
        let far = PowerUp::spawn_at(Vec2::new(10.0, 100.0), PowerUpKind::Laser);
        assert!(!power_up_caught(&far, &paddle));
    }

    proptest! {
        #[test]
        fn prop_wall_correction_keeps_ball_inside(
            x in -50.0f32..850.0,
            y in -50.0f32..550.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let mut ball = free_ball(Vec2::new(x, y), Vec2::new(vx, vy));
            ball_wall_collision(&mut ball, CANVAS_WIDTH);
            prop_assert!(ball.pos.x >= 0.0 && ball.pos.x <= CANVAS_WIDTH);
            prop_assert!(ball.pos.y >= 0.0);
            prop_assert_eq!(ball.vel.length(), Vec2::new(vx, vy).length());
        }
    }
}
