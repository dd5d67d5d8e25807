//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, with_alpha};
use crate::Rgba;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: Rgba) -> Vec<Vertex> {
    let max = min + size;
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a rectangle outline drawn inside its bounds
pub fn rect_outline(min: Vec2, size: Vec2, thickness: f32, color: Rgba) -> Vec<Vertex> {
    let t = thickness.min(size.x / 2.0).min(size.y / 2.0);
    let mut vertices = Vec::with_capacity(24);
    // Top, bottom, left, right
    vertices.extend(rect(min, Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + size.y - t), Vec2::new(size.x, t), color));
    vertices.extend(rect(Vec2::new(min.x, min.y + t), Vec2::new(t, size.y - 2.0 * t), color));
    vertices.extend(rect(
        Vec2::new(min.x + size.x - t, min.y + t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    ));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ball trail: fading dots, newest brightest
pub fn ball_trail<'a>(
    trail: impl ExactSizeIterator<Item = &'a Vec2>,
    ball_radius: f32,
    color: Rgba,
) -> Vec<Vertex> {
    let len = trail.len();
    if len == 0 {
        return Vec::new();
    }

    let mut vertices = Vec::new();
    for (i, pos) in trail.enumerate() {
        let alpha = (i + 1) as f32 / len as f32 * 0.3;
        vertices.extend(circle(*pos, ball_radius * 0.7, with_alpha(color, alpha), 12));
    }
    vertices
}
