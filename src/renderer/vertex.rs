//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::Rgba;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Rgba) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Bytes per vertex in an uploaded buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Scale a color's alpha
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Colors for screen elements that never appear in the simulation
pub mod colors {
    use crate::{Rgba, rgb};

    pub const BACKGROUND: Rgba = rgb(0x000000);
    pub const BRICK_BORDER: Rgba = rgb(0x333333);
    pub const INDESTRUCTIBLE: Rgba = rgb(0x666666);
    pub const INDESTRUCTIBLE_STRIPE: Rgba = rgb(0x888888);
    pub const OVERLAY: Rgba = [0.0, 0.0, 0.0, 0.8];
    pub const TITLE: Rgba = rgb(0x007acc);
    pub const MENU_DOT: Rgba = [0.0, 0.478, 0.8, 0.1];
    pub const HINT: Rgba = [1.0, 1.0, 1.0, 0.7];
    pub const SPEED: Rgba = rgb(0xff8844);
    pub const GAME_OVER: Rgba = rgb(0xff4444);
}
