//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color, laid out for direct upload
/// to a GPU vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Fixed colors; everything else derives from the cycling hue
pub mod colors {
    pub const BODY_FILL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const FOOT_SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.4];
}
