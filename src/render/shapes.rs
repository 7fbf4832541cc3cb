//! Shape generation for 2D primitives
//!
//! Every builder appends plain triangles; the caller owns the vertex list.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Convert an HSL color (h in degrees, s/l in percent) to RGBA
pub fn hsl_to_rgba(h: f32, s: f32, l: f32, alpha: f32) -> [f32; 4] {
    let h = h.rem_euclid(360.0);
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m, alpha]
}

/// Append a filled circle as a triangle fan
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Append a thick line segment as a quad
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);

    let v1 = a + perp;
    let v2 = a - perp;
    let v3 = b + perp;
    let v4 = b - perp;

    out.push(Vertex::new(v1.x, v1.y, color));
    out.push(Vertex::new(v2.x, v2.y, color));
    out.push(Vertex::new(v3.x, v3.y, color));

    out.push(Vertex::new(v3.x, v3.y, color));
    out.push(Vertex::new(v2.x, v2.y, color));
    out.push(Vertex::new(v4.x, v4.y, color));
}

/// Append a polyline as chained thick segments
pub fn polyline(out: &mut Vec<Vertex>, points: &[Vec2], width: f32, color: [f32; 4]) {
    for pair in points.windows(2) {
        line(out, pair[0], pair[1], width, color);
    }
}

/// Append a quad strip through `points` with a per-point half-width.
///
/// Used for the tapering body plates and particle streaks: each point
/// carries its own width so the strip can swell and pinch along its run.
pub fn tapered_strip(out: &mut Vec<Vertex>, points: &[(Vec2, f32)], color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }
    for pair in points.windows(2) {
        let (p1, w1) = pair[0];
        let (p2, w2) = pair[1];
        let dir = (p2 - p1).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x);

        let v1a = p1 + perp * w1;
        let v1b = p1 - perp * w1;
        let v2a = p2 + perp * w2;
        let v2b = p2 - perp * w2;

        out.push(Vertex::new(v1a.x, v1a.y, color));
        out.push(Vertex::new(v1b.x, v1b.y, color));
        out.push(Vertex::new(v2a.x, v2a.y, color));

        out.push(Vertex::new(v2a.x, v2a.y, color));
        out.push(Vertex::new(v1b.x, v1b.y, color));
        out.push(Vertex::new(v2b.x, v2b.y, color));
    }
}

/// Append a filled triangle
pub fn triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        let red = hsl_to_rgba(0.0, 100.0, 50.0, 1.0);
        assert!((red[0] - 1.0).abs() < 1e-5 && red[1].abs() < 1e-5 && red[2].abs() < 1e-5);
        let green = hsl_to_rgba(120.0, 100.0, 50.0, 1.0);
        assert!((green[1] - 1.0).abs() < 1e-5);
        let white = hsl_to_rgba(42.0, 0.0, 100.0, 1.0);
        assert!((white[0] - 1.0).abs() < 1e-5 && (white[1] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hsl_wraps_hue() {
        assert_eq!(
            hsl_to_rgba(380.0, 90.0, 50.0, 1.0),
            hsl_to_rgba(20.0, 90.0, 50.0, 1.0)
        );
    }

    #[test]
    fn test_circle_triangle_count() {
        let mut out = Vec::new();
        circle(&mut out, Vec2::ZERO, 5.0, [1.0; 4], 16);
        assert_eq!(out.len(), 16 * 3);
    }

    #[test]
    fn test_line_quad_spans_width() {
        let mut out = Vec::new();
        line(&mut out, Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, [1.0; 4]);
        assert_eq!(out.len(), 6);
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().any(|&y| (y - 2.0).abs() < 1e-5));
        assert!(ys.iter().any(|&y| (y + 2.0).abs() < 1e-5));
    }

    #[test]
    fn test_tapered_strip_degenerate_input() {
        let mut out = Vec::new();
        tapered_strip(&mut out, &[(Vec2::ZERO, 1.0)], [1.0; 4]);
        assert!(out.is_empty());
    }
}
