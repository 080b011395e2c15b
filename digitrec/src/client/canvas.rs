//! Freehand stroke canvas.
//!
//! Strokes are painted black on a white 280x280 surface with a round 30 px
//! brush, the same geometry as the drawing widget the digits are captured on.

use image::{GrayImage, Luma};
use serde::Deserialize;
use std::path::Path;

use crate::client::error::ClientError;

pub const CANVAS_SIZE: u32 = 280;
pub const STROKE_WIDTH: f32 = 30.0;
const BACKGROUND: Luma<u8> = Luma([255]);
const INK: Luma<u8> = Luma([0]);

/// One continuous pen movement, as `[x, y]` canvas coordinates.
pub type Stroke = Vec<[f32; 2]>;

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Canvas {
    strokes: Vec<Stroke>,
}

impl Canvas {
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    /// Reads a JSON list of strokes.
    pub fn from_json(content: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn render(&self) -> GrayImage {
        let mut surface = GrayImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, BACKGROUND);
        let radius = STROKE_WIDTH / 2.0;

        for stroke in &self.strokes {
            match stroke.as_slice() {
                [] => {}
                [dot] => stamp(&mut surface, *dot, radius),
                points => {
                    for segment in points.windows(2) {
                        paint_segment(&mut surface, segment[0], segment[1], radius);
                    }
                }
            }
        }

        surface
    }
}

fn paint_segment(surface: &mut GrayImage, from: [f32; 2], to: [f32; 2], radius: f32) {
    let (width, height) = surface.dimensions();
    let bounds = (
        [-radius, -radius],
        [width as f32 + radius, height as f32 + radius],
    );
    let Some((from, to)) = clip_segment(from, to, bounds) else {
        return;
    };

    let (dx, dy) = (to[0] - from[0], to[1] - from[1]);
    // One stamp per pixel of travel keeps the stroke edge smooth.
    let steps = dx.hypot(dy).ceil().max(1.0) as usize;
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        stamp(surface, [from[0] + dx * t, from[1] + dy * t], radius);
    }
}

/// Liang-Barsky clip of a segment to `bounds`, so the step count stays bounded
/// by the canvas no matter how far away the stroke points are.
fn clip_segment(
    from: [f32; 2],
    to: [f32; 2],
    (lo, hi): ([f32; 2], [f32; 2]),
) -> Option<([f32; 2], [f32; 2])> {
    if !from.iter().chain(&to).all(|c| c.is_finite()) {
        return None;
    }

    let from = from.map(f64::from);
    let delta = [f64::from(to[0]) - from[0], f64::from(to[1]) - from[1]];
    // Parameter of each clipped end, plus the edge it was clipped against.
    let mut enter: (f64, Option<(usize, f32)>) = (0.0, None);
    let mut exit: (f64, Option<(usize, f32)>) = (1.0, None);

    for axis in 0..2 {
        let edges = [
            (-delta[axis], from[axis] - f64::from(lo[axis]), lo[axis]),
            (delta[axis], f64::from(hi[axis]) - from[axis], hi[axis]),
        ];
        for (p, q, edge) in edges {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 && r > enter.0 {
                enter = (r, Some((axis, edge)));
            } else if p > 0.0 && r < exit.0 {
                exit = (r, Some((axis, edge)));
            }
        }
    }
    if enter.0 > exit.0 {
        return None;
    }

    // The clipped coordinate sits exactly on its edge; the other one is clamped
    // since rounding at huge magnitudes can land just outside the box.
    let point = |(t, edge): (f64, Option<(usize, f32)>)| {
        let mut p = [0, 1].map(|axis| {
            ((from[axis] + delta[axis] * t) as f32).clamp(lo[axis], hi[axis])
        });
        if let Some((axis, value)) = edge {
            p[axis] = value;
        }
        p
    };
    Some((point(enter), point(exit)))
}

fn stamp(surface: &mut GrayImage, center: [f32; 2], radius: f32) {
    if !center.iter().all(|c| c.is_finite()) {
        return;
    }
    let (width, height) = surface.dimensions();
    let min_x = (center[0] - radius).floor().max(0.0) as u32;
    let min_y = (center[1] - radius).floor().max(0.0) as u32;
    let max_x = (center[0] + radius).ceil().min(width as f32 - 1.0);
    let max_y = (center[1] + radius).ceil().min(height as f32 - 1.0);
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }

    for y in min_y..=max_y as u32 {
        for x in min_x..=max_x as u32 {
            let (px, py) = (x as f32 + 0.5 - center[0], y as f32 + 0.5 - center[1]);
            if px * px + py * py <= radius * radius {
                surface.put_pixel(x, y, INK);
            }
        }
    }
}
