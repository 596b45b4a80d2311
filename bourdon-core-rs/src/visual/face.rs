//! The animated face.
//!
//! The backdrop (face disc and eyes) is installed once. Every cycle the
//! overlay is rebuilt: a 20-segment mouth whose curvature follows how far
//! voice 1 sits from 440 Hz, and two eyebrows whose tilt is a quantized
//! function of voice 2's frequency, mirrored left/right.

use core::f32::consts::PI;

use micromath::F32Ext;

use crate::scene::{Scene, Shape, Tone, PANEL_HEIGHT, PANEL_WIDTH};
use crate::tuning::CONCERT_A_HZ;

/// Number of line segments approximating the mouth curve.
pub const MOUTH_SEGMENTS: usize = 20;

/// Mouth width in pixels.
const MOUTH_WIDTH: i32 = 80;

/// Mouth baseline, pixels below panel center.
const MOUTH_DROP: i32 = 40;

/// Peak vertical deflection of the mouth curve at full curvature.
const MOUTH_DEPTH: f32 = 40.0;

/// Frequency span (Hz) that drives the curvature from flat to full.
const CURVE_SPAN_HZ: f32 = 220.0;

/// Brow quantization: levels span `BROW_BASE_HZ` upward in steps of
/// `BROW_STEP_HZ`.
const BROW_BASE_HZ: f32 = 220.0;
const BROW_STEP_HZ: f32 = 40.0;

/// Brow endpoint offsets (outer edge, inner edge) from panel center, one
/// pair per tilt level: −45° through neutral to +45°.
const BROW_TILT_OFFSETS: [(i32, i32); 9] = [
    (-36, -64),
    (-39, -61),
    (-42, -58),
    (-45, -55),
    (-50, -50),
    (-54, -46),
    (-58, -42),
    (-61, -39),
    (-64, -36),
];

/// Horizontal brow extent: inner edge 35 px from center, outer edge 65 px.
const BROW_INNER_X: i32 = 35;
const BROW_OUTER_X: i32 = 65;

pub struct Face;

impl Face {
    /// Install the static backdrop and return the strategy.
    pub fn install(scene: &mut Scene) -> Self {
        let cx = PANEL_WIDTH / 2;
        let cy = PANEL_HEIGHT / 2;
        scene.push_backdrop(Shape::Disc {
            center: (cx, cy),
            radius: (PANEL_WIDTH / 2 - 4) as u32,
            fill: Tone::FaceFill,
            outline: Some(Tone::Ink),
        });
        scene.push_backdrop(Shape::Disc {
            center: (cx - 50, cy - 40),
            radius: 10,
            fill: Tone::Ink,
            outline: None,
        });
        scene.push_backdrop(Shape::Disc {
            center: (cx + 50, cy - 40),
            radius: 10,
            fill: Tone::Ink,
            outline: None,
        });
        Face
    }

    pub fn render(&mut self, hz: [f32; 2], scene: &mut Scene) {
        scene.clear_overlay();
        let cx = PANEL_WIDTH / 2;
        let cy = PANEL_HEIGHT / 2;

        // Mouth: sine-modulated curve, flat at 440 Hz, smiling below it,
        // frowning above.
        let curve = ((hz[0] - CONCERT_A_HZ) / CURVE_SPAN_HZ).clamp(-1.0, 1.0);
        let mouth_y = cy + MOUTH_DROP;
        let step = MOUTH_WIDTH / MOUTH_SEGMENTS as i32;
        for i in 0..MOUTH_SEGMENTS {
            let x0 = cx - MOUTH_WIDTH / 2 + i as i32 * step;
            let lift = (i as f32 / MOUTH_SEGMENTS as f32 * PI).sin();
            let y = mouth_y + (lift * MOUTH_DEPTH * -curve) as i32;
            scene.push_overlay(Shape::Segment {
                start: (x0, y),
                end: (x0 + step, y),
                tone: Tone::Ink,
            });
        }

        // Eyebrows: quantize voice 2 into a tilt level, mirror the offsets
        // for the opposite brow.
        let level = (((hz[1] - BROW_BASE_HZ) / BROW_STEP_HZ) as i32).clamp(0, 8) as usize;
        let (outer_dy, inner_dy) = BROW_TILT_OFFSETS[level];
        scene.push_overlay(Shape::Segment {
            start: (cx - BROW_OUTER_X, cy + outer_dy),
            end: (cx - BROW_INNER_X, cy + inner_dy),
            tone: Tone::Ink,
        });
        scene.push_overlay(Shape::Segment {
            start: (cx + BROW_INNER_X, cy + inner_dy),
            end: (cx + BROW_OUTER_X, cy + outer_dy),
            tone: Tone::Ink,
        });
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
