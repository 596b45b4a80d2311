//! Side-by-side vertical traces: voice 1 on the right display half,
//! voice 2 on the left.
//!
//! For each row, a sine of `y * frequency / 800` displaces a 2 px stripe
//! around the half's center line. Stateless: every frame is a pure
//! function of the current frequencies.

use micromath::F32Ext;

use super::TRACE_PHASE_DIVISOR;
use crate::scene::{Scene, Shape, Tone, PANEL_HEIGHT, PANEL_WIDTH};

/// Stripe thickness in pixels.
const STRIPE_PX: i32 = 2;

pub struct SplitTraces;

impl SplitTraces {
    pub fn render(&mut self, hz: [f32; 2], scene: &mut Scene) {
        scene.clear_overlay();
        let quarter = (PANEL_WIDTH / 4) as f32;
        for y in 0..PANEL_HEIGHT {
            let angle_a = y as f32 * hz[0] / TRACE_PHASE_DIVISOR;
            let angle_b = y as f32 * hz[1] / TRACE_PHASE_DIVISOR;
            let x_a = (3.0 * quarter + angle_a.sin() * quarter) as i32;
            let x_b = (quarter + angle_b.sin() * quarter) as i32;
            stripe(scene, x_a, y, Tone::VoiceA);
            stripe(scene, x_b, y, Tone::VoiceB);
        }
    }
}

/// Emit the horizontal run covering `center_x - 1 ..= center_x`, clipped
/// to the panel. An entirely off-panel stripe emits nothing.
fn stripe(scene: &mut Scene, center_x: i32, y: i32, tone: Tone) {
    let x0 = (center_x - STRIPE_PX + 1).max(0);
    let x1 = center_x.min(PANEL_WIDTH - 1);
    if x0 <= x1 {
        scene.push_overlay(Shape::Span {
            x: x0,
            y,
            width: (x1 - x0 + 1) as u32,
            tone,
        });
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_stripe_per_row_per_voice() {
        let mut scene = Scene::new();
        SplitTraces.render([440.0, 220.0], &mut scene);
        assert_eq!(scene.overlay_len(), 2 * PANEL_HEIGHT as usize);
    }

    #[test]
    fn voices_stay_on_their_halves() {
        let mut scene = Scene::new();
        SplitTraces.render([440.0, 220.0], &mut scene);
        for shape in scene.overlay() {
            let Shape::Span { x, width, tone, .. } = shape else {
                panic!("expected spans only");
            };
            let x_end = x + *width as i32 - 1;
            match tone {
                // Right half center 180, swing ±60: stripes stay right of center.
                Tone::VoiceA => assert!(*x >= PANEL_WIDTH / 2 - 1, "x={}", x),
                // Left half center 60, swing ±60.
                Tone::VoiceB => assert!(x_end <= PANEL_WIDTH / 2, "x_end={}", x_end),
                other => panic!("unexpected tone {:?}", other),
            }
        }
    }

    #[test]
    fn all_spans_are_on_panel() {
        let mut scene = Scene::new();
        SplitTraces.render([12_000.0, 26_000.0], &mut scene);
        for shape in scene.overlay() {
            let Shape::Span { x, y, width, .. } = shape else {
                panic!("expected spans only");
            };
            assert!(*x >= 0 && x + *width as i32 <= PANEL_WIDTH);
            assert!(*y >= 0 && *y < PANEL_HEIGHT);
            assert!(*width >= 1 && *width <= STRIPE_PX as u32);
        }
    }

    #[test]
    fn rerender_replaces_rather_than_accumulates() {
        let mut scene = Scene::new();
        let mut traces = SplitTraces;
        traces.render([100.0, 100.0], &mut scene);
        let count = scene.overlay_len();
        traces.render([200.0, 300.0], &mut scene);
        assert_eq!(scene.overlay_len(), count);
    }
}
