//! The visualizer: three rendering strategies behind one entry point.
//!
//! Every strategy consumes the current two voice frequencies and rebuilds
//! the scene overlay; which one runs is fixed at startup by
//! [`VisualStyle`]. The strategies share nothing but the scene; each owns
//! whatever cross-frame state it needs (only the scrolling traces carry
//! any).

pub mod face;
pub mod scroll;
pub mod split;

pub use face::Face;
pub use scroll::ScrollingTraces;
pub use split::SplitTraces;

use crate::scene::Scene;

/// Phase divisor shared by both trace strategies: a display coordinate
/// times `frequency / 800` is the sine argument.
pub(crate) const TRACE_PHASE_DIVISOR: f32 = 800.0;

/// Startup selection of the rendering strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VisualStyle {
    /// Two vertical traces on opposite display halves.
    SplitTraces,
    /// Two horizontal traces across the full width; the three-voice
    /// variant of the instrument.
    ScrollingTraces,
    /// Animated face: mouth curvature and eyebrow tilt track the voices.
    Face,
}

impl VisualStyle {
    /// Number of synthesizer voices this variant drives.
    pub fn voice_count(&self) -> usize {
        match self {
            VisualStyle::ScrollingTraces => 3,
            _ => 2,
        }
    }

    /// Target scheduler period for this variant, in milliseconds.
    pub fn frame_period_ms(&self) -> u64 {
        match self {
            VisualStyle::Face => 50,
            _ => 10,
        }
    }

    /// Build the strategy, installing any static backdrop it needs.
    pub fn build(self, scene: &mut Scene) -> Visual {
        match self {
            VisualStyle::SplitTraces => Visual::SplitTraces(SplitTraces),
            VisualStyle::ScrollingTraces => Visual::ScrollingTraces(ScrollingTraces::new()),
            VisualStyle::Face => Visual::Face(Face::install(scene)),
        }
    }
}

/// A running visualizer instance.
pub enum Visual {
    SplitTraces(SplitTraces),
    ScrollingTraces(ScrollingTraces),
    Face(Face),
}

impl Visual {
    /// Produce this cycle's frame: replace the overlay's previous
    /// generation with primitives derived from the two voice frequencies.
    pub fn render(&mut self, hz: [f32; 2], scene: &mut Scene) {
        match self {
            Visual::SplitTraces(v) => v.render(hz, scene),
            Visual::ScrollingTraces(v) => v.render(hz, scene),
            Visual::Face(v) => v.render(hz, scene),
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
