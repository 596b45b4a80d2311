//! The visual frame as a display list.
//!
//! A [`Scene`] splits its shapes into a **backdrop** (appended once at
//! startup, like the face disc and eyes) and an **overlay** (the
//! per-cycle strategy output). Strategies clear the overlay before appending their
//! new primitives, so the previous generation is always gone before the
//! next one exists and stale shapes never accumulate.
//!
//! Colors are semantic [`Tone`] indices here; the display crate maps them
//! to panel colors.

use heapless::Vec;

/// Panel width in pixels.
pub const PANEL_WIDTH: i32 = 240;

/// Panel height in pixels.
pub const PANEL_HEIGHT: i32 = 240;

/// Backdrop capacity: the face backdrop needs three shapes.
pub const BACKDROP_SHAPES: usize = 8;

/// Overlay capacity: the widest strategy emits one span per row per voice
/// (2 × [`PANEL_HEIGHT`] = 480 shapes).
pub const OVERLAY_SHAPES: usize = 512;

/// Semantic color of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tone {
    Background,
    /// Voice 1 trace (right encoder).
    VoiceA,
    /// Voice 2 trace (left encoder).
    VoiceB,
    FaceFill,
    Ink,
}

/// One drawable primitive, in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Shape {
    /// Filled circle with an optional outline.
    Disc {
        center: (i32, i32),
        radius: u32,
        fill: Tone,
        outline: Option<Tone>,
    },
    /// One-pixel-wide line segment.
    Segment {
        start: (i32, i32),
        end: (i32, i32),
        tone: Tone,
    },
    /// Horizontal run of `width` pixels starting at (`x`, `y`).
    Span { x: i32, y: i32, width: u32, tone: Tone },
    /// Single pixel.
    Dot { x: i32, y: i32, tone: Tone },
}

/// The display list for one panel.
#[derive(Debug, Default)]
pub struct Scene {
    backdrop: Vec<Shape, BACKDROP_SHAPES>,
    overlay: Vec<Shape, OVERLAY_SHAPES>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a static shape. Backdrop shapes persist for the process
    /// lifetime and draw beneath the overlay.
    ///
    /// Shapes beyond the fixed capacity are dropped.
    pub fn push_backdrop(&mut self, shape: Shape) {
        if self.backdrop.push(shape).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("scene backdrop full; shape dropped");
        }
    }

    /// Drop the overlay's current generation of shapes.
    pub fn clear_overlay(&mut self) {
        self.overlay.clear();
    }

    /// Append a per-cycle shape on top of the backdrop.
    ///
    /// Shapes beyond the fixed capacity are dropped.
    pub fn push_overlay(&mut self, shape: Shape) {
        if self.overlay.push(shape).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("scene overlay full; shape dropped");
        }
    }

    pub fn backdrop(&self) -> &[Shape] {
        &self.backdrop
    }

    pub fn overlay(&self) -> &[Shape] {
        &self.overlay
    }

    /// Number of overlay shapes currently resident.
    pub fn overlay_len(&self) -> usize {
        self.overlay.len()
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
