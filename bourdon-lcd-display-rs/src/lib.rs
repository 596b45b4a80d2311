//! GC9A01 round-LCD output for the bourdon instrument.
//!
//! This crate owns the display boundary: [`LcdDriver`] wraps the
//! [`mipidsi`] GC9A01 panel driver over a generic `display-interface`
//! bus, [`FrameBuffer`] is an off-screen RGB565 frame, and [`render`]
//! turns a [`Scene`](bourdon::scene::Scene) into pixels.
//!
//! # Per-cycle flow
//!
//! ```ignore
//! compose(&scene, &mut frame);   // clear + rasterize, off-screen
//! lcd.present(&frame)?;          // one full-frame SPI push
//! ```
//!
//! The frame is always composed completely before anything is pushed, so
//! the panel never shows a partially updated cycle.
//!
//! # Crate Features
//!
//! - **`defmt`** *(default)* — structured logging via [`defmt`].

#![no_std]

pub mod driver;
pub mod error;
pub mod frame;
pub mod render;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use driver::LcdDriver;
pub use error::LcdError;
pub use frame::{FrameBuffer, FRAME_PIXELS};
pub use render::{compose, palette, rasterize};
