//! Off-screen RGB565 frame storage.
//!
//! The backing array is provided by the caller; at 240×240×2 bytes it is
//! far too large for a task stack, so the firmware reserves it statically.
//! The buffer implements [`DrawTarget`] so the rasterizer and
//! `embedded-graphics` primitives draw straight into memory.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use bourdon::scene::{PANEL_HEIGHT, PANEL_WIDTH};

/// Number of pixels in one full frame.
pub const FRAME_PIXELS: usize = (PANEL_WIDTH * PANEL_HEIGHT) as usize;

/// One panel-sized RGB565 frame over borrowed storage.
pub struct FrameBuffer<'b> {
    px: &'b mut [u16; FRAME_PIXELS],
}

impl<'b> FrameBuffer<'b> {
    /// Wrap a backing array. The existing contents are kept; every cycle
    /// starts with a [`fill`](Self::fill) anyway.
    pub fn new(backing: &'b mut [u16; FRAME_PIXELS]) -> Self {
        Self { px: backing }
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgb565) {
        self.px.fill(color.into_storage());
    }

    /// Iterate the frame row-major, as the panel expects it.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb565> + '_ {
        self.px.iter().map(|&raw| Rgb565::from(RawU16::new(raw)))
    }

    /// Read one pixel; `None` outside the panel.
    pub fn pixel_at(&self, x: i32, y: i32) -> Option<Rgb565> {
        if (0..PANEL_WIDTH).contains(&x) && (0..PANEL_HEIGHT).contains(&y) {
            let idx = (y * PANEL_WIDTH + x) as usize;
            Some(Rgb565::from(RawU16::new(self.px[idx])))
        } else {
            None
        }
    }
}

impl OriginDimensions for FrameBuffer<'_> {
    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH as u32, PANEL_HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if (0..PANEL_WIDTH).contains(&point.x) && (0..PANEL_HEIGHT).contains(&point.y) {
                let idx = (point.y * PANEL_WIDTH + point.x) as usize;
                self.px[idx] = color.into_storage();
            }
        }
        Ok(())
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
