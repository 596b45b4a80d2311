//! Core LCD driver wrapping the `mipidsi` GC9A01 model.
//!
//! [`LcdDriver`] manages the panel lifecycle: construction without bus
//! traffic, explicit initialisation, and whole-frame presentation.

use display_interface::WriteOnlyDataCommand;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use mipidsi::models::GC9A01;
use mipidsi::options::ColorInversion;
use mipidsi::{Builder, Display};

use bourdon::scene::{PANEL_HEIGHT, PANEL_WIDTH};

use crate::error::LcdError;
use crate::frame::FrameBuffer;

/// Concrete display type used internally by [`LcdDriver`].
type Panel<DI, RST> = Display<DI, GC9A01, RST>;

/// Driver for a GC9A01 240×240 round LCD over a write-only display bus.
///
/// # Lifecycle
///
/// 1. [`LcdDriver::new()`] — constructs the driver without any bus traffic.
/// 2. [`LcdDriver::init()`] — hardware reset and panel initialisation
///    sequence (blocking, uses the provided delay).
/// 3. [`LcdDriver::present()`] — push one composed [`FrameBuffer`] to the
///    panel, once per cycle.
pub struct LcdDriver<DI, RST>
where
    DI: WriteOnlyDataCommand,
    RST: OutputPin,
{
    /// Bus interface and reset pin, held until `init()` consumes them.
    parts: Option<(DI, RST)>,
    /// The initialised panel. `Some` after a successful `init()`.
    display: Option<Panel<DI, RST>>,
}

impl<DI, RST> LcdDriver<DI, RST>
where
    DI: WriteOnlyDataCommand,
    RST: OutputPin,
{
    /// Construct an uninitialised driver.
    ///
    /// No bus traffic is generated. You **must** call
    /// [`init()`](Self::init) before presenting frames.
    pub fn new(di: DI, rst: RST) -> Self {
        Self {
            parts: Some((di, rst)),
            display: None,
        }
    }

    /// Reset the panel and run the GC9A01 initialisation sequence.
    ///
    /// Must be called exactly once before any presentation.
    ///
    /// # Errors
    ///
    /// Returns [`LcdError::InitializationFailed`] if the panel does not
    /// come up, or if `init()` is called a second time.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), LcdError> {
        let (di, rst) = self.parts.take().ok_or(LcdError::InitializationFailed)?;
        let display = Builder::new(GC9A01, di)
            .display_size(PANEL_WIDTH as u16, PANEL_HEIGHT as u16)
            .invert_colors(ColorInversion::Inverted)
            .reset_pin(rst)
            .init(delay)
            .map_err(|_| LcdError::InitializationFailed)?;
        self.display = Some(display);
        Ok(())
    }

    /// Push one complete frame to the panel.
    ///
    /// This is the cycle's only bus transfer: the frame was already
    /// composed off-screen, so the panel goes from one complete picture
    /// to the next.
    ///
    /// # Errors
    ///
    /// Returns [`LcdError::NotInitialized`] if [`init()`](Self::init) has
    /// not succeeded, or [`LcdError::Interface`] on a bus-level failure.
    pub fn present(&mut self, frame: &FrameBuffer<'_>) -> Result<(), LcdError> {
        let display = self.display.as_mut().ok_or(LcdError::NotInitialized)?;
        let full_panel = Rectangle::new(
            Point::zero(),
            Size::new(PANEL_WIDTH as u32, PANEL_HEIGHT as u32),
        );
        display
            .fill_contiguous(&full_panel, frame.pixels())
            .map_err(LcdError::from)
    }

    /// Check whether the panel has been successfully initialised.
    ///
    /// No bus traffic is generated.
    pub fn is_initialized(&self) -> bool {
        self.display.is_some()
    }
}
