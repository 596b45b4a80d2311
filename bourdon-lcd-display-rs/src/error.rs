//! Error types for the LCD driver.

use display_interface::DisplayError;

/// Errors that can occur during LCD operations.
///
/// The `mipidsi` crate reports bus-level failures through
/// [`DisplayError`], so this enum is non-generic.
#[derive(Debug)]
pub enum LcdError {
    /// Display interface error (wraps SPI and other bus-level failures).
    Interface(DisplayError),
    /// Panel did not come up during the initialisation sequence, or
    /// initialisation was attempted twice.
    InitializationFailed,
    /// An operation was attempted before
    /// [`LcdDriver::init()`](crate::LcdDriver::init) succeeded.
    NotInitialized,
}

impl From<DisplayError> for LcdError {
    fn from(e: DisplayError) -> Self {
        LcdError::Interface(e)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LcdError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            LcdError::Interface(_e) => defmt::write!(f, "Display interface error"),
            LcdError::InitializationFailed => defmt::write!(f, "Initialization failed"),
            LcdError::NotInitialized => defmt::write!(f, "Not initialized"),
        }
    }
}
