//! Alphanumeric display trait

/// Number of character cells on the display
pub const DISPLAY_WIDTH: usize = 4;

/// Text sized for one full display line
pub type DisplayText = heapless::String<DISPLAY_WIDTH>;

/// Errors that can occur talking to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer failed
    Bus,
    /// Controller did not acknowledge its address
    NotResponding,
}

/// Trait for the 4-character clock display
///
/// Text is left-aligned; characters past [`DISPLAY_WIDTH`] are dropped and
/// missing characters are blank.
pub trait DisplayDriver {
    /// Replace the displayed text
    fn print(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Blank every segment, including the colon
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Light the hour/minute separator
    fn colon_on(&mut self) -> Result<(), DisplayError>;

    /// Turn the separator off
    fn colon_off(&mut self) -> Result<(), DisplayError>;

    /// Set dimming level, 0 (dimmest) to 15
    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError>;
}
