//! RGB status indicator trait

use crate::indicator::{block_color, Rgb};
use crate::schedule::ScheduleBlock;

/// Errors from driving the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorError {
    /// PWM or data line write failed
    Output,
}

/// Trait for the colour indicator
///
/// Implementations scale the requested colour by the current brightness.
pub trait IndicatorDriver {
    /// Show a full-scale colour
    fn show(&mut self, color: Rgb) -> Result<(), IndicatorError>;

    /// Set brightness, 0-255
    fn set_brightness(&mut self, level: u8) -> Result<(), IndicatorError>;

    /// Show the colour for a schedule block
    fn set_status(&mut self, block: ScheduleBlock) -> Result<(), IndicatorError> {
        self.show(block_color(block))
    }

    /// Turn every channel off
    fn off(&mut self) -> Result<(), IndicatorError> {
        self.set_status(ScheduleBlock::None)
    }
}
