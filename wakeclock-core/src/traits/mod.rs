//! Hardware abstraction traits
//!
//! These traits define the interface between the schedule/UI logic and
//! the chip drivers in `wakeclock-drivers`.

pub mod display;
pub mod indicator;
pub mod rtc;

pub use display::{DisplayDriver, DisplayError, DisplayText, DISPLAY_WIDTH};
pub use indicator::{IndicatorDriver, IndicatorError};
pub use rtc::{RealTimeClock, RtcError};
