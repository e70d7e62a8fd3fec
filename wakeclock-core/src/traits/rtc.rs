//! Real-time clock trait

use crate::clock::WallTime;

/// Errors from the real-time clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    /// Bus transfer failed or was short
    Bus,
    /// Registers held an impossible value
    InvalidData,
}

/// Battery-backed time of day source
pub trait RealTimeClock {
    /// Read the current wall time
    fn now(&mut self) -> Result<WallTime, RtcError>;

    /// Set the time of day, leaving the date untouched
    fn set_time(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), RtcError>;
}
