//! Time source and tick handling
//!
//! The RTC square wave raises a [`TickFlag`] once per second from
//! interrupt context. The main loop hands the flag to [`Clock::poll`],
//! which re-reads the RTC and reports a change only when the displayed
//! `HHMM` string would change, so downstream work happens at most once
//! per minute.

use core::fmt::Write;

use portable_atomic::{AtomicBool, Ordering};

use crate::schedule::{DayOfWeek, TimeOfDay};
use crate::traits::{DisplayText, RealTimeClock, RtcError};

/// A reading from the real-time clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallTime {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
    /// 0 (Sunday) to 6
    pub day_of_week: u8,
}

impl WallTime {
    pub const fn new(hour: u8, minute: u8, second: u8, day_of_week: u8) -> Self {
        Self {
            hour,
            minute,
            second,
            day_of_week,
        }
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hm(self.hour, self.minute)
    }

    /// Day of the week; an out-of-range register value reads as Sunday
    pub fn day(&self) -> DayOfWeek {
        DayOfWeek::from_index(self.day_of_week).unwrap_or(DayOfWeek::Sunday)
    }
}

/// Format a time as 12-hour `HHMM` with the leading zero blanked
///
/// `00:05` renders as `1205`, `09:30` as ` 930`, `13:07` as ` 107`.
pub fn format_time(hour: u8, minute: u8) -> DisplayText {
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    let mut text = DisplayText::new();
    let _ = write!(text, "{:2}{:02}", hour12, minute % 60);
    text
}

/// One-shot notification shared with interrupt context
///
/// `raise` is the only operation allowed from the interrupt side.
pub struct TickFlag {
    raised: AtomicBool,
}

impl TickFlag {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Mark a tick as pending
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

impl Default for TickFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Cached view of the real-time clock
pub struct Clock<R> {
    rtc: R,
    last: WallTime,
    displayed: DisplayText,
}

impl<R: RealTimeClock> Clock<R> {
    /// Wrap an RTC and take an initial reading
    pub fn new(rtc: R) -> Self {
        let mut clock = Self {
            rtc,
            last: WallTime::default(),
            displayed: DisplayText::new(),
        };
        let now = clock.now();
        clock.displayed = format_time(now.hour, now.minute);
        clock
    }

    /// Read the RTC, falling back to the last good reading
    pub fn now(&mut self) -> WallTime {
        match self.rtc.now() {
            Ok(time) => {
                self.last = time;
                time
            }
            Err(e) => {
                warn!("RTC read failed: {}, keeping last time", e);
                self.last
            }
        }
    }

    /// Most recent successful reading, without touching the bus
    pub fn last_known(&self) -> WallTime {
        self.last
    }

    /// Text currently shown for the time of day
    pub fn time_string(&self) -> &str {
        &self.displayed
    }

    /// Write a new time of day to the RTC
    pub fn set_time(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), RtcError> {
        self.rtc.set_time(hour, minute, second)?;
        self.last.hour = hour;
        self.last.minute = minute;
        self.last.second = second;
        self.displayed = format_time(hour, minute);
        info!("Time set to {}:{}", hour, minute);
        Ok(())
    }

    /// Consume a pending tick
    ///
    /// Returns the new time only when the formatted string changed. Any
    /// number of raises between polls count as one tick; a failed read
    /// keeps the previous string and reports nothing.
    pub fn poll(&mut self, tick: &TickFlag) -> Option<WallTime> {
        if !tick.take() {
            return None;
        }

        let time = match self.rtc.now() {
            Ok(time) => time,
            Err(e) => {
                warn!("RTC read failed on tick: {}", e);
                return None;
            }
        };
        self.last = time;

        let text = format_time(time.hour, time.minute);
        if text == self.displayed {
            return None;
        }
        trace!("Minute changed to {}:{}", time.hour, time.minute);
        self.displayed = text;
        Some(time)
    }

    pub fn rtc_mut(&mut self) -> &mut R {
        &mut self.rtc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRtc;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0, 5).as_str(), "1205");
        assert_eq!(format_time(9, 30).as_str(), " 930");
        assert_eq!(format_time(12, 0).as_str(), "1200");
        assert_eq!(format_time(13, 7).as_str(), " 107");
        assert_eq!(format_time(23, 59).as_str(), "1159");
    }

    #[test]
    fn test_tick_flag() {
        let flag = TickFlag::new();
        assert!(!flag.take());
        flag.raise();
        flag.raise();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn test_poll_without_tick_does_nothing() {
        let mut clock = Clock::new(MockRtc::at(WallTime::new(8, 0, 0, 1)));
        clock.rtc_mut().time = WallTime::new(8, 1, 0, 1);
        let flag = TickFlag::new();
        assert_eq!(clock.poll(&flag), None);
        assert_eq!(clock.time_string(), " 800");
    }

    #[test]
    fn test_poll_reports_minute_change_once() {
        let mut clock = Clock::new(MockRtc::at(WallTime::new(8, 0, 58, 1)));
        let flag = TickFlag::new();

        // Sub-minute tick
        clock.rtc_mut().time = WallTime::new(8, 0, 59, 1);
        flag.raise();
        assert_eq!(clock.poll(&flag), None);

        // Several raises before one poll coalesce
        clock.rtc_mut().time = WallTime::new(8, 1, 0, 1);
        flag.raise();
        flag.raise();
        flag.raise();
        assert_eq!(clock.poll(&flag), Some(WallTime::new(8, 1, 0, 1)));
        assert_eq!(clock.poll(&flag), None);
        assert_eq!(clock.time_string(), " 801");
    }

    #[test]
    fn test_failed_read_keeps_last_time() {
        let mut clock = Clock::new(MockRtc::at(WallTime::new(22, 15, 0, 3)));
        clock.rtc_mut().fail = true;

        let flag = TickFlag::new();
        flag.raise();
        assert_eq!(clock.poll(&flag), None);
        assert_eq!(clock.now(), WallTime::new(22, 15, 0, 3));
        assert_eq!(clock.time_string(), "1015");
    }

    #[test]
    fn test_set_time_updates_display_string() {
        let mut clock = Clock::new(MockRtc::at(WallTime::new(6, 0, 0, 2)));
        clock.set_time(18, 45, 0).unwrap();

        assert_eq!(clock.time_string(), " 645");
        assert_eq!(clock.rtc_mut().set_calls, vec![(18, 45, 0)]);
        assert_eq!(clock.last_known().day_of_week, 2);
    }

    #[test]
    fn test_failed_set_time_is_reported() {
        let mut clock = Clock::new(MockRtc::at(WallTime::new(6, 0, 0, 2)));
        clock.rtc_mut().fail = true;
        assert_eq!(clock.set_time(7, 0, 0), Err(RtcError::Bus));
        assert_eq!(clock.time_string(), " 600");
    }
}
