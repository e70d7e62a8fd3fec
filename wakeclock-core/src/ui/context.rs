//! Context threaded through every UI handler

use embedded_hal::delay::DelayNs;
use wakeclock_hal::FlashStorage;

use crate::clock::{format_time, Clock, WallTime};
use crate::config::{
    LED_PERCENT_STEP, MAX_DISPLAY_BRIGHTNESS, MESSAGE_PERIOD_MS, NAP_MAX_MINUTES,
    NAP_MIN_MINUTES, NAP_STEP_MINUTES,
};
use crate::indicator;
use crate::schedule::ScheduleBlock;
use crate::store::ScheduleStore;
use crate::traits::{DisplayDriver, IndicatorDriver, RealTimeClock};

/// Concrete collaborator types for one hardware build
pub trait Board {
    type Display: DisplayDriver;
    type Indicator: IndicatorDriver;
    type Rtc: RealTimeClock;
    type Storage: FlashStorage;
    type Delay: DelayNs;
}

/// Field of an edit session a rotation adjusts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditField {
    Hour,
    Minute,
    SleepHour,
    SleepMinute,
    QuietHour,
    QuietMinute,
    NapDuration,
    DisplayLevel,
    LedPercent,
}

/// Scratch values for the edit flow in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditSession {
    Time {
        hour: u8,
        minute: u8,
    },
    Schedule {
        sleep_hour: u8,
        sleep_minute: u8,
        quiet_hour: u8,
        quiet_minute: u8,
    },
    Nap {
        duration: u16,
    },
    Brightness {
        display: u8,
        led_percent: u8,
    },
}

fn wrap_step(value: u8, modulus: u8, forward: bool) -> u8 {
    if forward {
        (value + 1) % modulus
    } else {
        (value + modulus - 1) % modulus
    }
}

impl EditSession {
    /// Move one field a single step
    ///
    /// Hours and minutes wrap; durations and brightness clamp at their
    /// limits. Fields that do not belong to this session are ignored.
    pub fn step(&mut self, field: EditField, forward: bool) {
        match (self, field) {
            (EditSession::Time { hour, .. }, EditField::Hour)
            | (EditSession::Schedule { sleep_hour: hour, .. }, EditField::SleepHour)
            | (EditSession::Schedule { quiet_hour: hour, .. }, EditField::QuietHour) => {
                *hour = wrap_step(*hour, 24, forward);
            }
            (EditSession::Time { minute, .. }, EditField::Minute)
            | (EditSession::Schedule { sleep_minute: minute, .. }, EditField::SleepMinute)
            | (EditSession::Schedule { quiet_minute: minute, .. }, EditField::QuietMinute) => {
                *minute = wrap_step(*minute, 60, forward);
            }
            (EditSession::Nap { duration }, EditField::NapDuration) => {
                *duration = if forward {
                    duration.saturating_add(NAP_STEP_MINUTES).min(NAP_MAX_MINUTES)
                } else {
                    duration.saturating_sub(NAP_STEP_MINUTES).max(NAP_MIN_MINUTES)
                };
            }
            (EditSession::Brightness { display, .. }, EditField::DisplayLevel) => {
                *display = if forward {
                    (*display + 1).min(MAX_DISPLAY_BRIGHTNESS)
                } else {
                    display.saturating_sub(1)
                };
            }
            (EditSession::Brightness { led_percent, .. }, EditField::LedPercent) => {
                *led_percent = if forward {
                    (*led_percent + LED_PERCENT_STEP).min(100)
                } else {
                    led_percent.saturating_sub(LED_PERCENT_STEP)
                };
            }
            _ => {}
        }
    }

    /// Current value of a field, if this session has it
    pub fn value(&self, field: EditField) -> Option<u16> {
        let value = match (*self, field) {
            (EditSession::Time { hour, .. }, EditField::Hour) => hour as u16,
            (EditSession::Time { minute, .. }, EditField::Minute) => minute as u16,
            (EditSession::Schedule { sleep_hour, .. }, EditField::SleepHour) => sleep_hour as u16,
            (EditSession::Schedule { sleep_minute, .. }, EditField::SleepMinute) => {
                sleep_minute as u16
            }
            (EditSession::Schedule { quiet_hour, .. }, EditField::QuietHour) => quiet_hour as u16,
            (EditSession::Schedule { quiet_minute, .. }, EditField::QuietMinute) => {
                quiet_minute as u16
            }
            (EditSession::Nap { duration }, EditField::NapDuration) => duration,
            (EditSession::Brightness { display, .. }, EditField::DisplayLevel) => display as u16,
            (EditSession::Brightness { led_percent, .. }, EditField::LedPercent) => {
                led_percent as u16
            }
            _ => return None,
        };
        Some(value)
    }
}

/// Indicator level (0-255) to the nearest editable percentage
pub fn level_to_percent(level: u8) -> u8 {
    let percent = (level as u16 * 100 + 127) / 255;
    let step = LED_PERCENT_STEP as u16;
    (((percent + step / 2) / step) * step) as u8
}

/// Editable percentage to indicator level (0-255)
pub fn percent_to_level(percent: u8) -> u8 {
    ((percent.min(100) as u16 * 255 + 50) / 100) as u8
}

/// Everything a UI handler can touch
pub struct UiContext<B: Board> {
    pub display: B::Display,
    pub indicator: B::Indicator,
    pub clock: Clock<B::Rtc>,
    pub store: ScheduleStore<B::Storage>,
    pub delay: B::Delay,
    /// Edit flow in progress, if any
    pub edit: Option<EditSession>,
}

impl<B: Board> UiContext<B> {
    pub fn new(
        display: B::Display,
        indicator: B::Indicator,
        clock: Clock<B::Rtc>,
        store: ScheduleStore<B::Storage>,
        delay: B::Delay,
    ) -> Self {
        Self {
            display,
            indicator,
            clock,
            store,
            delay,
            edit: None,
        }
    }

    /// Put text on the display, logging failures
    pub fn print(&mut self, text: &str) {
        if let Err(e) = self.display.print(text) {
            warn!("Display write failed: {}", e);
        }
    }

    /// Show a message for one message period
    pub fn show_message(&mut self, text: &str) {
        self.print(text);
        self.delay.delay_ms(MESSAGE_PERIOD_MS);
    }

    pub fn colon(&mut self, on: bool) {
        let result = if on {
            self.display.colon_on()
        } else {
            self.display.colon_off()
        };
        if let Err(e) = result {
            warn!("Display colon write failed: {}", e);
        }
    }

    pub fn clear_display(&mut self) {
        if let Err(e) = self.display.clear() {
            warn!("Display clear failed: {}", e);
        }
    }

    /// Show the cached time of day with the colon lit
    pub fn show_time(&mut self) {
        let now = self.clock.last_known();
        self.print(&format_time(now.hour, now.minute));
        self.colon(true);
    }

    pub fn set_display_brightness(&mut self, level: u8) {
        if let Err(e) = self.display.set_brightness(level) {
            warn!("Display brightness write failed: {}", e);
        }
    }

    pub fn set_indicator_brightness(&mut self, level: u8) {
        if let Err(e) = self.indicator.set_brightness(level) {
            warn!("Indicator brightness write failed: {}", e);
        }
    }

    pub fn show_status(&mut self, block: ScheduleBlock) {
        if let Err(e) = self.indicator.set_status(block) {
            warn!("Indicator write failed: {}", e);
        }
    }

    /// Re-read the time and bring the indicator up to date
    pub fn refresh_indicator(&mut self) -> ScheduleBlock {
        let now = self.clock.now();
        self.refresh_indicator_at(now)
    }

    pub fn refresh_indicator_at(&mut self, now: WallTime) -> ScheduleBlock {
        indicator::refresh_indicator(&mut self.store, &mut self.indicator, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_fields_wrap() {
        let mut edit = EditSession::Time { hour: 23, minute: 0 };
        edit.step(EditField::Hour, true);
        edit.step(EditField::Minute, false);
        assert_eq!(edit, EditSession::Time { hour: 0, minute: 59 });
    }

    #[test]
    fn test_schedule_fields_are_independent() {
        let mut edit = EditSession::Schedule {
            sleep_hour: 20,
            sleep_minute: 0,
            quiet_hour: 7,
            quiet_minute: 15,
        };
        edit.step(EditField::QuietHour, false);
        edit.step(EditField::SleepMinute, true);
        assert_eq!(edit.value(EditField::SleepHour), Some(20));
        assert_eq!(edit.value(EditField::SleepMinute), Some(1));
        assert_eq!(edit.value(EditField::QuietHour), Some(6));
        assert_eq!(edit.value(EditField::QuietMinute), Some(15));
    }

    #[test]
    fn test_nap_duration_clamps() {
        let mut edit = EditSession::Nap { duration: 10 };
        edit.step(EditField::NapDuration, false);
        edit.step(EditField::NapDuration, false);
        assert_eq!(edit.value(EditField::NapDuration), Some(5));

        let mut edit = EditSession::Nap { duration: 295 };
        edit.step(EditField::NapDuration, true);
        edit.step(EditField::NapDuration, true);
        assert_eq!(edit.value(EditField::NapDuration), Some(300));
    }

    #[test]
    fn test_brightness_clamps() {
        let mut edit = EditSession::Brightness {
            display: 15,
            led_percent: 0,
        };
        edit.step(EditField::DisplayLevel, true);
        edit.step(EditField::LedPercent, false);
        assert_eq!(edit, EditSession::Brightness { display: 15, led_percent: 0 });

        edit.step(EditField::LedPercent, true);
        assert_eq!(edit.value(EditField::LedPercent), Some(5));
    }

    #[test]
    fn test_foreign_field_is_ignored() {
        let mut edit = EditSession::Nap { duration: 60 };
        edit.step(EditField::Hour, true);
        assert_eq!(edit, EditSession::Nap { duration: 60 });
        assert_eq!(edit.value(EditField::Hour), None);
    }

    #[test]
    fn test_percent_conversion() {
        assert_eq!(level_to_percent(128), 50);
        assert_eq!(level_to_percent(255), 100);
        assert_eq!(level_to_percent(0), 0);
        assert_eq!(percent_to_level(100), 255);
        assert_eq!(percent_to_level(50), 128);
        assert_eq!(percent_to_level(0), 0);
    }
}
