//! Board-agnostic core logic for the wake clock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (display, indicator, real-time clock)
//! - Daily schedule model and block classification
//! - Persistent schedule store over the flash key-value trait
//! - Minute-tick clock service
//! - Menu/edit state machine and the application loop

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
mod fmt;

pub mod app;
pub mod clock;
pub mod config;
pub mod indicator;
pub mod schedule;
pub mod store;
pub mod traits;
pub mod ui;

#[cfg(test)]
mod mock;

pub use app::WakeClock;
pub use clock::{Clock, TickFlag, WallTime};
pub use indicator::Rgb;
pub use schedule::{DayOfWeek, Schedule, ScheduleBlock, TimeOfDay, WeeklySchedule};
pub use store::{DeviceSettings, ScheduleStore, StoreError};
pub use ui::{Action, Board, StateId};
