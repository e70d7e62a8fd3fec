//! Schedule engine
//!
//! Converts a time of day into one of the mutually exclusive schedule
//! blocks. All arithmetic is in minutes modulo one day, so intervals may
//! wrap past midnight.
//!
//! ```text
//!   winddown    sleep          quiet   wake   wake_end
//!      │  WindDown │    Sleep     │ Quiet │ Wake │
//!  ────┴───────────┴──────────────┴───────┴──────┴──── None ────
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{
    NAP_WINDDOWN_LEAD_MINUTES, WAKE_DELAY_MINUTES, WAKE_END_MINUTES, WINDDOWN_LEAD_MINUTES,
};

/// Minutes in one day
pub const MINUTES_PER_DAY: u16 = 1440;

/// Size of a serialized schedule record
pub const RECORD_LEN: usize = 10;

/// A time of day with minute resolution, always in `0..1440`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(0);

    /// Normalize any minute count into a time of day
    pub const fn from_minutes(minutes: u16) -> Self {
        Self(minutes % MINUTES_PER_DAY)
    }

    /// Build from hour and minute; out-of-range values wrap
    pub const fn from_hm(hour: u8, minute: u8) -> Self {
        Self::from_minutes(hour as u16 * 60 + minute as u16)
    }

    pub const fn minutes(self) -> u16 {
        self.0
    }

    pub const fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub const fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Add minutes, wrapping past midnight
    pub const fn add_minutes(self, delta: u16) -> Self {
        Self(((self.0 as u32 + delta as u32) % MINUTES_PER_DAY as u32) as u16)
    }

    /// Subtract minutes, wrapping before midnight
    pub const fn sub_minutes(self, delta: u16) -> Self {
        let delta = delta % MINUTES_PER_DAY;
        Self((self.0 + MINUTES_PER_DAY - delta) % MINUTES_PER_DAY)
    }
}

/// Half-open interval test on the 24h circle
///
/// `start == end` is the empty interval. When `start > end` the interval
/// wraps through midnight.
pub fn in_range(current: TimeOfDay, start: TimeOfDay, end: TimeOfDay) -> bool {
    if start <= end {
        start <= current && current < end
    } else {
        current >= start || current < end
    }
}

/// Phase of the day reported by a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleBlock {
    /// Getting ready for bed
    WindDown,
    /// Stay in bed
    Sleep,
    /// Awake is fine, stay quiet
    Quiet,
    /// Time to get up
    Wake,
    /// Outside every interval
    None,
}

/// Errors from decoding a persisted schedule record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// Record is not exactly [`RECORD_LEN`] bytes
    InvalidLength,
    /// An hour or minute field is out of range
    InvalidField,
    /// Serializer rejected the record
    Encode,
}

/// Five boundaries describing one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Schedule {
    pub winddown_start: TimeOfDay,
    pub sleep_start: TimeOfDay,
    pub quiet_start: TimeOfDay,
    pub wake_start: TimeOfDay,
    pub wake_end: TimeOfDay,
}

/// Wire layout: five (hour, minute) pairs, one byte each
#[derive(Serialize, Deserialize)]
struct ScheduleRecord {
    winddown: (u8, u8),
    sleep: (u8, u8),
    quiet: (u8, u8),
    wake: (u8, u8),
    wake_end: (u8, u8),
}

fn pair(t: TimeOfDay) -> (u8, u8) {
    (t.hour(), t.minute())
}

fn unpair((hour, minute): (u8, u8)) -> Result<TimeOfDay, ScheduleError> {
    if hour >= 24 || minute >= 60 {
        return Err(ScheduleError::InvalidField);
    }
    Ok(TimeOfDay::from_hm(hour, minute))
}

impl Schedule {
    /// Factory schedule: wind down 19:45, sleep 20:00, quiet 07:15,
    /// wake 07:30 until 07:45
    pub const DEFAULT: Self = Self {
        winddown_start: TimeOfDay::from_hm(19, 45),
        sleep_start: TimeOfDay::from_hm(20, 0),
        quiet_start: TimeOfDay::from_hm(7, 15),
        wake_start: TimeOfDay::from_hm(7, 30),
        wake_end: TimeOfDay::from_hm(7, 45),
    };

    /// Which block `now` falls into
    ///
    /// Blocks are checked in priority order so overlapping intervals
    /// resolve deterministically.
    pub fn current_block(&self, now: TimeOfDay) -> ScheduleBlock {
        if in_range(now, self.winddown_start, self.sleep_start) {
            ScheduleBlock::WindDown
        } else if in_range(now, self.sleep_start, self.quiet_start) {
            ScheduleBlock::Sleep
        } else if in_range(now, self.quiet_start, self.wake_start) {
            ScheduleBlock::Quiet
        } else if in_range(now, self.wake_start, self.wake_end) {
            ScheduleBlock::Wake
        } else {
            ScheduleBlock::None
        }
    }

    /// A nap starting now and sleeping for `duration_minutes`
    ///
    /// A zero duration gives an empty sleep block.
    pub fn nap(duration_minutes: u16, now: TimeOfDay) -> Self {
        let quiet_start = now.add_minutes(duration_minutes);
        Self {
            winddown_start: now.sub_minutes(NAP_WINDDOWN_LEAD_MINUTES),
            sleep_start: now,
            quiet_start,
            wake_start: quiet_start.add_minutes(WAKE_DELAY_MINUTES),
            wake_end: quiet_start.add_minutes(WAKE_END_MINUTES),
        }
    }

    /// Full schedule from the two boundaries a user edits
    pub fn from_sleep_and_quiet(sleep_start: TimeOfDay, quiet_start: TimeOfDay) -> Self {
        Self {
            winddown_start: sleep_start.sub_minutes(WINDDOWN_LEAD_MINUTES),
            sleep_start,
            quiet_start,
            wake_start: quiet_start.add_minutes(WAKE_DELAY_MINUTES),
            wake_end: quiet_start.add_minutes(WAKE_END_MINUTES),
        }
    }

    /// Serialize to the persisted record layout
    pub fn to_record(&self) -> Result<[u8; RECORD_LEN], ScheduleError> {
        let record = ScheduleRecord {
            winddown: pair(self.winddown_start),
            sleep: pair(self.sleep_start),
            quiet: pair(self.quiet_start),
            wake: pair(self.wake_start),
            wake_end: pair(self.wake_end),
        };

        let mut buf = [0u8; RECORD_LEN];
        let used = postcard::to_slice(&record, &mut buf)
            .map_err(|_| ScheduleError::Encode)?
            .len();
        if used != RECORD_LEN {
            return Err(ScheduleError::Encode);
        }
        Ok(buf)
    }

    /// Decode a persisted record, rejecting bad lengths and fields
    pub fn from_record(bytes: &[u8]) -> Result<Self, ScheduleError> {
        if bytes.len() != RECORD_LEN {
            return Err(ScheduleError::InvalidLength);
        }
        let record: ScheduleRecord =
            postcard::from_bytes(bytes).map_err(|_| ScheduleError::InvalidLength)?;

        Ok(Self {
            winddown_start: unpair(record.winddown)?,
            sleep_start: unpair(record.sleep)?,
            quiet_start: unpair(record.quiet)?,
            wake_start: unpair(record.wake)?,
            wake_end: unpair(record.wake_end)?,
        })
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Day of the week, Sunday first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DayOfWeek {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// One schedule per day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeeklySchedule {
    days: [Schedule; 7],
}

impl WeeklySchedule {
    /// Every day set to the same schedule
    pub const fn uniform(schedule: Schedule) -> Self {
        Self { days: [schedule; 7] }
    }

    pub fn get(&self, day: DayOfWeek) -> &Schedule {
        &self.days[day as usize]
    }

    pub fn set(&mut self, day: DayOfWeek, schedule: Schedule) {
        self.days[day as usize] = schedule;
    }

    pub fn iter(&self) -> impl Iterator<Item = (DayOfWeek, &Schedule)> {
        DayOfWeek::ALL.into_iter().zip(self.days.iter())
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::uniform(Schedule::DEFAULT)
    }
}
