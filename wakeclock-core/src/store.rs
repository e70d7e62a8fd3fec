//! Persistent schedule store
//!
//! Owns the weekly schedule, the nap schedule and its enabled flag, and
//! the device settings. Reads never fail: a missing or unreadable record
//! falls back to the compiled-in default (schedules are written back so
//! the miss heals itself). Writes report errors to the caller.

use wakeclock_hal::{FlashError, FlashStorage, StorageKey};

use crate::config::{DEFAULT_DISPLAY_BRIGHTNESS, DEFAULT_LED_BRIGHTNESS, MAX_DISPLAY_BRIGHTNESS};
use crate::schedule::{DayOfWeek, Schedule, ScheduleError, TimeOfDay, WeeklySchedule, RECORD_LEN};

/// Errors from store write paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Flash backend failed
    Flash(FlashError),
    /// Record could not be encoded or decoded
    Record(ScheduleError),
}

impl From<FlashError> for StoreError {
    fn from(e: FlashError) -> Self {
        StoreError::Flash(e)
    }
}

impl From<ScheduleError> for StoreError {
    fn from(e: ScheduleError) -> Self {
        StoreError::Record(e)
    }
}

/// Snapshot of the persisted device settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceSettings {
    pub locked: bool,
    /// 0-15
    pub display_brightness: u8,
    /// 0-255
    pub led_brightness: u8,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            locked: false,
            display_brightness: DEFAULT_DISPLAY_BRIGHTNESS,
            led_brightness: DEFAULT_LED_BRIGHTNESS,
        }
    }
}

/// Schedule and settings persistence over a key-value flash backend
pub struct ScheduleStore<S> {
    storage: S,
}

impl<S: FlashStorage> ScheduleStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Write factory defaults on first boot
    ///
    /// Safe to call on every boot; does nothing once the sentinel is set.
    pub fn init(&mut self) -> Result<(), StoreError> {
        if self.is_initialized() {
            debug!("Schedule store already initialized");
            return Ok(());
        }

        info!("First boot, writing default schedules");
        self.save_all_schedules(&Schedule::DEFAULT)?;
        self.save_nap(&Schedule::DEFAULT)?;
        self.storage.write_bool(StorageKey::NapEnabled, false)?;
        self.storage.write_bool(StorageKey::Initialized, true)?;
        Ok(())
    }

    pub fn is_initialized(&mut self) -> bool {
        self.storage
            .read_bool(StorageKey::Initialized)
            .unwrap_or(false)
    }

    fn read_schedule(&mut self, key: StorageKey) -> Result<Schedule, StoreError> {
        let mut buf = [0u8; RECORD_LEN];
        let len = self.storage.read(key, &mut buf)?;
        Ok(Schedule::from_record(&buf[..len])?)
    }

    fn write_schedule(&mut self, key: StorageKey, schedule: &Schedule) -> Result<(), StoreError> {
        let record = schedule.to_record()?;
        self.storage.write(key, &record)?;
        Ok(())
    }

    /// Schedule for one day, restoring the default if the record is bad
    pub fn load_schedule(&mut self, day: DayOfWeek) -> Schedule {
        let key = StorageKey::schedule(day.index());
        match self.read_schedule(key) {
            Ok(schedule) => schedule,
            Err(e) => {
                warn!("{} unreadable ({}), restoring default", key.name(), e);
                if let Err(e) = self.write_schedule(key, &Schedule::DEFAULT) {
                    warn!("Failed to restore {}: {}", key.name(), e);
                }
                Schedule::DEFAULT
            }
        }
    }

    /// All seven days
    pub fn load_weekly(&mut self) -> WeeklySchedule {
        let mut week = WeeklySchedule::default();
        for day in DayOfWeek::ALL {
            let schedule = self.load_schedule(day);
            week.set(day, schedule);
        }
        week
    }

    pub fn save_schedule(&mut self, day: DayOfWeek, schedule: &Schedule) -> Result<(), StoreError> {
        self.write_schedule(StorageKey::schedule(day.index()), schedule)
    }

    /// Apply one schedule to every day of the week
    pub fn save_all_schedules(&mut self, schedule: &Schedule) -> Result<(), StoreError> {
        for day in DayOfWeek::ALL {
            self.save_schedule(day, schedule)?;
        }
        Ok(())
    }

    pub fn reset_schedule(&mut self, day: DayOfWeek) -> Result<(), StoreError> {
        self.save_schedule(day, &Schedule::DEFAULT)
    }

    pub fn reset_all(&mut self) -> Result<(), StoreError> {
        info!("Resetting weekly schedule to defaults");
        self.save_all_schedules(&Schedule::DEFAULT)
    }

    /// Stored nap schedule, if the record is present and valid
    pub fn try_load_nap(&mut self) -> Result<Schedule, StoreError> {
        self.read_schedule(StorageKey::NapSchedule)
    }

    /// Stored nap schedule, or the default when unreadable
    pub fn load_nap(&mut self) -> Schedule {
        match self.try_load_nap() {
            Ok(schedule) => schedule,
            Err(e) => {
                warn!("Nap schedule unreadable ({}), using default", e);
                Schedule::DEFAULT
            }
        }
    }

    pub fn save_nap(&mut self, schedule: &Schedule) -> Result<(), StoreError> {
        self.write_schedule(StorageKey::NapSchedule, schedule)
    }

    /// Persist a nap starting at `now` and enable it
    pub fn start_nap(&mut self, duration_minutes: u16, now: TimeOfDay) -> Result<Schedule, StoreError> {
        let nap = Schedule::nap(duration_minutes, now);
        self.save_nap(&nap)?;
        self.storage.write_bool(StorageKey::NapEnabled, true)?;
        info!("Nap started for {} minutes", duration_minutes);
        Ok(nap)
    }

    /// Disable the nap; the stored times are kept
    pub fn stop_nap(&mut self) -> Result<(), StoreError> {
        self.storage.write_bool(StorageKey::NapEnabled, false)?;
        info!("Nap stopped");
        Ok(())
    }

    pub fn is_nap_enabled(&mut self) -> bool {
        self.storage
            .read_bool(StorageKey::NapEnabled)
            .unwrap_or(false)
    }

    /// A nap is active exactly when it is enabled
    pub fn is_nap_active(&mut self) -> bool {
        self.is_nap_enabled()
    }

    pub fn is_locked(&mut self) -> bool {
        self.storage
            .read_bool(StorageKey::DeviceLocked)
            .unwrap_or(false)
    }

    pub fn set_locked(&mut self, locked: bool) -> Result<(), StoreError> {
        self.storage.write_bool(StorageKey::DeviceLocked, locked)?;
        info!("Device {}", if locked { "locked" } else { "unlocked" });
        Ok(())
    }

    pub fn display_brightness(&mut self) -> u8 {
        self.storage
            .read_u8(StorageKey::DisplayLevel)
            .unwrap_or(DEFAULT_DISPLAY_BRIGHTNESS)
            .min(MAX_DISPLAY_BRIGHTNESS)
    }

    pub fn set_display_brightness(&mut self, level: u8) -> Result<(), StoreError> {
        self.storage
            .write_u8(StorageKey::DisplayLevel, level.min(MAX_DISPLAY_BRIGHTNESS))?;
        Ok(())
    }

    pub fn led_brightness(&mut self) -> u8 {
        self.storage
            .read_u8(StorageKey::LedLevel)
            .unwrap_or(DEFAULT_LED_BRIGHTNESS)
    }

    pub fn set_led_brightness(&mut self, level: u8) -> Result<(), StoreError> {
        self.storage.write_u8(StorageKey::LedLevel, level)?;
        Ok(())
    }

    pub fn settings(&mut self) -> DeviceSettings {
        DeviceSettings {
            locked: self.is_locked(),
            display_brightness: self.display_brightness(),
            led_brightness: self.led_brightness(),
        }
    }

    /// Erase everything; the next [`init`](Self::init) rewrites defaults
    pub fn factory_reset(&mut self) -> Result<(), StoreError> {
        warn!("Factory reset, erasing settings partition");
        self.storage.erase_all()?;
        Ok(())
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
