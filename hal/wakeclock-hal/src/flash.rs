//! Flash storage abstractions
//!
//! Provides the key vocabulary and a blocking key-value trait for the
//! settings partition. Values are opaque byte strings; the schedule store
//! decides their layout.

/// Namespace that groups every wake clock record
pub const NAMESPACE: &str = "wake-clock";

/// Storage keys for persisted records
///
/// The flash backend stores each record under its one-byte id. The
/// textual [`StorageKey::name`] is the stable record name used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// First-boot sentinel (bool)
    Initialized = 0,
    /// Weekly schedule entries, one per day (10-byte records)
    ScheduleSunday = 1,
    ScheduleMonday = 2,
    ScheduleTuesday = 3,
    ScheduleWednesday = 4,
    ScheduleThursday = 5,
    ScheduleFriday = 6,
    ScheduleSaturday = 7,
    /// Nap schedule (10-byte record)
    NapSchedule = 8,
    /// Nap enabled flag (bool)
    NapEnabled = 9,
    /// Input lock flag (bool)
    DeviceLocked = 10,
    /// Display brightness, 0-15
    DisplayLevel = 11,
    /// Indicator brightness, 0-255
    LedLevel = 12,
}

impl StorageKey {
    /// Number of distinct keys
    pub const COUNT: usize = 13;

    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::Initialized),
            1 => Some(StorageKey::ScheduleSunday),
            2 => Some(StorageKey::ScheduleMonday),
            3 => Some(StorageKey::ScheduleTuesday),
            4 => Some(StorageKey::ScheduleWednesday),
            5 => Some(StorageKey::ScheduleThursday),
            6 => Some(StorageKey::ScheduleFriday),
            7 => Some(StorageKey::ScheduleSaturday),
            8 => Some(StorageKey::NapSchedule),
            9 => Some(StorageKey::NapEnabled),
            10 => Some(StorageKey::DeviceLocked),
            11 => Some(StorageKey::DisplayLevel),
            12 => Some(StorageKey::LedLevel),
            _ => None,
        }
    }

    /// Schedule key for a day index (Sunday = 0)
    ///
    /// Out-of-range indices wrap into the week.
    pub fn schedule(day_index: u8) -> Self {
        match day_index % 7 {
            0 => StorageKey::ScheduleSunday,
            1 => StorageKey::ScheduleMonday,
            2 => StorageKey::ScheduleTuesday,
            3 => StorageKey::ScheduleWednesday,
            4 => StorageKey::ScheduleThursday,
            5 => StorageKey::ScheduleFriday,
            _ => StorageKey::ScheduleSaturday,
        }
    }

    /// Persisted record name
    pub fn name(self) -> &'static str {
        match self {
            StorageKey::Initialized => "initialized",
            StorageKey::ScheduleSunday => "sched_sunday",
            StorageKey::ScheduleMonday => "sched_monday",
            StorageKey::ScheduleTuesday => "sched_tuesday",
            StorageKey::ScheduleWednesday => "sched_wednesday",
            StorageKey::ScheduleThursday => "sched_thursday",
            StorageKey::ScheduleFriday => "sched_friday",
            StorageKey::ScheduleSaturday => "sched_saturday",
            StorageKey::NapSchedule => "nap_schedule",
            StorageKey::NapEnabled => "nap_schedule_enabled",
            StorageKey::DeviceLocked => "device_locked",
            StorageKey::DisplayLevel => "display_lvl",
            StorageKey::LedLevel => "led_lvl",
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

/// Flash storage trait
///
/// Provides wear-leveled key-value storage for the settings partition.
/// Calls block until the operation completes; the main loop tolerates
/// the latency of a flash write.
pub trait FlashStorage {
    /// Read a value by key into the provided buffer
    ///
    /// # Returns
    /// The number of bytes read, or an error.
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError>;

    /// Write a value by key, replacing any previous value
    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError>;

    /// Check if a key exists in storage
    fn exists(&mut self, key: StorageKey) -> bool;

    /// Erase all stored data
    ///
    /// This erases the entire settings partition.
    fn erase_all(&mut self) -> Result<(), FlashError>;

    /// Read a one-byte boolean
    fn read_bool(&mut self, key: StorageKey) -> Result<bool, FlashError> {
        self.read_u8(key).map(|v| v != 0)
    }

    /// Write a one-byte boolean
    fn write_bool(&mut self, key: StorageKey, value: bool) -> Result<(), FlashError> {
        self.write_u8(key, value as u8)
    }

    /// Read a single byte, rejecting records of any other length
    fn read_u8(&mut self, key: StorageKey) -> Result<u8, FlashError> {
        let mut buf = [0u8; 1];
        match self.read(key, &mut buf) {
            Ok(1) => Ok(buf[0]),
            Ok(_) | Err(FlashError::BufferTooSmall) => Err(FlashError::Corrupted),
            Err(e) => Err(e),
        }
    }

    /// Write a single byte
    fn write_u8(&mut self, key: StorageKey, value: u8) -> Result<(), FlashError> {
        self.write(key, &[value])
    }
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match StorageKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_byte_round_trip() {
        for id in 0..StorageKey::COUNT as u8 {
            let key = StorageKey::from_u8(id).unwrap();
            assert_eq!(key.as_u8(), id);
        }
        assert_eq!(StorageKey::from_u8(StorageKey::COUNT as u8), None);
    }

    #[test]
    fn test_schedule_keys_by_day() {
        assert_eq!(StorageKey::schedule(0), StorageKey::ScheduleSunday);
        assert_eq!(StorageKey::schedule(6), StorageKey::ScheduleSaturday);
        assert_eq!(StorageKey::schedule(7), StorageKey::ScheduleSunday);
        assert_eq!(StorageKey::schedule(3).name(), "sched_wednesday");
    }

    #[test]
    fn test_record_names() {
        assert_eq!(StorageKey::NapEnabled.name(), "nap_schedule_enabled");
        assert_eq!(StorageKey::DisplayLevel.name(), "display_lvl");
        assert_eq!(StorageKey::LedLevel.name(), "led_lvl");
    }

    struct OneSlot {
        value: Option<[u8; 4]>,
        len: usize,
    }

    impl FlashStorage for OneSlot {
        fn read(&mut self, _key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
            let value = self.value.ok_or(FlashError::NotFound)?;
            if buffer.len() < self.len {
                return Err(FlashError::BufferTooSmall);
            }
            buffer[..self.len].copy_from_slice(&value[..self.len]);
            Ok(self.len)
        }

        fn write(&mut self, _key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
            let mut value = [0u8; 4];
            value[..data.len()].copy_from_slice(data);
            self.value = Some(value);
            self.len = data.len();
            Ok(())
        }

        fn exists(&mut self, _key: StorageKey) -> bool {
            self.value.is_some()
        }

        fn erase_all(&mut self) -> Result<(), FlashError> {
            self.value = None;
            Ok(())
        }
    }

    #[test]
    fn test_bool_helpers() {
        let mut slot = OneSlot { value: None, len: 0 };
        assert_eq!(slot.read_bool(StorageKey::DeviceLocked), Err(FlashError::NotFound));

        slot.write_bool(StorageKey::DeviceLocked, true).unwrap();
        assert_eq!(slot.read_bool(StorageKey::DeviceLocked), Ok(true));
    }

    #[test]
    fn test_read_u8_rejects_wrong_length() {
        let mut slot = OneSlot { value: None, len: 0 };
        slot.write(StorageKey::DisplayLevel, &[1, 2]).unwrap();
        assert_eq!(slot.read_u8(StorageKey::DisplayLevel), Err(FlashError::Corrupted));
    }
}
