//! Host-side test doubles for the hardware traits

use std::collections::HashMap;

use embedded_hal::delay::DelayNs;
use wakeclock_hal::{FlashError, FlashStorage, StorageKey};

use crate::clock::WallTime;
use crate::indicator::Rgb;
use crate::traits::{
    DisplayDriver, DisplayError, IndicatorDriver, IndicatorError, RealTimeClock, RtcError,
    DISPLAY_WIDTH,
};
use crate::ui::Board;

/// Key-value store kept in a map
#[derive(Default)]
pub struct MemoryStorage {
    records: HashMap<u8, Vec<u8>>,
    /// Successful writes so far
    pub writes: usize,
    /// Make every write fail
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: StorageKey) -> Option<Vec<u8>> {
        self.records.get(&key.as_u8()).cloned()
    }
}

impl FlashStorage for MemoryStorage {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let data = self.records.get(&key.as_u8()).ok_or(FlashError::NotFound)?;
        if data.len() > buffer.len() {
            return Err(FlashError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if self.fail_writes {
            return Err(FlashError::Storage);
        }
        self.records.insert(key.as_u8(), data.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn exists(&mut self, key: StorageKey) -> bool {
        self.records.contains_key(&key.as_u8())
    }

    fn erase_all(&mut self) -> Result<(), FlashError> {
        self.records.clear();
        Ok(())
    }
}

/// Display that remembers what it was asked to show
#[derive(Default)]
pub struct MockDisplay {
    pub text: String,
    pub history: Vec<String>,
    pub colon: bool,
    pub brightness: Option<u8>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplayDriver for MockDisplay {
    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        self.text = text.chars().take(DISPLAY_WIDTH).collect();
        self.history.push(self.text.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.text = String::new();
        self.colon = false;
        Ok(())
    }

    fn colon_on(&mut self) -> Result<(), DisplayError> {
        self.colon = true;
        Ok(())
    }

    fn colon_off(&mut self) -> Result<(), DisplayError> {
        self.colon = false;
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError> {
        self.brightness = Some(level);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockIndicator {
    pub color: Option<Rgb>,
    pub brightness: Option<u8>,
    /// Calls to `show`
    pub writes: usize,
}

impl MockIndicator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndicatorDriver for MockIndicator {
    fn show(&mut self, color: Rgb) -> Result<(), IndicatorError> {
        self.color = Some(color);
        self.writes += 1;
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), IndicatorError> {
        self.brightness = Some(level);
        Ok(())
    }
}

pub struct MockRtc {
    pub time: WallTime,
    pub fail: bool,
    pub set_calls: Vec<(u8, u8, u8)>,
}

impl MockRtc {
    pub fn at(time: WallTime) -> Self {
        Self {
            time,
            fail: false,
            set_calls: Vec::new(),
        }
    }
}

impl RealTimeClock for MockRtc {
    fn now(&mut self) -> Result<WallTime, RtcError> {
        if self.fail {
            return Err(RtcError::Bus);
        }
        Ok(self.time)
    }

    fn set_time(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), RtcError> {
        if self.fail {
            return Err(RtcError::Bus);
        }
        self.set_calls.push((hour, minute, second));
        self.time = WallTime::new(hour, minute, second, self.time.day_of_week);
        Ok(())
    }
}

/// Delay that returns immediately
#[derive(Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

pub struct MockBoard;

impl Board for MockBoard {
    type Display = MockDisplay;
    type Indicator = MockIndicator;
    type Rtc = MockRtc;
    type Storage = MemoryStorage;
    type Delay = NoDelay;
}

