//! DS3231 real-time clock (I2C)
//!
//! Only the time-of-day and day-of-week registers are used. The chip is
//! configured for a 1 Hz square wave on its INT/SQW pin, which the
//! firmware watches to know when to re-read the time.
//!
//! # Register map (subset)
//!
//! | Addr | Contents                                   |
//! |------|--------------------------------------------|
//! | 0x00 | seconds, BCD                               |
//! | 0x01 | minutes, BCD                               |
//! | 0x02 | hours, BCD; bit 6 selects 12-hour mode     |
//! | 0x03 | day of week, 1-7                           |
//! | 0x0E | control: INTCN=0, RS=00 gives 1 Hz on SQW  |

use embedded_hal::i2c::I2c;
use wakeclock_core::clock::WallTime;
use wakeclock_core::traits::{RealTimeClock, RtcError};

/// Fixed 7-bit bus address
pub const DS3231_ADDR: u8 = 0x68;

/// Register addresses
pub mod reg {
    pub const SECONDS: u8 = 0x00;
    pub const MINUTES: u8 = 0x01;
    pub const HOURS: u8 = 0x02;
    pub const DAY: u8 = 0x03;
    pub const CONTROL: u8 = 0x0E;
    pub const STATUS: u8 = 0x0F;
}

/// Control value: oscillator on, square wave enabled, 1 Hz
const CONTROL_SQW_1HZ: u8 = 0x00;

/// Hours register: 12-hour mode flag and PM flag
const HOURS_12H: u8 = 0x40;
const HOURS_PM: u8 = 0x20;

pub(crate) fn bcd_to_dec(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

pub(crate) fn dec_to_bcd(dec: u8) -> u8 {
    ((dec / 10) << 4) | (dec % 10)
}

fn decode_hours(raw: u8) -> u8 {
    if raw & HOURS_12H != 0 {
        let hour12 = bcd_to_dec(raw & 0x1F) % 12;
        if raw & HOURS_PM != 0 {
            hour12 + 12
        } else {
            hour12
        }
    } else {
        bcd_to_dec(raw & 0x3F)
    }
}

/// DS3231 driver owning its bus handle
pub struct Ds3231<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DS3231_ADDR,
        }
    }

    /// Enable the 1 Hz square wave
    ///
    /// Fails if the chip does not acknowledge; the firmware treats that as
    /// a fatal bring-up error.
    pub fn init(&mut self) -> Result<(), RtcError> {
        self.i2c
            .write(self.address, &[reg::CONTROL, CONTROL_SQW_1HZ])
            .map_err(|_| RtcError::Bus)
    }

    /// Give the bus handle back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RealTimeClock for Ds3231<I2C> {
    fn now(&mut self) -> Result<WallTime, RtcError> {
        let mut regs = [0u8; 4];
        self.i2c
            .write_read(self.address, &[reg::SECONDS], &mut regs)
            .map_err(|_| RtcError::Bus)?;

        let second = bcd_to_dec(regs[0] & 0x7F);
        let minute = bcd_to_dec(regs[1] & 0x7F);
        let hour = decode_hours(regs[2]);
        let day = regs[3] & 0x07;

        if second > 59 || minute > 59 || hour > 23 || !(1..=7).contains(&day) {
            return Err(RtcError::InvalidData);
        }

        // Register counts 1-7 from Sunday
        Ok(WallTime::new(hour, minute, second, day - 1))
    }

    fn set_time(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), RtcError> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(RtcError::InvalidData);
        }
        // Always written in 24-hour mode
        self.i2c
            .write(
                self.address,
                &[
                    reg::SECONDS,
                    dec_to_bcd(second),
                    dec_to_bcd(minute),
                    dec_to_bcd(hour),
                ],
            )
            .map_err(|_| RtcError::Bus)
    }
}
