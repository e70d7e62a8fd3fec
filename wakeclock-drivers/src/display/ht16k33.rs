//! HT16K33 14-segment alphanumeric backpack (I2C)
//!
//! Four characters, each one 16-bit word in display RAM (low byte first).
//! Bits 0-13 are segments A-N; bit 14 is the decimal point, which on the
//! clock backpack is wired to the centre colon after the second digit.

use embedded_hal::i2c::I2c;
use wakeclock_core::traits::{DisplayDriver, DisplayError, DISPLAY_WIDTH};

/// Default 7-bit bus address (no address jumpers)
pub const HT16K33_ADDR: u8 = 0x70;

/// Command bytes
pub mod cmd {
    /// System setup: oscillator on
    pub const OSCILLATOR_ON: u8 = 0x21;
    /// Display setup: display on, no blink
    pub const DISPLAY_ON: u8 = 0x81;
    /// Dimming set, OR with level 0-15
    pub const DIMMING: u8 = 0xE0;
    /// Display RAM start address
    pub const RAM: u8 = 0x00;
}

const MAX_LEVEL: u8 = 15;

/// Colon segment, carried on the second digit
const COLON_BIT: u16 = 0x4000;
const COLON_DIGIT: usize = 1;

/// Segment patterns for ASCII 0x20 (space) through 0x60 (backtick)
///
/// Lowercase letters are shown as uppercase; anything else is blank.
const FONT: [u16; 65] = [
    0b0000000000000000, // ' '
    0b0000000000000110, // !
    0b0000001000100000, // "
    0b0001001011001110, // #
    0b0001001011101101, // $
    0b0000110000100100, // %
    0b0010001101011101, // &
    0b0000010000000000, // '
    0b0010010000000000, // (
    0b0000100100000000, // )
    0b0011111111000000, // *
    0b0001001011000000, // +
    0b0000100000000000, // ,
    0b0000000011000000, // -
    0b0100000000000000, // .
    0b0000110000000000, // /
    0b0000110000111111, // 0
    0b0000000000000110, // 1
    0b0000000011011011, // 2
    0b0000000010001111, // 3
    0b0000000011100110, // 4
    0b0010000001101001, // 5
    0b0000000011111101, // 6
    0b0000000000000111, // 7
    0b0000000011111111, // 8
    0b0000000011101111, // 9
    0b0001001000000000, // :
    0b0000101000000000, // ;
    0b0010010000000000, // <
    0b0000000011001000, // =
    0b0000100100000000, // >
    0b0001000010000011, // ?
    0b0000001010111011, // @
    0b0000000011110111, // A
    0b0001001010001111, // B
    0b0000000000111001, // C
    0b0001001000001111, // D
    0b0000000011111001, // E
    0b0000000001110001, // F
    0b0000000010111101, // G
    0b0000000011110110, // H
    0b0001001000001001, // I
    0b0000000000011110, // J
    0b0010010001110000, // K
    0b0000000000111000, // L
    0b0000010100110110, // M
    0b0010000100110110, // N
    0b0000000000111111, // O
    0b0000000011110011, // P
    0b0010000000111111, // Q
    0b0010000011110011, // R
    0b0000000011101101, // S
    0b0001001000000001, // T
    0b0000000000111110, // U
    0b0000110000110000, // V
    0b0010100000110110, // W
    0b0010110100000000, // X
    0b0001010100000000, // Y
    0b0000110000001001, // Z
    0b0000000000111001, // [
    0b0010000100000000, // \
    0b0000000000001111, // ]
    0b0000110000000011, // ^
    0b0000000000001000, // _
    0b0000000100000000, // `
];

/// Segment pattern for one character
pub fn glyph(c: char) -> u16 {
    let c = c.to_ascii_uppercase();
    match c as u32 {
        code @ 0x20..=0x60 => FONT[(code - 0x20) as usize],
        _ => 0,
    }
}

/// HT16K33 driver owning its bus handle
pub struct Ht16k33<I2C> {
    i2c: I2C,
    address: u8,
    digits: [u16; DISPLAY_WIDTH],
    colon: bool,
}

impl<I2C: I2c> Ht16k33<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, HT16K33_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            digits: [0; DISPLAY_WIDTH],
            colon: false,
        }
    }

    /// Start the oscillator, turn the display on and blank it
    ///
    /// A missing acknowledge on the first command is reported as
    /// [`DisplayError::NotResponding`].
    pub fn init(&mut self, level: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[cmd::OSCILLATOR_ON])
            .map_err(|_| DisplayError::NotResponding)?;
        self.command(cmd::DISPLAY_ON)?;
        self.set_brightness(level)?;
        self.clear()
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[byte])
            .map_err(|_| DisplayError::Bus)
    }

    /// Push the digit buffer to display RAM
    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut frame = [0u8; 1 + 2 * DISPLAY_WIDTH];
        frame[0] = cmd::RAM;
        for (i, word) in self.digits.iter().enumerate() {
            let word = if i == COLON_DIGIT && self.colon {
                word | COLON_BIT
            } else {
                *word
            };
            frame[1 + 2 * i..3 + 2 * i].copy_from_slice(&word.to_le_bytes());
        }
        self.i2c
            .write(self.address, &frame)
            .map_err(|_| DisplayError::Bus)
    }
}

impl<I2C: I2c> DisplayDriver for Ht16k33<I2C> {
    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        let mut chars = text.chars();
        for digit in self.digits.iter_mut() {
            *digit = chars.next().map(glyph).unwrap_or(0);
        }
        self.flush()
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.digits = [0; DISPLAY_WIDTH];
        self.colon = false;
        self.flush()
    }

    fn colon_on(&mut self) -> Result<(), DisplayError> {
        self.colon = true;
        self.flush()
    }

    fn colon_off(&mut self) -> Result<(), DisplayError> {
        self.colon = false;
        self.flush()
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError> {
        self.command(cmd::DIMMING | level.min(MAX_LEVEL))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Records every write
    struct MockBus {
        writes: Vec<Vec<u8>>,
        nack: bool,
    }

    impl MockBus {
        fn new() -> Self {
            Self {
                writes: Vec::new(),
                nack: false,
            }
        }
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.nack || address != HT16K33_ADDR {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push(bytes.to_vec());
                }
            }
            Ok(())
        }
    }

    fn words(frame: &[u8]) -> Vec<u16> {
        assert_eq!(frame[0], cmd::RAM);
        frame[1..]
            .chunks(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect()
    }

    #[test]
    fn test_init_sequence() {
        let mut display = Ht16k33::new(MockBus::new());
        display.init(3).unwrap();
        let writes = display.release().writes;

        assert_eq!(writes[0], vec![0x21]);
        assert_eq!(writes[1], vec![0x81]);
        assert_eq!(writes[2], vec![0xE3]);
        assert_eq!(words(&writes[3]), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_init_without_device() {
        let mut bus = MockBus::new();
        bus.nack = true;
        let mut display = Ht16k33::new(bus);
        assert_eq!(display.init(3), Err(DisplayError::NotResponding));
    }

    #[test]
    fn test_print_pads_and_truncates() {
        let mut display = Ht16k33::new(MockBus::new());
        display.print("NAP").unwrap();
        display.print("TOOLONG").unwrap();
        let writes = display.release().writes;

        assert_eq!(
            words(&writes[0]),
            vec![glyph('N'), glyph('A'), glyph('P'), 0]
        );
        assert_eq!(
            words(&writes[1]),
            vec![glyph('T'), glyph('O'), glyph('O'), glyph('L')]
        );
    }

    #[test]
    fn test_colon_rides_on_second_digit() {
        let mut display = Ht16k33::new(MockBus::new());
        display.print(" 930").unwrap();
        display.colon_on().unwrap();
        display.print(" 931").unwrap();
        display.colon_off().unwrap();
        let writes = display.release().writes;

        assert_eq!(words(&writes[1])[1], glyph('9') | COLON_BIT);
        // Colon survives a reprint
        assert_eq!(words(&writes[2])[1], glyph('9') | COLON_BIT);
        assert_eq!(words(&writes[3])[1], glyph('9'));
    }

    #[test]
    fn test_brightness_is_clamped() {
        let mut display = Ht16k33::new(MockBus::new());
        display.set_brightness(40).unwrap();
        assert_eq!(display.release().writes[0], vec![0xEF]);
    }

    #[test]
    fn test_glyph_lookup() {
        assert_eq!(glyph(' '), 0);
        assert_eq!(glyph('a'), glyph('A'));
        assert_eq!(glyph('~'), 0);
        assert_ne!(glyph('%'), 0);
        assert_eq!(glyph('1'), 0b0000000000000110);
    }
}
