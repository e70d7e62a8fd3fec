//! Addressable LED strip (WS2812 and friends)
//!
//! Every pixel shows the same colour. Brightness is applied with
//! `smart_leds::brightness` on the way out.

use core::iter;

use smart_leds::{brightness, SmartLedsWrite, RGB8};
use wakeclock_core::indicator::{Rgb, OFF};
use wakeclock_core::traits::{IndicatorDriver, IndicatorError};

/// `N` pixels behind any `SmartLedsWrite` backend
pub struct StripIndicator<W, const N: usize> {
    writer: W,
    brightness: u8,
    color: Rgb,
}

impl<W, const N: usize> StripIndicator<W, N>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    pub fn new(writer: W, brightness: u8) -> Self {
        Self {
            writer,
            brightness,
            color: OFF,
        }
    }

    fn apply(&mut self) -> Result<(), IndicatorError> {
        let pixels = iter::repeat(self.color).take(N);
        self.writer
            .write(brightness(pixels, self.brightness))
            .map_err(|_| IndicatorError::Output)
    }
}

impl<W, const N: usize> IndicatorDriver for StripIndicator<W, N>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    fn show(&mut self, color: Rgb) -> Result<(), IndicatorError> {
        self.color = color;
        self.apply()
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), IndicatorError> {
        self.brightness = level;
        self.apply()
    }
}
