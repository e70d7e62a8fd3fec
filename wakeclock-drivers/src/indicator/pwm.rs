//! RGB LED on three PWM channels
//!
//! Each colour channel is scaled by the brightness before it reaches the
//! hardware, so a brightness change re-applies the last colour.

use embedded_hal::pwm::SetDutyCycle;
use wakeclock_core::indicator::{Rgb, OFF};
use wakeclock_core::traits::{IndicatorDriver, IndicatorError};

/// Channel value after brightness scaling, 0-255
fn scale(channel: u8, brightness: u8) -> u8 {
    ((channel as u16 * brightness as u16 + 127) / 255) as u8
}

/// Discrete RGB LED driven by PWM
pub struct PwmIndicator<R, G, B> {
    red: R,
    green: G,
    blue: B,
    /// If true, the LED lights when the pin is low (common anode)
    inverted: bool,
    brightness: u8,
    color: Rgb,
}

impl<R, G, B> PwmIndicator<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    /// Create the driver and drive every channel off
    ///
    /// Fails if a channel rejects the first duty write.
    pub fn new(
        red: R,
        green: G,
        blue: B,
        inverted: bool,
        brightness: u8,
    ) -> Result<Self, IndicatorError> {
        let mut led = Self {
            red,
            green,
            blue,
            inverted,
            brightness,
            color: OFF,
        };
        led.apply()?;
        Ok(led)
    }

    /// Common cathode wiring: channel on = pin high
    pub fn new_common_cathode(
        red: R,
        green: G,
        blue: B,
        brightness: u8,
    ) -> Result<Self, IndicatorError> {
        Self::new(red, green, blue, false, brightness)
    }

    /// Common anode wiring: channel on = pin low
    pub fn new_common_anode(
        red: R,
        green: G,
        blue: B,
        brightness: u8,
    ) -> Result<Self, IndicatorError> {
        Self::new(red, green, blue, true, brightness)
    }

    /// Last colour requested, before scaling
    pub fn color(&self) -> Rgb {
        self.color
    }

    fn duty(&self, channel: u8) -> u16 {
        let level = scale(channel, self.brightness);
        if self.inverted {
            255 - level as u16
        } else {
            level as u16
        }
    }

    fn apply(&mut self) -> Result<(), IndicatorError> {
        let (r, g, b) = (
            self.duty(self.color.r),
            self.duty(self.color.g),
            self.duty(self.color.b),
        );
        self.red
            .set_duty_cycle_fraction(r, 255)
            .map_err(|_| IndicatorError::Output)?;
        self.green
            .set_duty_cycle_fraction(g, 255)
            .map_err(|_| IndicatorError::Output)?;
        self.blue
            .set_duty_cycle_fraction(b, 255)
            .map_err(|_| IndicatorError::Output)
    }
}

impl<R, G, B> IndicatorDriver for PwmIndicator<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
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
