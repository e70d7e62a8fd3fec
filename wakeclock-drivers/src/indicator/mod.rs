//! Status indicator drivers
//!
//! - PWM: discrete RGB LED, one PWM channel per colour
//! - Strip: addressable LEDs driven through `smart-leds`

pub mod pwm;
pub mod strip;

pub use pwm::PwmIndicator;
pub use strip::StripIndicator;
