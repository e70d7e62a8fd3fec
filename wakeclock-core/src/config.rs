//! Compile-time tuning constants
//!
//! Runtime settings (lock, brightness) live in flash and are handled by
//! [`crate::store`]; everything here is fixed at build time.

/// How long a transient message ("LOCK", "STRT", ...) stays on screen
pub const MESSAGE_PERIOD_MS: u32 = 1000;

/// Main loop period
pub const LOOP_PERIOD_MS: u64 = 10;

/// Button level must be stable this long before it counts
pub const DEBOUNCE_MS: u64 = 50;

/// Press duration that turns a select into a select-hold
pub const HOLD_MS: u64 = 1000;

/// Nap duration editing
pub const NAP_DEFAULT_MINUTES: u16 = 60;
pub const NAP_STEP_MINUTES: u16 = 5;
pub const NAP_MIN_MINUTES: u16 = 5;
pub const NAP_MAX_MINUTES: u16 = 300;

/// Display brightness (HT16K33 dimming levels)
pub const DEFAULT_DISPLAY_BRIGHTNESS: u8 = 3;
pub const MAX_DISPLAY_BRIGHTNESS: u8 = 15;

/// Indicator brightness (0-255 PWM scale)
pub const DEFAULT_LED_BRIGHTNESS: u8 = 128;

/// Indicator brightness is edited as a percentage in these steps
pub const LED_PERCENT_STEP: u8 = 5;

/// Wind-down starts this long before sleep in an edited schedule
pub const WINDDOWN_LEAD_MINUTES: u16 = 30;

/// Wind-down starts this long before a nap
pub const NAP_WINDDOWN_LEAD_MINUTES: u16 = 15;

/// Wake starts this long after quiet starts
pub const WAKE_DELAY_MINUTES: u16 = 15;

/// Wake ends this long after quiet starts
pub const WAKE_END_MINUTES: u16 = 30;
