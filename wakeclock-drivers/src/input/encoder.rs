//! Rotary encoder and push button
//!
//! Two layers:
//!
//! - [`QuadratureDecoder`] turns raw A/B pin levels into detents. It runs
//!   in a fast sampling task that only keeps an absolute detent count.
//! - [`RotaryInput`] runs in the main loop. It compares the count with the
//!   last one it saw and debounces the button, producing at most one
//!   [`Action`] per poll.

use wakeclock_core::config::{DEBOUNCE_MS, HOLD_MS};
use wakeclock_core::ui::Action;

/// Direction of one detent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    /// Signed change to the detent count
    pub fn delta(self) -> i32 {
        match self {
            Rotation::Clockwise => 1,
            Rotation::CounterClockwise => -1,
        }
    }
}

/// Decoder states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Quadrature decoder with bounce rejection
///
/// Pins idle high (pull-ups). One detent is a full A/B cycle:
///
/// ```text
/// CW:  Idle (1,1) -> (0,1) -> (0,0) -> A or B high: emit
/// CCW: Idle (1,1) -> (1,0) -> (0,0) -> A or B high: emit
/// ```
///
/// Returning to (1,1) before both pins are low discards the partial step.
pub struct QuadratureDecoder {
    phase: Phase,
    last_a: bool,
    last_b: bool,
}

impl QuadratureDecoder {
    pub fn new(a: bool, b: bool) -> Self {
        Self {
            phase: Phase::Idle,
            last_a: a,
            last_b: b,
        }
    }

    /// Feed one sample of both pins
    pub fn update(&mut self, a: bool, b: bool) -> Option<Rotation> {
        if a == self.last_a && b == self.last_b {
            return None;
        }
        self.last_a = a;
        self.last_b = b;

        match self.phase {
            Phase::Idle => {
                if !a && b {
                    self.phase = Phase::CwStep1;
                } else if a && !b {
                    self.phase = Phase::CcwStep1;
                }
                None
            }
            Phase::CwStep1 | Phase::CcwStep1 => {
                if !a && !b {
                    self.phase = if self.phase == Phase::CwStep1 {
                        Phase::CwStep2
                    } else {
                        Phase::CcwStep2
                    };
                } else if a && b {
                    // Bounce
                    self.phase = Phase::Idle;
                }
                None
            }
            Phase::CwStep2 => self.complete(a, b, Rotation::Clockwise),
            Phase::CcwStep2 => self.complete(a, b, Rotation::CounterClockwise),
        }
    }

    fn complete(&mut self, a: bool, b: bool, rotation: Rotation) -> Option<Rotation> {
        if a || b {
            self.phase = Phase::Idle;
            Some(rotation)
        } else {
            None
        }
    }
}

/// Main-loop side of the encoder: count comparison and button debounce
pub struct RotaryInput {
    last_count: i32,
    /// Level seen on the previous poll (true = pressed)
    raw_pressed: bool,
    /// Level that has been stable for the debounce period
    stable_pressed: bool,
    last_change_ms: u64,
    press_start_ms: u64,
    hold_sent: bool,
}

impl RotaryInput {
    pub fn new(initial_count: i32) -> Self {
        Self {
            last_count: initial_count,
            raw_pressed: false,
            stable_pressed: false,
            last_change_ms: 0,
            press_start_ms: 0,
            hold_sent: false,
        }
    }

    /// Produce at most one action from the current count and button level
    ///
    /// Any number of detents since the last poll collapse to a single
    /// Clockwise/CounterClockwise. A button event wins over rotation; the
    /// rotation is then reported on the next poll.
    pub fn poll(&mut self, count: i32, pressed: bool, now_ms: u64) -> Action {
        match self.poll_button(pressed, now_ms) {
            Action::None => self.poll_rotation(count),
            action => action,
        }
    }

    fn poll_rotation(&mut self, count: i32) -> Action {
        let delta = count.wrapping_sub(self.last_count);
        self.last_count = count;
        match delta {
            d if d > 0 => Action::Clockwise,
            d if d < 0 => Action::CounterClockwise,
            _ => Action::None,
        }
    }

    fn poll_button(&mut self, pressed: bool, now_ms: u64) -> Action {
        if pressed != self.raw_pressed {
            self.raw_pressed = pressed;
            self.last_change_ms = now_ms;
        }

        let settled = now_ms.saturating_sub(self.last_change_ms) >= DEBOUNCE_MS;
        if settled && self.raw_pressed != self.stable_pressed {
            self.stable_pressed = self.raw_pressed;
            if self.stable_pressed {
                self.press_start_ms = self.last_change_ms;
                self.hold_sent = false;
            } else if !self.hold_sent {
                return Action::Select;
            }
        }

        if self.stable_pressed
            && !self.hold_sent
            && now_ms.saturating_sub(self.press_start_ms) >= HOLD_MS
        {
            self.hold_sent = true;
            return Action::SelectHold;
        }

        Action::None
    }
}
