//! State shared between the interrupt-driven tasks and the main loop
//!
//! Both are lock-free: the tasks only ever set or add, and the main loop
//! only takes or reads.

use portable_atomic::AtomicI32;
use wakeclock_core::clock::TickFlag;

/// Raised on every RTC square-wave falling edge
pub static TICK: TickFlag = TickFlag::new();

/// Absolute encoder detent count (clockwise positive)
pub static ENCODER_COUNT: AtomicI32 = AtomicI32::new(0);
