//! RP2040-specific HAL for the wake clock firmware
//!
//! Provides the RP2040 implementation of the shared `wakeclock-hal`
//! storage trait:
//!
//! - Flash storage driver (implements `wakeclock_hal::FlashStorage`)

#![no_std]

pub mod flash;

// Re-export shared traits from wakeclock-hal for convenience
pub use wakeclock_hal::{FlashStorage as FlashStorageTrait, StorageKey};
