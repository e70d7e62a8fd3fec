//! Wake Clock Hardware Abstraction Layer
//!
//! This crate defines the storage vocabulary shared between the
//! board-agnostic core and the chip-specific HAL. The core only ever talks
//! to persistent storage through [`flash::FlashStorage`], so the schedule
//! store can be tested on the host against an in-memory map.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  wakeclock-core (ScheduleStore)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  wakeclock-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ wakeclock-hal-│
//!             │    rp2040     │
//!             └───────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

pub use flash::{FlashError, FlashStorage, StorageKey, NAMESPACE};
