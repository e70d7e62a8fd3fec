//! Display drivers

pub mod ht16k33;

pub use ht16k33::{Ht16k33, HT16K33_ADDR};
