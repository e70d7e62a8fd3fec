//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in wakeclock-core for the clock's peripherals:
//!
//! - Real-time clock (DS3231 over I2C)
//! - Alphanumeric display (HT16K33 14-segment backpack over I2C)
//! - Status indicator (RGB LED on three PWM channels, or an addressable strip)
//! - Rotary encoder and push button decoding

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod indicator;
pub mod input;
pub mod rtc;
