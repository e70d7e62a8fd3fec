//! Embassy async tasks
//!
//! Each task only feeds shared state in `channels`; all real work happens
//! in the main loop.

pub mod encoder;
pub mod tick;

pub use encoder::encoder_task;
pub use tick::sqw_task;
