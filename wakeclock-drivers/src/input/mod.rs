//! Input decoding

pub mod encoder;

pub use encoder::{QuadratureDecoder, Rotation, RotaryInput};
