//! Encoder sampling task
//!
//! Samples the A/B pins every millisecond and accumulates detents into
//! the shared count. The RP2040 has no quadrature counter peripheral, so
//! decoding happens here in software.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};
use portable_atomic::Ordering;
use wakeclock_drivers::input::QuadratureDecoder;

use crate::channels::ENCODER_COUNT;

/// Pin sampling period
const SAMPLE_PERIOD_MS: u64 = 1;

#[embassy_executor::task]
pub async fn encoder_task(a: Input<'static>, b: Input<'static>) {
    info!("Encoder task started");

    let mut decoder = QuadratureDecoder::new(a.is_high(), b.is_high());
    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_PERIOD_MS));

    loop {
        ticker.next().await;

        if let Some(rotation) = decoder.update(a.is_high(), b.is_high()) {
            ENCODER_COUNT.fetch_add(rotation.delta(), Ordering::Relaxed);
            trace!("Encoder {}", rotation);
        }
    }
}
