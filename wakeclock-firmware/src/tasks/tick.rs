//! RTC square-wave watcher
//!
//! The DS3231 pulls SQW low once per second. Each falling edge raises the
//! tick flag; the main loop decides whether the displayed minute changed.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::TICK;

#[embassy_executor::task]
pub async fn sqw_task(mut sqw: Input<'static>) {
    info!("SQW task started");

    loop {
        sqw.wait_for_falling_edge().await;
        TICK.raise();
        trace!("SQW tick");
    }
}
