//! Wake Clock - Bedside Sleep/Wake Indicator Firmware
//!
//! Main firmware binary for the RP2040 wake clock. Shows the time on a
//! four-character display and lights a colour indicator for the current
//! part of the night (wind-down, sleep, quiet, wake), following a weekly
//! schedule or a one-off nap.
//!
//! Two small tasks feed shared state (RTC square-wave ticks, encoder
//! detents); everything else runs synchronously in the 10 ms main loop.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Instant, Ticker};
use portable_atomic::Ordering;
use {defmt_rtt as _, panic_probe as _};

use wakeclock_core::config::LOOP_PERIOD_MS;
use wakeclock_core::WakeClock;
use wakeclock_drivers::input::RotaryInput;

use crate::board::PicoBoard;
use crate::channels::{ENCODER_COUNT, TICK};

mod board;
mod channels;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Wake clock firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let parts = match board::bring_up(p) {
        Ok(parts) => parts,
        Err(e) => {
            error!("Bring-up failed: {}", e);
            halt();
        }
    };

    let mut app: WakeClock<PicoBoard> = WakeClock::new(
        parts.display,
        parts.indicator,
        parts.rtc,
        parts.storage,
        Delay,
    );
    info!("UI started in {}", app.current_state());

    spawner.spawn(tasks::sqw_task(parts.sqw)).unwrap();
    spawner
        .spawn(tasks::encoder_task(parts.encoder_a, parts.encoder_b))
        .unwrap();

    info!("All tasks spawned, firmware running");

    let button = parts.button;
    let mut input = RotaryInput::new(ENCODER_COUNT.load(Ordering::Relaxed));
    let mut ticker = Ticker::every(Duration::from_millis(LOOP_PERIOD_MS));

    loop {
        let action = input.poll(
            ENCODER_COUNT.load(Ordering::Relaxed),
            button.is_low(),
            Instant::now().as_millis(),
        );
        app.poll(&TICK, action);

        ticker.next().await;
    }
}

/// Park the core after an unrecoverable bring-up failure
fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
