//! Indicator refresh policy
//!
//! Decides what the status light shows for a given wall time. An enabled
//! nap takes priority over the daily schedule; once the nap schedule
//! reports no block the nap is over, so it is disabled and the light goes
//! dark until the next refresh consults the daily schedule.

use smart_leds::RGB8;
use wakeclock_hal::FlashStorage;

use crate::clock::WallTime;
use crate::schedule::ScheduleBlock;
use crate::store::ScheduleStore;
use crate::traits::IndicatorDriver;

/// Colour type shared with the LED drivers
pub type Rgb = RGB8;

pub const BLUE: Rgb = RGB8 { r: 0, g: 0, b: 255 };
pub const RED: Rgb = RGB8 { r: 255, g: 0, b: 0 };
pub const YELLOW: Rgb = RGB8 { r: 255, g: 255, b: 0 };
pub const GREEN: Rgb = RGB8 { r: 0, g: 255, b: 0 };
pub const OFF: Rgb = RGB8 { r: 0, g: 0, b: 0 };

/// Fixed colour for each block
pub const fn block_color(block: ScheduleBlock) -> Rgb {
    match block {
        ScheduleBlock::WindDown => BLUE,
        ScheduleBlock::Sleep => RED,
        ScheduleBlock::Quiet => YELLOW,
        ScheduleBlock::Wake => GREEN,
        ScheduleBlock::None => OFF,
    }
}

/// Update the indicator for `now` and return the block shown
pub fn refresh_indicator<S, I>(
    store: &mut ScheduleStore<S>,
    indicator: &mut I,
    now: WallTime,
) -> ScheduleBlock
where
    S: FlashStorage,
    I: IndicatorDriver,
{
    let time = now.time_of_day();

    let nap = if store.is_nap_enabled() {
        match store.try_load_nap() {
            Ok(nap) => Some(nap),
            Err(e) => {
                warn!("Nap enabled but record unreadable ({}), using daily schedule", e);
                None
            }
        }
    } else {
        None
    };

    let block = match nap {
        Some(nap) => {
            let block = nap.current_block(time);
            if block == ScheduleBlock::None {
                info!("Nap finished");
                if let Err(e) = store.stop_nap() {
                    warn!("Failed to clear nap flag: {}", e);
                }
                if let Err(e) = indicator.off() {
                    warn!("Indicator write failed: {}", e);
                }
                return ScheduleBlock::None;
            }
            block
        }
        None => store.load_schedule(now.day()).current_block(time),
    };

    debug!("Indicator block: {}", block);
    if let Err(e) = indicator.set_status(block) {
        warn!("Indicator write failed: {}", e);
    }
    block
}
