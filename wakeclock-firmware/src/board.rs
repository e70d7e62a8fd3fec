//! Board wiring and peripheral bring-up
//!
//! Raspberry Pi Pico pin assignments:
//!
//! | Function             | Pin    | Notes                        |
//! |----------------------|--------|------------------------------|
//! | I2C0 SDA             | GPIO4  | DS3231 (0x68), HT16K33 (0x70)|
//! | I2C0 SCL             | GPIO5  |                              |
//! | DS3231 SQW           | GPIO6  | pull-up, falling edge 1 Hz   |
//! | Encoder A            | GPIO10 | pull-up                      |
//! | Encoder B            | GPIO11 | pull-up                      |
//! | Encoder button       | GPIO12 | pull-up, active low          |
//! | Indicator red        | GPIO16 | PWM slice 0 A                |
//! | Indicator green      | GPIO17 | PWM slice 0 B                |
//! | Indicator blue       | GPIO18 | PWM slice 1 A                |

use core::cell::RefCell;

use defmt::*;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::pwm::{self, Pwm, PwmOutput};
use embassy_rp::Peripherals;
use embassy_time::Delay;
use embedded_hal_bus::i2c::RefCellDevice;
use static_cell::StaticCell;

use wakeclock_core::config::{DEFAULT_DISPLAY_BRIGHTNESS, DEFAULT_LED_BRIGHTNESS};
use wakeclock_core::traits::{DisplayError, IndicatorError, RtcError};
use wakeclock_core::ui::Board;
use wakeclock_drivers::display::Ht16k33;
use wakeclock_drivers::indicator::PwmIndicator;
use wakeclock_drivers::rtc::Ds3231;
use wakeclock_hal_rp2040::flash::Rp2040FlashStorage;

/// I2C bus clock
const I2C_FREQUENCY_HZ: u32 = 400_000;

/// PWM counter wrap; duty resolution of the indicator channels
const PWM_TOP: u16 = 0x0FFF;

type I2cBus = I2c<'static, I2C0, Blocking>;
type SharedI2c = RefCellDevice<'static, I2cBus>;

/// One blocking I2C bus shared by the display and the RTC
static I2C_BUS: StaticCell<RefCell<I2cBus>> = StaticCell::new();

/// Concrete collaborators for the Pico build
pub struct PicoBoard;

impl Board for PicoBoard {
    type Display = Ht16k33<SharedI2c>;
    type Indicator = PwmIndicator<PwmOutput<'static>, PwmOutput<'static>, PwmOutput<'static>>;
    type Rtc = Ds3231<SharedI2c>;
    type Storage = Rp2040FlashStorage<'static>;
    type Delay = Delay;
}

/// Fatal bring-up failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum BringUpError {
    /// Display did not acknowledge or rejected setup
    Display(DisplayError),
    /// RTC did not acknowledge
    Rtc(RtcError),
    /// A PWM slice did not hand out the expected output
    Pwm,
    /// Indicator channels rejected the initial duty write
    Indicator(IndicatorError),
}

impl From<DisplayError> for BringUpError {
    fn from(e: DisplayError) -> Self {
        BringUpError::Display(e)
    }
}

impl From<IndicatorError> for BringUpError {
    fn from(e: IndicatorError) -> Self {
        BringUpError::Indicator(e)
    }
}

impl From<RtcError> for BringUpError {
    fn from(e: RtcError) -> Self {
        BringUpError::Rtc(e)
    }
}

/// Everything main needs after bring-up
pub struct Parts {
    pub display: <PicoBoard as Board>::Display,
    pub indicator: <PicoBoard as Board>::Indicator,
    pub rtc: <PicoBoard as Board>::Rtc,
    pub storage: <PicoBoard as Board>::Storage,
    pub sqw: Input<'static>,
    pub encoder_a: Input<'static>,
    pub encoder_b: Input<'static>,
    pub button: Input<'static>,
}

/// Configure every peripheral the clock uses
///
/// The display, RTC and indicator channels must all accept their first
/// write; later runtime failures are logged and tolerated.
pub fn bring_up(p: Peripherals) -> Result<Parts, BringUpError> {
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let bus = I2C_BUS.init(RefCell::new(I2c::new_blocking(
        p.I2C0, p.PIN_5, p.PIN_4, i2c_config,
    )));
    info!("I2C0 initialized");

    let mut display = Ht16k33::new(RefCellDevice::new(bus));
    display.init(DEFAULT_DISPLAY_BRIGHTNESS)?;
    info!("Display acknowledged");

    let mut rtc = Ds3231::new(RefCellDevice::new(bus));
    rtc.init()?;
    info!("RTC square wave enabled");

    let mut pwm_config = pwm::Config::default();
    pwm_config.top = PWM_TOP;
    let (red, green) =
        Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_16, p.PIN_17, pwm_config.clone()).split();
    let (blue, _) = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, pwm_config).split();
    let (Some(red), Some(green), Some(blue)) = (red, green, blue) else {
        return Err(BringUpError::Pwm);
    };
    let indicator = PwmIndicator::new_common_cathode(red, green, blue, DEFAULT_LED_BRIGHTNESS)?;
    info!("Indicator PWM initialized");

    let storage = Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0);

    Ok(Parts {
        display,
        indicator,
        rtc,
        storage,
        sqw: Input::new(p.PIN_6, Pull::Up),
        encoder_a: Input::new(p.PIN_10, Pull::Up),
        encoder_b: Input::new(p.PIN_11, Pull::Up),
        button: Input::new(p.PIN_12, Pull::Up),
    })
}
