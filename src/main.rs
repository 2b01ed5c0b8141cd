//! Firmware for the Raspberry Pi Pico radio clock.
//!
//! Brings up the buttons, the OLED, the FM tuner and the RTC, hands the clock to the
//! orchestrator task and starts one task per button plus the 1 Hz ticker.

// we are in an environment with constrained resources, so we do not use the standard library and we define a different entry point.
#![no_std]
#![no_main]

use crate::drivers::rda5807::Rda5807;
use crate::task::{
    buttons::button_handler,
    display::OledDisplay,
    orchestrate::{orchestrator, ticker},
    rtc,
};
use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::rtc::Rtc;
use pico_radio_clock::{AlarmClock, ButtonEvent};
use {defmt_rtt as _, panic_probe as _};

mod drivers;
mod task;

/// I2C bus speed shared by the display and the tuner
const I2C_FREQUENCY: u32 = 400_000;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Program start");

    // Initialize the peripherals for the RP2040
    let p = embassy_rp::init(Default::default());

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY;

    // display on I2C0
    info!("init display");
    let display = OledDisplay::new(I2c::new_blocking(p.I2C0, p.PIN_13, p.PIN_12, i2c_config));

    // tuner on I2C1, the clock runs without it if it does not answer
    info!("init tuner");
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY;
    let tuner = Rda5807::new(I2c::new_blocking(p.I2C1, p.PIN_27, p.PIN_26, i2c_config));

    // real time clock, software fallback if it cannot be started
    info!("init rtc");
    let rtc = rtc::init(Rtc::new(p.RTC));

    let clock = AlarmClock::new(rtc, tuner);
    unwrap!(spawner.spawn(orchestrator(clock, display)));
    unwrap!(spawner.spawn(ticker()));

    // buttons, left to right under the display
    info!("init buttons");
    unwrap!(spawner.spawn(button_handler(Input::new(p.PIN_0, Pull::Up), ButtonEvent::Up)));
    unwrap!(spawner.spawn(button_handler(Input::new(p.PIN_1, Pull::Up), ButtonEvent::Down)));
    unwrap!(spawner.spawn(button_handler(Input::new(p.PIN_2, Pull::Up), ButtonEvent::Mode)));
    unwrap!(spawner.spawn(button_handler(Input::new(p.PIN_3, Pull::Up), ButtonEvent::Set)));
}
