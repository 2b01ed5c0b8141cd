//! # Pico Radio Clock
//! The controller core of a bedside clock with a decaying snooze alarm and an FM radio.
//!
//! The library holds everything that has rules: the button debounce, the alarm and its snooze
//! sequence, the mode and edit state machine, the screen composition and the configuration
//! surface. Hardware is reached only through the traits in [`peripherals`], so the core builds
//! and tests on the host. The firmware binary wires it to the RP2040.
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod alarm;
pub mod config;
pub mod debounce;
pub mod defaults;
pub mod error;
pub mod event;
pub mod orchestrate;
pub mod peripherals;
pub mod render;
pub mod state;
pub mod time;

pub use alarm::AlarmScheduler;
pub use config::{ConfigCommand, ConfigResponse, StatusSnapshot};
pub use debounce::{Debouncer, Edge, Level};
pub use error::ConfigError;
pub use event::{ButtonEvent, ButtonMask, Event};
pub use orchestrate::{AlarmClock, Outcome};
pub use peripherals::{Display, RadioState, Rtc, RtcSource, Tuner};
pub use render::{HintBar, RenderOrchestrator, Screen};
pub use state::{Mode, ModeController};
pub use time::{ClockReading, DisplayFormat, SoftwareClock, Weekday};
