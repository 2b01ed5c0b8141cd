//! # Orchestrate
//! The clock as one owned aggregate.
//!
//! [`AlarmClock`] owns the RTC, the optional tuner, the alarm, the mode controller and the
//! render state. Every input arrives as an [`Event`] through [`AlarmClock::handle_event`], so
//! all mutation of shared state happens in one place and one event at a time. The firmware
//! feeds it from a single channel; tests call it directly.

use crate::alarm::AlarmScheduler;
use crate::config::{self, ConfigCommand, ConfigResponse};
use crate::defaults::{DEFAULT_FREQUENCY_MHZ, DEFAULT_VOLUME, VOLUME_MAX};
use crate::error::ConfigError;
use crate::event::{ButtonEvent, Event};
use crate::peripherals::{Display, Rtc, Tuner};
use crate::render::{RenderOrchestrator, Screen};
use crate::state::ModeController;

/// What handling an event produced
#[derive(Debug, PartialEq, Clone)]
pub enum Outcome {
    /// A frame was drawn
    Rendered(Screen),
    /// A configuration request was answered
    Config(Result<ConfigResponse, ConfigError>),
}

/// The whole clock
pub struct AlarmClock<R: Rtc, T: Tuner> {
    /// Wall clock
    rtc: R,
    /// FM tuner, `None` if it could not be initialized
    tuner: Option<T>,
    /// Alarm time and snooze state
    alarm: AlarmScheduler,
    /// Mode and edit state
    modes: ModeController,
    /// State kept between frames
    render: RenderOrchestrator,
}

impl<R: Rtc, T: Tuner> AlarmClock<R, T> {
    /// Assemble the clock from its collaborators, with the compiled-in defaults.
    ///
    /// A present tuner is tuned to the default station at the default volume and muted, since
    /// the clock starts in TIME mode.
    pub fn new(rtc: R, mut tuner: Option<T>) -> Self {
        if let Some(tuner) = tuner.as_mut() {
            tuner.set_frequency_mhz(DEFAULT_FREQUENCY_MHZ);
            tuner.set_volume(DEFAULT_VOLUME.min(VOLUME_MAX));
            tuner.mute(true);
        } else {
            warn!("No tuner, radio disabled");
        }
        Self {
            rtc,
            tuner,
            alarm: AlarmScheduler::default(),
            modes: ModeController::default(),
            render: RenderOrchestrator::new(),
        }
    }

    /// The alarm state
    pub const fn alarm(&self) -> &AlarmScheduler {
        &self.alarm
    }

    /// The mode state
    pub const fn modes(&self) -> &ModeController {
        &self.modes
    }

    /// The RTC
    pub const fn rtc(&self) -> &R {
        &self.rtc
    }

    /// The RTC, mutable, e.g. to move the time in tests
    pub const fn rtc_mut(&mut self) -> &mut R {
        &mut self.rtc
    }

    /// The tuner, if present
    pub const fn tuner(&self) -> Option<&T> {
        self.tuner.as_ref()
    }

    /// Handle one event. Button presses are dispatched and then rendered, ticks are rendered,
    /// configuration requests are applied and answered.
    pub fn handle_event<D: Display>(&mut self, event: Event, display: &mut D) -> Outcome {
        match event {
            Event::Button(button) => Outcome::Rendered(self.press(button, display)),
            Event::Tick => Outcome::Rendered(self.tick(display)),
            Event::Config(command) => Outcome::Config(self.configure(command)),
        }
    }

    /// Dispatch a button press and render right away
    pub fn press<D: Display>(&mut self, button: ButtonEvent, display: &mut D) -> Screen {
        info!("Button {}", button);
        self.render.note_button(button);
        self.modes
            .dispatch(button, &mut self.alarm, &mut self.rtc, self.tuner.as_mut());
        self.tick(display)
    }

    /// Run one render pass
    pub fn tick<D: Display>(&mut self, display: &mut D) -> Screen {
        self.render
            .render(&mut self.alarm, &self.modes, &mut self.rtc, self.tuner.as_mut(), display)
    }

    /// Apply a configuration request
    #[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
    pub fn configure(&mut self, command: ConfigCommand) -> Result<ConfigResponse, ConfigError> {
        let response = config::apply(
            command,
            &mut self.alarm,
            &mut self.modes,
            &mut self.rtc,
            self.tuner.as_mut(),
        );
        if let Err(e) = &response {
            warn!("Config request rejected: {}", e);
        }
        response
    }
}
