//! # State of the system
//! The top-level mode, the edit cursor and the handling of button presses.
//!
//! The modes form a ring, TIME → ALARM → RADIO → TIME, cycled with the Mode button. The Set
//! button enters and leaves edit mode; while editing, Mode moves the cursor over the fields of
//! the current mode and Up/Down change the selected field. A ringing or snoozed alarm takes over
//! Mode (reset) and a ringing alarm takes over Set (snooze).
use serde::Serialize;

use crate::alarm::{AlarmScheduler, wrap};
use crate::defaults::{DEFAULT_FORMAT_24H, VOLUME_MAX};
use crate::event::{ButtonEvent, ButtonMask};
use crate::peripherals::{Rtc, Tuner};
use crate::time::DisplayFormat;

/// The operation modes of the system
#[derive(Debug, Eq, PartialEq, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Show the clock, edit time and display format
    Time,
    /// Show the alarm, edit alarm time and enabled flag
    Alarm,
    /// Show the radio, seek and change volume
    Radio,
}

impl Mode {
    /// The next mode in the ring
    pub const fn next(self) -> Self {
        match self {
            Self::Time => Self::Alarm,
            Self::Alarm => Self::Radio,
            Self::Radio => Self::Time,
        }
    }

    /// Number of editable fields in this mode
    pub const fn field_count(self) -> u8 {
        match self {
            Self::Time | Self::Alarm => 3,
            Self::Radio => 2,
        }
    }

    /// Upper case name, as used by the configuration endpoint
    pub const fn name(self) -> &'static str {
        match self {
            Self::Time => "TIME",
            Self::Alarm => "ALARM",
            Self::Radio => "RADIO",
        }
    }

    /// Parse a mode name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Time, Self::Alarm, Self::Radio]
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
    }
}

/// Mode, edit state and display format
#[derive(Debug, Eq, PartialEq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeController {
    /// The current mode
    mode: Mode,
    /// Edit mode is active
    editing: bool,
    /// The field selected for editing, always below `mode.field_count()`
    edit_field: u8,
    /// Buttons that currently do something
    buttons_enabled: ButtonMask,
    /// 12 or 24 hour display
    format: DisplayFormat,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new(DisplayFormat::from_24h(DEFAULT_FORMAT_24H))
    }
}

/// State transitions
impl ModeController {
    /// Create a controller in TIME mode, not editing
    pub const fn new(format: DisplayFormat) -> Self {
        Self {
            mode: Mode::Time,
            editing: false,
            edit_field: 0,
            buttons_enabled: ButtonMask::NAVIGATION,
            format,
        }
    }

    /// The current mode
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether edit mode is active
    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    /// The field selected for editing
    pub const fn edit_field(&self) -> u8 {
        self.edit_field
    }

    /// Buttons that currently do something
    pub const fn buttons_enabled(&self) -> ButtonMask {
        self.buttons_enabled
    }

    /// The display format
    pub const fn format(&self) -> DisplayFormat {
        self.format
    }

    /// Switch between 12 and 24 hour display
    pub fn toggle_format(&mut self) {
        self.format = self.format.toggled();
        info!("Display format now {}", self.format.tag());
    }

    /// Jump to a mode directly, leaving edit mode.
    ///
    /// Applies the same mute rule as the Mode ring: leaving RADIO mutes the tuner, entering it
    /// unmutes it.
    pub fn switch_to<T: Tuner>(&mut self, mode: Mode, tuner: Option<&mut T>) {
        self.set_editing(false);
        self.enter(mode, tuner);
    }

    /// Change the mode and mute or unmute the tuner when RADIO is left or entered
    fn enter<T: Tuner>(&mut self, mode: Mode, tuner: Option<&mut T>) {
        let previous = self.mode;
        self.mode = mode;
        self.edit_field = 0;
        if let Some(tuner) = tuner {
            if previous == Mode::Radio && mode != Mode::Radio {
                tuner.mute(true);
            } else if previous != Mode::Radio && mode == Mode::Radio {
                tuner.mute(false);
            }
        }
        info!("Mode {}", mode.name());
    }

    /// Enter or leave edit mode and update the enabled buttons
    fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
        if editing {
            self.edit_field = 0;
            self.buttons_enabled = ButtonMask::EDITING;
        } else {
            self.buttons_enabled = ButtonMask::NAVIGATION;
        }
    }

    /// Mute the tuner after the alarm was snoozed or reset, unless the user is listening to the radio
    fn silence_alarm<T: Tuner>(&self, tuner: Option<&mut T>) {
        if self.mode != Mode::Radio {
            if let Some(tuner) = tuner {
                tuner.mute(true);
            }
        }
    }
}

/// User Input Handling
impl ModeController {
    /// Handle a debounced button press. Buttons that are not enabled are ignored.
    pub fn dispatch<R: Rtc, T: Tuner>(
        &mut self,
        button: ButtonEvent,
        alarm: &mut AlarmScheduler,
        rtc: &mut R,
        tuner: Option<&mut T>,
    ) {
        if !self.buttons_enabled.contains(button) {
            debug!("Button {} ignored", button);
            return;
        }
        match button {
            ButtonEvent::Up => self.on_up_button(alarm, rtc, tuner),
            ButtonEvent::Down => self.on_down_button(alarm, rtc, tuner),
            ButtonEvent::Mode => self.on_mode_button(alarm, tuner),
            ButtonEvent::Set => self.on_set_button(alarm, tuner),
        }
    }

    /// Handle the Mode button: reset a live alarm, move the edit cursor, or cycle the mode ring
    pub fn on_mode_button<T: Tuner>(&mut self, alarm: &mut AlarmScheduler, tuner: Option<&mut T>) {
        if alarm.is_live() {
            alarm.reset();
            self.silence_alarm(tuner);
            return;
        }
        if self.editing {
            self.edit_field = (self.edit_field + 1) % self.mode.field_count();
        } else {
            self.enter(self.mode.next(), tuner);
        }
    }

    /// Handle the Set button: snooze a ringing alarm, or toggle edit mode
    pub fn on_set_button<T: Tuner>(&mut self, alarm: &mut AlarmScheduler, tuner: Option<&mut T>) {
        if alarm.is_triggered() {
            alarm.snooze();
            self.silence_alarm(tuner);
            return;
        }
        self.set_editing(!self.editing);
    }

    /// Handle the Up button: increase the selected field while editing
    pub fn on_up_button<R: Rtc, T: Tuner>(&mut self, alarm: &mut AlarmScheduler, rtc: &mut R, tuner: Option<&mut T>) {
        if self.editing {
            self.adjust_field(1, alarm, rtc, tuner);
        }
    }

    /// Handle the Down button: decrease the selected field while editing
    pub fn on_down_button<R: Rtc, T: Tuner>(&mut self, alarm: &mut AlarmScheduler, rtc: &mut R, tuner: Option<&mut T>) {
        if self.editing {
            self.adjust_field(-1, alarm, rtc, tuner);
        }
    }

    /// Apply `delta` to the selected field of the current mode.
    ///
    /// Time edits are written to the RTC right away, alarm edits only change the effective
    /// alarm time. On the radio the sign of `delta` picks the seek direction.
    fn adjust_field<R: Rtc, T: Tuner>(&mut self, delta: i8, alarm: &mut AlarmScheduler, rtc: &mut R, tuner: Option<&mut T>) {
        match (self.mode, self.edit_field) {
            (Mode::Time, 0) => {
                let now = rtc.read();
                rtc.write(&now.with_time(wrap(now.hour, delta, 24), now.minute, 0));
            }
            (Mode::Time, 1) => {
                let now = rtc.read();
                rtc.write(&now.with_time(now.hour, wrap(now.minute, delta, 60), 0));
            }
            (Mode::Time, _) => self.toggle_format(),
            (Mode::Alarm, 0) => alarm.adjust_hour(delta),
            (Mode::Alarm, 1) => alarm.adjust_minute(delta),
            (Mode::Alarm, _) => alarm.toggle_enabled(),
            (Mode::Radio, 0) => {
                if let Some(tuner) = tuner {
                    if delta > 0 {
                        tuner.seek_up();
                    } else {
                        tuner.seek_down();
                    }
                }
            }
            (Mode::Radio, _) => {
                if let Some(tuner) = tuner {
                    let volume = tuner.volume().saturating_add_signed(delta).min(VOLUME_MAX);
                    tuner.set_volume(volume);
                    tuner.mute(false);
                }
            }
        }
    }
}
