//! # Render
//! Composes what the panel shows and hands it to the display.
//!
//! Rendering runs once per tick and once right after every button press. Each pass polls the
//! alarm, flashes the panel while the alarm rings, builds a [`Screen`] for the current mode and
//! draws it. The screen is plain data so it can be inspected without a panel.

use core::fmt::Write;
use heapless::{String, Vec};

use crate::alarm::AlarmScheduler;
use crate::defaults::{NUM_BARS, VOLUME_MAX};
use crate::event::ButtonEvent;
use crate::peripherals::{Display, RadioState, Rtc, Tuner};
use crate::state::{Mode, ModeController};
use crate::time::{ClockReading, format_date, format_time};

/// Height of a text line in pixels
pub const LINE_HEIGHT: i32 = 9;

/// Width of a character cell in pixels
pub const CHAR_WIDTH: i32 = 8;

/// Line the hint bar sits on
const HINT_LINE: i32 = 6;

/// Horizontal centers of the four hint bar slots
const HINT_SLOT_CENTERS: [i32; 4] = [12, 40, 76, 112];

/// Left edge of the signal strength bars
const SIGNAL_X: i32 = 14 * CHAR_WIDTH;

/// Width of a single signal strength bar
const SIGNAL_BAR_WIDTH: u32 = 4;

/// Edit labels of the time screen, by field
static TIME_FIELD_LABELS: [&str; 3] = ["SET: Hour", "SET: Minute", "SET: Format"];

/// Edit labels of the alarm screen, by field
static ALARM_FIELD_LABELS: [&str; 3] = ["Set: Hour", "Set: Minute", "Set: On/Off"];

/// Edit labels of the radio screen, by field
static RADIO_FIELD_LABELS: [&str; 2] = ["SET: Frequency", "SET: Volume"];

/// Text lines of a screen, at most one per panel line plus the format tag
const MAX_TEXT_ITEMS: usize = 8;

/// A piece of text placed on the panel
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TextItem {
    /// The text
    pub text: String<24>,
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
}

/// The four slot footer that maps the buttons to their current action
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct HintBar {
    /// Labels, left to right: Up, Down, Mode, Set
    pub labels: [&'static str; 4],
    /// Slot of the most recently pressed button
    pub highlight: Option<usize>,
}

impl HintBar {
    /// Build the hint bar for the current edit and alarm state
    pub const fn new(editing: bool, triggered: bool, last_button: Option<ButtonEvent>) -> Self {
        let mut labels = if editing {
            ["UP", "DOWN", "NEXT", "DONE"]
        } else {
            ["    ", "    ", "MODE", "SET"]
        };
        if triggered {
            labels[2] = "RST";
            labels[3] = "SNOZ";
        }
        let highlight = match last_button {
            Some(button) => Some(button.slot()),
            None => None,
        };
        Self { labels, highlight }
    }

    /// Draw the labels centered on their slots and underline the highlighted one
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)] // labels are at most 4 characters
    pub fn draw<D: Display>(&self, display: &mut D) {
        let y = HINT_LINE * LINE_HEIGHT;
        for (slot, (label, center)) in self.labels.iter().zip(HINT_SLOT_CENTERS).enumerate() {
            let width = label.len() as i32 * CHAR_WIDTH;
            let x = center - width / 2;
            display.draw_text(label, x, y);
            if self.highlight == Some(slot) {
                display.draw_hline(x, y - 2, width as u32);
                display.draw_hline(x, y - 1 + LINE_HEIGHT, width as u32);
            }
        }
    }
}

/// Everything shown on the panel in one frame
#[derive(Debug, PartialEq, Clone)]
pub struct Screen {
    /// Text placed on the panel
    pub text: Vec<TextItem, MAX_TEXT_ITEMS>,
    /// The whole panel is inverted
    pub inverted: bool,
    /// Lit signal bars, only on the radio screen
    pub signal_bars: Option<u8>,
    /// The button hints
    pub hint_bar: HintBar,
}

impl Screen {
    /// Start an empty screen
    const fn new(inverted: bool, hint_bar: HintBar) -> Self {
        Self {
            text: Vec::new(),
            inverted,
            signal_bars: None,
            hint_bar,
        }
    }

    /// Place text at the start of a line
    fn line(&mut self, line: i32, text: &str) {
        self.text_at(text, 0, line * LINE_HEIGHT);
    }

    /// Place text at a pixel position
    fn text_at(&mut self, text: &str, x: i32, y: i32) {
        let mut s: String<24> = String::new();
        // overlong text is cut at the capacity, the panel could not show it anyway
        for c in text.chars() {
            if s.push(c).is_err() {
                break;
            }
        }
        let _ = self.text.push(TextItem { text: s, x, y });
    }

    /// Find the text starting at the beginning of a line
    pub fn line_text(&self, line: i32) -> Option<&str> {
        self.text
            .iter()
            .find(|item| item.x == 0 && item.y == line * LINE_HEIGHT)
            .map(|item| item.text.as_str())
    }

    /// Draw the screen and send it to the panel
    pub fn draw<D: Display>(&self, display: &mut D) {
        display.clear();
        display.set_inverted(self.inverted);
        for item in &self.text {
            display.draw_text(&item.text, item.x, item.y);
        }
        if let Some(bars) = self.signal_bars {
            draw_signal(display, SIGNAL_X, LINE_HEIGHT, bars);
        }
        self.hint_bar.draw(display);
        display.present();
    }
}

/// Draw the signal strength as bars growing from left to right, lit bars filled
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)] // all values are small
fn draw_signal<D: Display>(display: &mut D, x: i32, y: i32, bars: u8) {
    let bars = bars.min(NUM_BARS);
    let count = i32::from(NUM_BARS);
    for i in 0..count {
        let height = (i + 1) * LINE_HEIGHT / count;
        let xi = x + i * SIGNAL_BAR_WIDTH as i32;
        let yi = y + (LINE_HEIGHT - height);
        if i < i32::from(bars) {
            display.draw_filled_rect(xi, yi, SIGNAL_BAR_WIDTH, height as u32);
        } else {
            display.draw_rect(xi, yi, SIGNAL_BAR_WIDTH, height as u32);
        }
    }
}

/// Render state that lives between frames
#[derive(Debug, Default, Eq, PartialEq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderOrchestrator {
    /// The panel was inverted on the last frame
    inverted: bool,
    /// The most recently pressed button, cleared once shown in the hint bar
    last_button: Option<ButtonEvent>,
}

impl RenderOrchestrator {
    /// Create the render state, panel not inverted
    pub const fn new() -> Self {
        Self {
            inverted: false,
            last_button: None,
        }
    }

    /// Remember a button press for the hint bar highlight
    pub const fn note_button(&mut self, button: ButtonEvent) {
        self.last_button = Some(button);
    }

    /// The button waiting to be highlighted
    pub const fn last_button(&self) -> Option<ButtonEvent> {
        self.last_button
    }

    /// Run one render pass: poll the alarm, build the screen for the current mode and draw it.
    ///
    /// While the alarm rings the panel inversion flips on every pass and the tuner is unmuted.
    /// Returns the screen that was drawn.
    pub fn render<R: Rtc, T: Tuner, D: Display>(
        &mut self,
        alarm: &mut AlarmScheduler,
        modes: &ModeController,
        rtc: &mut R,
        mut tuner: Option<&mut T>,
        display: &mut D,
    ) -> Screen {
        let now = rtc.read();
        alarm.check(&now);

        if alarm.is_triggered() {
            self.inverted = !self.inverted;
            if let Some(tuner) = tuner.as_deref_mut() {
                tuner.mute(false);
            }
        } else {
            self.inverted = false;
        }

        // only the radio screen needs the tuner state, each read is a bus transfer
        let radio = tuner.filter(|_| modes.mode() == Mode::Radio).map(RadioState::read);
        let screen = self.compose(&now, modes, alarm, radio.as_ref());
        screen.draw(display);
        self.last_button = None;
        screen
    }

    /// Build the screen for the current mode without touching any hardware
    pub fn compose(
        &self,
        now: &ClockReading,
        modes: &ModeController,
        alarm: &AlarmScheduler,
        radio: Option<&RadioState>,
    ) -> Screen {
        let hint_bar = HintBar::new(modes.is_editing(), alarm.is_triggered(), self.last_button);
        let mut screen = Screen::new(self.inverted, hint_bar);
        let format = modes.format();
        let editing = modes.is_editing().then_some(usize::from(modes.edit_field()));
        let mut s: String<24> = String::new();

        match modes.mode() {
            Mode::Time => {
                screen.line(0, "Clock");
                screen.text_at(format.tag(), 100, 0);
                screen.line(2, &format_time(now.hour, now.minute, Some(now.second), format));
                screen.line(3, &format_date(now));
                if let Some(label) = editing.and_then(|field| TIME_FIELD_LABELS.get(field)) {
                    screen.line(4, label);
                }
            }
            Mode::Alarm => {
                let _ = write!(s, "Alarm: {}", format_time(alarm.hour(), alarm.minute(), None, format));
                screen.line(0, &s);
                s.clear();
                let _ = write!(s, "Now: {}", format_time(now.hour, now.minute, Some(now.second), format));
                screen.line(1, &s);
                screen.line(3, if alarm.is_enabled() { "State: On" } else { "State: Off" });
                if alarm.is_snoozed() {
                    s.clear();
                    let _ = write!(s, "Snoozed {}x", alarm.snooze_count());
                    screen.line(2, &s);
                } else if let Some(label) = editing.and_then(|field| ALARM_FIELD_LABELS.get(field)) {
                    screen.line(4, label);
                }
            }
            Mode::Radio => match radio {
                None => screen.line(0, "Radio->Not initialized"),
                Some(radio) => {
                    let _ = write!(s, "Radio FM {:.1}", radio.frequency_mhz);
                    screen.line(0, &s);
                    s.clear();
                    let _ = write!(s, "Volume:{}/{}", radio.volume, VOLUME_MAX);
                    screen.line(1, &s);
                    screen.signal_bars = Some(radio.signal_bars());
                    if let Some(label) = editing.and_then(|field| RADIO_FIELD_LABELS.get(field)) {
                        screen.line(4, label);
                    }
                }
            },
        }
        screen
    }
}
