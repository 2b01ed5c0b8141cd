//! Events that drive the clock
//!
//! Every input of the system (a debounced button press, the 1 Hz tick, a configuration
//! request) is expressed as an [`Event`] and handed to [`crate::orchestrate::AlarmClock::handle_event`],
//! the single place where shared state is mutated.

use crate::config::ConfigCommand;

/// Bit of the Up button in a [`ButtonMask`]
pub const MENU_UP: u8 = 1 << 3;
/// Bit of the Down button in a [`ButtonMask`]
pub const MENU_DOWN: u8 = 1 << 2;
/// Bit of the Mode button in a [`ButtonMask`]
pub const MENU_MODE: u8 = 1 << 1;
/// Bit of the Set button in a [`ButtonMask`]
pub const MENU_SET: u8 = 1 << 0;

/// The buttons of the system, in hint bar order
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Increase the field being edited
    Up,
    /// Decrease the field being edited
    Down,
    /// Cycle modes, advance the edit cursor, or reset a live alarm
    Mode,
    /// Toggle edit mode, or snooze a triggered alarm
    Set,
}

impl ButtonEvent {
    /// All buttons, left to right as they sit under the display
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Mode, Self::Set];

    /// The source mask of this button
    pub const fn mask(self) -> u8 {
        match self {
            Self::Up => MENU_UP,
            Self::Down => MENU_DOWN,
            Self::Mode => MENU_MODE,
            Self::Set => MENU_SET,
        }
    }

    /// Position of this button's slot in the hint bar
    pub const fn slot(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Mode => 2,
            Self::Set => 3,
        }
    }
}

/// A set of buttons, one bit per [`ButtonEvent`]
#[derive(Debug, Eq, PartialEq, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonMask(pub u8);

impl ButtonMask {
    /// Buttons usable outside of edit mode
    pub const NAVIGATION: Self = Self(MENU_MODE | MENU_SET);
    /// Buttons usable while editing
    pub const EDITING: Self = Self(MENU_UP | MENU_DOWN | MENU_MODE | MENU_SET);

    /// Check whether the mask contains the given button
    pub const fn contains(self, button: ButtonEvent) -> bool {
        self.0 & button.mask() != 0
    }
}

/// The event type used in the system
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A debounced button press
    Button(ButtonEvent),
    /// The 1 Hz timer has ticked
    Tick,
    /// A request from the configuration endpoint
    Config(ConfigCommand),
}
