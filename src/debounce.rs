//! # Debounce
//! Turns the raw, bouncing edges of a push button into clean press events.
//!
//! The filter is fed from the edge interrupt of a button pin. An edge is accepted only if at
//! least the debounce window has passed since the previously *accepted* edge; every edge inside
//! the window is dropped without moving the window. An accepted edge to the active level is a
//! press.

use crate::defaults::DEBOUNCE_US;

/// Logic level of a button pin
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Pin reads low
    Low,
    /// Pin reads high
    High,
}

/// An edge that made it through the filter
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// The button went to its active level
    Pressed,
    /// The button went back to its idle level
    Released,
}

/// Debounce filter for one button
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    /// The level that means "pressed"; low for a button with a pull-up
    active: Level,
    /// The last accepted level
    stable: Level,
    /// Timestamp of the last accepted edge, in microseconds
    last_accepted_us: Option<u64>,
    /// The debounce window, in microseconds
    window_us: u64,
}

impl Debouncer {
    /// Create a filter for an active-low button with a pull-up, using the configured window
    pub const fn active_low() -> Self {
        Self::new(Level::Low, Level::High, DEBOUNCE_US)
    }

    /// Create a filter with explicit polarity, initial level and window
    pub const fn new(active: Level, initial: Level, window_us: u64) -> Self {
        Self {
            active,
            stable: initial,
            last_accepted_us: None,
            window_us,
        }
    }

    /// The last accepted level
    pub const fn level(&self) -> Level {
        self.stable
    }

    /// Feed a raw edge observed at `now_us` with the level read right after it.
    ///
    /// Returns the accepted edge, or `None` if the edge fell inside the window of the last
    /// accepted edge or did not change the stable level.
    pub fn on_edge(&mut self, level: Level, now_us: u64) -> Option<Edge> {
        if let Some(last) = self.last_accepted_us {
            if now_us.saturating_sub(last) < self.window_us {
                return None;
            }
        }
        if level == self.stable {
            return None;
        }

        self.stable = level;
        self.last_accepted_us = Some(now_us);
        if level == self.active {
            Some(Edge::Pressed)
        } else {
            Some(Edge::Released)
        }
    }

    /// Feed a raw edge and report only whether it produced a press
    pub fn pressed(&mut self, level: Level, now_us: u64) -> bool {
        self.on_edge(level, now_us) == Some(Edge::Pressed)
    }
}
