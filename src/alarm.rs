//! # Alarm
//! The alarm time, its trigger detection and the snooze sequence.
//!
//! `hour`/`minute` hold the effective time the alarm fires next. During a snooze sequence that
//! is the time the user set plus the snooze minutes added so far, while `original_hour`/
//! `original_minute` keep the time the user set, so a reset can go back to it.
//!
//! Each snooze is shorter than the previous one: `max(1, 10 / snooze_count)` minutes with
//! integer division, which gives 10, 5, 3, 2, 2, 1, 1, ... minutes.

use crate::defaults::{DEFAULT_ALARM_HOUR, DEFAULT_ALARM_MINUTE};
use crate::time::{ClockReading, SECONDS_PER_DAY};

/// Longest gap between two checks, in seconds, that still counts as a late tick rather than a
/// jump of the clock. A late tick may still fire an alarm whose second it skipped.
pub const MAX_TICK_LAG_SECS: u32 = 5;

/// Snooze length of the first snooze, in minutes
const FIRST_SNOOZE_MINUTES: u16 = 10;

/// Minutes in a day, the modulus of the snooze wheel
const MINUTES_PER_DAY: u16 = 24 * 60;

/// The alarm state, a single instance lives for the whole runtime of the device
#[derive(Debug, Eq, PartialEq, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmScheduler {
    /// Hour the alarm fires next, 0-23
    hour: u8,
    /// Minute the alarm fires next, 0-59
    minute: u8,
    /// The alarm is armed
    enabled: bool,
    /// Hour the user set, 0-23
    original_hour: u8,
    /// Minute the user set, 0-59
    original_minute: u8,
    /// How often the alarm has been snoozed in the current episode
    snooze_count: u16,
    /// The alarm is ringing
    triggered: bool,
    /// The alarm has been snoozed and will ring again
    snoozed: bool,
    /// Seconds of day of the previous check, used to catch a skipped firing second
    last_checked: Option<u32>,
}

impl Default for AlarmScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_ALARM_HOUR, DEFAULT_ALARM_MINUTE)
    }
}

impl AlarmScheduler {
    /// Create a disabled alarm set to the given time
    pub const fn new(hour: u8, minute: u8) -> Self {
        let hour = hour % 24;
        let minute = minute % 60;
        Self {
            hour,
            minute,
            enabled: false,
            original_hour: hour,
            original_minute: minute,
            snooze_count: 0,
            triggered: false,
            snoozed: false,
            last_checked: None,
        }
    }

    /// Hour the alarm fires next
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Minute the alarm fires next
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    /// Hour the user set
    pub const fn original_hour(&self) -> u8 {
        self.original_hour
    }

    /// Minute the user set
    pub const fn original_minute(&self) -> u8 {
        self.original_minute
    }

    /// Whether the alarm is armed
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the alarm is ringing
    pub const fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Whether the alarm is snoozed
    pub const fn is_snoozed(&self) -> bool {
        self.snoozed
    }

    /// Whether the alarm is ringing or snoozed, i.e. an alarm episode is in progress
    pub const fn is_live(&self) -> bool {
        self.triggered || self.snoozed
    }

    /// How often the alarm has been snoozed in the current episode
    pub const fn snooze_count(&self) -> u16 {
        self.snooze_count
    }

    /// Arm or disarm the alarm
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Toggle the alarm enabled state
    pub const fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Set the alarm time from outside, e.g. from the configuration endpoint.
    ///
    /// Sets both the effective and the original time and arms the alarm. Out of range values are
    /// wrapped, not rejected. Does not touch a ringing or snoozed alarm.
    pub fn set(&mut self, hour: u8, minute: u8) {
        self.hour = hour % 24;
        self.minute = minute % 60;
        self.original_hour = self.hour;
        self.original_minute = self.minute;
        self.enabled = true;
        info!("Alarm set to {}:{}", self.hour, self.minute);
    }

    /// Move the effective alarm hour by `delta`, wrapping around the day
    pub fn adjust_hour(&mut self, delta: i8) {
        self.hour = wrap(self.hour, delta, 24);
    }

    /// Move the effective alarm minute by `delta`, wrapping around the hour
    pub fn adjust_minute(&mut self, delta: i8) {
        self.minute = wrap(self.minute, delta, 60);
    }

    /// Check whether the alarm fires at `now`.
    ///
    /// Returns true exactly once for the firing second `HH:MM:00`. A tick that arrives late
    /// still fires if it skipped the firing second, as long as the gap to the previous check is
    /// at most [`MAX_TICK_LAG_SECS`]. A larger gap, a clock set backwards, or the very first
    /// check only fire on an exact match. A second check within the same second never fires.
    ///
    /// On the first firing of an episode the current time is remembered as the original time
    /// and the snooze count starts over.
    pub fn check(&mut self, now: &ClockReading) -> bool {
        let now_s = now.seconds_of_day();
        let previous = self.last_checked.replace(now_s);

        if !self.enabled || self.triggered {
            return false;
        }

        let fire_s = u32::from(self.hour) * 3600 + u32::from(self.minute) * 60;
        let due = match previous.map(|p| (now_s + SECONDS_PER_DAY - p) % SECONDS_PER_DAY) {
            Some(0) => false,
            Some(lag) if lag <= MAX_TICK_LAG_SECS => {
                let since_fire = (now_s + SECONDS_PER_DAY - fire_s) % SECONDS_PER_DAY;
                since_fire < lag
            }
            _ => now_s == fire_s,
        };
        if !due {
            return false;
        }

        if !self.snoozed {
            self.original_hour = self.hour;
            self.original_minute = self.minute;
            self.snooze_count = 0;
        }
        self.triggered = true;
        info!(
            "Alarm triggered at {}:{}:{}, snoozed {} times",
            now.hour, now.minute, now.second, self.snooze_count
        );
        true
    }

    /// Snooze a ringing alarm. Does nothing and returns false if the alarm is not ringing.
    ///
    /// The alarm moves forward by `max(1, 10 / snooze_count)` minutes, wrapping around midnight.
    #[allow(clippy::cast_possible_truncation)] // hour and minute are below 60 after the modulo
    pub fn snooze(&mut self) -> bool {
        if !self.triggered {
            return false;
        }
        self.triggered = false;
        self.snoozed = true;
        self.snooze_count = self.snooze_count.saturating_add(1);

        let snooze_minutes = (FIRST_SNOOZE_MINUTES / self.snooze_count).max(1);
        let total = u16::from(self.hour) * 60 + u16::from(self.minute) + snooze_minutes;
        let total = total % MINUTES_PER_DAY;
        self.hour = (total / 60) as u8;
        self.minute = (total % 60) as u8;
        info!(
            "Alarm snoozed for {} minutes (#{}), next at {}:{}",
            snooze_minutes, self.snooze_count, self.hour, self.minute
        );
        true
    }

    /// End the alarm episode: stop ringing, forget the snoozes and go back to the original time
    pub fn reset(&mut self) {
        self.triggered = false;
        self.snoozed = false;
        self.snooze_count = 0;
        self.hour = self.original_hour;
        self.minute = self.original_minute;
        info!("Alarm reset to {}:{}", self.hour, self.minute);
    }
}

/// Add `delta` to `value` on a wheel of `modulus` positions
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // rem_euclid keeps the result in 0..modulus
pub(crate) fn wrap(value: u8, delta: i8, modulus: u8) -> u8 {
    (i16::from(value) + i16::from(delta)).rem_euclid(i16::from(modulus)) as u8
}
