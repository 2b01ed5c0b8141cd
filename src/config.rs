//! # Config
//! The read/write surface offered to a network front-end.
//!
//! A front-end turns an HTTP request path into a [`ConfigCommand`] with
//! [`ConfigCommand::parse`], hands it to the clock as an [`crate::event::Event::Config`] and
//! sends back the [`ConfigResponse`]. The routes are:
//!
//! | path                                          | effect                               |
//! |-----------------------------------------------|--------------------------------------|
//! | `/get_settings`                               | status snapshot as JSON              |
//! | `/set_time?h=7&m=30&s=0[&format=12&am_pm=PM]` | set the RTC time of day              |
//! | `/set_alarm?h=6&m=45`                         | set and enable the alarm             |
//! | `/alarm_enabled`, `/alarm_disabled`           | arm or disarm the alarm              |
//! | `/set_mode?mode=radio`                        | jump to TIME, ALARM or RADIO         |
//! | `/toggle_format`, `/set_format?format=12`     | change the 12/24 hour display        |
//! | `/radio_seek_up`, `/radio_seek_down`          | seek the next station                |
//! | `/radio_vol_up`, `/radio_vol_down`            | change the volume within 0-4         |

use heapless::String;
use serde::Serialize;

use crate::alarm::AlarmScheduler;
use crate::defaults::VOLUME_MAX;
use crate::error::ConfigError;
use crate::peripherals::{Rtc, Tuner};
use crate::state::{Mode, ModeController};
use crate::time::{DisplayFormat, format_time};

/// A request from the configuration endpoint
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigCommand {
    /// Read the status snapshot
    GetSettings,
    /// Set the time of day, the date is kept
    SetTime {
        /// Hour 0-23
        hour: u8,
        /// Minute 0-59
        minute: u8,
        /// Second 0-59
        second: u8,
    },
    /// Set the alarm time and arm the alarm
    SetAlarm {
        /// Hour 0-23
        hour: u8,
        /// Minute 0-59
        minute: u8,
    },
    /// Arm or disarm the alarm
    SetAlarmEnabled(bool),
    /// Jump to a mode
    SetMode(Mode),
    /// Switch between 12 and 24 hour display
    ToggleFormat,
    /// Pick the 12 or 24 hour display
    SetFormat(DisplayFormat),
    /// Seek the next station above
    RadioSeekUp,
    /// Seek the next station below
    RadioSeekDown,
    /// One volume step up
    RadioVolumeUp,
    /// One volume step down
    RadioVolumeDown,
}

impl ConfigCommand {
    /// Parse a request path such as `/set_alarm?h=6&m=45`
    pub fn parse(path: &str) -> Result<Self, ConfigError> {
        let (route, query) = path.split_once('?').unwrap_or((path, ""));
        match route {
            "/get_settings" => Ok(Self::GetSettings),
            "/set_time" => parse_set_time(query),
            "/set_alarm" => Ok(Self::SetAlarm {
                hour: field_in_range(query, "h", 0, 23)?,
                minute: field_in_range(query, "m", 0, 59)?,
            }),
            "/alarm_enabled" => Ok(Self::SetAlarmEnabled(true)),
            "/alarm_disabled" => Ok(Self::SetAlarmEnabled(false)),
            "/set_mode" => {
                let name = query_value(query, "mode").ok_or(ConfigError::MissingField("mode"))?;
                Mode::from_name(name).map(Self::SetMode).ok_or(ConfigError::UnknownMode)
            }
            "/toggle_format" => Ok(Self::ToggleFormat),
            "/set_format" => match query_value(query, "format") {
                Some("24") => Ok(Self::SetFormat(DisplayFormat::H24)),
                Some("12") => Ok(Self::SetFormat(DisplayFormat::H12)),
                Some(_) => Err(ConfigError::OutOfRange("format")),
                None => Err(ConfigError::MissingField("format")),
            },
            "/radio_seek_up" => Ok(Self::RadioSeekUp),
            "/radio_seek_down" => Ok(Self::RadioSeekDown),
            "/radio_vol_up" => Ok(Self::RadioVolumeUp),
            "/radio_vol_down" => Ok(Self::RadioVolumeDown),
            _ => Err(ConfigError::UnknownRoute),
        }
    }

    /// Whether the command needs the tuner
    pub const fn needs_radio(self) -> bool {
        matches!(
            self,
            Self::RadioSeekUp | Self::RadioSeekDown | Self::RadioVolumeUp | Self::RadioVolumeDown
        )
    }
}

/// Parse the set-time query. With `format=12` the hour is 1-12 and `am_pm` picks the half day.
fn parse_set_time(query: &str) -> Result<ConfigCommand, ConfigError> {
    let minute = field_in_range(query, "m", 0, 59)?;
    let second = field_in_range(query, "s", 0, 59)?;
    let hour = if query_value(query, "format") == Some("12") {
        let hour = field_in_range(query, "h", 1, 12)?;
        let pm = query_value(query, "am_pm").is_some_and(|half| half.eq_ignore_ascii_case("PM"));
        match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        }
    } else {
        field_in_range(query, "h", 0, 23)?
    };
    Ok(ConfigCommand::SetTime { hour, minute, second })
}

/// Look up a key in a `k=v&k=v` query string
fn query_value<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// Read a numeric query field and check its range
fn field_in_range(query: &str, key: &'static str, min: u8, max: u8) -> Result<u8, ConfigError> {
    let raw = query_value(query, key).ok_or(ConfigError::MissingField(key))?;
    // parse wider than u8 so that 300 reads as out of range, not as garbage
    let value: u16 = raw.trim().parse().map_err(|_| ConfigError::InvalidNumber(key))?;
    u8::try_from(value)
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or(ConfigError::OutOfRange(key))
}

/// Read-only projection of the clock state for the endpoint
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct StatusSnapshot {
    /// Current time with seconds, in the display format
    pub time: String<16>,
    /// 24 hour display is active
    pub format_24h: bool,
    /// Hour the alarm fires next
    pub alarm_hour: u8,
    /// Minute the alarm fires next
    pub alarm_minute: u8,
    /// The alarm is armed
    pub alarm_toggle: bool,
    /// Tuned frequency, `null` without a tuner
    pub radio_frequency: Option<f32>,
    /// Volume, `null` without a tuner
    pub radio_volume: Option<u8>,
    /// The current mode
    pub mode: Mode,
}

impl StatusSnapshot {
    /// Take a snapshot of the current state
    pub fn capture<R: Rtc, T: Tuner>(
        alarm: &AlarmScheduler,
        modes: &ModeController,
        rtc: &mut R,
        tuner: Option<&mut T>,
    ) -> Self {
        let now = rtc.read();
        let (radio_frequency, radio_volume) = match tuner {
            Some(tuner) => (Some(tuner.frequency_mhz()), Some(tuner.volume())),
            None => (None, None),
        };
        Self {
            // always 24h, the display format travels in `format_24h`
            time: format_time(now.hour, now.minute, Some(now.second), DisplayFormat::H24),
            format_24h: modes.format().is_24h(),
            alarm_hour: alarm.hour(),
            alarm_minute: alarm.minute(),
            alarm_toggle: alarm.is_enabled(),
            radio_frequency,
            radio_volume,
            mode: modes.mode(),
        }
    }

    /// Serialize as JSON into `buf`, returning the number of bytes written
    pub fn to_json(&self, buf: &mut [u8]) -> Result<usize, ConfigError> {
        serde_json_core::to_slice(self, buf).map_err(|_| ConfigError::BufferOverflow)
    }
}

/// The answer to a configuration request
#[derive(Debug, PartialEq, Clone)]
pub enum ConfigResponse {
    /// The request was applied
    Ack,
    /// The requested status snapshot
    Status(StatusSnapshot),
}

/// Apply a configuration command to the clock state.
///
/// On error nothing has been changed.
pub fn apply<R: Rtc, T: Tuner>(
    command: ConfigCommand,
    alarm: &mut AlarmScheduler,
    modes: &mut ModeController,
    rtc: &mut R,
    tuner: Option<&mut T>,
) -> Result<ConfigResponse, ConfigError> {
    if command.needs_radio() && tuner.is_none() {
        warn!("Config {} rejected, radio not initialized", command);
        return Err(ConfigError::RadioUnavailable);
    }

    match command {
        ConfigCommand::GetSettings => {
            return Ok(ConfigResponse::Status(StatusSnapshot::capture(alarm, modes, rtc, tuner)));
        }
        ConfigCommand::SetTime { hour, minute, second } => {
            let now = rtc.read();
            rtc.write(&now.with_time(hour, minute, second));
        }
        ConfigCommand::SetAlarm { hour, minute } => alarm.set(hour, minute),
        ConfigCommand::SetAlarmEnabled(enabled) => alarm.set_enabled(enabled),
        ConfigCommand::SetMode(mode) => modes.switch_to(mode, tuner),
        ConfigCommand::ToggleFormat => modes.toggle_format(),
        ConfigCommand::SetFormat(format) => {
            if modes.format() != format {
                modes.toggle_format();
            }
        }
        ConfigCommand::RadioSeekUp | ConfigCommand::RadioSeekDown => {
            if let Some(tuner) = tuner {
                if command == ConfigCommand::RadioSeekUp {
                    tuner.seek_up();
                } else {
                    tuner.seek_down();
                }
            }
        }
        ConfigCommand::RadioVolumeUp | ConfigCommand::RadioVolumeDown => {
            if let Some(tuner) = tuner {
                let delta = if command == ConfigCommand::RadioVolumeUp { 1 } else { -1 };
                let volume = tuner.volume().saturating_add_signed(delta).min(VOLUME_MAX);
                tuner.set_volume(volume);
            }
        }
    }
    info!("Config {} applied", command);
    Ok(ConfigResponse::Ack)
}
