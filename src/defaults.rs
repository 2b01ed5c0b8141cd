//! # Defaults
//! Compile-time settings generated by `build.rs` from `config/clock.json`.
//!
//! The file is formatted as follows, every key is optional:
//!```json
//! {
//!     "alarm": { "hour": 7, "minute": 0 },
//!     "radio": { "frequency_mhz": 101.9, "volume": 0 },
//!     "buttons": { "debounce_us": 5000 },
//!     "display": { "format_24h": true },
//!     "rtc_seed": { "year": 2025, "month": 1, "day": 1 }
//! }
//! ```

include!(concat!(env!("OUT_DIR"), "/clock_defaults.rs"));

/// Highest volume step offered to the user. The tuner takes 0-15, but the speaker distorts above this.
pub const VOLUME_MAX: u8 = 4;

/// Highest signal strength reported by the tuner
pub const MAX_RSSI: u8 = 70;

/// Number of signal strength bars on the radio screen
pub const NUM_BARS: u8 = 4;
