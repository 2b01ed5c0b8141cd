//! Error type of the configuration surface.
//!
//! Fixed-size variants only, no `alloc`. A rejected request never changes state; the caller
//! turns the error into a negative acknowledgement.

/// Why a configuration request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The path names no known route
    UnknownRoute,

    /// A required query field is absent
    MissingField(&'static str),

    /// A query field is not a number
    InvalidNumber(&'static str),

    /// A query field is outside its range
    OutOfRange(&'static str),

    /// The requested mode is not TIME, ALARM or RADIO
    UnknownMode,

    /// A radio request arrived but no tuner is present
    RadioUnavailable,

    /// The response does not fit the caller's buffer
    BufferOverflow,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownRoute => write!(f, "unknown route"),
            Self::MissingField(field) => write!(f, "missing field `{field}`"),
            Self::InvalidNumber(field) => write!(f, "field `{field}` is not a number"),
            Self::OutOfRange(field) => write!(f, "field `{field}` is out of range"),
            Self::UnknownMode => write!(f, "mode must be TIME, ALARM or RADIO"),
            Self::RadioUnavailable => write!(f, "radio not initialized"),
            Self::BufferOverflow => write!(f, "response buffer too small"),
        }
    }
}
