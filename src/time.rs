//! # Time
//! Wall-clock readings, calendar arithmetic and the text formats used on the display.
//!
//! The core never keeps its own copy of the time: every consumer reads a fresh
//! [`ClockReading`] from the RTC collaborator. The calendar helpers here are what lets the
//! [`SoftwareClock`] fallback keep a date when no hardware RTC is available.

use core::fmt::Write;
use heapless::String;

/// Seconds in a day
pub const SECONDS_PER_DAY: u32 = 86_400;

/// The day of the week
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    /// Monday
    Monday,
    /// Tuesday
    Tuesday,
    /// Wednesday
    Wednesday,
    /// Thursday
    Thursday,
    /// Friday
    Friday,
    /// Saturday
    Saturday,
    /// Sunday
    Sunday,
}

impl Weekday {
    /// Get the next day of the week
    pub const fn next(self) -> Self {
        match self {
            Self::Monday => Self::Tuesday,
            Self::Tuesday => Self::Wednesday,
            Self::Wednesday => Self::Thursday,
            Self::Thursday => Self::Friday,
            Self::Friday => Self::Saturday,
            Self::Saturday => Self::Sunday,
            Self::Sunday => Self::Monday,
        }
    }

    /// The day of the week of a Gregorian date (Sakamoto's method)
    pub const fn of_date(year: u16, month: u8, day: u8) -> Self {
        const OFFSETS: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
        let y = if month < 3 { year.saturating_sub(1) } else { year };
        let m = if matches!(month, 1..=12) { month } else { 1 };
        let index = (y + y / 4 - y / 100 + y / 400 + OFFSETS[(m - 1) as usize] + day as u16) % 7;
        // 0 is Sunday
        match index {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            _ => Self::Saturday,
        }
    }

    /// Three letter English abbreviation of the day
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Monday => "Mon",
            Self::Tuesday => "Tue",
            Self::Wednesday => "Wed",
            Self::Thursday => "Thu",
            Self::Friday => "Fri",
            Self::Saturday => "Sat",
            Self::Sunday => "Sun",
        }
    }
}

/// A reading of the real-time clock
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockReading {
    /// Year, e.g. 2025
    pub year: u16,
    /// Month 1-12
    pub month: u8,
    /// Day of month 1-31
    pub day: u8,
    /// Day of the week
    pub weekday: Weekday,
    /// Hour 0-23
    pub hour: u8,
    /// Minute 0-59
    pub minute: u8,
    /// Second 0-59
    pub second: u8,
}

impl ClockReading {
    /// Midnight of the given date
    pub const fn midnight(year: u16, month: u8, day: u8, weekday: Weekday) -> Self {
        Self {
            year,
            month,
            day,
            weekday,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }

    /// The same date with a different time of day
    pub const fn with_time(self, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
            ..self
        }
    }

    /// Seconds elapsed since midnight
    pub const fn seconds_of_day(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Calculate the date following this one, keeping the time of day
    pub const fn tomorrow(self) -> Self {
        let mut tomorrow = self;
        tomorrow.day += 1;

        // Handle month rollover
        if tomorrow.day > days_in_month(tomorrow.month, tomorrow.year) {
            tomorrow.day = 1;
            tomorrow.month += 1;

            // Handle year rollover
            if tomorrow.month > 12 {
                tomorrow.month = 1;
                tomorrow.year += 1;
            }
        }

        tomorrow.weekday = tomorrow.weekday.next();
        tomorrow
    }

    /// Advance the reading by a number of seconds, rolling over days, months and years
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // hour, minute and second are bounded by the modulo
    pub fn advanced_by(self, seconds: u64) -> Self {
        let total = u64::from(self.seconds_of_day()) + seconds;
        let days = total / u64::from(SECONDS_PER_DAY);
        let rest = (total % u64::from(SECONDS_PER_DAY)) as u32;

        let mut reading = self;
        for _ in 0..days {
            reading = reading.tomorrow();
        }
        reading.with_time((rest / 3600) as u8, ((rest / 60) % 60) as u8, (rest % 60) as u8)
    }
}

/// Get the number of days in a given month and year
pub const fn days_in_month(month: u8, year: u16) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30, // all other months
    }
}

/// Check if a year is a leap year
/// A year is a leap year if it is divisible by 4, but not by 100, unless it is also divisible by 400.
pub const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && year % 100 != 0 || year % 400 == 0
}

/// How hours are shown to the user
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayFormat {
    /// 00:00 to 23:59
    H24,
    /// 12:00 AM to 11:59 PM
    H12,
}

impl DisplayFormat {
    /// Build the format from the 24 hour flag
    pub const fn from_24h(format_24h: bool) -> Self {
        if format_24h { Self::H24 } else { Self::H12 }
    }

    /// True for the 24 hour format
    pub const fn is_24h(self) -> bool {
        matches!(self, Self::H24)
    }

    /// The other format
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::H24 => Self::H12,
            Self::H12 => Self::H24,
        }
    }

    /// Short tag shown in the corner of the time screen
    pub const fn tag(self) -> &'static str {
        match self {
            Self::H24 => "24H",
            Self::H12 => "12H",
        }
    }
}

/// Format a time of day, e.g. `"07:05:09"` or `"07:05:09 AM"`
pub fn format_time(hour: u8, minute: u8, second: Option<u8>, format: DisplayFormat) -> String<16> {
    let mut s: String<16> = String::new();
    let display_hour = match format {
        DisplayFormat::H24 => hour,
        DisplayFormat::H12 => match hour % 12 {
            0 => 12,
            h => h,
        },
    };
    let _ = write!(s, "{display_hour:02}:{minute:02}");
    if let Some(second) = second {
        let _ = write!(s, ":{second:02}");
    }
    if format == DisplayFormat::H12 {
        let _ = s.push_str(if hour < 12 { " AM" } else { " PM" });
    }
    s
}

/// Width of the centered date line, in characters
const DATE_FIELD_WIDTH: usize = 16;

/// Format the date as `"Ddd DD.MM.YYYY"`, padded to center it in a 16 character field
/// one example being `" Mon 06.01.2025"`
pub fn format_date(reading: &ClockReading) -> String<24> {
    let mut s: String<24> = String::new();
    let _ = write!(
        s,
        "{} {:02}.{:02}.{}",
        reading.weekday.abbreviation(),
        reading.day,
        reading.month,
        reading.year
    );

    let content_length = s.chars().count();
    let padding_left = DATE_FIELD_WIDTH.saturating_sub(content_length) / 2;

    let mut padded: String<24> = String::new();
    for _ in 0..padding_left {
        let _ = padded.push(' ');
    }
    let _ = padded.push_str(&s);
    padded
}

/// A monotonic source of whole seconds since boot
pub trait Uptime {
    /// Seconds elapsed since boot
    fn uptime_secs(&self) -> u64;
}

impl<F: Fn() -> u64> Uptime for F {
    fn uptime_secs(&self) -> u64 {
        self()
    }
}

/// Software-only wall clock, used when the hardware RTC cannot be brought up.
///
/// It remembers the reading it was last set to together with the uptime at that moment,
/// and derives the current reading from the uptime elapsed since.
#[derive(Debug)]
pub struct SoftwareClock<U: Uptime> {
    /// Monotonic time source
    uptime: U,
    /// The reading the clock was last set to
    base: ClockReading,
    /// Uptime in seconds when `base` was set
    base_uptime: u64,
}

impl<U: Uptime> SoftwareClock<U> {
    /// Create a software clock that starts at `start`
    pub fn new(uptime: U, start: ClockReading) -> Self {
        let base_uptime = uptime.uptime_secs();
        Self {
            uptime,
            base: start,
            base_uptime,
        }
    }

    /// The current reading
    pub fn now(&self) -> ClockReading {
        let elapsed = self.uptime.uptime_secs().saturating_sub(self.base_uptime);
        self.base.advanced_by(elapsed)
    }

    /// Set the clock
    pub fn set(&mut self, reading: ClockReading) {
        self.base = reading;
        self.base_uptime = self.uptime.uptime_secs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    fn reading(year: u16, month: u8, day: u8, weekday: Weekday) -> ClockReading {
        ClockReading::midnight(year, month, day, weekday)
    }

    #[test]
    fn tomorrow_rolls_over_month_and_year() {
        let eve = reading(2024, 12, 31, Weekday::Tuesday).with_time(23, 59, 59);
        let next = eve.tomorrow();
        assert_eq!((next.year, next.month, next.day), (2025, 1, 1));
        assert_eq!(next.weekday, Weekday::Wednesday);
        assert_eq!((next.hour, next.minute, next.second), (23, 59, 59));
    }

    #[test]
    fn weekday_of_known_dates() {
        assert_eq!(Weekday::of_date(2025, 1, 1), Weekday::Wednesday);
        assert_eq!(Weekday::of_date(2025, 6, 2), Weekday::Monday);
        assert_eq!(Weekday::of_date(2024, 2, 29), Weekday::Thursday);
        assert_eq!(Weekday::of_date(2000, 1, 1), Weekday::Saturday);
    }

    #[test]
    fn tomorrow_respects_leap_years() {
        let leap = reading(2024, 2, 28, Weekday::Wednesday).tomorrow();
        assert_eq!((leap.month, leap.day), (2, 29));
        let common = reading(2023, 2, 28, Weekday::Tuesday).tomorrow();
        assert_eq!((common.month, common.day), (3, 1));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
    }

    #[test]
    fn advanced_by_crosses_midnight() {
        let late = reading(2025, 3, 31, Weekday::Monday).with_time(23, 59, 30);
        let next = late.advanced_by(45);
        assert_eq!((next.month, next.day), (4, 1));
        assert_eq!((next.hour, next.minute, next.second), (0, 0, 15));
        assert_eq!(next.weekday, Weekday::Tuesday);
    }

    #[test]
    fn formats_24_and_12_hour_times() {
        assert_eq!(format_time(7, 5, Some(9), DisplayFormat::H24).as_str(), "07:05:09");
        assert_eq!(format_time(0, 30, None, DisplayFormat::H12).as_str(), "12:30 AM");
        assert_eq!(format_time(12, 0, None, DisplayFormat::H12).as_str(), "12:00 PM");
        assert_eq!(format_time(23, 59, Some(1), DisplayFormat::H12).as_str(), "11:59:01 PM");
    }

    #[test]
    fn date_is_centered() {
        let date = format_date(&reading(2025, 1, 3, Weekday::Friday));
        assert_eq!(date.as_str(), " Fri 03.01.2025");
        let short = format_date(&ClockReading::midnight(25, 1, 4, Weekday::Saturday));
        assert_eq!(short.as_str(), "  Sat 04.01.25");
    }

    #[test]
    fn software_clock_follows_uptime() {
        let secs = Cell::new(100u64);
        let start = reading(2025, 6, 1, Weekday::Sunday).with_time(6, 59, 50);
        let mut clock = SoftwareClock::new(|| secs.get(), start);
        assert_eq!(clock.now(), start);

        secs.set(115);
        assert_eq!(clock.now(), start.with_time(7, 0, 5));

        clock.set(start.with_time(12, 0, 0));
        secs.set(175);
        assert_eq!(clock.now(), start.with_time(12, 1, 0));
    }
}
