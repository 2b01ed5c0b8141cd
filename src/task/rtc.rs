//! # RTC
//! The RP2040 on-chip real time clock behind the clock's `Rtc` contract.
//!
//! The hardware RTC loses its time on every power cycle and comes up at 2000-01-01, or not
//! running at all. At boot it is seeded with the build-time default date. If it cannot be
//! started, the clock runs on a software clock derived from the embassy uptime instead.

use defmt::{Debug2Format, info, warn};
use embassy_rp::peripherals::RTC;
use embassy_rp::rtc::{DateTime, DayOfWeek, Rtc as HwRtc};
use embassy_time::Instant;
use pico_radio_clock::defaults::{RTC_SEED_DAY, RTC_SEED_MONTH, RTC_SEED_YEAR};
use pico_radio_clock::{ClockReading, Rtc, RtcSource, SoftwareClock, Weekday};

/// Year the RTC reports after a reset
const RESET_YEAR: u16 = 2000;

/// The clock source the firmware runs on
pub type ClockRtc = RtcSource<BoardRtc, fn() -> u64>;

/// The on-chip RTC
pub struct BoardRtc {
    /// The peripheral
    rtc: HwRtc<'static, RTC>,
    /// The last successful reading, returned when a read fails
    last: ClockReading,
}

impl BoardRtc {
    /// Check that the RTC runs and holds a plausible date, seed it otherwise.
    /// Returns `None` if the RTC cannot be brought up.
    fn start(mut rtc: HwRtc<'static, RTC>) -> Option<Self> {
        let current = if rtc.is_running() { rtc.now().ok() } else { None };
        let last = match current.map(reading_from) {
            Some(reading) if reading.year != RESET_YEAR => reading,
            _ => {
                let seed = seed_reading();
                info!("RTC unset, seeding {}", seed);
                if let Err(e) = rtc.set_datetime(datetime_from(&seed)) {
                    warn!("RTC seed failed: {}", Debug2Format(&e));
                    return None;
                }
                seed
            }
        };
        Some(Self { rtc, last })
    }
}

impl Rtc for BoardRtc {
    fn read(&mut self) -> ClockReading {
        match self.rtc.now() {
            Ok(now) => self.last = reading_from(now),
            Err(e) => warn!("RTC read failed: {}", Debug2Format(&e)),
        }
        self.last
    }

    fn write(&mut self, reading: &ClockReading) {
        match self.rtc.set_datetime(datetime_from(reading)) {
            Ok(()) => self.last = *reading,
            Err(e) => warn!("RTC write failed: {}", Debug2Format(&e)),
        }
    }
}

/// Seconds since boot
fn uptime_secs() -> u64 {
    Instant::now().as_secs()
}

/// Bring up the clock source, falling back to software time if the hardware RTC fails
pub fn init(rtc: HwRtc<'static, RTC>) -> ClockRtc {
    BoardRtc::start(rtc).map_or_else(
        || {
            warn!("RTC unavailable, keeping time in software");
            RtcSource::Software(SoftwareClock::new(uptime_secs as fn() -> u64, seed_reading()))
        },
        RtcSource::Hardware,
    )
}

/// Midnight of the build-time seed date
const fn seed_reading() -> ClockReading {
    ClockReading::midnight(
        RTC_SEED_YEAR,
        RTC_SEED_MONTH,
        RTC_SEED_DAY,
        Weekday::of_date(RTC_SEED_YEAR, RTC_SEED_MONTH, RTC_SEED_DAY),
    )
}

/// Convert the HAL date into a reading
fn reading_from(dt: DateTime) -> ClockReading {
    let weekday = match dt.day_of_week {
        DayOfWeek::Monday => Weekday::Monday,
        DayOfWeek::Tuesday => Weekday::Tuesday,
        DayOfWeek::Wednesday => Weekday::Wednesday,
        DayOfWeek::Thursday => Weekday::Thursday,
        DayOfWeek::Friday => Weekday::Friday,
        DayOfWeek::Saturday => Weekday::Saturday,
        DayOfWeek::Sunday => Weekday::Sunday,
    };
    ClockReading::midnight(dt.year, dt.month, dt.day, weekday).with_time(dt.hour, dt.minute, dt.second)
}

/// Convert a reading into the HAL date
fn datetime_from(reading: &ClockReading) -> DateTime {
    let day_of_week = match reading.weekday {
        Weekday::Monday => DayOfWeek::Monday,
        Weekday::Tuesday => DayOfWeek::Tuesday,
        Weekday::Wednesday => DayOfWeek::Wednesday,
        Weekday::Thursday => DayOfWeek::Thursday,
        Weekday::Friday => DayOfWeek::Friday,
        Weekday::Saturday => DayOfWeek::Saturday,
        Weekday::Sunday => DayOfWeek::Sunday,
    };
    DateTime {
        year: reading.year,
        month: reading.month,
        day: reading.day,
        day_of_week,
        hour: reading.hour,
        minute: reading.minute,
        second: reading.second,
    }
}
