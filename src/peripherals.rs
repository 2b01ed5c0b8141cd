//! # Peripherals
//! The narrow contracts of the hardware the clock talks to: the display, the real-time clock
//! and the FM tuner.
//!
//! The core only ever sees these traits. The firmware implements them over the SSD1306 panel,
//! the RP2040 RTC and the RDA5807M tuner; the tests implement them with recording mocks.

use crate::defaults::{MAX_RSSI, NUM_BARS};
use crate::time::{ClockReading, SoftwareClock, Uptime};

/// Pixel and text primitives of a monochrome panel.
///
/// Drawing happens into a frame buffer; nothing is visible before [`Display::present`].
pub trait Display {
    /// Clear the frame buffer
    fn clear(&mut self);
    /// Draw text with its top left corner at `(x, y)`
    fn draw_text(&mut self, text: &str, x: i32, y: i32);
    /// Draw a filled rectangle
    fn draw_filled_rect(&mut self, x: i32, y: i32, width: u32, height: u32);
    /// Draw the outline of a rectangle
    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32);
    /// Draw a horizontal line of `length` pixels
    fn draw_hline(&mut self, x: i32, y: i32, length: u32);
    /// Invert the whole panel
    fn set_inverted(&mut self, inverted: bool);
    /// Send the frame buffer to the panel
    fn present(&mut self);
}

/// The real-time clock
pub trait Rtc {
    /// Read the current time
    fn read(&mut self) -> ClockReading;
    /// Set the current time
    fn write(&mut self, reading: &ClockReading);
}

/// An FM receiver
pub trait Tuner {
    /// Set the volume, 0-15
    fn set_volume(&mut self, volume: u8);
    /// Get the volume, 0-15
    fn volume(&mut self) -> u8;
    /// Tune to a frequency
    fn set_frequency_mhz(&mut self, mhz: f32);
    /// Get the tuned frequency
    fn frequency_mhz(&mut self) -> f32;
    /// Mute or unmute the audio output
    fn mute(&mut self, muted: bool);
    /// Whether the audio output is muted
    fn is_muted(&mut self) -> bool;
    /// Whether the receiver is forced to mono
    fn is_mono(&mut self) -> bool;
    /// Seek to the next station above the current frequency
    fn seek_up(&mut self);
    /// Seek to the next station below the current frequency
    fn seek_down(&mut self);
    /// Received signal strength, 0-70
    fn signal_strength(&mut self) -> u8;
}

/// Snapshot of the tuner, as shown on the radio screen and in the status snapshot
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioState {
    /// Tuned frequency in MHz
    pub frequency_mhz: f32,
    /// Volume 0-15
    pub volume: u8,
    /// Audio muted
    pub muted: bool,
    /// Forced mono
    pub mono: bool,
    /// Signal strength 0-70
    pub signal_strength: u8,
}

impl RadioState {
    /// Read the state from the tuner
    pub fn read<T: Tuner>(tuner: &mut T) -> Self {
        Self {
            frequency_mhz: tuner.frequency_mhz(),
            volume: tuner.volume(),
            muted: tuner.is_muted(),
            mono: tuner.is_mono(),
            signal_strength: tuner.signal_strength(),
        }
    }

    /// Number of lit signal bars, the strength quantized into `NUM_BARS` buckets of width
    /// `MAX_RSSI / NUM_BARS` (17.5, so computed as `strength * NUM_BARS / MAX_RSSI`)
    #[allow(clippy::cast_possible_truncation)] // at most 255 * 4 / 70
    pub const fn signal_bars(&self) -> u8 {
        let bars = (self.signal_strength as u16 * NUM_BARS as u16 / MAX_RSSI as u16) as u8;
        if bars > NUM_BARS { NUM_BARS } else { bars }
    }
}

/// The clock the system runs on: the hardware RTC, or the software fallback if the hardware
/// could not be brought up
pub enum RtcSource<R: Rtc, U: Uptime> {
    /// A working hardware RTC
    Hardware(R),
    /// Time kept in software from the monotonic uptime
    Software(SoftwareClock<U>),
}

impl<R: Rtc, U: Uptime> RtcSource<R, U> {
    /// True when running on the software fallback
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Software(_))
    }
}

impl<R: Rtc, U: Uptime> Rtc for RtcSource<R, U> {
    fn read(&mut self) -> ClockReading {
        match self {
            Self::Hardware(rtc) => rtc.read(),
            Self::Software(clock) => clock.now(),
        }
    }

    fn write(&mut self, reading: &ClockReading) {
        match self {
            Self::Hardware(rtc) => rtc.write(reading),
            Self::Software(clock) => clock.set(*reading),
        }
    }
}
