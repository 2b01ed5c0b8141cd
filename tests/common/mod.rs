//! Shared test infrastructure for the clock integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use pico_radio_clock::{ClockReading, Display, Rtc, Tuner, Weekday};

// ============================================================================
// Mock Display
// ============================================================================

/// One drawing call made on the display
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Text(String, i32, i32),
    FilledRect(i32, i32, u32, u32),
    Rect(i32, i32, u32, u32),
    HLine(i32, i32, u32),
    Inverted(bool),
    Present,
}

/// Display that records every call
#[derive(Debug, Default)]
pub struct MockDisplay {
    pub ops: Vec<DrawOp>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text drawn since the last clear
    pub fn texts(&self) -> Vec<&str> {
        self.last_frame()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text(text, _, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether the last frame contains the given text
    pub fn shows(&self, text: &str) -> bool {
        self.texts().contains(&text)
    }

    /// The inversion state set in the last frame
    pub fn inverted(&self) -> Option<bool> {
        self.last_frame().iter().rev().find_map(|op| match op {
            DrawOp::Inverted(inverted) => Some(*inverted),
            _ => None,
        })
    }

    /// Number of horizontal lines in the last frame
    pub fn hlines(&self) -> usize {
        self.last_frame()
            .iter()
            .filter(|op| matches!(op, DrawOp::HLine(..)))
            .count()
    }

    /// All calls since the last clear
    pub fn last_frame(&self) -> &[DrawOp] {
        let start = self.ops.iter().rposition(|op| *op == DrawOp::Clear).unwrap_or(0);
        &self.ops[start..]
    }

    /// Number of frames sent to the panel
    pub fn frames(&self) -> usize {
        self.ops.iter().filter(|op| **op == DrawOp::Present).count()
    }
}

impl Display for MockDisplay {
    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        self.ops.push(DrawOp::Text(text.to_string(), x, y));
    }

    fn draw_filled_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.ops.push(DrawOp::FilledRect(x, y, width, height));
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.ops.push(DrawOp::Rect(x, y, width, height));
    }

    fn draw_hline(&mut self, x: i32, y: i32, length: u32) {
        self.ops.push(DrawOp::HLine(x, y, length));
    }

    fn set_inverted(&mut self, inverted: bool) {
        self.ops.push(DrawOp::Inverted(inverted));
    }

    fn present(&mut self) {
        self.ops.push(DrawOp::Present);
    }
}

// ============================================================================
// Mock RTC
// ============================================================================

/// RTC that holds a reading set by the test
#[derive(Debug, Clone)]
pub struct MockRtc {
    pub now: ClockReading,
    pub writes: usize,
}

impl MockRtc {
    /// An RTC standing at the given time on Monday, 2 June 2025
    pub fn at(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            now: monday(hour, minute, second),
            writes: 0,
        }
    }

    /// Move the time of day, keeping the date
    pub fn set_time(&mut self, hour: u8, minute: u8, second: u8) {
        self.now = self.now.with_time(hour, minute, second);
    }
}

impl Rtc for MockRtc {
    fn read(&mut self) -> ClockReading {
        self.now
    }

    fn write(&mut self, reading: &ClockReading) {
        self.now = *reading;
        self.writes += 1;
    }
}

/// A reading on Monday, 2 June 2025
pub fn monday(hour: u8, minute: u8, second: u8) -> ClockReading {
    ClockReading::midnight(2025, 6, 2, Weekday::Monday).with_time(hour, minute, second)
}

// ============================================================================
// Mock Tuner
// ============================================================================

/// Tuner with public state; seeking moves the frequency by 0.5 MHz
#[derive(Debug, Clone)]
pub struct MockTuner {
    pub frequency_mhz: f32,
    pub volume: u8,
    pub muted: bool,
    pub signal_strength: u8,
    pub seeks_up: usize,
    pub seeks_down: usize,
    pub signal_reads: usize,
}

impl MockTuner {
    pub fn new() -> Self {
        Self {
            frequency_mhz: 88.0,
            volume: 9,
            muted: false,
            signal_strength: 40,
            seeks_up: 0,
            seeks_down: 0,
            signal_reads: 0,
        }
    }
}

impl Tuner for MockTuner {
    fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }

    fn volume(&mut self) -> u8 {
        self.volume
    }

    fn set_frequency_mhz(&mut self, mhz: f32) {
        self.frequency_mhz = mhz;
    }

    fn frequency_mhz(&mut self) -> f32 {
        self.frequency_mhz
    }

    fn mute(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&mut self) -> bool {
        self.muted
    }

    fn is_mono(&mut self) -> bool {
        false
    }

    fn seek_up(&mut self) {
        self.frequency_mhz += 0.5;
        self.seeks_up += 1;
    }

    fn seek_down(&mut self) {
        self.frequency_mhz -= 0.5;
        self.seeks_down += 1;
    }

    fn signal_strength(&mut self) -> u8 {
        self.signal_reads += 1;
        self.signal_strength
    }
}
