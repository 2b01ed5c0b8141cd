//! This build script generates the compile-time clock defaults from `config/clock.json`
//! and, for firmware builds, copies the `memory.x` file from the crate root into
//! a directory where the linker can always find it at build time.
//!
//! Requesting that Cargo re-run the build script whenever `memory.x` or the
//! config file changes ensures a rebuild with the new settings.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::print_stdout)]

use serde::Deserialize;
use std::{
    env, fs,
    fs::File,
    io,
    io::Write,
    path::{Path, PathBuf},
};

/// Alarm section of `clock.json`
#[derive(Deserialize)]
#[serde(default)]
struct AlarmDefaults {
    /// Default alarm hour
    hour: u8,
    /// Default alarm minute
    minute: u8,
}

impl Default for AlarmDefaults {
    fn default() -> Self {
        Self { hour: 7, minute: 0 }
    }
}

/// Radio section of `clock.json`
#[derive(Deserialize)]
#[serde(default)]
struct RadioDefaults {
    /// Frequency tuned at power-up
    frequency_mhz: f32,
    /// Volume set at power-up
    volume: u8,
}

impl Default for RadioDefaults {
    fn default() -> Self {
        Self {
            frequency_mhz: 101.9,
            volume: 0,
        }
    }
}

/// Button section of `clock.json`
#[derive(Deserialize)]
#[serde(default)]
struct ButtonDefaults {
    /// Debounce window in microseconds
    debounce_us: u64,
}

impl Default for ButtonDefaults {
    fn default() -> Self {
        Self { debounce_us: 5_000 }
    }
}

/// Display section of `clock.json`
#[derive(Deserialize)]
#[serde(default)]
struct DisplayDefaults {
    /// Start in 24 hour format
    format_24h: bool,
}

impl Default for DisplayDefaults {
    fn default() -> Self {
        Self { format_24h: true }
    }
}

/// Date written to an unset RTC at first boot
#[derive(Deserialize)]
#[serde(default)]
struct RtcSeed {
    /// Seed year
    year: u16,
    /// Seed month
    month: u8,
    /// Seed day
    day: u8,
}

impl Default for RtcSeed {
    fn default() -> Self {
        Self {
            year: 2025,
            month: 1,
            day: 1,
        }
    }
}

/// The complete `clock.json` document
#[derive(Deserialize, Default)]
#[serde(default)]
struct ClockConfig {
    /// Alarm defaults
    alarm: AlarmDefaults,
    /// Radio defaults
    radio: RadioDefaults,
    /// Button defaults
    buttons: ButtonDefaults,
    /// Display defaults
    display: DisplayDefaults,
    /// RTC seed date
    rtc_seed: RtcSeed,
}

fn main() {
    clock_defaults().unwrap();
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_some() {
        memory_x();
    }
}

/// Generate `clock_defaults.rs` from `config/clock.json`
fn clock_defaults() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR environment variable not set");
    let dest_path = Path::new(&out_dir).join("clock_defaults.rs");
    let mut f = File::create(dest_path)?;

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR environment variable not set");
    let config_path = Path::new(&manifest_dir).join("config/clock.json");
    println!("cargo:rerun-if-changed={}", config_path.display());

    // A missing or unreadable file is not an error, the built-in defaults apply
    let config: ClockConfig = match fs::read_to_string(&config_path) {
        Ok(contents) => serde_json::from_str(&contents).expect("Could not parse config/clock.json"),
        Err(_) => {
            println!("cargo:warning=config/clock.json not found, using built-in defaults");
            ClockConfig::default()
        }
    };

    let consts = [
        ("Alarm hour at power-up", format!("DEFAULT_ALARM_HOUR: u8 = {}", config.alarm.hour % 24)),
        ("Alarm minute at power-up", format!("DEFAULT_ALARM_MINUTE: u8 = {}", config.alarm.minute % 60)),
        ("FM frequency tuned at power-up", format!("DEFAULT_FREQUENCY_MHZ: f32 = {:?}", config.radio.frequency_mhz)),
        ("Tuner volume at power-up", format!("DEFAULT_VOLUME: u8 = {}", config.radio.volume)),
        ("Button debounce window in microseconds", format!("DEBOUNCE_US: u64 = {}", config.buttons.debounce_us)),
        ("Start in 24 hour format", format!("DEFAULT_FORMAT_24H: bool = {}", config.display.format_24h)),
        ("Year written to an unset RTC", format!("RTC_SEED_YEAR: u16 = {}", config.rtc_seed.year)),
        ("Month written to an unset RTC", format!("RTC_SEED_MONTH: u8 = {}", config.rtc_seed.month)),
        ("Day written to an unset RTC", format!("RTC_SEED_DAY: u8 = {}", config.rtc_seed.day)),
    ];
    for (doc, decl) in consts {
        writeln!(f, "/// {doc}")?;
        writeln!(f, "pub const {decl};")?;
    }
    Ok(())
}

/// Handle the `memory.x` linker script
fn memory_x() {
    // Put `memory.x` in our output directory and ensure it's
    // on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // By default, Cargo will re-run a build script whenever
    // any file in the project changes. By specifying `memory.x`
    // here, we ensure the build script is only re-run when
    // `memory.x` is changed.
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
