//! # RDA5807M FM tuner
//! Blocking driver for the RDA5807M single-chip FM receiver over I2C.
//!
//! The chip is addressed in random access mode, one 16 bit register per transfer. The control
//! registers are write-only in practice, so the driver keeps shadow copies of them and only ever
//! writes from the shadow. Bus errors are logged and swallowed: a glitch on the bus must not take
//! down the clock.

use defmt::{Debug2Format, info, warn};
use embassy_rp::i2c::{Blocking, I2c, Instance};
use embassy_time::{Duration, block_for};
use pico_radio_clock::peripherals::Tuner;

/// Random access I2C address
const ADDRESS: u8 = 0x11;

/// Chip id register, reads 0x58xx
const REG_CHIP_ID: u8 = 0x00;
/// Power, mute, mono and seek control
const REG_CONTROL: u8 = 0x02;
/// Channel, tune, band and spacing
const REG_CHANNEL: u8 = 0x03;
/// Seek threshold and volume
const REG_VOLUME: u8 = 0x05;
/// Seek status and read channel
const REG_STATUS: u8 = 0x0A;
/// Signal strength
const REG_RSSI: u8 = 0x0B;

/// Audio output high-z disable
const CTRL_DHIZ: u16 = 1 << 15;
/// Mute disable, set means audio plays
const CTRL_DMUTE: u16 = 1 << 14;
/// Force mono
const CTRL_MONO: u16 = 1 << 13;
/// Bass boost
const CTRL_BASS: u16 = 1 << 12;
/// Seek direction up
const CTRL_SEEKUP: u16 = 1 << 9;
/// Start seeking
const CTRL_SEEK: u16 = 1 << 8;
/// Use the new demodulation method
const CTRL_NEW_METHOD: u16 = 1 << 2;
/// Soft reset
const CTRL_SOFT_RESET: u16 = 1 << 1;
/// Power up
const CTRL_ENABLE: u16 = 1 << 0;

/// Start tuning to the channel in `CHAN`
const CHAN_TUNE: u16 = 1 << 4;
/// Position of the channel number
const CHAN_SHIFT: u16 = 6;

/// Seek/tune complete
const STATUS_STC: u16 = 1 << 14;
/// Mask of the channel read back from the status register
const STATUS_CHANNEL_MASK: u16 = 0x03FF;

/// Default seek threshold, interrupt mode and LNA settings, volume bits cleared
const VOLUME_BASE: u16 = 0x8880;
/// Mask of the volume bits
const VOLUME_MASK: u16 = 0x000F;

/// Lower edge of the 87-108 MHz band
const BAND_BOTTOM_MHZ: f32 = 87.0;
/// Upper edge of the band
const BAND_TOP_MHZ: f32 = 108.0;
/// Channel spacing of 100 kHz
const CHANNEL_SPACING_MHZ: f32 = 0.1;

/// How often the seek status is polled before giving up
const SEEK_POLLS: u8 = 100;

/// The RDA5807M on an I2C bus
pub struct Rda5807<'d, I: Instance> {
    /// The bus
    i2c: I2c<'d, I, Blocking>,
    /// Shadow of the control register
    control: u16,
    /// Shadow of the channel register, without the tune bit
    channel: u16,
    /// Shadow of the volume register
    volume: u16,
}

impl<'d, I: Instance> Rda5807<'d, I> {
    /// Probe and power up the chip. Returns `None` if it does not answer on the bus.
    pub fn new(i2c: I2c<'d, I, Blocking>) -> Option<Self> {
        let mut tuner = Self {
            i2c,
            control: CTRL_DHIZ | CTRL_BASS | CTRL_NEW_METHOD | CTRL_ENABLE,
            channel: 0,
            volume: VOLUME_BASE,
        };

        let id = tuner.read_register(REG_CHIP_ID)?;
        info!("RDA5807M chip id {:#x}", id);

        tuner.write_register(REG_CONTROL, tuner.control | CTRL_SOFT_RESET)?;
        block_for(Duration::from_millis(50));
        tuner.write_register(REG_CONTROL, tuner.control)?;
        tuner.write_register(REG_VOLUME, tuner.volume)?;
        Some(tuner)
    }

    /// Read one register
    fn read_register(&mut self, register: u8) -> Option<u16> {
        let mut buf = [0u8; 2];
        match self.i2c.blocking_write_read(ADDRESS, &[register], &mut buf) {
            Ok(()) => Some(u16::from_be_bytes(buf)),
            Err(e) => {
                warn!("RDA5807M read of {:#x} failed: {}", register, Debug2Format(&e));
                None
            }
        }
    }

    /// Write one register
    fn write_register(&mut self, register: u8, value: u16) -> Option<()> {
        let [hi, lo] = value.to_be_bytes();
        match self.i2c.blocking_write(ADDRESS, &[register, hi, lo]) {
            Ok(()) => Some(()),
            Err(e) => {
                warn!("RDA5807M write of {:#x} failed: {}", register, Debug2Format(&e));
                None
            }
        }
    }

    /// Write the control register from the shadow
    fn write_control(&mut self) {
        let _ = self.write_register(REG_CONTROL, self.control);
    }

    /// Run a seek in the given direction and wait for it to complete
    fn seek(&mut self, up: bool) {
        if up {
            self.control |= CTRL_SEEKUP;
        } else {
            self.control &= !CTRL_SEEKUP;
        }
        let _ = self.write_register(REG_CONTROL, self.control | CTRL_SEEK);

        for _ in 0..SEEK_POLLS {
            block_for(Duration::from_millis(10));
            if self.read_register(REG_STATUS).is_some_and(|s| s & STATUS_STC != 0) {
                break;
            }
        }
        self.write_control();

        if let Some(status) = self.read_register(REG_STATUS) {
            self.channel = (status & STATUS_CHANNEL_MASK) << CHAN_SHIFT;
        }
        info!("Seek done, now at {} MHz", self.frequency_mhz());
    }
}

impl<I: Instance> Tuner for Rda5807<'_, I> {
    fn set_volume(&mut self, volume: u8) {
        self.volume = (self.volume & !VOLUME_MASK) | (u16::from(volume) & VOLUME_MASK);
        let _ = self.write_register(REG_VOLUME, self.volume);
    }

    fn volume(&mut self) -> u8 {
        // the mask keeps it within 4 bits
        #[allow(clippy::cast_possible_truncation)]
        let volume = (self.volume & VOLUME_MASK) as u8;
        volume
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to the band
    fn set_frequency_mhz(&mut self, mhz: f32) {
        let mhz = mhz.clamp(BAND_BOTTOM_MHZ, BAND_TOP_MHZ);
        let channel = ((mhz - BAND_BOTTOM_MHZ) / CHANNEL_SPACING_MHZ + 0.5) as u16;
        self.channel = channel << CHAN_SHIFT;
        let _ = self.write_register(REG_CHANNEL, self.channel | CHAN_TUNE);
        info!("Tuned to {} MHz", mhz);
    }

    #[allow(clippy::suboptimal_flops)] // no fused multiply-add without std
    fn frequency_mhz(&mut self) -> f32 {
        f32::from(self.channel >> CHAN_SHIFT) * CHANNEL_SPACING_MHZ + BAND_BOTTOM_MHZ
    }

    fn mute(&mut self, muted: bool) {
        if muted {
            self.control &= !CTRL_DMUTE;
        } else {
            self.control |= CTRL_DMUTE;
        }
        self.write_control();
    }

    fn is_muted(&mut self) -> bool {
        self.control & CTRL_DMUTE == 0
    }

    fn is_mono(&mut self) -> bool {
        self.control & CTRL_MONO != 0
    }

    fn seek_up(&mut self) {
        self.seek(true);
    }

    fn seek_down(&mut self) {
        self.seek(false);
    }

    #[allow(clippy::cast_possible_truncation)] // RSSI sits in the top 7 bits
    fn signal_strength(&mut self) -> u8 {
        self.read_register(REG_RSSI).map_or(0, |r| (r >> 9) as u8)
    }
}
