//! Drivers for peripherals without a HAL-level crate.
pub mod rda5807;
