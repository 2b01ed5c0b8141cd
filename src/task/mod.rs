//! Tasks that make up the application and the adapters they drive.
pub mod buttons;
pub mod display;
pub mod orchestrate;
pub mod rtc;
