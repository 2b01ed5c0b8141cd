//! # Orchestrate Tasks
//! The system event channel, the 1 Hz ticker and the task that owns the clock.
//!
//! Every task talks to the clock only through [`EVENT_CHANNEL`]. The orchestrator is its only
//! receiver, so button presses, ticks and configuration requests are handled strictly one after
//! the other.

use defmt::{debug, info, warn};
use embassy_rp::peripherals::I2C1;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};
use pico_radio_clock::{AlarmClock, ConfigResponse, Event, Outcome};

use crate::drivers::rda5807::Rda5807;
use crate::task::display::OledDisplay;
use crate::task::rtc::ClockRtc;

/// The clock as assembled on the board
pub type BoardClock = AlarmClock<ClockRtc, Rda5807<'static, I2C1>>;

/// The capacity of the event channel
const EVENT_CHANNEL_CAPACITY: usize = 10;

/// System event channel for sending and receiving events
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, Event, EVENT_CHANNEL_CAPACITY> =
    Channel::new();

/// Sends an event to the system channel
pub async fn send_event(event: Event) {
    EVENT_CHANNEL.sender().send(event).await;
}

/// Receives the next event from the system channel
pub async fn receive_event() -> Event {
    EVENT_CHANNEL.receiver().receive().await
}

/// Sends a tick once a second, driving the alarm check and the redraw
#[embassy_executor::task]
pub async fn ticker() {
    info!("Ticker task started");
    let mut ticker = Ticker::every(Duration::from_secs(1));
    loop {
        ticker.next().await;
        send_event(Event::Tick).await;
    }
}

/// Owns the clock and the display, handles every event of the system
#[embassy_executor::task]
pub async fn orchestrator(mut clock: BoardClock, mut display: OledDisplay) {
    info!("Orchestrator task started");
    loop {
        let event = receive_event().await;
        debug!("Event {}", event);
        match clock.handle_event(event, &mut display) {
            // rejected requests are already logged by the clock
            Outcome::Rendered(_) | Outcome::Config(Err(_)) => {}
            Outcome::Config(Ok(ConfigResponse::Ack)) => info!("Config applied"),
            Outcome::Config(Ok(ConfigResponse::Status(status))) => {
                let mut buf = [0u8; 256];
                match status.to_json(&mut buf) {
                    Ok(len) => info!("Status {}", core::str::from_utf8(&buf[..len]).unwrap_or("?")),
                    Err(e) => warn!("Status not serialized: {}", e),
                }
            }
        }
    }
}
