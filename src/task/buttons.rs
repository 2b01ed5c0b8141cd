//! # Button Tasks
//! This module contains the tasks for the buttons. Each button has its own task.

use defmt::info;
use embassy_rp::gpio::{self, Input};
use embassy_time::Instant;
use pico_radio_clock::{ButtonEvent, Debouncer, Event, Level};

use crate::task::orchestrate::send_event;

/// Watches one button pin and turns its edges into press events
pub struct ButtonManager<'a> {
    /// The input pin for the button
    input: Input<'a>,
    /// Edge filter, the pins are pulled up so a press reads low
    debouncer: Debouncer,
    /// The button being managed
    button: ButtonEvent,
}

impl<'a> ButtonManager<'a> {
    /// Create a new `ButtonManager`
    pub const fn new(input: Input<'a>, button: ButtonEvent) -> Self {
        Self {
            input,
            debouncer: Debouncer::active_low(),
            button,
        }
    }

    /// Wait for edges forever and send an event for every debounced press
    pub async fn handle_button_press(&mut self) -> ! {
        loop {
            self.input.wait_for_any_edge().await;
            let level = match self.input.get_level() {
                gpio::Level::Low => Level::Low,
                gpio::Level::High => Level::High,
            };
            if self.debouncer.pressed(level, Instant::now().as_micros()) {
                send_event(Event::Button(self.button)).await;
            }
        }
    }
}

#[embassy_executor::task(pool_size = 4)]
pub async fn button_handler(input: Input<'static>, button: ButtonEvent) {
    let mut btn = ButtonManager::new(input, button);
    info!("{} task started", btn.button);
    btn.handle_button_press().await;
}
