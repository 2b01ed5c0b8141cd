//! Integration tests for the assembled clock: buttons, ticks and the alarm episode

mod common;
use common::*;

use std::cell::Cell;
use std::rc::Rc;

use pico_radio_clock::defaults::{DEFAULT_FREQUENCY_MHZ, DEFAULT_VOLUME, VOLUME_MAX};
use pico_radio_clock::time::format_time;
use pico_radio_clock::{
    AlarmClock, ButtonEvent, ConfigCommand, ConfigError, ConfigResponse, Event, Mode, Outcome, Rtc, RtcSource,
    SoftwareClock,
};

fn clock_at(hour: u8, minute: u8, second: u8) -> AlarmClock<MockRtc, MockTuner> {
    AlarmClock::new(MockRtc::at(hour, minute, second), Some(MockTuner::new()))
}

fn tick_at(clock: &mut AlarmClock<MockRtc, MockTuner>, display: &mut MockDisplay, hour: u8, minute: u8, second: u8) {
    clock.rtc_mut().set_time(hour, minute, second);
    clock.tick(display);
}

fn tuner(clock: &AlarmClock<MockRtc, MockTuner>) -> &MockTuner {
    clock.tuner().expect("tuner present")
}

#[test]
fn startup_tunes_default_station_muted() {
    let clock = clock_at(6, 0, 0);
    let tuner = tuner(&clock);
    assert_eq!(tuner.frequency_mhz, DEFAULT_FREQUENCY_MHZ);
    assert_eq!(tuner.volume, DEFAULT_VOLUME.min(VOLUME_MAX));
    assert!(tuner.muted);
    assert_eq!(clock.modes().mode(), Mode::Time);
    assert!(!clock.alarm().is_enabled());
}

#[test]
fn alarm_episode_flashes_snoozes_and_resets() {
    let mut clock = clock_at(6, 57, 58);
    let mut display = MockDisplay::new();
    assert_eq!(
        clock.configure(ConfigCommand::SetAlarm { hour: 6, minute: 58 }),
        Ok(ConfigResponse::Ack)
    );

    tick_at(&mut clock, &mut display, 6, 57, 59);
    assert!(!clock.alarm().is_triggered());
    assert_eq!(display.inverted(), Some(false));

    tick_at(&mut clock, &mut display, 6, 58, 0);
    assert!(clock.alarm().is_triggered());
    assert_eq!(display.inverted(), Some(true));
    assert!(!tuner(&clock).muted);
    assert!(display.shows("RST"));
    assert!(display.shows("SNOZ"));

    tick_at(&mut clock, &mut display, 6, 58, 1);
    assert_eq!(display.inverted(), Some(false));
    tick_at(&mut clock, &mut display, 6, 58, 2);
    assert_eq!(display.inverted(), Some(true));

    clock.press(ButtonEvent::Set, &mut display);
    assert!(clock.alarm().is_snoozed());
    assert!(!clock.alarm().is_triggered());
    assert_eq!((clock.alarm().hour(), clock.alarm().minute()), (7, 8));
    assert!(tuner(&clock).muted);
    assert_eq!(display.inverted(), Some(false));
    assert!(!clock.modes().is_editing());

    tick_at(&mut clock, &mut display, 7, 8, 0);
    assert!(clock.alarm().is_triggered());
    clock.press(ButtonEvent::Set, &mut display);
    assert_eq!((clock.alarm().hour(), clock.alarm().minute()), (7, 13));

    tick_at(&mut clock, &mut display, 7, 13, 0);
    clock.press(ButtonEvent::Set, &mut display);
    assert_eq!((clock.alarm().hour(), clock.alarm().minute()), (7, 16));
    assert_eq!(clock.alarm().snooze_count(), 3);

    clock.press(ButtonEvent::Mode, &mut display);
    assert!(!clock.alarm().is_live());
    assert_eq!((clock.alarm().hour(), clock.alarm().minute()), (6, 58));
    assert_eq!(clock.alarm().snooze_count(), 0);
    assert_eq!(clock.modes().mode(), Mode::Time);
}

#[test]
fn late_tick_does_not_miss_the_alarm() {
    let mut clock = clock_at(6, 59, 59);
    let mut display = MockDisplay::new();
    clock.configure(ConfigCommand::SetAlarm { hour: 7, minute: 0 }).unwrap();
    clock.tick(&mut display);
    tick_at(&mut clock, &mut display, 7, 0, 1);
    assert!(clock.alarm().is_triggered());
}

#[test]
fn snooze_in_radio_mode_keeps_the_radio_playing() {
    let mut clock = clock_at(6, 29, 59);
    let mut display = MockDisplay::new();
    clock.configure(ConfigCommand::SetMode(Mode::Radio)).unwrap();
    clock.configure(ConfigCommand::SetAlarm { hour: 6, minute: 30 }).unwrap();
    clock.tick(&mut display);
    tick_at(&mut clock, &mut display, 6, 30, 0);
    assert!(clock.alarm().is_triggered());

    clock.press(ButtonEvent::Set, &mut display);
    assert!(clock.alarm().is_snoozed());
    assert!(!tuner(&clock).muted);
}

#[test]
fn button_highlight_is_shown_once() {
    let mut clock = clock_at(12, 0, 0);
    let mut display = MockDisplay::new();
    clock.press(ButtonEvent::Mode, &mut display);
    assert_eq!(display.hlines(), 2);
    clock.tick(&mut display);
    assert_eq!(display.hlines(), 0);
}

#[test]
fn edit_mode_changes_the_hint_bar() {
    let mut clock = clock_at(12, 0, 0);
    let mut display = MockDisplay::new();
    clock.tick(&mut display);
    assert!(display.shows("MODE"));
    assert!(display.shows("SET"));

    clock.press(ButtonEvent::Set, &mut display);
    for label in ["UP", "DOWN", "NEXT", "DONE", "SET: Hour"] {
        assert!(display.shows(label), "missing {label}");
    }
}

#[test]
fn time_edit_writes_through_to_the_rtc() {
    let mut clock = clock_at(23, 59, 30);
    let mut display = MockDisplay::new();
    clock.press(ButtonEvent::Set, &mut display);
    clock.press(ButtonEvent::Up, &mut display);
    let now = clock.rtc_mut().read();
    assert_eq!((now.hour, now.minute, now.second), (0, 59, 0));
    assert_eq!((now.month, now.day), (6, 2));
    assert_eq!(clock.rtc().writes, 1);
}

#[test]
fn radio_mode_seeks_and_sets_volume() {
    let mut clock = clock_at(12, 0, 0);
    let mut display = MockDisplay::new();
    clock.press(ButtonEvent::Mode, &mut display);
    assert!(tuner(&clock).muted);
    clock.press(ButtonEvent::Mode, &mut display);
    assert_eq!(clock.modes().mode(), Mode::Radio);
    assert!(!tuner(&clock).muted);
    assert!(display.shows(&format!("Radio FM {DEFAULT_FREQUENCY_MHZ:.1}")));
    let bars = display
        .last_frame()
        .iter()
        .filter(|op| matches!(op, DrawOp::FilledRect(..) | DrawOp::Rect(..)))
        .count();
    assert_eq!(bars, 4);

    clock.press(ButtonEvent::Set, &mut display);
    assert!(display.shows("SET: Frequency"));
    clock.press(ButtonEvent::Up, &mut display);
    clock.press(ButtonEvent::Down, &mut display);
    clock.press(ButtonEvent::Up, &mut display);
    assert_eq!(tuner(&clock).seeks_up, 2);
    assert_eq!(tuner(&clock).seeks_down, 1);

    clock.press(ButtonEvent::Mode, &mut display);
    for _ in 0..8 {
        clock.press(ButtonEvent::Up, &mut display);
    }
    assert_eq!(tuner(&clock).volume, VOLUME_MAX);
    assert!(display.shows(&format!("Volume:{VOLUME_MAX}/{VOLUME_MAX}")));

    // NEXT wraps the cursor without leaving the radio
    clock.press(ButtonEvent::Mode, &mut display);
    assert_eq!(clock.modes().edit_field(), 0);
    assert_eq!(clock.modes().mode(), Mode::Radio);

    clock.press(ButtonEvent::Set, &mut display);
    clock.press(ButtonEvent::Mode, &mut display);
    assert_eq!(clock.modes().mode(), Mode::Time);
    assert!(tuner(&clock).muted);
}

#[test]
fn tuner_is_read_only_on_the_radio_screen() {
    let mut clock = clock_at(9, 0, 0);
    let mut display = MockDisplay::new();
    tick_at(&mut clock, &mut display, 9, 0, 1);
    clock.press(ButtonEvent::Mode, &mut display);
    tick_at(&mut clock, &mut display, 9, 0, 2);
    assert_eq!(clock.modes().mode(), Mode::Alarm);
    assert_eq!(tuner(&clock).signal_reads, 0);

    clock.press(ButtonEvent::Mode, &mut display);
    assert_eq!(clock.modes().mode(), Mode::Radio);
    assert_eq!(tuner(&clock).signal_reads, 1);
    tick_at(&mut clock, &mut display, 9, 0, 3);
    assert_eq!(tuner(&clock).signal_reads, 2);

    clock.press(ButtonEvent::Mode, &mut display);
    tick_at(&mut clock, &mut display, 9, 0, 4);
    assert_eq!(clock.modes().mode(), Mode::Time);
    assert_eq!(tuner(&clock).signal_reads, 2);
}

#[test]
fn missing_tuner_degrades_the_radio() {
    let mut clock: AlarmClock<MockRtc, MockTuner> = AlarmClock::new(MockRtc::at(12, 0, 0), None);
    let mut display = MockDisplay::new();
    clock.press(ButtonEvent::Mode, &mut display);
    clock.press(ButtonEvent::Mode, &mut display);
    assert_eq!(clock.modes().mode(), Mode::Radio);
    assert_eq!(display.texts()[0], "Radio->Not initialized");

    clock.press(ButtonEvent::Set, &mut display);
    clock.press(ButtonEvent::Up, &mut display);
    assert_eq!(
        clock.configure(ConfigCommand::RadioVolumeUp),
        Err(ConfigError::RadioUnavailable)
    );
    match clock.configure(ConfigCommand::GetSettings) {
        Ok(ConfigResponse::Status(status)) => {
            assert_eq!(status.radio_frequency, None);
            assert_eq!(status.radio_volume, None);
            assert_eq!(status.mode, Mode::Radio);
        }
        other => panic!("unexpected response {other:?}"),
    }
}

#[test]
fn events_route_to_render_or_config() {
    let mut clock = clock_at(8, 15, 0);
    let mut display = MockDisplay::new();
    assert!(matches!(clock.handle_event(Event::Tick, &mut display), Outcome::Rendered(_)));
    assert!(matches!(
        clock.handle_event(Event::Button(ButtonEvent::Mode), &mut display),
        Outcome::Rendered(_)
    ));
    assert_eq!(clock.modes().mode(), Mode::Alarm);
    assert!(matches!(
        clock.handle_event(Event::Config(ConfigCommand::GetSettings), &mut display),
        Outcome::Config(Ok(ConfigResponse::Status(_)))
    ));
    // config requests do not draw
    assert_eq!(display.frames(), 2);
}

#[test]
fn software_clock_stands_in_for_a_failed_rtc() {
    let uptime = Rc::new(Cell::new(0u64));
    let source = Rc::clone(&uptime);
    let rtc: RtcSource<MockRtc, _> = RtcSource::Software(SoftwareClock::new(move || source.get(), monday(6, 59, 58)));
    assert!(rtc.is_degraded());

    let mut clock: AlarmClock<_, MockTuner> = AlarmClock::new(rtc, Some(MockTuner::new()));
    let mut display = MockDisplay::new();
    clock.configure(ConfigCommand::SetAlarm { hour: 7, minute: 0 }).unwrap();
    clock.tick(&mut display);

    uptime.set(2);
    clock.tick(&mut display);
    assert!(clock.alarm().is_triggered());
    let shown = format_time(7, 0, Some(0), clock.modes().format());
    assert!(display.shows(&shown));

    clock
        .configure(ConfigCommand::SetTime { hour: 21, minute: 0, second: 0 })
        .unwrap();
    uptime.set(10);
    let now = clock.rtc_mut().read();
    assert_eq!((now.hour, now.minute, now.second), (21, 0, 8));
}
