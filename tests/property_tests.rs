//! Property tests for the wheel arithmetic, the snooze sequence and the edit state machine

mod common;
use common::*;

use proptest::prelude::*;

use pico_radio_clock::defaults::VOLUME_MAX;
use pico_radio_clock::{AlarmClock, AlarmScheduler, ButtonEvent, ConfigCommand};

/// Any of the four buttons
fn button_strategy() -> impl Strategy<Value = ButtonEvent> {
    prop::sample::select(ButtonEvent::ALL.to_vec())
}

/// An alarm that is ringing at `hour:minute`
fn ringing(hour: u8, minute: u8) -> AlarmScheduler {
    let mut alarm = AlarmScheduler::new(0, 0);
    alarm.set(hour, minute);
    assert!(alarm.check(&monday(hour, minute, 0)));
    alarm
}

proptest! {
    /// Property: 24 hour steps in the same direction bring the alarm hour back
    #[test]
    fn prop_hour_wheel_closes(hour in 0u8..24, up in any::<bool>()) {
        let mut alarm = AlarmScheduler::new(hour, 0);
        let delta = if up { 1 } else { -1 };
        for _ in 0..24 {
            alarm.adjust_hour(delta);
            prop_assert!(alarm.hour() < 24);
        }
        prop_assert_eq!(alarm.hour(), hour);
    }

    /// Property: alarm fields stay in range under any sequence of adjustments
    #[test]
    fn prop_alarm_fields_stay_in_range(steps in prop::collection::vec((any::<bool>(), -1i8..=1), 0..200)) {
        let mut alarm = AlarmScheduler::new(12, 30);
        for (hour, delta) in steps {
            if hour {
                alarm.adjust_hour(delta);
            } else {
                alarm.adjust_minute(delta);
            }
            prop_assert!(alarm.hour() < 24);
            prop_assert!(alarm.minute() < 60);
        }
    }

    /// Property: n snoozes add up to the sum of max(1, 10 / k) minutes on the day wheel
    #[test]
    fn prop_snooze_offset_is_cumulative(hour in 0u8..24, minute in 0u8..60, n in 1u16..40) {
        let mut alarm = ringing(hour, minute);
        let mut expected = u32::from(hour) * 60 + u32::from(minute);
        for k in 1..=n {
            prop_assert!(alarm.snooze());
            expected += u32::from((10 / k).max(1));
            prop_assert_eq!(alarm.snooze_count(), k);
            prop_assert!(!alarm.is_triggered());
            let (h, m) = (alarm.hour(), alarm.minute());
            prop_assert!(alarm.check(&monday(h, m, 0)));
        }
        let expected = expected % (24 * 60);
        prop_assert_eq!(u32::from(alarm.hour()) * 60 + u32::from(alarm.minute()), expected);
    }

    /// Property: reset after any number of snoozes restores the time the user set
    #[test]
    fn prop_reset_restores_original(hour in 0u8..24, minute in 0u8..60, n in 0u16..20) {
        let mut alarm = ringing(hour, minute);
        for _ in 0..n {
            alarm.snooze();
            let (h, m) = (alarm.hour(), alarm.minute());
            alarm.check(&monday(h, m, 0));
        }
        alarm.reset();
        prop_assert_eq!((alarm.hour(), alarm.minute()), (hour, minute));
        prop_assert_eq!(alarm.snooze_count(), 0);
        prop_assert!(!alarm.is_live());
    }

    /// Property: any button sequence keeps the edit cursor and the volume in range
    #[test]
    fn prop_buttons_keep_state_in_range(buttons in prop::collection::vec(button_strategy(), 0..120)) {
        let mut clock = AlarmClock::new(MockRtc::at(9, 0, 0), Some(MockTuner::new()));
        let mut display = MockDisplay::new();
        for button in buttons {
            clock.press(button, &mut display);
            let modes = clock.modes();
            prop_assert!(modes.edit_field() < modes.mode().field_count());
            prop_assert!(clock.tuner().map_or(0, |t| t.volume) <= VOLUME_MAX);
            prop_assert!(clock.alarm().hour() < 24 && clock.alarm().minute() < 60);
        }
    }

    /// Property: out of range set-alarm requests are rejected, direct calls wrap
    #[test]
    fn prop_set_alarm_ranges(hour in 0u8..=255, minute in 0u8..=255) {
        let path = format!("/set_alarm?h={hour}&m={minute}");
        let parsed = ConfigCommand::parse(&path);
        prop_assert_eq!(parsed.is_ok(), hour < 24 && minute < 60);

        let mut alarm = AlarmScheduler::new(0, 0);
        alarm.set(hour, minute);
        prop_assert_eq!((alarm.hour(), alarm.minute()), (hour % 24, minute % 60));
    }
}
