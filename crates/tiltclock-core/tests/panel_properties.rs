//! Property tests for the tick-driven panels.

use proptest::prelude::*;
use tiltclock_core::panels::countdown::parse_entry;
use tiltclock_core::{detect, Countdown, Event, Mode, Orientation, Stopwatch};

fn hhmmss(digits: &str) -> u64 {
    let padded = format!("{digits:0>6}");
    let h: u64 = padded[0..2].parse().unwrap();
    let m: u64 = padded[2..4].parse().unwrap();
    let s: u64 = padded[4..6].parse().unwrap();
    h * 3600 + m * 60 + s
}

proptest! {
    #[test]
    fn parse_matches_padded_fields(digits in "[0-9]{0,6}") {
        prop_assert_eq!(parse_entry(&digits).unwrap(), hhmmss(&digits));
    }

    #[test]
    fn digit_pad_never_exceeds_six(digits in "[0-9]{0,12}") {
        let mut cd = Countdown::new();
        for d in digits.chars() {
            cd.press_digit(d);
        }
        prop_assert!(cd.buffer().len() <= 6);
        prop_assert!(digits.starts_with(cd.buffer()));
    }

    #[test]
    fn countdown_monotone_and_completes_once(digits in "[0-9]{1,3}", extra in 0u64..20) {
        let mut cd = Countdown::new();
        for d in digits.chars() {
            cd.press_digit(d);
        }
        let total = hhmmss(&digits);
        prop_assume!(total > 0);
        prop_assert!(cd.start().is_some());

        let mut completions = 0;
        let mut last = cd.remaining_secs();
        for _ in 0..(total + extra) {
            if let Some(Event::CountdownCompleted { .. }) = cd.tick() {
                completions += 1;
            }
            prop_assert!(cd.remaining_secs() <= last);
            prop_assert!(cd.remaining_secs() <= cd.total_secs());
            last = cd.remaining_secs();
        }
        prop_assert_eq!(completions, 1);
        prop_assert!(!cd.is_running());
        prop_assert_eq!(cd.remaining_secs(), 0);
    }

    #[test]
    fn stopwatch_monotone_frozen_and_reset(ops in proptest::collection::vec(0u8..4, 0..200)) {
        let mut sw = Stopwatch::new();
        for op in ops {
            let before = sw.elapsed_ms();
            match op {
                0 => { sw.start(); }
                1 => { sw.pause(); }
                2 => {
                    sw.reset();
                    prop_assert_eq!(sw.elapsed_ms(), 0);
                    continue;
                }
                _ => {
                    let running = sw.is_running();
                    sw.tick();
                    if running {
                        prop_assert_eq!(sw.elapsed_ms(), before + 10);
                    } else {
                        prop_assert_eq!(sw.elapsed_ms(), before);
                    }
                    continue;
                }
            }
            prop_assert_eq!(sw.elapsed_ms(), before);
        }
    }

    #[test]
    fn orientation_always_selects_a_mode(w in 1u32..4000, h in 1u32..4000, angle in prop::sample::select(vec![-90, 0, 90, 180])) {
        let o = detect(None, w, h, angle);
        prop_assert_eq!(w > h, matches!(o, Orientation::LandscapePrimary | Orientation::LandscapeSecondary));
        let mode = o.mode();
        prop_assert!(matches!(mode, Mode::Alarm | Mode::Stopwatch | Mode::Timer | Mode::Weather));
    }
}

#[test]
fn documented_examples() {
    assert_eq!(parse_entry("130045").unwrap(), 46845);
    assert_eq!(parse_entry("5").unwrap(), 5);
    assert_eq!(detect(None, 1024, 768, 90), Orientation::LandscapePrimary);
    assert_eq!(detect(None, 768, 1024, 0), Orientation::PortraitPrimary);
}
