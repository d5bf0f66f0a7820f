use cosmic_tarot::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[cfg(test)]
mod animation_timing_tests {
    use super::*;

    fn tracked_tween(
        from: f64,
        to: f64,
        duration_ms: f64,
        easing: EasingFunction,
    ) -> (Tween<f64>, Rc<Cell<f64>>, Rc<Cell<u32>>) {
        let value = Rc::new(Cell::new(f64::NAN));
        let completions = Rc::new(Cell::new(0));
        let (sink, counter) = (value.clone(), completions.clone());
        let tween = Tween::new(from, to, duration_ms, easing, move |v| sink.set(v))
            .unwrap()
            .on_complete(move || counter.set(counter.get() + 1));
        (tween, value, completions)
    }

    #[test]
    fn test_ease_out_quad_reading() {
        let (mut tween, value, completions) = tracked_tween(0.0, 100.0, 1000.0, EasingFunction::EaseOutQuad);

        tween.advance(500.0);
        assert!((value.get() - 75.0).abs() < 1e-9);
        assert_eq!(completions.get(), 0);

        assert!(!tween.advance(500.0));
        assert_eq!(value.get(), 100.0);
        assert_eq!(completions.get(), 1);

        // Finished tweens ignore further ticks
        assert!(!tween.advance(500.0));
        assert_eq!(completions.get(), 1);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_values_follow_the_easing_curve() {
        for easing in EasingFunction::ALL {
            for step in 0..=10 {
                let t = step as f64 / 10.0;
                let (mut tween, value, _) = tracked_tween(-20.0, 30.0, 1000.0, easing);
                tween.advance(t * 1000.0);
                let expected = -20.0 + 50.0 * easing.apply(t);
                assert!(
                    (value.get() - expected).abs() < 1e-9,
                    "{easing:?} at t={t}: {} != {expected}",
                    value.get()
                );
            }
        }
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in EasingFunction::ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
        assert_eq!(EasingFunction::OscillatingAppear.apply(1.0), 1.0);
    }

    #[test]
    fn test_invalid_tween_input_fails_fast() {
        assert!(matches!(
            Tween::new(0.0, f64::NAN, 100.0, EasingFunction::Linear, |_| {}),
            Err(Error::InvalidTweenInput(_))
        ));
        assert!(matches!(
            Tween::new(0.0, 1.0, -5.0, EasingFunction::Linear, |_| {}),
            Err(Error::InvalidTweenInput(_))
        ));
    }

    #[test]
    fn test_staggered_phase_resolves_after_last_item() {
        let duration = 400.0;
        let stagger = 150.0;
        let tick = 16.0;

        let mut sequencer = Sequencer::new();
        let signal = sequencer
            .run_phase(PhaseKind::Entry, vec![(); 5], stagger, move |_, _| {
                Ok(Tween::new(0.0, 1.0, duration, EasingFunction::EaseOutCubic, |_| {})?.boxed())
            })
            .unwrap();

        while sequencer.advance(tick) {}

        let resolved = signal.resolved_at_ms().unwrap();
        let earliest = 4.0 * stagger + duration;
        assert!(resolved >= earliest, "resolved at {resolved}");
        assert!(resolved <= earliest + tick, "resolved at {resolved}");
        assert!(!sequencer.is_busy());
    }

    #[test]
    fn test_items_start_independently_of_each_other() {
        let starts = Rc::new(RefCell::new(Vec::new()));
        let mut sequencer = Sequencer::new();
        let log = starts.clone();
        let clock = Rc::new(Cell::new(0.0));
        let now = clock.clone();

        sequencer
            .run_phase(PhaseKind::Reveal, vec![0usize, 1, 2], 100.0, move |_, index| {
                let log = log.clone();
                let now = now.clone();
                let mut started = false;
                // Item durations differ; start times must not
                Ok(Tween::new(0.0, 1.0, 50.0 * (index + 1) as f64, EasingFunction::Linear, move |_| {
                    if !started {
                        started = true;
                        log.borrow_mut().push(now.get());
                    }
                })?
                .boxed())
            })
            .unwrap();

        for _ in 0..40 {
            clock.set(clock.get() + 10.0);
            sequencer.advance(10.0);
        }
        // Delayed items write their start value on the tick their delay runs out
        assert_eq!(*starts.borrow(), vec![10.0, 100.0, 200.0]);
    }

    #[test]
    fn test_busy_rejection_scenario() {
        let mut sequencer = Sequencer::new();
        let a = sequencer
            .run_phase(PhaseKind::Flip, vec![()], 0.0, |_, _| {
                Ok(Tween::new(0.0, 1.0, 600.0, EasingFunction::EaseInOutQuad, |_| {})?.boxed())
            })
            .unwrap();

        sequencer.advance(100.0);
        let rejected = sequencer.run_phase(PhaseKind::Entry, vec![()], 0.0, |_, _| {
            Ok(Tween::new(0.0, 1.0, 10.0, EasingFunction::Linear, |_| {})?.boxed())
        });
        assert!(matches!(rejected, Err(Error::Busy)));

        sequencer.advance(501.0);
        assert!(a.is_resolved());
        let accepted = sequencer.run_phase(PhaseKind::Entry, vec![()], 0.0, |_, _| {
            Ok(Tween::new(0.0, 1.0, 10.0, EasingFunction::Linear, |_| {})?.boxed())
        });
        assert!(accepted.is_ok());
    }

    #[test]
    fn test_frame_driver_caps_stalled_frames() {
        let clock = ManualClock::new();
        let mut driver = FrameDriver::new(&clock, Some(50.0));
        let value = Rc::new(Cell::new(0.0));
        let sink = value.clone();
        let mut tween = Tween::new(0.0, 1000.0, 1000.0, EasingFunction::Linear, move |v| sink.set(v)).unwrap();

        driver.tick(&mut tween);
        clock.advance(500.0);
        driver.tick(&mut tween);
        assert_eq!(value.get(), 50.0);
        assert_eq!(driver.frames(), 2);
    }
}
