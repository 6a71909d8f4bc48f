use super::*;

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 6,
        initial_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(1000),
        jitter_factor: 0.5,
    }
}

#[test]
fn base_delay_doubles_then_caps() {
    let p = policy();
    let got: Vec<u128> = (1..=6).map(|a| p.base_delay(a).as_millis()).collect();
    assert_eq!(got, vec![100, 200, 400, 800, 1000, 1000]);
}

#[test]
fn huge_attempt_numbers_stay_capped() {
    assert_eq!(policy().base_delay(u32::MAX), Duration::from_millis(1000));
}

#[test]
fn no_jitter_gives_bare_schedule() {
    let p = policy();
    let delays = p.delays(&mut NoJitter);
    assert_eq!(delays.len(), 5);
    for (i, d) in delays.iter().enumerate() {
        assert_eq!(*d, p.base_delay(i as u32 + 1));
    }
}

#[test]
fn seeded_jitter_is_reproducible() {
    let p = policy();
    let a = p.delays(&mut SeededJitter::new(42));
    let b = p.delays(&mut SeededJitter::new(42));
    assert_eq!(a, b);
    let c = p.delays(&mut SeededJitter::new(43));
    assert_ne!(a, c);
}

#[test]
fn jittered_delays_stay_in_bounds() {
    let p = policy();
    let mut rng = SeededJitter::new(7);
    for attempt in 1..=50 {
        let base = p.base_delay(attempt);
        let d = p.delay_for(attempt, &mut rng);
        assert!(d >= base, "attempt {attempt}: {d:?} < {base:?}");
        assert!(d <= base.mul_f64(1.5), "attempt {attempt}: {d:?} too large");
    }
}

#[test]
fn seeded_units_are_in_unit_interval() {
    let mut rng = SeededJitter::new(0);
    for _ in 0..1000 {
        let u = rng.next_unit();
        assert!((0.0..1.0).contains(&u));
    }
}

#[test]
fn invalid_policies_are_rejected() {
    assert!(policy().validate().is_ok());
    let zero = RetryPolicy {
        max_attempts: 0,
        ..policy()
    };
    assert!(zero.validate().is_err());
    let inverted = RetryPolicy {
        initial_delay: Duration::from_secs(5),
        ..policy()
    };
    assert!(inverted.validate().is_err());
    let negative = RetryPolicy {
        jitter_factor: -0.1,
        ..policy()
    };
    assert!(negative.validate().is_err());
}

#[test]
fn thread_rng_jitter_respects_the_same_bounds() {
    let p = policy();
    let mut rng = rand::rng();
    for attempt in 1..=10 {
        let base = p.base_delay(attempt);
        let d = p.delay_for(attempt, &mut rng);
        assert!(d >= base && d <= base.mul_f64(1.5));
    }
}
