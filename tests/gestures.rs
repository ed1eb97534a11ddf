use std::{cell::RefCell, sync::Once};

use clickwise::{
    Level, PinMode, Polarity, SwitchDebouncer, SwitchEventKind as K, SwitchOutput, SwitchTiming,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const ON: Level = Level::High;
const OFF: Level = Level::Low;

static INIT: Once = Once::new();

fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

fn recorder<'a>(log: &'a RefCell<Vec<K>>, kind: K) -> impl FnMut() + 'a {
    move || log.borrow_mut().push(kind)
}

fn active_high<'a>() -> SwitchDebouncer<'a> {
    SwitchDebouncer::new(PinMode::InputPullDown, Polarity::Auto, SwitchTiming::DEFAULT)
}

/// Feeds `(level, duration_ms)` segments at 1 ms resolution starting at `start_ms`.
fn drive(
    switch: &mut SwitchDebouncer<'_>,
    start_ms: u64,
    segments: &[(Level, u64)],
    mut on_output: impl FnMut(u64, &SwitchOutput),
) -> u64 {
    let mut now_ms = start_ms;
    for &(level, duration_ms) in segments {
        for _ in 0..duration_ms {
            let output = switch.poll(now_ms, level);
            on_output(now_ms, &output);
            now_ms += 1;
        }
    }
    now_ms
}

#[test]
fn notifications_follow_double_click() {
    init_logger();
    let log = RefCell::new(Vec::new());
    let mut recorders: Vec<_> = K::ALL.iter().map(|&kind| recorder(&log, kind)).collect();

    let mut switch = active_high();
    for (kind, notification) in K::ALL.iter().zip(recorders.iter_mut()) {
        switch.attach(*kind, notification);
    }

    let mut double_clicked_at = Vec::new();
    drive(
        &mut switch,
        0,
        &[(ON, 40), (OFF, 40), (ON, 40), (OFF, 400)],
        |now_ms, output| {
            if output.is_double_clicked() {
                double_clicked_at.push(now_ms);
            }
            assert!(!output.is_clicked());
        },
    );

    assert_eq!(
        *log.borrow(),
        vec![K::Pressed, K::Released, K::Pressed, K::Released, K::DoubleClicked]
    );
    assert_eq!(double_clicked_at, vec![126]);
}

#[test]
fn notifications_follow_single_click() {
    init_logger();
    let log = RefCell::new(Vec::new());
    let mut on_pressed = recorder(&log, K::Pressed);
    let mut on_released = recorder(&log, K::Released);
    let mut on_clicked = recorder(&log, K::Clicked);
    let mut on_double = recorder(&log, K::DoubleClicked);

    let mut switch = active_high();
    switch.attach_pressed(&mut on_pressed);
    switch.attach_released(&mut on_released);
    switch.attach_clicked(&mut on_clicked);
    switch.attach_double_clicked(&mut on_double);

    let mut clicked_polls = 0;
    drive(&mut switch, 0, &[(ON, 40), (OFF, 400)], |_, output| {
        if output.is_clicked() {
            clicked_polls += 1;
        }
    });

    assert_eq!(clicked_polls, 1);
    assert_eq!(*log.borrow(), vec![K::Pressed, K::Released, K::Clicked]);
}

#[test]
fn notifications_follow_click_and_hold() {
    init_logger();
    let log = RefCell::new(Vec::new());
    let mut recorders: Vec<_> = K::ALL.iter().map(|&kind| recorder(&log, kind)).collect();

    let mut switch = active_high();
    for (kind, notification) in K::ALL.iter().zip(recorders.iter_mut()) {
        switch.attach(*kind, notification);
    }

    drive(&mut switch, 0, &[(ON, 40), (OFF, 40), (ON, 600)], |_, _| {});

    assert_eq!(
        *log.borrow(),
        vec![
            K::Pressed,
            K::Released,
            K::Pressed,
            K::Clicked,
            K::Held,
            K::Repeated
        ]
    );
    assert!(switch.is_held());
}

#[test]
fn late_attach_never_fires_retroactively() {
    init_logger();
    let log = RefCell::new(Vec::new());
    let mut on_clicked = recorder(&log, K::Clicked);
    let mut on_pressed = recorder(&log, K::Pressed);

    let mut switch = active_high();
    let now_ms = drive(&mut switch, 0, &[(ON, 40), (OFF, 300)], |_, _| {});
    assert!(!switch.is_clicked());

    switch.attach_clicked(&mut on_clicked);
    switch.attach_pressed(&mut on_pressed);
    drive(&mut switch, now_ms, &[(OFF, 300)], |_, _| {});

    assert!(log.borrow().is_empty());
}

#[test]
fn detached_slot_stays_silent() {
    init_logger();
    let log = RefCell::new(Vec::new());
    let mut on_pressed = recorder(&log, K::Pressed);

    let mut switch = active_high();
    switch.attach_pressed(&mut on_pressed);
    assert!(switch.detach(K::Pressed).is_some());
    assert!(switch.detach(K::Pressed).is_none());

    drive(&mut switch, 0, &[(ON, 40)], |_, _| {});

    assert!(log.borrow().is_empty());
    assert!(switch.is_pressed());
}

#[test]
fn bursts_inside_debounce_window_report_only_final_level() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..1_000 {
        let mut switch = active_high();
        let burst_len = rng.gen_range(1..=6);
        let mut segments: Vec<(Level, u64)> = (0..burst_len)
            .map(|_| (Level::from(rng.gen::<bool>()), 1))
            .collect();
        let last = Level::from(rng.gen::<bool>());
        segments.push((last, 50));

        let mut kinds = Vec::new();
        drive(&mut switch, 0, &segments, |_, output| kinds.extend(output.kinds()));

        if last == ON {
            assert_eq!(kinds, vec![K::Pressed], "segments {segments:?}");
        } else {
            assert!(kinds.is_empty(), "segments {segments:?}");
        }
    }
}

#[test]
fn press_and_release_strictly_alternate() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let mut switch = active_high();
        let segments: Vec<(Level, u64)> = (0..200)
            .map(|_| (Level::from(rng.gen::<bool>()), rng.gen_range(1..=700)))
            .collect();

        let mut edges = Vec::new();
        drive(&mut switch, 0, &segments, |_, output| {
            let one_shots = [
                output.is_clicked(),
                output.is_long_clicked(),
                output.is_double_clicked(),
            ];
            assert!(one_shots.iter().filter(|flag| **flag).count() <= 1);
            edges.extend(
                output
                    .kinds()
                    .filter(|kind| matches!(kind, K::Pressed | K::Released)),
            );
        });

        for (idx, kind) in edges.iter().enumerate() {
            let expected = if idx % 2 == 0 { K::Pressed } else { K::Released };
            assert_eq!(*kind, expected);
        }
    }
}

#[test]
fn released_switch_stays_quiet() {
    init_logger();
    let mut switch = active_high();

    let mut events = 0;
    drive(&mut switch, 0, &[(OFF, 5_000)], |_, output| {
        events += output.events.len();
    });

    assert_eq!(events, 0);
    assert!(switch.is_released());
}
