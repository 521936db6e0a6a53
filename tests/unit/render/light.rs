use super::*;

fn frame(level: u8) -> Pixmap {
    Pixmap::from_straight(160, 120, [level, level, level, 255].repeat(160 * 120)).unwrap()
}

#[test]
fn brightness_is_channel_mean() {
    let f = Pixmap::from_straight(4, 4, [30u8, 60, 90, 255].repeat(16)).unwrap();
    assert_eq!(central_brightness(&f), Some(60.0));
    assert_eq!(central_brightness(&Pixmap::new(0, 0).unwrap()), None);
}

#[test]
fn nothing_is_sampled_during_initial_delay() {
    let mut m = LightMonitor::new();
    let dark = frame(10);
    for t in [0.0, 500.0, 1000.0, 1499.0] {
        assert_eq!(m.observe(&dark, t), None);
    }
    assert!(!m.is_warning());
}

#[test]
fn three_dark_samples_raise_and_one_bright_clears() {
    let mut m = LightMonitor::new();
    let dark = frame(20);
    let bright = frame(200);
    m.observe(&dark, 0.0);
    assert_eq!(m.observe(&dark, 1500.0), None);
    // Inside the interval: not sampled.
    assert_eq!(m.observe(&dark, 1700.0), None);
    assert_eq!(m.observe(&dark, 2000.0), None);
    assert_eq!(m.observe(&dark, 2500.0), Some(LightEvent::WarningRaised));
    assert!(m.is_warning());
    assert_eq!(m.observe(&dark, 3000.0), None);
    assert_eq!(m.observe(&bright, 3500.0), Some(LightEvent::WarningCleared));
    assert!(!m.is_warning());
}

#[test]
fn bright_sample_resets_the_dark_streak() {
    let mut m = LightMonitor::new();
    let dark = frame(20);
    let bright = frame(200);
    m.observe(&dark, 0.0);
    m.observe(&dark, 1500.0);
    m.observe(&dark, 2000.0);
    m.observe(&bright, 2500.0);
    assert_eq!(m.observe(&dark, 3000.0), None);
    assert_eq!(m.observe(&dark, 3500.0), None);
    assert!(!m.is_warning());
}
