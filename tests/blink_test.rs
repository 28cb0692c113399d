//! Blink and double-blink detection scenarios

mod test_helpers;

use gaze_tracking::{
    blink::BlinkDetector,
    config::BlinkConfig,
    features::eye_aspect_ratio,
};
use test_helpers::{assert_close, FaceBuilder};

fn feed(detector: &mut BlinkDetector, frames: &[(f64, f64)]) -> Vec<bool> {
    frames
        .iter()
        .map(|&(t, ear)| detector.update(ear, t).double_blink)
        .collect()
}

#[test]
fn test_single_blink_counted_on_reopen() {
    let mut detector = BlinkDetector::new(BlinkConfig::default());
    let ears = [0.3, 0.1, 0.1, 0.3, 0.3];
    let mut counts = Vec::new();
    for (i, ear) in ears.into_iter().enumerate() {
        counts.push(detector.update(ear, i as f64 / 30.0).blink_count);
    }
    assert_eq!(counts, vec![0, 0, 0, 1, 1]);
}

#[test]
fn test_double_blink_reported_on_one_frame() {
    let mut detector = BlinkDetector::new(BlinkConfig::default());
    let flags = feed(
        &mut detector,
        &[(0.0, 0.3), (0.1, 0.1), (0.2, 0.3), (0.3, 0.1), (0.5, 0.3), (0.6, 0.3)],
    );
    assert_eq!(flags, vec![false, false, false, false, true, false]);
    assert_eq!(detector.blink_count(), 2);
}

#[test]
fn test_third_blink_does_not_retrigger() {
    let mut detector = BlinkDetector::new(BlinkConfig::default());
    let flags = feed(
        &mut detector,
        &[(0.0, 0.1), (0.1, 0.3), (0.2, 0.1), (0.3, 0.3), (0.4, 0.1), (0.5, 0.3)],
    );
    assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
    assert!(flags[3]);
    assert_eq!(detector.blink_count(), 3);
}

#[test]
fn test_blinks_outside_window_are_not_double() {
    let mut detector = BlinkDetector::new(BlinkConfig::default());
    let flags = feed(&mut detector, &[(0.0, 0.1), (0.1, 0.3), (0.6, 0.1), (0.8, 0.3)]);
    assert!(flags.iter().all(|&f| !f));
    assert_eq!(detector.blink_count(), 2);
}

#[test]
fn test_long_closure_is_not_a_blink() {
    let mut detector = BlinkDetector::new(BlinkConfig::default());
    for i in 0..10 {
        assert!(detector.update(0.1, f64::from(i) / 30.0).eyes_closed);
    }
    let out = detector.update(0.3, 10.0 / 30.0);
    assert_eq!(out.blink_count, 0);
    assert!(!out.eyes_closed);
}

#[test]
fn test_synthetic_face_ear_drives_detector() {
    let open = FaceBuilder::default().ear(0.3).build();
    let closed = FaceBuilder::default().ear(0.05).build();
    assert_close(eye_aspect_ratio(&open), 0.3, 1e-9);
    assert_close(eye_aspect_ratio(&closed), 0.05, 1e-9);

    let mut detector = BlinkDetector::new(BlinkConfig::default());
    detector.update(eye_aspect_ratio(&open), 0.0);
    detector.update(eye_aspect_ratio(&closed), 0.033);
    let out = detector.update(eye_aspect_ratio(&open), 0.066);
    assert_eq!(out.blink_count, 1);
}
