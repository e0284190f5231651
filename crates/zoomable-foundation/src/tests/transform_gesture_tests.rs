use super::*;

fn detector() -> TransformGestureDetector {
    TransformGestureDetector::new(TransformGestureConfig::default())
}

fn collect(
    detector: &mut TransformGestureDetector,
    events: &[PointerEvent],
) -> Vec<TransformGesture> {
    events.iter().filter_map(|event| detector.on_event(event)).collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn centroid_of_points() {
    assert_eq!(calculate_centroid(std::iter::empty()), None);
    assert_eq!(
        calculate_centroid([Point::new(0.0, 0.0), Point::new(10.0, 20.0)]),
        Some(Point::new(5.0, 10.0))
    );
}

#[test]
fn zoom_is_ratio_of_spans() {
    let previous = [Point::new(-50.0, 0.0), Point::new(50.0, 0.0)];
    let current = [Point::new(-100.0, 0.0), Point::new(100.0, 0.0)];
    assert!(approx(calculate_zoom(&previous, &current), 2.0));
    assert!(approx(calculate_zoom(&current, &previous), 0.5));
    assert_eq!(calculate_zoom(&previous[..1], &current[..1]), 1.0);
}

#[test]
fn zoom_with_coincident_pointers_is_identity() {
    let previous = [Point::new(5.0, 5.0), Point::new(5.0, 5.0)];
    let current = [Point::new(5.0, 5.0), Point::new(50.0, 5.0)];
    assert_eq!(calculate_zoom(&previous, &current), 1.0);
}

#[test]
fn pan_is_average_movement() {
    let previous = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
    let current = [Point::new(10.0, 0.0), Point::new(100.0, 0.0)];
    assert_eq!(calculate_pan(&previous, &current), Point::new(5.0, 0.0));
}

#[test]
fn rotation_quarter_turn() {
    let previous = [Point::new(-10.0, 0.0), Point::new(10.0, 0.0)];
    let current = [Point::new(0.0, -10.0), Point::new(0.0, 10.0)];
    assert!(approx(calculate_rotation(&previous, &current), 90.0));
    assert!(approx(calculate_rotation(&current, &previous), -90.0));
}

#[test]
fn rotation_wraps_across_half_turn() {
    assert!(approx(normalize_degrees(270.0), -90.0));
    assert!(approx(normalize_degrees(-270.0), 90.0));
    assert!(approx(normalize_degrees(180.0), 180.0));
}

#[test]
fn movement_inside_slop_is_not_reported() {
    let mut detector = detector();
    let gestures = collect(
        &mut detector,
        &[
            PointerEvent::down(1, Point::new(100.0, 100.0), 0),
            PointerEvent::moved(1, Point::new(103.0, 101.0), 16),
            PointerEvent::moved(1, Point::new(98.0, 102.0), 32),
        ],
    );
    assert!(gestures.is_empty());
    assert_eq!(detector.state(), RecognizerState::SlopPending);
}

#[test]
fn single_pointer_becomes_drag() {
    let mut detector = detector();
    let gestures = collect(
        &mut detector,
        &[
            PointerEvent::down(1, Point::new(100.0, 100.0), 0),
            PointerEvent::moved(1, Point::new(110.0, 100.0), 16),
            PointerEvent::moved(1, Point::new(125.0, 104.0), 32),
        ],
    );
    assert_eq!(
        gestures,
        vec![
            TransformGesture::Started {
                kind: GestureKind::Drag,
                position: Point::new(110.0, 100.0),
                pan: Point::new(10.0, 0.0),
            },
            TransformGesture::Drag {
                pan: Point::new(15.0, 4.0)
            },
        ]
    );
    assert_eq!(detector.state(), RecognizerState::Dragging);
}

#[test]
fn two_pointers_become_transform_around_centroid() {
    let mut detector = detector();
    let gestures = collect(
        &mut detector,
        &[
            PointerEvent::down(1, Point::new(100.0, 200.0), 0),
            PointerEvent::down(2, Point::new(300.0, 200.0), 5),
            PointerEvent::moved(2, Point::new(340.0, 200.0), 16),
            PointerEvent::moved(1, Point::new(60.0, 200.0), 20),
        ],
    );
    assert_eq!(gestures.len(), 2);
    assert!(matches!(
        gestures[0],
        TransformGesture::Started {
            kind: GestureKind::Transform,
            ..
        }
    ));
    let TransformGesture::Transform {
        centroid,
        pan,
        zoom,
        rotation,
    } = gestures[1]
    else {
        panic!("expected transform, got {:?}", gestures[1]);
    };
    assert!(approx(centroid.x, 200.0));
    assert!(approx(pan.x, -20.0));
    // Span went from 120 to 140.
    assert!(approx(zoom, 140.0 / 120.0));
    assert!(approx(rotation, 0.0));
    assert_eq!(detector.state(), RecognizerState::Transforming);
}

#[test]
fn session_kind_survives_second_pointer() {
    let mut detector = detector();
    collect(
        &mut detector,
        &[
            PointerEvent::down(1, Point::new(0.0, 0.0), 0),
            PointerEvent::moved(1, Point::new(20.0, 0.0), 16),
            PointerEvent::down(2, Point::new(200.0, 0.0), 24),
        ],
    );
    let gesture = detector.on_event(&PointerEvent::moved(2, Point::new(260.0, 0.0), 32));
    assert_eq!(
        gesture,
        Some(TransformGesture::Drag {
            pan: Point::new(30.0, 0.0)
        })
    );
    assert_eq!(detector.state(), RecognizerState::Dragging);
}

#[test]
fn release_reports_velocity_for_drag() {
    let mut detector = detector();
    collect(
        &mut detector,
        &[
            PointerEvent::down(1, Point::new(0.0, 0.0), 0),
            PointerEvent::moved(1, Point::new(10.0, 0.0), 20),
            PointerEvent::moved(1, Point::new(20.0, 0.0), 40),
            PointerEvent::moved(1, Point::new(30.0, 0.0), 60),
            PointerEvent::moved(1, Point::new(40.0, 0.0), 80),
            PointerEvent::moved(1, Point::new(50.0, 0.0), 100),
        ],
    );
    let ended = detector.on_event(&PointerEvent::up(1, Point::new(50.0, 0.0), 100));
    let Some(TransformGesture::Ended {
        kind,
        velocity,
        pointer_count,
        ..
    }) = ended
    else {
        panic!("expected end, got {:?}", ended);
    };
    assert_eq!(kind, GestureKind::Drag);
    assert_eq!(pointer_count, 1);
    assert!((velocity.x - 500.0).abs() < 1.0, "velocity {:?}", velocity);
    assert_eq!(detector.state(), RecognizerState::Idle);
}

#[test]
fn holding_still_before_release_reports_no_velocity() {
    let mut detector = detector();
    collect(
        &mut detector,
        &[
            PointerEvent::down(1, Point::new(0.0, 0.0), 0),
            PointerEvent::moved(1, Point::new(20.0, 0.0), 10),
            PointerEvent::moved(1, Point::new(40.0, 0.0), 20),
            PointerEvent::moved(1, Point::new(60.0, 0.0), 30),
            PointerEvent::moved(1, Point::new(80.0, 0.0), 40),
            PointerEvent::moved(1, Point::new(100.0, 0.0), 50),
        ],
    );
    let ended = detector.on_event(&PointerEvent::up(1, Point::new(100.0, 0.0), 2_050));
    let Some(TransformGesture::Ended { kind, velocity, .. }) = ended else {
        panic!("expected end, got {:?}", ended);
    };
    assert_eq!(kind, GestureKind::Drag);
    assert_eq!(velocity, Point::ZERO);
}

#[test]
fn tap_ends_undetermined() {
    let mut detector = detector();
    detector.on_event(&PointerEvent::down(1, Point::new(10.0, 10.0), 0));
    let ended = detector.on_event(&PointerEvent::up(1, Point::new(11.0, 10.0), 80));
    assert!(matches!(
        ended,
        Some(TransformGesture::Ended {
            kind: GestureKind::Undetermined,
            ..
        })
    ));
}

#[test]
fn cancel_discards_session() {
    let mut detector = detector();
    collect(
        &mut detector,
        &[
            PointerEvent::down(1, Point::new(0.0, 0.0), 0),
            PointerEvent::moved(1, Point::new(40.0, 0.0), 16),
        ],
    );
    assert_eq!(
        detector.on_event(&PointerEvent::cancel(1, 20)),
        Some(TransformGesture::Cancelled)
    );
    assert_eq!(detector.state(), RecognizerState::Idle);
    assert_eq!(detector.pointer_count(), 0);
    // The stale release is tolerated.
    assert_eq!(detector.on_event(&PointerEvent::up(1, Point::ZERO, 30)), None);
}

#[test]
fn malformed_sequences_are_ignored() {
    let mut detector = detector();
    assert_eq!(detector.on_event(&PointerEvent::up(7, Point::ZERO, 0)), None);
    assert_eq!(detector.on_event(&PointerEvent::moved(7, Point::ZERO, 0)), None);
    assert_eq!(detector.on_event(&PointerEvent::cancel(7, 0)), None);
    assert_eq!(detector.state(), RecognizerState::Idle);
}

#[test]
fn rotation_counts_toward_slop_only_when_enabled() {
    let twist = [
        PointerEvent::down(1, Point::new(-100.0, 0.0), 0),
        PointerEvent::down(2, Point::new(100.0, 0.0), 0),
        // Both pointers rotate ~6 degrees about the origin.
        PointerEvent::moved(1, Point::new(-99.45, -10.45), 16),
        PointerEvent::moved(2, Point::new(99.45, 10.45), 16),
    ];

    let mut plain = detector();
    collect(&mut plain, &twist);
    assert_eq!(plain.state(), RecognizerState::SlopPending);

    let mut rotating = TransformGestureDetector::new(TransformGestureConfig {
        rotation_enabled: true,
        ..TransformGestureConfig::default()
    });
    collect(&mut rotating, &twist);
    assert_eq!(rotating.state(), RecognizerState::Transforming);
}
