//! End-to-end dispatch scenarios
//!
//! Drives a fully-built router with message sequences and checks the
//! complete pipeline: detector update, position refresh, velocity
//! estimate, remap, mode application, thresholding, and routing of the
//! result to the right target.

use hapticlink_core::{ConfigBuilder, DeviceSpec, Dispatch, Router};

fn build_router(mode: u8, output_threshold: f32) -> Router {
    let default_target = "127.0.0.1:9000".parse().unwrap();
    let mut builder = ConfigBuilder::new(default_target);
    builder.add_detector("Contact", 1.0).unwrap();
    builder
        .add_device(DeviceSpec {
            name: "Wrist",
            target: "127.0.0.1:9101".parse().unwrap(),
            detector_keys: &["Contact"],
            min_velocity: 0.0,
            max_velocity: 1.0,
            proximity_key: "WristTouch",
            mode,
            output_threshold,
        })
        .unwrap();
    Router::new(builder.build().unwrap())
}

fn forwarded(router: &mut Router, address: &str, value: f32) -> f32 {
    match router.dispatch(address, value).unwrap() {
        Dispatch::Forward { value, .. } => value,
        other => panic!("expected forward, got {other:?}"),
    }
}

/// Sample sequence 0.2 -> 0.8 on a radius-1 detector: position goes
/// 0.8 -> 0.2, velocity 0.6, identity remap, gated by proximity 1.0.
#[test]
fn analog_intensity_follows_approach_velocity() {
    let mut router = build_router(0, 0.0);

    router.dispatch("/avatar/parameters/Contact", 0.2).unwrap();
    // First trigger loads the position vector; its value reflects the
    // jump from the zeroed initial vector.
    forwarded(&mut router, "/avatar/parameters/WristTouch", 1.0);

    router.dispatch("/avatar/parameters/Contact", 0.8).unwrap();
    let value = forwarded(&mut router, "/avatar/parameters/WristTouch", 1.0);
    assert!((value - 0.6).abs() < 1e-6, "got {value}");
}

#[test]
fn threshold_binarizes_the_same_sequence() {
    let mut router = build_router(0, 0.5);

    router.dispatch("/avatar/parameters/Contact", 0.2).unwrap();
    forwarded(&mut router, "/avatar/parameters/WristTouch", 1.0);

    router.dispatch("/avatar/parameters/Contact", 0.8).unwrap();
    let value = forwarded(&mut router, "/avatar/parameters/WristTouch", 1.0);
    assert_eq!(value, 1.0);
}

#[test]
fn unmatched_address_passes_through_untouched() {
    let mut router = build_router(0, 0.0);
    assert_eq!(
        router.dispatch("/avatar/parameters/Foo", 3.14).unwrap(),
        Dispatch::Passthrough
    );
}

#[test]
fn velocity_is_clamped_before_gating() {
    // Velocity far above max_velocity must still yield at most 1.0.
    let default_target = "127.0.0.1:9000".parse().unwrap();
    let mut builder = ConfigBuilder::new(default_target);
    builder.add_detector("Contact", 10.0).unwrap();
    builder
        .add_device(DeviceSpec {
            name: "Wrist",
            target: "127.0.0.1:9101".parse().unwrap(),
            detector_keys: &["Contact"],
            min_velocity: 0.0,
            max_velocity: 0.1,
            proximity_key: "WristTouch",
            mode: 0,
            output_threshold: 0.0,
        })
        .unwrap();
    let mut router = Router::new(builder.build().unwrap());

    router.dispatch("/avatar/parameters/Contact", 1.0).unwrap();
    forwarded(&mut router, "/avatar/parameters/WristTouch", 1.0);
    router.dispatch("/avatar/parameters/Contact", 0.0).unwrap();
    let value = forwarded(&mut router, "/avatar/parameters/WristTouch", 1.0);
    assert_eq!(value, 1.0);
}

#[test]
fn multi_detector_vector_keeps_list_order() {
    let default_target = "127.0.0.1:9000".parse().unwrap();
    let mut builder = ConfigBuilder::new(default_target);
    builder.add_detector("Left", 1.0).unwrap();
    builder.add_detector("Right", 1.0).unwrap();
    builder
        .add_device(DeviceSpec {
            name: "Chest",
            target: "127.0.0.1:9102".parse().unwrap(),
            detector_keys: &["Left", "Right"],
            min_velocity: 0.0,
            max_velocity: 1.0,
            proximity_key: "ChestTouch",
            mode: 0,
            output_threshold: 0.0,
        })
        .unwrap();
    let mut router = Router::new(builder.build().unwrap());

    // Settle both detector positions.
    router.dispatch("/avatar/parameters/Left", 0.5).unwrap();
    router.dispatch("/avatar/parameters/Right", 0.5).unwrap();
    forwarded(&mut router, "/avatar/parameters/ChestTouch", 1.0);

    // Only one of the two channels moves: the average halves the delta.
    router.dispatch("/avatar/parameters/Left", 0.9).unwrap();
    let value = forwarded(&mut router, "/avatar/parameters/ChestTouch", 1.0);
    assert!((value - 0.2).abs() < 1e-6, "got {value}");
}

#[test]
fn digital_mode_end_to_end() {
    let mut router = build_router(1, 0.0);

    router.dispatch("/avatar/parameters/Contact", 0.2).unwrap();
    forwarded(&mut router, "/avatar/parameters/WristTouch", 1.0);
    router.dispatch("/avatar/parameters/Contact", 0.8).unwrap();

    // Touching: velocity passes through unscaled by proximity.
    let value = forwarded(&mut router, "/avatar/parameters/WristTouch", 0.2);
    assert!((value - 0.6).abs() < 1e-6);

    // Not touching: silent regardless of movement.
    router.dispatch("/avatar/parameters/Contact", 0.1).unwrap();
    let value = forwarded(&mut router, "/avatar/parameters/WristTouch", 0.0);
    assert_eq!(value, 0.0);
}
