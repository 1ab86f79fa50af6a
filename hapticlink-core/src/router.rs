//! Address dispatch for inbound avatar parameter messages
//!
//! The router maps each bound OSC address to a closed handler variant and
//! owns the mutable detector/device state exclusively. Dispatching a
//! message mutates that state and tells the transport what, if anything,
//! to send:
//!
//! ```text
//! /avatar/parameters/<detector key>  -> Route::RecordDetector  -> Dispatch::Recorded
//! /avatar/parameters/<proximity key> -> Route::ComputeAndForward -> Dispatch::Forward
//! anything else                      -> Dispatch::Passthrough
//! ```
//!
//! Detector updates alone produce no outbound traffic; they only feed the
//! next device computation. Address collisions are rejected when the
//! configuration is built, so route insertion here cannot conflict.
//!
//! Concurrency: dispatch takes `&mut self`. The transport serializes all
//! invocations behind one lock, because the device's two-vector
//! read-modify-write is not atomic and an interleaved refresh would
//! corrupt the velocity estimate.

use core::net::SocketAddr;

use heapless::FnvIndexMap;

use crate::{
    config::{HapticConfig, MAX_DETECTORS, MAX_DEVICES},
    detector::{DetectorId, ProximityDetector},
    device::{DeviceId, HapticDevice},
    errors::DispatchError,
    key::{OscAddress, ParamKey},
};

/// Exact, case-sensitive prefix every bound address derives from
pub const ADDRESS_PREFIX: &str = "/avatar/parameters/";

/// Route table capacity; power of two, holds every possible binding
pub const MAX_ROUTES: usize = 32;

const _: () = assert!(MAX_DETECTORS + MAX_DEVICES <= MAX_ROUTES);

/// Derive the OSC address for an avatar parameter key
pub fn parameter_address(key: &ParamKey) -> OscAddress {
    // Prefix plus maximum key length fits the address capacity
    OscAddress::concat(ADDRESS_PREFIX, key.as_str()).unwrap_or_else(|| unreachable!())
}

/// Closed set of per-address handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Store the sample into a proximity detector; no outbound traffic
    RecordDetector(DetectorId),
    /// Store the device proximity sample, compute, forward the intensity
    ComputeAndForward(DeviceId),
}

/// What the transport must do after a dispatch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dispatch {
    /// Detector state updated; nothing to send
    Recorded,
    /// Send `value` to `target` at the arrival address
    Forward {
        /// The device's configured outbound destination
        target: SocketAddr,
        /// The computed haptic intensity
        value: f32,
    },
    /// No binding; forward the message verbatim to the default target
    Passthrough,
}

/// Owns all mutable routing state and resolves inbound addresses
#[derive(Debug)]
pub struct Router {
    routes: FnvIndexMap<OscAddress, Route, MAX_ROUTES>,
    detectors: heapless::Vec<ProximityDetector, MAX_DETECTORS>,
    devices: heapless::Vec<HapticDevice, MAX_DEVICES>,
    default_target: SocketAddr,
}

impl Router {
    /// Build the route table from a validated configuration
    pub fn new(config: HapticConfig) -> Self {
        let mut routes = FnvIndexMap::new();

        for (i, detector) in config.detectors.iter().enumerate() {
            let address = parameter_address(detector.key());
            // Uniqueness and capacity were enforced at config build
            routes
                .insert(address, Route::RecordDetector(DetectorId(i as u8)))
                .ok();
        }
        for (i, device) in config.devices.iter().enumerate() {
            let address = parameter_address(device.proximity_key());
            routes
                .insert(address, Route::ComputeAndForward(DeviceId(i as u8)))
                .ok();
        }

        Self {
            routes,
            detectors: config.detectors,
            devices: config.devices,
            default_target: config.default_target,
        }
    }

    /// Forwarding target for unmatched addresses
    pub fn default_target(&self) -> SocketAddr {
        self.default_target
    }

    /// Look up the handler bound to an address, if any
    pub fn route(&self, address: &str) -> Option<Route> {
        let key = OscAddress::new(address)?;
        self.routes.get(&key).copied()
    }

    /// Handle one inbound message: mutate state, report the required send.
    ///
    /// Addresses too long to ever be bound fall through to passthrough.
    pub fn dispatch(&mut self, address: &str, value: f32) -> Result<Dispatch, DispatchError> {
        let route = match self.route(address) {
            Some(route) => route,
            None => return Ok(Dispatch::Passthrough),
        };

        match route {
            Route::RecordDetector(id) => {
                self.detectors[id.index()].record(value);
                Ok(Dispatch::Recorded)
            }
            Route::ComputeAndForward(id) => {
                let device = &mut self.devices[id.index()];
                device.record_proximity(value);
                let intensity = device.compute_intensity(&self.detectors)?;
                Ok(Dispatch::Forward {
                    target: device.target(),
                    value: intensity,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigBuilder, DeviceSpec};

    fn device_target() -> SocketAddr {
        "127.0.0.1:9101".parse().unwrap()
    }

    fn router() -> Router {
        let default_target = "127.0.0.1:9001".parse().unwrap();
        let mut b = ConfigBuilder::new(default_target);
        b.add_detector("C0", 1.0).unwrap();
        b.add_device(DeviceSpec {
            name: "Wrist",
            target: device_target(),
            detector_keys: &["C0"],
            min_velocity: 0.0,
            max_velocity: 1.0,
            proximity_key: "WristTouch",
            mode: 0,
            output_threshold: 0.0,
        })
        .unwrap();
        Router::new(b.build().unwrap())
    }

    #[test]
    fn derives_the_exact_address() {
        let key = ParamKey::new("Foo").unwrap();
        assert_eq!(parameter_address(&key).as_str(), "/avatar/parameters/Foo");
    }

    #[test]
    fn detector_updates_produce_no_traffic() {
        let mut r = router();
        let outcome = r.dispatch("/avatar/parameters/C0", 0.5).unwrap();
        assert_eq!(outcome, Dispatch::Recorded);
    }

    #[test]
    fn device_messages_forward_to_the_device_target() {
        let mut r = router();
        r.dispatch("/avatar/parameters/C0", 0.5).unwrap();
        match r.dispatch("/avatar/parameters/WristTouch", 1.0).unwrap() {
            Dispatch::Forward { target, value } => {
                assert_eq!(target, device_target());
                assert!((0.0..=1.0).contains(&value));
            }
            other => panic!("expected forward, got {other:?}"),
        }
    }

    #[test]
    fn unmatched_addresses_pass_through() {
        let mut r = router();
        assert_eq!(
            r.dispatch("/avatar/parameters/Foo", 3.14).unwrap(),
            Dispatch::Passthrough
        );
        // Not under the avatar prefix at all
        assert_eq!(
            r.dispatch("/tracking/head", 0.0).unwrap(),
            Dispatch::Passthrough
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        let mut r = router();
        assert_eq!(
            r.dispatch("/avatar/parameters/c0", 0.5).unwrap(),
            Dispatch::Passthrough
        );
    }

    #[test]
    fn overlong_addresses_fall_through() {
        let mut r = router();
        let long = "/avatar/parameters/".to_string() + &"k".repeat(100);
        assert_eq!(r.dispatch(&long, 1.0).unwrap(), Dispatch::Passthrough);
    }
}
