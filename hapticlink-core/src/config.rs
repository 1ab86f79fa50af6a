//! Validated configuration arena
//!
//! The configuration owns every detector and device for the process
//! lifetime. Detectors live in an arena indexed by [`DetectorId`]; devices
//! hold ids rather than references, so ownership stays with the arena and
//! cross-references cannot dangle or cycle.
//!
//! All configuration-shape errors are rejected here, at build time:
//! duplicate address bindings, unresolved detector keys, degenerate
//! velocity ranges, unknown computation modes, negative thresholds,
//! non-finite numbers. A configuration that builds successfully can be
//! routed without any per-message validation.

use core::net::SocketAddr;

use heapless::Vec;

use crate::{
    detector::{DetectorId, ProximityDetector},
    device::{DeviceId, HapticDevice, IntensityMode, MAX_DEVICE_DETECTORS},
    errors::{ConfigError, ConfigResult},
    key::{ParamKey, MAX_KEY_LEN},
};

/// Maximum number of proximity detectors in one configuration
pub const MAX_DETECTORS: usize = 16;

/// Maximum number of haptic devices in one configuration
pub const MAX_DEVICES: usize = 8;

/// Everything needed to construct one haptic device
#[derive(Debug, Clone, Copy)]
pub struct DeviceSpec<'a> {
    /// Device name, unique within the configuration
    pub name: &'a str,
    /// Outbound UDP destination for computed intensities
    pub target: SocketAddr,
    /// Referenced detector keys, in position-vector order
    pub detector_keys: &'a [&'a str],
    /// Velocity mapped to 0.0 on the output scale
    pub min_velocity: f32,
    /// Velocity mapped to 1.0 on the output scale
    pub max_velocity: f32,
    /// Parameter key whose messages trigger computation for this device
    pub proximity_key: &'a str,
    /// Computation mode wire value, must be 0 or 1
    pub mode: u8,
    /// Binarization threshold; 0 keeps the analog output
    pub output_threshold: f32,
}

/// A fully-validated configuration, ready to route
#[derive(Debug, Clone)]
pub struct HapticConfig {
    pub(crate) detectors: Vec<ProximityDetector, MAX_DETECTORS>,
    pub(crate) devices: Vec<HapticDevice, MAX_DEVICES>,
    pub(crate) default_target: SocketAddr,
}

impl HapticConfig {
    /// The detector arena
    pub fn detectors(&self) -> &[ProximityDetector] {
        &self.detectors
    }

    /// The configured devices
    pub fn devices(&self) -> &[HapticDevice] {
        &self.devices
    }

    /// Forwarding target for unmatched addresses
    pub fn default_target(&self) -> SocketAddr {
        self.default_target
    }
}

/// Incremental, eagerly-validating configuration builder
pub struct ConfigBuilder {
    detectors: Vec<ProximityDetector, MAX_DETECTORS>,
    devices: Vec<HapticDevice, MAX_DEVICES>,
    default_target: SocketAddr,
}

impl ConfigBuilder {
    /// Start a configuration with the given default forwarding target
    pub fn new(default_target: SocketAddr) -> Self {
        Self {
            detectors: Vec::new(),
            devices: Vec::new(),
            default_target,
        }
    }

    /// Define a proximity detector channel
    pub fn add_detector(&mut self, key: &str, radius: f32) -> ConfigResult<DetectorId> {
        let key = parse_key(key)?;
        self.check_unbound(&key)?;

        if !radius.is_finite() {
            return Err(ConfigError::InvalidValue { field: "radius" });
        }
        if radius <= 0.0 {
            return Err(ConfigError::InvalidRadius { radius });
        }

        let id = DetectorId(self.detectors.len() as u8);
        self.detectors
            .push(ProximityDetector::new(key, radius))
            .map_err(|_| ConfigError::CapacityExceeded {
                what: "detectors",
                limit: MAX_DETECTORS,
            })?;
        Ok(id)
    }

    /// Define a haptic device, resolving its detector keys against the arena
    pub fn add_device(&mut self, spec: DeviceSpec<'_>) -> ConfigResult<DeviceId> {
        let name = parse_key(spec.name)?;
        if self.devices.iter().any(|d| *d.name() == name) {
            return Err(ConfigError::DuplicateDevice { name });
        }
        let proximity_key = parse_key(spec.proximity_key)?;
        self.check_unbound(&proximity_key)?;

        for (field, value) in [
            ("min_velocity", spec.min_velocity),
            ("max_velocity", spec.max_velocity),
            ("output_threshold", spec.output_threshold),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue { field });
            }
        }
        if spec.min_velocity == spec.max_velocity {
            return Err(ConfigError::VelocityRangeEmpty {
                min: spec.min_velocity,
                max: spec.max_velocity,
            });
        }
        if spec.output_threshold < 0.0 {
            return Err(ConfigError::NegativeThreshold {
                threshold: spec.output_threshold,
            });
        }
        let mode = IntensityMode::from_wire(spec.mode)
            .ok_or(ConfigError::InvalidMode { mode: spec.mode })?;

        if spec.detector_keys.is_empty() {
            return Err(ConfigError::NoDetectors { device: name });
        }
        let mut ids: Vec<DetectorId, MAX_DEVICE_DETECTORS> = Vec::new();
        for key in spec.detector_keys {
            let key = parse_key(key)?;
            let id = self
                .detectors
                .iter()
                .position(|d| *d.key() == key)
                .ok_or(ConfigError::UnknownDetector { key })?;
            ids.push(DetectorId(id as u8))
                .map_err(|_| ConfigError::CapacityExceeded {
                    what: "detectors per device",
                    limit: MAX_DEVICE_DETECTORS,
                })?;
        }

        let id = DeviceId(self.devices.len() as u8);
        self.devices
            .push(HapticDevice::new(
                name,
                proximity_key,
                ids,
                spec.min_velocity,
                spec.max_velocity,
                mode,
                spec.output_threshold,
                spec.target,
            ))
            .map_err(|_| ConfigError::CapacityExceeded {
                what: "devices",
                limit: MAX_DEVICES,
            })?;
        Ok(id)
    }

    /// Finish and hand over the validated arena
    pub fn build(self) -> ConfigResult<HapticConfig> {
        Ok(HapticConfig {
            detectors: self.detectors,
            devices: self.devices,
            default_target: self.default_target,
        })
    }

    /// Strict collision policy: every inbound address gets exactly one
    /// handler, so a key may appear once across detectors and device
    /// proximity channels combined.
    fn check_unbound(&self, key: &ParamKey) -> ConfigResult<()> {
        let detector_clash = self.detectors.iter().any(|d| d.key() == key);
        let device_clash = self.devices.iter().any(|h| h.proximity_key() == key);
        if detector_clash || device_clash {
            return Err(ConfigError::DuplicateKey { key: *key });
        }
        Ok(())
    }
}

fn parse_key(key: &str) -> ConfigResult<ParamKey> {
    ParamKey::new(key).ok_or(ConfigError::KeyTooLong { max: MAX_KEY_LEN })
}
