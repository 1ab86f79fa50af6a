//! Haptic device state machine
//!
//! A device owns the per-unit state needed to turn detector positions into
//! one outbound intensity value: the two most recent position vectors, the
//! raw proximity-to-device sample, the velocity bounds, the computation
//! mode, and the optional binarization threshold.
//!
//! The position vectors always have the same length as the device's
//! detector list, and `previous` always holds the vector as of the prior
//! computation. `refresh_position` is the only writer and runs exactly
//! once per computation, immediately before the velocity estimate - a
//! second refresh before the read would erase the velocity information.

use core::net::SocketAddr;

use heapless::Vec;

use crate::{
    detector::{DetectorId, ProximityDetector},
    errors::DispatchError,
    key::ParamKey,
    physics,
};

/// Maximum number of detectors one device may reference
pub const MAX_DEVICE_DETECTORS: usize = 8;

/// Handle into the device arena owned by the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(pub(crate) u8);

impl DeviceId {
    /// Index into the device arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Policy selecting how velocity and proximity combine into intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IntensityMode {
    /// `value = velocity * proximity`, both clamped to [0, 1]
    ProximityGated = 0,
    /// `value = velocity` while the raw proximity sample is > 0, else 0
    DigitalVelocity = 1,
}

impl IntensityMode {
    /// Decode the configuration wire value; `None` outside the closed set
    pub const fn from_wire(mode: u8) -> Option<Self> {
        match mode {
            0 => Some(Self::ProximityGated),
            1 => Some(Self::DigitalVelocity),
            _ => None,
        }
    }

    /// The configuration wire value of this mode
    pub const fn as_wire(self) -> u8 {
        self as u8
    }
}

/// One haptic output unit and its response state
#[derive(Debug, Clone)]
pub struct HapticDevice {
    name: ParamKey,
    proximity_key: ParamKey,
    detectors: Vec<DetectorId, MAX_DEVICE_DETECTORS>,
    current: Vec<f32, MAX_DEVICE_DETECTORS>,
    previous: Vec<f32, MAX_DEVICE_DETECTORS>,
    proximity_value: f32,
    min_velocity: f32,
    max_velocity: f32,
    mode: IntensityMode,
    output_threshold: f32,
    target: SocketAddr,
}

impl HapticDevice {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: ParamKey,
        proximity_key: ParamKey,
        detectors: Vec<DetectorId, MAX_DEVICE_DETECTORS>,
        min_velocity: f32,
        max_velocity: f32,
        mode: IntensityMode,
        output_threshold: f32,
        target: SocketAddr,
    ) -> Self {
        // Both vectors start zeroed at the detector-list length, so the
        // length invariant holds from the first computation on.
        let mut current = Vec::new();
        for _ in 0..detectors.len() {
            current.push(0.0).ok();
        }
        let previous = current.clone();

        Self {
            name,
            proximity_key,
            detectors,
            current,
            previous,
            proximity_value: 0.0,
            min_velocity,
            max_velocity,
            mode,
            output_threshold,
            target,
        }
    }

    /// Device name from the configuration
    pub fn name(&self) -> &ParamKey {
        &self.name
    }

    /// The parameter key whose messages trigger computation for this device
    pub fn proximity_key(&self) -> &ParamKey {
        &self.proximity_key
    }

    /// Outbound UDP destination for computed intensities
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// The computation mode in effect
    pub fn mode(&self) -> IntensityMode {
        self.mode
    }

    /// Store the raw proximity-to-device sample.
    ///
    /// Clamping happens inside the computation, not at store time - the
    /// digital mode compares the raw value against zero.
    pub fn record_proximity(&mut self, value: f32) {
        self.proximity_value = value;
    }

    /// Last raw proximity sample received
    pub fn proximity_value(&self) -> f32 {
        self.proximity_value
    }

    /// Snapshot `current` into `previous`, then rebuild `current` from the
    /// referenced detectors in list order.
    fn refresh_position(&mut self, detectors: &[ProximityDetector]) {
        self.previous = self.current.clone();
        self.current.clear();
        for id in &self.detectors {
            // Capacity and index validity are guaranteed at config build
            self.current.push(detectors[id.index()].position()).ok();
        }
    }

    /// Run the full intensity pipeline for the current detector state.
    ///
    /// Refreshes the position vector, estimates the average approach
    /// velocity, remaps it into [0, 1] against the configured bounds,
    /// applies the computation mode, and binarizes when a threshold is set.
    pub fn compute_intensity(
        &mut self,
        detectors: &[ProximityDetector],
    ) -> Result<f32, DispatchError> {
        self.refresh_position(detectors);

        let v = physics::average_velocity(&self.current, &self.previous, 1.0)?;
        let v = physics::remap(v, self.min_velocity, self.max_velocity, 0.0, 1.0);
        let v = physics::constrain(v, 0.0, 1.0);
        let p = physics::constrain(self.proximity_value, 0.0, 1.0);

        let value = match self.mode {
            IntensityMode::ProximityGated => v * p,
            IntensityMode::DigitalVelocity => {
                if self.proximity_value > 0.0 {
                    v
                } else {
                    0.0
                }
            }
        };

        Ok(if self.output_threshold > 0.0 {
            if value > self.output_threshold {
                1.0
            } else {
                0.0
            }
        } else {
            value
        })
    }
}
