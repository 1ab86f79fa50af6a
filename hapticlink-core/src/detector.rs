//! Proximity detector channels
//!
//! A detector is one spherical contact receiver on the avatar: it stores
//! the last proximity sample received for its parameter key and derives
//! the relative position of the contact sender from it. Detectors carry no
//! other state - position is purely a function of the last sample and the
//! fixed radius.

use crate::key::ParamKey;

/// Handle into the detector arena owned by the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorId(pub(crate) u8);

impl DetectorId {
    /// Index into the detector arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One virtual proximity sensor, identified by its parameter key
#[derive(Debug, Clone)]
pub struct ProximityDetector {
    key: ParamKey,
    radius: f32,
    last_value: f32,
}

impl ProximityDetector {
    pub(crate) fn new(key: ParamKey, radius: f32) -> Self {
        Self {
            key,
            radius,
            last_value: 0.0,
        }
    }

    /// The parameter key this detector listens on
    pub fn key(&self) -> &ParamKey {
        &self.key
    }

    /// The contact radius used to scale reported positions
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Store a raw proximity sample.
    ///
    /// Incoming transport values are trusted as already-scaled floats;
    /// no range validation happens here.
    pub fn record(&mut self, value: f32) {
        self.last_value = value;
    }

    /// The last raw sample received (0.0 before any message arrives)
    pub fn last_value(&self) -> f32 {
        self.last_value
    }

    /// Relative position of the contact sender: `(1 - last_value) * radius`
    pub fn position(&self) -> f32 {
        (1.0 - self.last_value) * self.radius
    }
}
