//! JSON file configuration
//!
//! Deserializes the operator-facing configuration file and maps it onto
//! the core's validated arena. Everything here fails fast: unreadable
//! files, bad JSON, and any shape error the core validator reports are
//! all fatal at startup.
//!
//! ```json
//! {
//!   "listen": { "ip": "127.0.0.1", "port": 9001 },
//!   "default_target": { "ip": "127.0.0.1", "port": 9000 },
//!   "detectors": [
//!     { "key": "HapticsVelocity_1", "radius": 0.3 }
//!   ],
//!   "devices": [
//!     {
//!       "name": "LeftWrist",
//!       "target": { "ip": "192.168.1.50", "port": 9100 },
//!       "detector_keys": ["HapticsVelocity_1"],
//!       "min_velocity": 0.0,
//!       "max_velocity": 1.0,
//!       "proximity_key": "HapticsProximity_1",
//!       "mode": 0,
//!       "output_threshold": 0.0
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use serde::Deserialize;

use hapticlink_core::{ConfigBuilder, DeviceSpec, Router};

use crate::BridgeError;

/// One UDP endpoint in the configuration file
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EndpointConfig {
    /// IP address, v4 or v6
    pub ip: IpAddr,
    /// UDP port
    pub port: u16,
}

impl From<EndpointConfig> for SocketAddr {
    fn from(e: EndpointConfig) -> Self {
        SocketAddr::new(e.ip, e.port)
    }
}

/// One proximity detector definition
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Avatar parameter key the detector listens on
    pub key: String,
    /// Contact radius used to scale positions
    pub radius: f32,
}

/// One haptic device definition
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Device name, unique within the file
    pub name: String,
    /// Outbound target for computed intensities
    pub target: EndpointConfig,
    /// Referenced detector keys, in position-vector order
    pub detector_keys: Vec<String>,
    /// Velocity mapped to 0.0 on the output scale
    pub min_velocity: f32,
    /// Velocity mapped to 1.0 on the output scale
    pub max_velocity: f32,
    /// Parameter key whose messages trigger computation
    pub proximity_key: String,
    /// Computation mode, 0 or 1
    pub mode: u8,
    /// Binarization threshold; 0 keeps the analog output
    #[serde(default)]
    pub output_threshold: f32,
}

/// The operator-facing configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Where the bridge listens for avatar parameter messages
    pub listen: EndpointConfig,
    /// Forwarding target for unmatched addresses
    pub default_target: EndpointConfig,
    /// Proximity detector channels
    #[serde(default)]
    pub detectors: Vec<DetectorConfig>,
    /// Haptic devices
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
}

impl BridgeConfig {
    /// Read and parse a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BridgeError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse configuration from a JSON string
    pub fn parse(text: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The listen socket address
    pub fn listen_addr(&self) -> SocketAddr {
        self.listen.into()
    }

    /// Validate against the core and build the router
    pub fn build_router(&self) -> Result<Router, BridgeError> {
        let mut builder = ConfigBuilder::new(self.default_target.into());

        for detector in &self.detectors {
            builder.add_detector(&detector.key, detector.radius)?;
        }
        for device in &self.devices {
            let keys: Vec<&str> = device.detector_keys.iter().map(String::as_str).collect();
            builder.add_device(DeviceSpec {
                name: &device.name,
                target: device.target.into(),
                detector_keys: &keys,
                min_velocity: device.min_velocity,
                max_velocity: device.max_velocity,
                proximity_key: &device.proximity_key,
                mode: device.mode,
                output_threshold: device.output_threshold,
            })?;
        }

        Ok(Router::new(builder.build()?))
    }
}
