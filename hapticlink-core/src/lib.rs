//! Core haptic-intensity engine for HapticLink
//!
//! Turns streams of scalar proximity samples into bounded vibration
//! intensities, keyed by which avatar parameter produced the sample.
//! Designed to run on small always-on bridges with no heap allocation
//! in the per-message path.
//!
//! Key constraints:
//! - Fixed-capacity state, sized at configuration time
//! - One handler invocation per inbound message, no blocking
//! - All configuration errors rejected at construction, never per message
//!
//! ```no_run
//! use hapticlink_core::{ConfigBuilder, DeviceSpec, Router, Dispatch};
//!
//! let target = "127.0.0.1:9001".parse().unwrap();
//! let mut builder = ConfigBuilder::new(target);
//! builder.add_detector("ContactLeft", 0.25).unwrap();
//! builder.add_device(DeviceSpec {
//!     name: "HeadPat",
//!     target,
//!     detector_keys: &["ContactLeft"],
//!     min_velocity: 0.0,
//!     max_velocity: 1.0,
//!     proximity_key: "HeadTouch",
//!     mode: 0,
//!     output_threshold: 0.0,
//! }).unwrap();
//!
//! let mut router = Router::new(builder.build().unwrap());
//! match router.dispatch("/avatar/parameters/HeadTouch", 0.9) {
//!     Ok(Dispatch::Forward { .. }) => { /* send the value downstream */ }
//!     Ok(_) => {}
//!     Err(_) => { /* log and drop the message */ }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod detector;
pub mod device;
pub mod errors;
pub mod key;
pub mod physics;
pub mod router;

// Public API
pub use config::{ConfigBuilder, DeviceSpec, HapticConfig, MAX_DETECTORS, MAX_DEVICES};
pub use detector::{DetectorId, ProximityDetector};
pub use device::{DeviceId, HapticDevice, IntensityMode, MAX_DEVICE_DETECTORS};
pub use errors::{ConfigError, ConfigResult, DispatchError, PhysicsError};
pub use key::{OscAddress, ParamKey};
pub use router::{parameter_address, Dispatch, Route, Router, ADDRESS_PREFIX};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
