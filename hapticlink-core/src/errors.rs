//! Error types for configuration and per-message dispatch
//!
//! Two distinct failure classes, per the system's error model:
//!
//! 1. **Construction-time** (`ConfigError`) - anything wrong with the
//!    configured object graph: duplicate bindings, dangling detector
//!    references, degenerate velocity ranges, unknown computation modes.
//!    These are detected eagerly while building the configuration and are
//!    fatal; they are never deferred to message handling.
//!
//! 2. **Per-message** (`DispatchError`) - numeric failures while handling
//!    one inbound sample. These are logged and dropped by the transport;
//!    one bad message must never take down the router.
//!
//! All errors are small `Copy` enums with inline payloads only - no heap,
//! no `String`, safe to return from the hot path and to store in queues.

use thiserror_no_std::Error;

use crate::key::ParamKey;

/// Result type for configuration construction
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration-shape errors, detected at construction time
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Two entities would bind the same inbound address
    #[error("key '{key}' is already bound to another handler")]
    DuplicateKey {
        /// The parameter key claimed twice
        key: ParamKey,
    },

    /// Two devices share a name
    #[error("device name '{name}' is already in use")]
    DuplicateDevice {
        /// The device name defined twice
        name: ParamKey,
    },

    /// Device references a detector key that was never defined
    #[error("device references unknown detector key '{key}'")]
    UnknownDetector {
        /// The unresolved detector key
        key: ParamKey,
    },

    /// Device lists zero detectors - velocity over an empty vector is undefined
    #[error("device '{device}' lists no velocity detectors")]
    NoDetectors {
        /// The offending device name
        device: ParamKey,
    },

    /// A parameter key or name exceeds the inline key capacity
    #[error("key longer than {max} bytes")]
    KeyTooLong {
        /// Maximum accepted key length
        max: usize,
    },

    /// A fixed-capacity arena is full
    #[error("too many {what} configured (limit {limit})")]
    CapacityExceeded {
        /// Which arena overflowed
        what: &'static str,
        /// Its capacity
        limit: usize,
    },

    /// `min_velocity == max_velocity` makes the remap source domain empty
    #[error("velocity range [{min}, {max}] is degenerate")]
    VelocityRangeEmpty {
        /// Configured minimum velocity
        min: f32,
        /// Configured maximum velocity
        max: f32,
    },

    /// Computation mode outside the closed set {0, 1}
    #[error("invalid computation mode {mode} (expected 0 or 1)")]
    InvalidMode {
        /// The rejected wire value
        mode: u8,
    },

    /// Output threshold must be >= 0
    #[error("output threshold {threshold} is negative")]
    NegativeThreshold {
        /// The rejected threshold
        threshold: f32,
    },

    /// Detector radius must be strictly positive
    #[error("detector radius {radius} is not strictly positive")]
    InvalidRadius {
        /// The rejected radius
        radius: f32,
    },

    /// A numeric field is NaN or infinite
    #[error("field '{field}' is not a finite number")]
    InvalidValue {
        /// Which configuration field was non-finite
        field: &'static str,
    },
}

/// Numeric errors from the pure physics helpers
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    /// Velocity over an empty position vector is undefined
    #[error("cannot average velocity over an empty vector")]
    EmptyVector,

    /// The two position vectors differ in dimension
    #[error("position vectors differ in length ({current} vs {previous})")]
    LengthMismatch {
        /// Length of the current vector
        current: usize,
        /// Length of the previous vector
        previous: usize,
    },
}

/// Per-message dispatch errors - logged and dropped, never fatal
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DispatchError {
    /// Velocity estimation failed for this sample
    #[error("velocity estimate failed: {0}")]
    Physics(#[from] PhysicsError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for PhysicsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::EmptyVector => defmt::write!(fmt, "empty position vector"),
            Self::LengthMismatch { current, previous } => {
                defmt::write!(fmt, "vector length {} vs {}", current, previous)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DispatchError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Physics(e) => defmt::write!(fmt, "physics: {}", e),
        }
    }
}
