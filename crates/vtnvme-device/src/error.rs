//! Error types for the device registry

use thiserror::Error;

/// Errors raised while opening a device
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Option list is not `key=value,...`
    #[error("Invalid parameter format: '{0}' (expected key=value)")]
    ParameterFormat(String),

    /// Option value could not be used
    #[error("Invalid value for '{key}': '{value}'")]
    InvalidValue {
        /// Option name
        key: String,
        /// Rejected value
        value: String,
    },

    /// Backend rejected its options
    #[error("{0}")]
    InvalidOptions(String),

    /// No backend by that name in this build
    #[error("Unknown device type: {0}")]
    UnknownBackend(String),

    /// The Linux backend failed to open the device
    #[cfg(feature = "linux")]
    #[error(transparent)]
    Linux(#[from] vtnvme_linux::LinuxNvmeError),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, DeviceError>;
