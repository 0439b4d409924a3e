//! Error types for Linux NVMe operations

use thiserror::Error;

/// Linux NVMe specific errors
#[derive(Debug, Error)]
pub enum LinuxNvmeError {
    /// Failed to open device
    #[error("Failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The path is neither an NVMe controller nor a namespace node
    #[error("{path} is not a character or block device")]
    NotADevice { path: String },

    /// Device not specified
    #[error("No device specified. Use path=/dev/nvmeX")]
    NoDevice,

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An ioctl outside of command submission failed
    #[error("ioctl failed: {0}")]
    Ioctl(#[from] nix::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Linux NVMe operations
pub type Result<T> = std::result::Result<T, LinuxNvmeError>;
