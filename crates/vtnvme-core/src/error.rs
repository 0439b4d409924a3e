//! Error types for vtnvme-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate. Every variant is `Copy` so it can be stored and
//! passed around without allocation.

use core::fmt;

/// A failed admin command submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelError {
    /// Opcode of the command that failed
    pub opcode: u8,
    /// NVMe status (positive) or negated errno from the driver (negative)
    pub status: i32,
}

/// The header returned by the device could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The header blob is shorter than the fixed layout
    Truncated {
        /// Bytes required by the layout
        needed: usize,
        /// Bytes actually available
        got: usize,
    },
    /// Records are announced but their size is zero
    ZeroUnitSize {
        /// Announced unit count
        units: u32,
    },
}

/// Decoded parameters do not match what the operation expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterMismatch {
    /// The header carries a different kind of record
    KindTag {
        /// Tag the operation requires
        expected: u32,
        /// Tag reported by the device
        found: u32,
    },
    /// The requested crash image does not exist on the drive
    NoSuchImage {
        /// Image number asked for
        requested: u8,
        /// Images present on the drive
        available: u32,
    },
    /// Page indices no longer fit in the control buffer
    PageCountTooLarge {
        /// Pages announced by the device
        pages: u32,
        /// Largest page count the encoding allows
        max: u32,
    },
    /// A string value does not fit in its payload
    ValueTooLong {
        /// Bytes in the value
        len: usize,
        /// Capacity of the payload
        capacity: usize,
    },
    /// A string value contains non-ASCII bytes
    NotAscii,
    /// Paging was requested before the info header was decoded
    NotDecoded,
}

/// Buffer acquisition failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceError {
    /// A page buffer of the given size could not be allocated
    AllocationFailed {
        /// Requested size in bytes
        size: usize,
    },
    /// The buffer handed to a command is smaller than its transfer length
    BufferTooSmall {
        /// Transfer length of the command
        needed: usize,
        /// Length of the buffer
        got: usize,
    },
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The admin command channel reported a failure
    Channel(ChannelError),
    /// The info header could not be decoded
    Decode(DecodeError),
    /// Decoded parameters or caller arguments do not fit the operation
    ParameterMismatch(ParameterMismatch),
    /// A buffer could not be acquired
    Resource(ResourceError),
    /// The output sink refused a page
    Sink,
}

impl Error {
    /// Status code of the failing channel call, if this is a channel error
    pub fn channel_status(&self) -> Option<i32> {
        match self {
            Self::Channel(e) => Some(e.status),
            _ => None,
        }
    }
}

impl From<ChannelError> for Error {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

impl From<ParameterMismatch> for Error {
    fn from(e: ParameterMismatch) -> Self {
        Self::ParameterMismatch(e)
    }
}

impl From<ResourceError> for Error {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.status < 0 {
            write!(
                f,
                "admin command 0x{:02X} failed: driver error {}",
                self.opcode, -self.status
            )
        } else {
            write!(
                f,
                "admin command 0x{:02X} failed: NVMe status 0x{:04X}",
                self.opcode, self.status
            )
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { needed, got } => {
                write!(f, "header truncated: need {} bytes, got {}", needed, got)
            }
            Self::ZeroUnitSize { units } => {
                write!(f, "header announces {} units of size 0", units)
            }
        }
    }
}

impl fmt::Display for ParameterMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KindTag { expected, found } => {
                write!(f, "unexpected record type {} (expected {})", found, expected)
            }
            Self::NoSuchImage {
                requested,
                available,
            } => write!(
                f,
                "no crash dump {} on drive, only {} images",
                requested, available
            ),
            Self::PageCountTooLarge { pages, max } => {
                write!(f, "{} pages announced, at most {} supported", pages, max)
            }
            Self::ValueTooLong { len, capacity } => {
                write!(f, "value is {} bytes, field holds {}", len, capacity)
            }
            Self::NotAscii => write!(f, "value must be ASCII"),
            Self::NotDecoded => write!(f, "extraction parameters not decoded yet"),
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { size } => {
                write!(f, "could not allocate a {} byte buffer", size)
            }
            Self::BufferTooSmall { needed, got } => {
                write!(f, "buffer too small: need {} bytes, got {}", needed, got)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(e) => write!(f, "{}", e),
            Self::Decode(e) => write!(f, "{}", e),
            Self::ParameterMismatch(e) => write!(f, "{}", e),
            Self::Resource(e) => write!(f, "{}", e),
            Self::Sink => write!(f, "failed to write output"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
