//! vtnvme-core - Virtium NVMe vendor diagnostics
//!
//! This crate implements the vendor-specific maintenance protocol of
//! Virtium NVMe drives on top of a generic admin command channel. It
//! is `no_std` compatible; bulk extraction needs `alloc`.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`)
//! - `alloc` - Enable the paged extractor, which owns a page buffer
//!
//! # Example
//!
//! ```ignore
//! use vtnvme_core::{extract, vendor::VendorSession, AdminChannel};
//!
//! fn dump_event_log<C: AdminChannel>(channel: &mut C) -> vtnvme_core::Result<Vec<u8>> {
//!     let mut session = VendorSession::new(channel);
//!     let mut out = Vec::new();
//!     let sink = &mut out;
//!     extract::extract(
//!         &mut session,
//!         extract::Dataset::EventLog,
//!         move |_| Ok(sink),
//!         &mut extract::NoProgress,
//!     )?;
//!     Ok(out)
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod admin;
pub mod channel;
pub mod command;
pub mod error;
#[cfg(feature = "alloc")]
pub mod extract;
pub mod header;
pub mod opcodes;
pub mod params;
pub mod structs;
pub mod vendor;

#[cfg(test)]
mod mock;

pub use channel::AdminChannel;
pub use command::AdminCommand;
pub use error::{Error, Result};
