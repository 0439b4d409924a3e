//! vtnvme-linux - Linux NVMe admin passthrough
//!
//! This crate submits admin commands to NVMe drives through the kernel's
//! `NVME_IOCTL_ADMIN_CMD` passthrough on the controller character device
//! (`/dev/nvmeX`) or a namespace block device (`/dev/nvmeXnY`).
//!
//! # Example
//!
//! ```no_run
//! use vtnvme_linux::LinuxNvme;
//! use vtnvme_core::{admin, structs};
//!
//! let mut nvme = LinuxNvme::open_device("/dev/nvme0")?;
//! let mut buf = [0u8; structs::IDENTIFY_LEN];
//! admin::identify_controller(&mut nvme, &mut buf)?;
//! let ctrl = structs::view::<structs::IdController>(&buf)?;
//! println!("Model: {}", ctrl.model());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage with vtnvme CLI
//!
//! ```bash
//! vtnvme get-sn /dev/nvme0
//! vtnvme get-event-log linux:path=/dev/nvme0,timeout=60000
//! ```
//!
//! # System Requirements
//!
//! - Linux kernel with the NVMe driver (`CONFIG_BLK_DEV_NVME`)
//! - Read/write access to the device node, usually root or `CAP_SYS_ADMIN`

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, LinuxNvme, LinuxNvmeConfig};
pub use error::{LinuxNvmeError, Result};
