//! Linux NVMe device implementation
//!
//! This module provides the `LinuxNvme` struct that implements the
//! `AdminChannel` trait through the kernel's admin passthrough ioctl on
//! `/dev/nvmeX` or `/dev/nvmeXnY`.

use crate::error::{LinuxNvmeError, Result};

use vtnvme_core::error::{ChannelError, Error as CoreError, ResourceError, Result as CoreResult};
use vtnvme_core::{AdminChannel, AdminCommand};

use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileTypeExt;
use std::os::unix::io::AsRawFd;

use ioctl::NvmePassthruCmd;

/// Default command timeout; 0 leaves the driver default in place
const DEFAULT_TIMEOUT_MS: u32 = 0;

/// Linux NVMe ioctl definitions
mod ioctl {
    use nix::{ioctl_none, ioctl_readwrite};

    const NVME_IOCTL_MAGIC: u8 = b'N';
    const NVME_IOCTL_TYPE_ID: u8 = 0x40;
    const NVME_IOCTL_TYPE_ADMIN_CMD: u8 = 0x41;

    ioctl_none!(nvme_ioctl_id, NVME_IOCTL_MAGIC, NVME_IOCTL_TYPE_ID);
    ioctl_readwrite!(
        nvme_ioctl_admin_cmd,
        NVME_IOCTL_MAGIC,
        NVME_IOCTL_TYPE_ADMIN_CMD,
        NvmePassthruCmd
    );

    /// Admin passthrough command
    /// This must match the kernel's struct nvme_passthru_cmd layout
    #[repr(C)]
    #[derive(Debug, Default, Clone)]
    pub struct NvmePassthruCmd {
        pub opcode: u8,        // __u8 opcode
        pub flags: u8,         // __u8 flags
        pub rsvd1: u16,        // __u16 rsvd1
        pub nsid: u32,         // __u32 nsid
        pub cdw2: u32,         // __u32 cdw2
        pub cdw3: u32,         // __u32 cdw3
        pub metadata: u64,     // __u64 metadata
        pub addr: u64,         // __u64 addr
        pub metadata_len: u32, // __u32 metadata_len
        pub data_len: u32,     // __u32 data_len
        pub cdw10: u32,        // __u32 cdw10
        pub cdw11: u32,        // __u32 cdw11
        pub cdw12: u32,        // __u32 cdw12
        pub cdw13: u32,        // __u32 cdw13
        pub cdw14: u32,        // __u32 cdw14
        pub cdw15: u32,        // __u32 cdw15
        pub timeout_ms: u32,   // __u32 timeout_ms
        pub result: u32,       // __u32 result
    }
}

/// Configuration for opening a Linux NVMe device
#[derive(Debug, Clone)]
pub struct LinuxNvmeConfig {
    /// Device path (e.g., "/dev/nvme0")
    pub path: String,
    /// Per-command timeout in milliseconds, 0 for the driver default
    pub timeout_ms: u32,
}

impl Default for LinuxNvmeConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl LinuxNvmeConfig {
    /// Create a new configuration with the given device path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the per-command timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// NVMe controller or namespace node opened for admin passthrough
pub struct LinuxNvme {
    file: File,
    path: String,
    timeout_ms: u32,
}

impl LinuxNvme {
    /// Open a device with the given configuration
    pub fn open(config: &LinuxNvmeConfig) -> Result<Self> {
        if config.path.is_empty() {
            return Err(LinuxNvmeError::NoDevice);
        }

        log::debug!("linux_nvme: Opening device {}", config.path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.path)
            .map_err(|e| LinuxNvmeError::OpenFailed {
                path: config.path.clone(),
                source: e,
            })?;

        let file_type = file.metadata()?.file_type();
        if !file_type.is_char_device() && !file_type.is_block_device() {
            return Err(LinuxNvmeError::NotADevice {
                path: config.path.clone(),
            });
        }

        log::debug!("linux_nvme: Opened {}", config.path);

        Ok(Self {
            file,
            path: config.path.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    /// Open a device with default settings
    pub fn open_device(path: &str) -> Result<Self> {
        Self::open(&LinuxNvmeConfig::new(path))
    }

    /// Path the device was opened from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Namespace the handle is bound to, `None` for a controller node
    pub fn query_namespace(&self) -> Result<Option<u32>> {
        let fd = self.file.as_raw_fd();
        match unsafe { ioctl::nvme_ioctl_id(fd) } {
            Ok(nsid) if nsid > 0 => Ok(Some(nsid as u32)),
            Ok(_) | Err(nix::errno::Errno::ENOTTY) | Err(nix::errno::Errno::EINVAL) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl AdminChannel for LinuxNvme {
    fn submit(&mut self, cmd: &mut AdminCommand<'_>) -> CoreResult<u32> {
        if cmd.data_len as usize > cmd.data.len() {
            return Err(CoreError::Resource(ResourceError::BufferTooSmall {
                needed: cmd.data_len as usize,
                got: cmd.data.len(),
            }));
        }

        let mut passthru = NvmePassthruCmd {
            opcode: cmd.opcode,
            nsid: cmd.nsid,
            addr: cmd.data.as_mut_ptr() as u64,
            data_len: cmd.data_len,
            cdw10: cmd.cdw10,
            cdw11: cmd.cdw11,
            cdw12: cmd.cdw12,
            timeout_ms: self.timeout_ms,
            ..Default::default()
        };

        log::trace!(
            "linux_nvme: opcode={:#04x} nsid={:#x} cdw10={:#x} cdw11={:#x} cdw12={:#x} len={}",
            passthru.opcode,
            passthru.nsid,
            passthru.cdw10,
            passthru.cdw11,
            passthru.cdw12,
            passthru.data_len
        );

        let fd = self.file.as_raw_fd();
        let ret = unsafe { ioctl::nvme_ioctl_admin_cmd(fd, &mut passthru) };

        match ret {
            Ok(0) => Ok(passthru.result),
            Ok(status) => {
                log::warn!(
                    "linux_nvme: opcode {:#04x} completed with status {:#06x}",
                    cmd.opcode,
                    status
                );
                Err(CoreError::Channel(ChannelError {
                    opcode: cmd.opcode,
                    status,
                }))
            }
            Err(errno) => {
                log::warn!("linux_nvme: opcode {:#04x} failed: {}", cmd.opcode, errno);
                Err(CoreError::Channel(ChannelError {
                    opcode: cmd.opcode,
                    status: -(errno as i32),
                }))
            }
        }
    }

    fn namespace_id(&mut self) -> CoreResult<u32> {
        match self.query_namespace() {
            Ok(Some(nsid)) => Ok(nsid),
            Ok(None) => Ok(1),
            Err(e) => {
                log::warn!("linux_nvme: cannot read namespace id of {}: {}", self.path, e);
                Err(CoreError::Channel(ChannelError {
                    opcode: 0,
                    status: -libc::EIO,
                }))
            }
        }
    }
}

impl Drop for LinuxNvme {
    fn drop(&mut self) {
        log::debug!("linux_nvme: Closing {}", self.path);
    }
}

/// Parse device options from a list of key-value pairs
pub fn parse_options(options: &[(&str, &str)]) -> std::result::Result<LinuxNvmeConfig, String> {
    let mut config = LinuxNvmeConfig::default();

    for (key, value) in options {
        match *key {
            "path" | "dev" => {
                config.path = value.to_string();
            }
            "timeout" => {
                config.timeout_ms = value
                    .parse()
                    .map_err(|_| format!("Invalid timeout value: {}", value))?;
            }
            _ => {
                log::warn!("linux_nvme: Unknown option: {}={}", key, value);
            }
        }
    }

    if config.path.is_empty() {
        return Err("No device specified. Use path=/dev/nvmeX".to_string());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthru_layout() {
        assert_eq!(std::mem::size_of::<NvmePassthruCmd>(), 72);
        assert_eq!(std::mem::align_of::<NvmePassthruCmd>(), 8);
    }

    #[test]
    fn test_parse_options() {
        let config = parse_options(&[("path", "/dev/nvme1"), ("timeout", "5000")]).unwrap();
        assert_eq!(config.path, "/dev/nvme1");
        assert_eq!(config.timeout_ms, 5000);

        let config = parse_options(&[("dev", "/dev/nvme0n1")]).unwrap();
        assert_eq!(config.path, "/dev/nvme0n1");
        assert_eq!(config.timeout_ms, 0);
    }

    #[test]
    fn test_parse_options_errors() {
        assert!(parse_options(&[]).is_err());
        assert!(parse_options(&[("path", "/dev/nvme0"), ("timeout", "soon")]).is_err());
    }

    #[test]
    fn test_open_rejects_regular_file() {
        let path = std::env::temp_dir().join(format!("vtnvme-linux-{}", std::process::id()));
        std::fs::write(&path, b"not a device").unwrap();
        let err = LinuxNvme::open_device(path.to_str().unwrap()).err().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, LinuxNvmeError::NotADevice { .. }));
    }

    #[test]
    fn test_open_missing_device() {
        let err = LinuxNvme::open_device("/nonexistent/nvme9").err().unwrap();
        assert!(matches!(err, LinuxNvmeError::OpenFailed { .. }));
        assert!(matches!(
            LinuxNvme::open(&LinuxNvmeConfig::default()),
            Err(LinuxNvmeError::NoDevice)
        ));
    }
}
