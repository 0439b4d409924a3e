//! Device registry for vtnvme
//!
//! The CLI never names a backend type. It passes a device string to
//! [`open_device`] and works with the returned [`DeviceHandle`], which owns
//! the backend behind a boxed [`AdminChannel`].
//!
//! # Device strings
//!
//! | String | Backend |
//! |---|---|
//! | `/dev/nvme0`, `/dev/nvme0n1` | Linux NVMe ioctl |
//! | `linux:path=/dev/nvme0,timeout=5000` | Linux NVMe ioctl |
//! | `dummy:images=2,pages=8` | In-memory emulated drive |
//!
//! # Example
//!
//! ```ignore
//! let mut handle = vtnvme_device::open_device("/dev/nvme0")?;
//! let mut session = vtnvme_core::vendor::VendorSession::new(&mut handle);
//! let sn = vtnvme_core::params::read_serial_number(&mut session)?;
//! ```

mod error;
mod handle;
mod registry;

pub use error::{DeviceError, Result};
pub use handle::DeviceHandle;
pub use registry::{
    available_devices, device_names_short, open_device, parse_device_spec, DeviceInfo,
    DeviceSpec,
};

pub use vtnvme_core::AdminChannel;
