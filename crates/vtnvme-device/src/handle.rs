//! DeviceHandle - an opened drive, whatever its backend

use vtnvme_core::{AdminChannel, AdminCommand};

/// An opened drive
///
/// Owns the backend for its whole lifetime; dropping the handle closes the
/// device.
pub struct DeviceHandle {
    channel: Box<dyn AdminChannel>,
    backend: &'static str,
    port: String,
}

impl DeviceHandle {
    pub(crate) fn new(channel: Box<dyn AdminChannel>, backend: &'static str, port: String) -> Self {
        Self {
            channel,
            backend,
            port,
        }
    }

    /// Name of the backend serving this handle
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    /// Where the drive is attached (device node for real drives)
    pub fn port(&self) -> &str {
        &self.port
    }
}

impl AdminChannel for DeviceHandle {
    fn submit(&mut self, cmd: &mut AdminCommand<'_>) -> vtnvme_core::Result<u32> {
        self.channel.submit(cmd)
    }

    fn namespace_id(&mut self) -> vtnvme_core::Result<u32> {
        self.channel.namespace_id()
    }
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("backend", &self.backend)
            .field("port", &self.port)
            .finish()
    }
}
