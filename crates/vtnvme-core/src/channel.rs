//! Admin command channel trait

use crate::command::AdminCommand;
use crate::error::Result;

/// A device that executes admin commands one at a time
///
/// Implementations block until the controller completes the command. They
/// must not retry on their own and must reject a command whose `data_len`
/// exceeds its buffer before touching the device.
pub trait AdminChannel {
    /// Submit one admin command
    ///
    /// Returns completion dword 0 on success.
    fn submit(&mut self, cmd: &mut AdminCommand<'_>) -> Result<u32>;

    /// Namespace identifier the handle is bound to
    ///
    /// Controller handles that are not bound to a namespace report 1.
    fn namespace_id(&mut self) -> Result<u32> {
        Ok(1)
    }
}

impl<T: AdminChannel + ?Sized> AdminChannel for &mut T {
    fn submit(&mut self, cmd: &mut AdminCommand<'_>) -> Result<u32> {
        (**self).submit(cmd)
    }

    fn namespace_id(&mut self) -> Result<u32> {
        (**self).namespace_id()
    }
}

#[cfg(feature = "alloc")]
impl<T: AdminChannel + ?Sized> AdminChannel for alloc::boxed::Box<T> {
    fn submit(&mut self, cmd: &mut AdminCommand<'_>) -> Result<u32> {
        (**self).submit(cmd)
    }

    fn namespace_id(&mut self) -> Result<u32> {
        (**self).namespace_id()
    }
}
