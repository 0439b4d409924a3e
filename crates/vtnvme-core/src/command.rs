//! Admin command descriptor

use crate::opcodes;

/// One admin command submission
///
/// Designed to avoid allocation - the data buffer is borrowed from the
/// caller and must outlive the submission. `data_len` is the transfer
/// length put on the wire and may be shorter than the buffer.
#[derive(Debug)]
pub struct AdminCommand<'a> {
    /// The opcode byte
    pub opcode: u8,
    /// Namespace identifier
    pub nsid: u32,
    /// Command dword 10
    pub cdw10: u32,
    /// Command dword 11
    pub cdw11: u32,
    /// Command dword 12
    pub cdw12: u32,
    /// Transfer length in bytes
    pub data_len: u32,
    /// Data buffer, read from or written into depending on the opcode
    pub data: &'a mut [u8],
}

impl<'a> AdminCommand<'a> {
    /// Create a command with every dword cleared
    pub fn new(opcode: u8, data: &'a mut [u8]) -> Self {
        let data_len = data.len() as u32;
        Self {
            opcode,
            nsid: 0,
            cdw10: 0,
            cdw11: 0,
            cdw12: 0,
            data_len,
            data,
        }
    }

    /// Vendor arm command carrying the control buffer
    pub fn arm(control: &'a mut [u8]) -> Self {
        let mut cmd = Self::new(opcodes::VENDOR_ARM, control);
        cmd.cdw10 = opcodes::ARM_CDW10;
        cmd.cdw12 = opcodes::ARM_CDW12;
        cmd
    }

    /// Vendor execute command reading `len` bytes into `buf`
    pub fn execute(cdw10: u32, len: u32, buf: &'a mut [u8]) -> Self {
        let mut cmd = Self::new(opcodes::VENDOR_EXECUTE, buf);
        cmd.cdw10 = cdw10;
        cmd.cdw12 = opcodes::EXECUTE_CDW12;
        cmd.data_len = len;
        cmd
    }

    /// Vendor execute command sending `len` bytes from `buf`
    pub fn execute_write(cdw10: u32, len: u32, buf: &'a mut [u8]) -> Self {
        let mut cmd = Self::execute(cdw10, len, buf);
        cmd.opcode = opcodes::VENDOR_EXECUTE_WRITE;
        cmd
    }

    /// Identify command for the given CNS value
    pub fn identify(cns: u32, nsid: u32, buf: &'a mut [u8]) -> Self {
        let mut cmd = Self::new(opcodes::IDENTIFY, buf);
        cmd.nsid = nsid;
        cmd.cdw10 = cns;
        cmd
    }

    /// Get Log Page command transferring the whole buffer
    ///
    /// The dword count is split across cdw10 (NUMDL) and cdw11 (NUMDU).
    pub fn get_log_page(nsid: u32, lid: u8, lsp: u8, rae: bool, buf: &'a mut [u8]) -> Self {
        let numd = (buf.len() as u32 / 4).saturating_sub(1);
        let mut cmd = Self::new(opcodes::GET_LOG_PAGE, buf);
        cmd.nsid = nsid;
        cmd.cdw10 = lid as u32
            | ((lsp as u32 & 0x0F) << 8)
            | ((rae as u32) << 15)
            | ((numd & 0xFFFF) << 16);
        cmd.cdw11 = numd >> 16;
        cmd
    }

    /// True when bit 0 of the opcode marks a host-to-controller transfer
    pub fn is_host_to_device(&self) -> bool {
        self.opcode & 0x01 != 0
    }

    /// The part of the buffer covered by `data_len`
    pub fn payload(&self) -> &[u8] {
        let len = core::cmp::min(self.data_len as usize, self.data.len());
        &self.data[..len]
    }

    /// Mutable view of the part of the buffer covered by `data_len`
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let len = core::cmp::min(self.data_len as usize, self.data.len());
        &mut self.data[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_envelope() {
        let mut control = [0u8; 512];
        let cmd = AdminCommand::arm(&mut control);
        assert_eq!(cmd.opcode, 0xFD);
        assert_eq!(cmd.cdw12, 0x00FC);
        assert_eq!(cmd.cdw10, 128);
        assert_eq!(cmd.data_len, 512);
        assert!(cmd.is_host_to_device());
    }

    #[test]
    fn test_execute_envelope() {
        let mut buf = [0u8; 4096];
        let cmd = AdminCommand::execute(1024, 4096, &mut buf);
        assert_eq!(cmd.opcode, 0xFE);
        assert_eq!(cmd.cdw12, 0x00FD);
        assert_eq!(cmd.cdw10, 1024);
        assert_eq!(cmd.data_len, 4096);
        assert!(!cmd.is_host_to_device());

        let mut payload = [0u8; 20];
        let cmd = AdminCommand::execute_write(5, 20, &mut payload);
        assert_eq!(cmd.opcode, 0xFD);
        assert_eq!(cmd.cdw12, 0x00FD);
    }

    #[test]
    fn test_get_log_page_dwords() {
        let mut buf = [0u8; 512];
        let cmd = AdminCommand::get_log_page(opcodes::NSID_ALL, 0x02, 0, false, &mut buf);
        assert_eq!(cmd.cdw10, 0x02 | (127 << 16));
        assert_eq!(cmd.cdw11, 0);

        let mut buf = [0u8; 1024];
        let cmd = AdminCommand::get_log_page(opcodes::NSID_ALL, 0x07, 1, false, &mut buf);
        assert_eq!(cmd.cdw10, 0x07 | (1 << 8) | (255 << 16));
    }

    #[test]
    fn test_payload_is_clipped_to_data_len() {
        let mut buf = [7u8; 512];
        let cmd = AdminCommand::execute(3, 12, &mut buf);
        assert_eq!(cmd.payload().len(), 12);
    }
}
