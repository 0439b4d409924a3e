//! Scripted admin channel for unit tests

use std::vec::Vec;

use crate::channel::AdminChannel;
use crate::command::AdminCommand;
use crate::error::{ChannelError, Error, Result};

/// Snapshot of one submitted command
#[derive(Debug, Clone)]
pub struct Recorded {
    pub opcode: u8,
    pub nsid: u32,
    pub cdw10: u32,
    pub cdw11: u32,
    pub cdw12: u32,
    pub data_len: u32,
    /// Buffer contents as the host handed them over
    pub data: Vec<u8>,
}

/// Records every command and plays back queued responses
#[derive(Default)]
pub struct MockChannel {
    pub calls: Vec<Recorded>,
    responses: Vec<(u8, Vec<u8>)>,
    failures: Vec<(usize, i32)>,
    pub nsid: u32,
}

impl MockChannel {
    pub fn new() -> Self {
        Self {
            nsid: 1,
            ..Default::default()
        }
    }

    /// Queue bytes returned by the next device-to-host command with `opcode`
    pub fn respond_with(&mut self, opcode: u8, bytes: &[u8]) {
        self.responses.push((opcode, bytes.to_vec()));
    }

    /// Fail the call with zero-based sequence number `call` with `status`
    pub fn fail_call(&mut self, call: usize, status: i32) {
        self.failures.push((call, status));
    }
}

impl AdminChannel for MockChannel {
    fn submit(&mut self, cmd: &mut AdminCommand<'_>) -> Result<u32> {
        let seq = self.calls.len();
        self.calls.push(Recorded {
            opcode: cmd.opcode,
            nsid: cmd.nsid,
            cdw10: cmd.cdw10,
            cdw11: cmd.cdw11,
            cdw12: cmd.cdw12,
            data_len: cmd.data_len,
            data: cmd.data.to_vec(),
        });

        if let Some(&(_, status)) = self.failures.iter().find(|(n, _)| *n == seq) {
            return Err(Error::Channel(ChannelError {
                opcode: cmd.opcode,
                status,
            }));
        }

        if !cmd.is_host_to_device() {
            if let Some(pos) = self.responses.iter().position(|(op, _)| *op == cmd.opcode) {
                let (_, bytes) = self.responses.remove(pos);
                let payload = cmd.payload_mut();
                let n = core::cmp::min(bytes.len(), payload.len());
                payload[..n].copy_from_slice(&bytes[..n]);
            }
        }
        Ok(0)
    }

    fn namespace_id(&mut self) -> Result<u32> {
        Ok(self.nsid)
    }
}
