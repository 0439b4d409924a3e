//! CLI command implementations
//!
//! Every command takes any [`vtnvme_core::AdminChannel`], so the same code
//! runs against a Linux controller node and the in-memory dummy drive.

pub mod dump;
pub mod identify;
mod list;
pub mod logs;
mod output;
pub mod params;
pub mod vtview;

pub use list::list_devices;

/// Result of a command; the error decides the process exit status
pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Process exit status for a failed command
///
/// Channel failures exit with their status clamped to 1..=255 (a negated
/// errno exits with the errno). Everything else exits with 1.
pub fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<vtnvme_core::Error>() {
        Some(e) => match e.channel_status() {
            Some(status) => status.unsigned_abs().clamp(1, 255) as i32,
            None => 1,
        },
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtnvme_core::error::{ChannelError, ParameterMismatch};
    use vtnvme_core::Error;

    fn code(err: Error) -> i32 {
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        exit_code(boxed.as_ref())
    }

    #[test]
    fn test_exit_codes() {
        let channel = |status| Error::Channel(ChannelError { opcode: 0xFE, status });
        assert_eq!(code(channel(0x0002)), 2);
        assert_eq!(code(channel(0x4281)), 255);
        assert_eq!(code(channel(-5)), 5);
        assert_eq!(code(channel(0)), 1);
        assert_eq!(code(Error::ParameterMismatch(ParameterMismatch::NotAscii)), 1);

        let io: Box<dyn std::error::Error> =
            Box::new(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(exit_code(io.as_ref()), 1);
    }
}
