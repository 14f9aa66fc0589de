//! ## Transport
//!
//! The primitive operations a GPIB bridge has to offer. Everything in
//! [`BusController`](crate::BusController) is built on top of these.
//!

use crate::communication::frame::TalkChunk;

use anyhow::Result;

/// ### Transport
///
/// Blocking access to one bridge. Implemented by [`UsbTransport`](crate::UsbTransport)
/// for the Ful488 hardware.
///
pub trait Transport {
    /// Assert (`true`) or release (`false`) Remote Enable
    fn set_remote_enable(&mut self, enable: bool) -> Result<()>;

    /// Pulse Interface Clear
    fn pulse_interface_clear(&mut self) -> Result<()>;

    /// Send one command byte with ATN asserted
    fn send_atn_command(&mut self, command: u8) -> Result<()>;

    /// Read the SRQ line
    fn read_service_request_line(&mut self) -> Result<bool>;

    /// Read the status of the last data transfer, zero when it succeeded
    fn read_status_register(&mut self) -> Result<u8>;

    /// Send one packed chunk of talker data
    fn write_talk_chunk(&mut self, chunk: TalkChunk) -> Result<()>;

    /// Read up to `max_len` bytes of listener data. Fewer bytes than asked
    /// means the talker ended the message with EOI.
    fn read_listen_chunk(&mut self, max_len: usize) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn set_remote_enable(&mut self, enable: bool) -> Result<()> {
        (**self).set_remote_enable(enable)
    }

    fn pulse_interface_clear(&mut self) -> Result<()> {
        (**self).pulse_interface_clear()
    }

    fn send_atn_command(&mut self, command: u8) -> Result<()> {
        (**self).send_atn_command(command)
    }

    fn read_service_request_line(&mut self) -> Result<bool> {
        (**self).read_service_request_line()
    }

    fn read_status_register(&mut self) -> Result<u8> {
        (**self).read_status_register()
    }

    fn write_talk_chunk(&mut self, chunk: TalkChunk) -> Result<()> {
        (**self).write_talk_chunk(chunk)
    }

    fn read_listen_chunk(&mut self, max_len: usize) -> Result<Vec<u8>> {
        (**self).read_listen_chunk(max_len)
    }
}
