//! ## USB Transport
//!
//! [`Transport`] over a libusb handle to a Ful488 bridge.
//!

use std::time::Duration;

use crate::communication::{control, frame::TalkChunk};
use crate::constants::misc::DEFAULT_TIMEOUT_DURATION;
use crate::transport::Transport;
use crate::{init, DeviceFilter};

use anyhow::Result;
use rusb::{Context, DeviceHandle};

/// ### USB Transport
///
/// An opened, configured bridge.
///
#[derive(Debug)]
pub struct UsbTransport {
    handle: DeviceHandle<Context>,
    timeout: Duration,
}

impl UsbTransport {
    /// ### Open
    ///
    /// Find the bridge selected by `filter`, open and configure it.
    ///
    pub fn open(filter: impl DeviceFilter) -> Result<UsbTransport> {
        // setup context
        let mut context = Context::new()?;
        // attempt to open the device
        let mut handle = init::open_device(&mut context, filter)?;

        init::configure(&mut handle);

        Ok(UsbTransport {
            handle,
            timeout: DEFAULT_TIMEOUT_DURATION,
        })
    }

    /// ### Set Timeout
    ///
    /// Set a new timeout for every request sent to the bridge.
    ///
    pub fn set_timeout(&mut self, duration: Duration) {
        self.timeout = duration;
    }

    /// The timeout used for every request
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for UsbTransport {
    fn set_remote_enable(&mut self, enable: bool) -> Result<()> {
        log::trace!("REN {}", enable);
        control::remote_enable(&self.handle, enable, self.timeout)
    }

    fn pulse_interface_clear(&mut self) -> Result<()> {
        log::trace!("IFC");
        control::interface_clear(&self.handle, self.timeout)
    }

    fn send_atn_command(&mut self, command: u8) -> Result<()> {
        log::trace!("ATN {:#04x}", command);
        control::atn_command(&self.handle, command, self.timeout)
    }

    fn read_service_request_line(&mut self) -> Result<bool> {
        let srq = control::service_request(&self.handle, self.timeout)?;
        log::trace!("SRQ {}", srq);
        Ok(srq)
    }

    fn read_status_register(&mut self) -> Result<u8> {
        let status = control::status(&self.handle, self.timeout)?;
        log::trace!("status {:#04x}", status);
        Ok(status)
    }

    fn write_talk_chunk(&mut self, chunk: TalkChunk) -> Result<()> {
        log::trace!("talk {:02x?} eoi={}", chunk.data(), chunk.eoi());
        control::talk(&self.handle, chunk, self.timeout)
    }

    fn read_listen_chunk(&mut self, max_len: usize) -> Result<Vec<u8>> {
        let data = control::listen(&self.handle, max_len, self.timeout)?;
        log::trace!("listen {} bytes", data.len());
        Ok(data)
    }
}
