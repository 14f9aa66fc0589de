//! ## Bus Controller
//!
//! GPIB controller-in-charge built on the bridge primitives of a [`Transport`].
//!
//! Every public operation holds the transport lock from the first to the last
//! primitive it issues, so transactions from different threads never
//! interleave on the bus. Data transfers read the bridge status after each
//! chunk; a nonzero status stops the transfer, unaddresses the bus and
//! surfaces [`Error::BusError`].
//!

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::communication::frame;
use crate::constants::{gpib, misc};
use crate::error::Error;
use crate::session::Session;
use crate::transport::Transport;
use crate::types::Address;

use anyhow::Result;

/// ### BusController
///
/// Controller of one GPIB bus, reached through one bridge.
///
#[derive(Debug)]
pub struct BusController<T: Transport> {
    transport: Mutex<T>,
}

impl<T: Transport> BusController<T> {
    /// ### New
    ///
    /// Take control of the bus behind `transport`. The bus is not touched until
    /// the first operation; call [`init_bus`](Self::init_bus) to reset it.
    ///
    pub fn new(transport: T) -> BusController<T> {
        BusController {
            transport: Mutex::new(transport),
        }
    }

    /// Give the transport back
    pub fn into_inner(self) -> T {
        self.transport
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// ### Init Bus
    ///
    /// Assert REN, pulse IFC and send Device Clear, leaving every instrument
    /// remote and cleared.
    ///
    /// This is best-effort: each step is attempted even when an earlier one
    /// failed, and failures are only logged.
    ///
    pub fn init_bus(&self) {
        let mut transport = self.lock();

        log::debug!("initializing bus");
        best_effort("assert REN", transport.set_remote_enable(true));
        best_effort("pulse IFC", transport.pulse_interface_clear());
        best_effort("send DCL", transport.send_atn_command(gpib::DCL));
    }

    /// ### Talk
    ///
    /// Send `data` as talker. With an address, the controller addresses itself
    /// as talker and the device as listener first and unaddresses afterwards.
    ///
    /// #### Arguments
    /// - `data` -> the bytes to send
    /// - `address` -> the listening device, or `None` to use the current addressing
    /// - `eoi` -> assert EOI with the last byte
    ///
    pub fn talk(&self, data: impl AsRef<[u8]>, address: Option<Address>, eoi: bool) -> Result<()> {
        talk(&mut *self.lock(), data.as_ref(), address, eoi)
    }

    /// ### Listen
    ///
    /// Read one message as listener, up to the byte sent with EOI. With an
    /// address, the device is addressed as talker for the read.
    ///
    pub fn listen(&self, address: Option<Address>) -> Result<Vec<u8>> {
        listen(&mut *self.lock(), address)
    }

    /// ### Command
    ///
    /// Send `cmd` to the device. When the command is a query (ends with `?`)
    /// the response is read back and returned.
    ///
    pub fn command(&self, cmd: impl AsRef<[u8]>, address: Address) -> Result<Option<Vec<u8>>> {
        let cmd = cmd.as_ref();
        let mut transport = self.lock();

        talk(&mut *transport, cmd, Some(address), true)?;

        if cmd.last() == Some(&misc::QUERY_MARKER) {
            return Ok(Some(listen(&mut *transport, Some(address))?));
        }

        Ok(None)
    }

    /// ### Query Raw
    ///
    /// Send a command and read the response, whatever the command looks like.
    ///
    pub fn query_raw(&self, cmd: impl AsRef<[u8]>, address: Address) -> Result<Vec<u8>> {
        let mut transport = self.lock();

        talk(&mut *transport, cmd.as_ref(), Some(address), true)?;
        listen(&mut *transport, Some(address))
    }

    /// ### Query
    ///
    /// Send a command and read the response as a trimmed utf-8 string.
    ///
    pub fn query(&self, cmd: impl AsRef<[u8]>, address: Address) -> Result<String> {
        let resp = self.query_raw(cmd, address)?;

        // Convert response to string
        let resp = std::str::from_utf8(&resp)?.trim();

        Ok(String::from(resp))
    }

    /// ### Serial Poll
    ///
    /// Serial poll the device at primary address 1 and return its status byte.
    /// Use [`spoll_device`](Self::spoll_device) for any other device.
    ///
    pub fn spoll(&self) -> Result<u8> {
        serial_poll(&mut *self.lock(), Address::new(1)?)
    }

    /// ### Serial Poll Device
    ///
    /// Serial poll `address` and return its status byte.
    ///
    pub fn spoll_device(&self, address: Address) -> Result<u8> {
        serial_poll(&mut *self.lock(), address)
    }

    /// Read the SRQ line, `true` while some device requests service
    pub fn service_request(&self) -> Result<bool> {
        self.lock().read_service_request_line()
    }

    /// Assert or release Remote Enable
    pub fn remote_enable(&self, enable: bool) -> Result<()> {
        self.lock().set_remote_enable(enable)
    }

    /// Pulse Interface Clear
    pub fn interface_clear(&self) -> Result<()> {
        self.lock().pulse_interface_clear()
    }

    /// Send Device Clear to every device
    pub fn device_clear(&self) -> Result<()> {
        self.lock().send_atn_command(gpib::DCL)
    }

    /// Send Local Lockout to every device
    pub fn local_lockout(&self) -> Result<()> {
        self.lock().send_atn_command(gpib::LLO)
    }

    /// Send Selected Device Clear to one device
    pub fn selected_device_clear(&self, address: Address) -> Result<()> {
        addressed_command(&mut *self.lock(), address, gpib::SDC)
    }

    /// Return one device to local (front panel) control
    pub fn go_to_local(&self, address: Address) -> Result<()> {
        addressed_command(&mut *self.lock(), address, gpib::GTL)
    }

    /// ### With Transport
    ///
    /// Run `f` with exclusive access to the bridge, for sequences of raw
    /// primitives (see [`gpib`](crate::gpib) for the command bytes).
    ///
    pub fn with_transport<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut *self.lock())
    }

    // a poisoned lock only means a caller panicked mid-transaction, the next
    // transaction addresses the bus from scratch
    fn lock(&self) -> MutexGuard<'_, T> {
        self.transport.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn best_effort(step: &str, result: Result<()>) {
    if let Err(e) = result {
        log::warn!("bus init: failed to {}: {}", step, e);
    }
}

fn check_status<T: Transport>(transport: &mut T) -> Result<()> {
    match transport.read_status_register()? {
        0 => Ok(()),
        status => {
            log::warn!("bus error, status {:#04x}", status);
            Err(Error::BusError { status }.into())
        }
    }
}

fn talk<T: Transport>(
    transport: &mut T,
    data: &[u8],
    address: Option<Address>,
    eoi: bool,
) -> Result<()> {
    let chunks = frame::talk_chunks(data, eoi)?;

    log::debug!("talk {} bytes in {} chunks", data.len(), chunks.len());

    let mut session = Session::talker(transport, address)?;
    for chunk in chunks {
        session.write_talk_chunk(chunk)?;
        // dropping the session on error unaddresses the bus
        check_status(&mut *session)?;
    }

    session.close()
}

fn listen<T: Transport>(transport: &mut T, address: Option<Address>) -> Result<Vec<u8>> {
    let mut output_data: Vec<u8> = Vec::new();

    let mut session = Session::listener(transport, address)?;
    loop {
        let mut data = session.read_listen_chunk(misc::LISTEN_CHUNK_SIZE)?;
        check_status(&mut *session)?;

        let end_of_message = data.len() < misc::LISTEN_CHUNK_SIZE;
        output_data.append(&mut data);

        if end_of_message {
            break;
        }
    }
    session.close()?;

    log::debug!("listen got {} bytes", output_data.len());

    Ok(output_data)
}

fn serial_poll<T: Transport>(transport: &mut T, address: Address) -> Result<u8> {
    log::debug!("serial poll {}", address);

    transport.send_atn_command(gpib::SPE)?;
    let status = poll_status_byte(transport, address);
    // serial poll mode is left even when the poll failed
    let disable = transport.send_atn_command(gpib::SPD);

    let status = status?;
    disable?;

    Ok(status)
}

fn poll_status_byte<T: Transport>(transport: &mut T, address: Address) -> Result<u8> {
    let mut session = Session::listener(transport, Some(address))?;

    let data = session.read_listen_chunk(1)?;
    let status = *data.first().ok_or(Error::EmptySerialPoll)?;

    session.close()?;

    Ok(status)
}

fn addressed_command<T: Transport>(transport: &mut T, address: Address, command: u8) -> Result<()> {
    let mut session = Session::talker(transport, Some(address))?;
    session.send_atn_command(command)?;
    session.close()
}
