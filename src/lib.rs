//! # Rust Ful488
//!
//! GPIB (IEEE-488) bus controller for the Ful488 USB bridge.
//!
//! The bridge exposes a handful of primitives over vendor control requests:
//! drive REN and IFC, put a command byte on the bus under ATN, talk up to three
//! data bytes, listen up to 254 data bytes and read a status register. This
//! library turns those into controller transactions: bus reset, addressed
//! talk/listen transfers with EOI, queries and serial polls.
//!
//! ## Usage
//!
//! To use, add the following line to your project's Cargo.toml dependencies:
//! ```toml
//! rs-ful488 = "0.1"
//! ```
//!
//! ## Example
//!
//! The example below resets the bus, then sends a command and a query to the
//! instrument at GPIB address 9.
//!
//! ```no_run
//! use rs_ful488::{Address, Ful488Client};
//!
//! fn main() -> anyhow::Result<()> {
//!     // connect to the first bridge found
//!     let bus = Ful488Client::connect(())?;
//!     bus.init_bus();
//!
//!     let dmm = Address::new(9)?;
//!
//!     // send a command to the device
//!     bus.command("*RST", dmm)?;
//!
//!     // query the device and get a string
//!     let idn: String = bus.query("*IDN?", dmm)?;
//!     println!("{}", idn);
//!
//!     // check for service requests
//!     if bus.service_request()? {
//!         println!("status byte: {:#04x}", bus.spoll_device(dmm)?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Any other bridge can be driven by implementing [`Transport`] for it and
//! handing it to [`BusController::new`].
//!

mod constants;
mod controller;
mod error;
mod init;
mod session;
mod transport;
mod types;
mod usb;
mod communication {
    pub mod control;
    pub mod frame;
}

use std::time::Duration;

use rusb::DeviceDescriptor;

pub use communication::frame::{encode_talk_chunk, talk_chunks, TalkChunk};
pub use controller::BusController;
pub use error::Error;
pub use transport::Transport;
pub use types::{Address, DeviceAddr, DeviceId, DeviceInfo};
pub use usb::UsbTransport;

/// GPIB command bytes, for use with [`Transport::send_atn_command`]
pub use constants::gpib;

use anyhow::Result;

/// Device filter
pub trait DeviceFilter {
    fn apply_filter<T: rusb::UsbContext>(
        &self,
        device: &rusb::Device<T>,
        device_desc: &DeviceDescriptor,
    ) -> bool;
}

/// ### Ful488Client
///
/// Bus controller connected to a Ful488 bridge over USB.
///
pub type Ful488Client = BusController<UsbTransport>;

impl BusController<UsbTransport> {
    /// ### Devices
    ///
    /// Get a list of connected Ful488 bridges
    ///
    pub fn devices() -> Result<Vec<DeviceInfo>> {
        // setup context
        let mut context = rusb::Context::new()?;

        init::list_devices(&mut context)
    }

    /// ### Connect
    ///
    /// Connect to a bridge.
    ///
    /// Use `filter` argument to select the bridge:
    /// - `()` - first found Ful488 bridge
    /// - `(idVendor, idProduct)` or `DeviceId` - device by USB identifiers
    /// - `(bus, device)` or `DeviceAddr` - Ful488 bridge by USB bus and device number
    /// - `DeviceInfo` - device by both USB identifiers and address
    ///
    pub fn connect(filter: impl DeviceFilter) -> Result<Ful488Client> {
        Ok(BusController::new(UsbTransport::open(filter)?))
    }

    /// ### Set Timeout
    ///
    /// Set a new timeout for the bridge connection.
    ///
    /// #### Arguments
    /// - `duration` -> the duration of the timeout
    ///
    pub fn set_timeout(&self, duration: Duration) {
        self.with_transport(|transport| transport.set_timeout(duration));
    }
}
