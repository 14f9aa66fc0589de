//! ## Constants
//!
//! Various constants used throughout the project.
//!

#[allow(unused)]
pub mod usb {
    /// Vendor ID of the Ful488 bridge
    pub const FUL488_VENDOR_ID: u16 = 0x16c0;
    /// Product ID of the Ful488 bridge
    pub const FUL488_PRODUCT_ID: u16 = 0x05dc;
    /// The configuration the bridge runs in
    pub const FUL488_CONFIGURATION: u8 = 1;
    /// bmRequestType for vendor requests to the device, host to device
    pub const REQUEST_TYPE_OUT: u8 = 0x40;
    /// bmRequestType for vendor requests to the device, device to host
    pub const REQUEST_TYPE_IN: u8 = 0xC0;
}

#[allow(unused)]
pub mod misc {
    use std::time::Duration;

    /// The default timeout duration
    pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(2);
    /// Maximum number of data bytes carried by one talk request
    pub const TALK_CHUNK_SIZE: usize = 3;
    /// Maximum number of data bytes returned by one listen request
    pub const LISTEN_CHUNK_SIZE: usize = 254;
    /// Bit of the talk length field that asks the bridge to assert EOI
    pub const TALK_EOI_FLAG: u8 = 0x80;
    /// ASCII marker ending a query command
    pub const QUERY_MARKER: u8 = b'?';
}

/// Vendor requests understood by the bridge firmware
#[allow(unused)]
pub mod bridge_requests {
    /// Write a command byte with ATN asserted
    pub const ATN1: u8 = 1;
    /// Write data bytes with ATN deasserted
    pub const TALK: u8 = 2;
    /// Read data bytes
    pub const LISTEN: u8 = 3;
    /// Control the REN line
    pub const REN: u8 = 4;
    /// Read the SRQ line
    pub const SRQ: u8 = 5;
    /// Pulse the IFC line
    pub const IFC: u8 = 6;
    /// Read the status flags of the last transfer
    pub const STATUS: u8 = 7;
}

/// IEEE-488 bus command bytes, sent with ATN asserted
#[allow(unused)]
pub mod gpib {
    /// Go To Local
    pub const GTL: u8 = 0x01;
    /// Selected Device Clear
    pub const SDC: u8 = 0x04;
    /// Local Lock Out
    pub const LLO: u8 = 0x11;
    /// Device Clear
    pub const DCL: u8 = 0x14;
    /// Serial Poll Enable
    pub const SPE: u8 = 0x18;
    /// Serial Poll Disable
    pub const SPD: u8 = 0x19;
    /// Address mask for MLA, MTA and MSA
    pub const PAD: u8 = 0x1f;
    /// My Listen Address
    pub const MLA: u8 = 0x20;
    /// Unlisten
    pub const UNL: u8 = 0x3f;
    /// My Talk Address
    pub const MTA: u8 = 0x40;
    /// Untalk
    pub const UNT: u8 = 0x5f;
    /// My Secondary Address
    pub const MSA: u8 = 0x60;
}
