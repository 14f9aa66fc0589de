//! ## Types
//!
//! The different types used across the crate
//!

use std::fmt;

use crate::constants::gpib;
use crate::error::Error;

use anyhow::Result;

/// ### Address
///
/// A GPIB device address: a 5-bit primary address and an optional secondary address.
///
/// Address 31 is not a device address on the bus (`MLA | 31` is Unlisten and
/// `MTA | 31` is Untalk), so both parts are limited to 0..=30.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    primary: u8,
    secondary: Option<u8>,
}

impl Address {
    /// Highest usable primary or secondary address
    pub const MAX: u8 = 30;

    /// ### New
    ///
    /// Create a primary-only address.
    ///
    pub fn new(primary: u8) -> Result<Address> {
        Ok(Address {
            primary: check(primary)?,
            secondary: None,
        })
    }

    /// ### With Secondary
    ///
    /// Create an address with an extended (secondary) part.
    ///
    pub fn with_secondary(primary: u8, secondary: u8) -> Result<Address> {
        Ok(Address {
            primary: check(primary)?,
            secondary: Some(check(secondary)?),
        })
    }

    /// The primary address, 0..=30
    pub fn primary(&self) -> u8 {
        self.primary
    }

    /// The secondary address, if any
    pub fn secondary(&self) -> Option<u8> {
        self.secondary
    }

    /// The byte that addresses this device as listener
    pub(crate) fn listen_byte(&self) -> u8 {
        gpib::MLA | (self.primary & gpib::PAD)
    }

    /// The byte that addresses this device as talker
    pub(crate) fn talk_byte(&self) -> u8 {
        gpib::MTA | (self.primary & gpib::PAD)
    }

    /// The byte selecting the secondary address, if any
    pub(crate) fn secondary_byte(&self) -> Option<u8> {
        self.secondary.map(|sad| gpib::MSA | (sad & gpib::PAD))
    }
}

fn check(address: u8) -> Result<u8> {
    if address > Address::MAX {
        return Err(Error::InvalidAddress(address).into());
    }
    Ok(address)
}

impl TryFrom<u8> for Address {
    type Error = anyhow::Error;

    fn try_from(primary: u8) -> Result<Address> {
        Address::new(primary)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.secondary {
            Some(sad) => write!(f, "{}.{}", self.primary, sad),
            None => write!(f, "{}", self.primary),
        }
    }
}

/// ### Device Id
///
/// USB identifiers of a bridge.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    pub vendor_id: u16,
    pub product_id: u16,
}

/// ### Device Addr
///
/// Location of a bridge on the USB bus.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceAddr {
    pub bus: u8,
    pub device: u8,
}

/// ### Device Info
///
/// Both the identifiers and the location of a bridge.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub address: DeviceAddr,
}
