//! ## Session
//!
//! Addressing for one transfer. A [`Session`] puts the talker and listener
//! roles in place when it is opened and sends Untalk and Unlisten when it is
//! closed or dropped, so the bus ends idle on every exit path.
//!

use std::ops::{Deref, DerefMut};

use crate::constants::gpib;
use crate::transport::Transport;
use crate::types::Address;

use anyhow::Result;

/// ### Session
///
/// Guard over the transport for the duration of an addressed transfer.
/// Without an address the guard is inert and only lends out the transport.
///
pub struct Session<'a, T: Transport> {
    transport: &'a mut T,
    addressed: bool,
}

impl<'a, T: Transport> Session<'a, T> {
    /// ### Talker
    ///
    /// The controller talks, `address` listens.
    ///
    pub fn talker(transport: &'a mut T, address: Option<Address>) -> Result<Session<'a, T>> {
        let mut session = Session {
            transport,
            addressed: address.is_some(),
        };

        if let Some(address) = address {
            log::debug!("addressing {} as listener", address);
            session.transport.send_atn_command(gpib::MTA)?;
            session.transport.send_atn_command(address.listen_byte())?;
            session.secondary(address)?;
        }

        Ok(session)
    }

    /// ### Listener
    ///
    /// `address` talks, the controller listens.
    ///
    pub fn listener(transport: &'a mut T, address: Option<Address>) -> Result<Session<'a, T>> {
        let mut session = Session {
            transport,
            addressed: address.is_some(),
        };

        if let Some(address) = address {
            log::debug!("addressing {} as talker", address);
            session.transport.send_atn_command(gpib::MLA)?;
            session.transport.send_atn_command(address.talk_byte())?;
            session.secondary(address)?;
        }

        Ok(session)
    }

    /// ### Close
    ///
    /// Unaddress the bus, reporting a failure to do so.
    ///
    pub fn close(mut self) -> Result<()> {
        self.unaddress()
    }

    fn secondary(&mut self, address: Address) -> Result<()> {
        if let Some(msa) = address.secondary_byte() {
            self.transport.send_atn_command(msa)?;
        }
        Ok(())
    }

    fn unaddress(&mut self) -> Result<()> {
        if !self.addressed {
            return Ok(());
        }
        // disarm first, a failed attempt is not repeated from drop
        self.addressed = false;

        // Unlisten is still sent when Untalk fails
        let untalk = self.transport.send_atn_command(gpib::UNT);
        let unlisten = self.transport.send_atn_command(gpib::UNL);
        untalk.and(unlisten)
    }
}

impl<T: Transport> Deref for Session<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.transport
    }
}

impl<T: Transport> DerefMut for Session<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.transport
    }
}

impl<T: Transport> Drop for Session<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.unaddress() {
            log::warn!("failed to unaddress the bus: {}", e);
        }
    }
}
