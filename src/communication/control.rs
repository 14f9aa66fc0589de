//! ## Control
//!
//! Set of vendor control requests to send to the bridge.
//!

use std::time::Duration;

use crate::communication::frame::TalkChunk;
use crate::constants::{bridge_requests, misc, usb};
use crate::error::Error;

use anyhow::Result;
use rusb::{Context, DeviceHandle};

/// ### Remote Enable
///
/// Assert or release the REN line.
///
pub fn remote_enable(
    handle: &DeviceHandle<Context>,
    enable: bool,
    timeout: Duration,
) -> Result<()> {
    handle.write_control(
        usb::REQUEST_TYPE_OUT,
        bridge_requests::REN,
        enable as u16,
        0x0000,
        &[],
        timeout,
    )?;
    Ok(())
}

/// ### Interface Clear
///
/// Pulse the IFC line.
///
pub fn interface_clear(handle: &DeviceHandle<Context>, timeout: Duration) -> Result<()> {
    handle.write_control(
        usb::REQUEST_TYPE_OUT,
        bridge_requests::IFC,
        0x0000,
        0x0000,
        &[],
        timeout,
    )?;
    Ok(())
}

/// ### ATN Command
///
/// Put one command byte on the bus with ATN asserted.
///
pub fn atn_command(handle: &DeviceHandle<Context>, command: u8, timeout: Duration) -> Result<()> {
    handle.write_control(
        usb::REQUEST_TYPE_OUT,
        bridge_requests::ATN1,
        command as u16,
        0x0000,
        &[],
        timeout,
    )?;
    Ok(())
}

/// ### Service Request
///
/// Read the SRQ line. Returns `true` while a device requests service.
///
pub fn service_request(handle: &DeviceHandle<Context>, timeout: Duration) -> Result<bool> {
    Ok(read_byte(handle, bridge_requests::SRQ, timeout)? != 0)
}

/// ### Status
///
/// Read the status flags of the last talk or listen request. Zero means success.
///
pub fn status(handle: &DeviceHandle<Context>, timeout: Duration) -> Result<u8> {
    read_byte(handle, bridge_requests::STATUS, timeout)
}

/// ### Talk
///
/// Send one packed chunk of data bytes with ATN deasserted.
///
/// #### Arguments
/// - `handle` -> the device handle to the bridge
/// - `chunk` -> the data bytes and length/EOI field, already packed
/// - `timeout` -> the timeout to use for the request
///
pub fn talk(handle: &DeviceHandle<Context>, chunk: TalkChunk, timeout: Duration) -> Result<()> {
    handle.write_control(
        usb::REQUEST_TYPE_OUT,
        bridge_requests::TALK,
        chunk.value(),
        chunk.index(),
        &[],
        timeout,
    )?;
    Ok(())
}

/// ### Listen
///
/// Read data bytes from the current talker. The bridge stops early when the
/// talker asserts EOI, so a short read marks the end of a message.
///
/// #### Arguments
/// - `handle` -> the device handle to the bridge
/// - `max_len` -> the most bytes to read, capped at the bridge limit of 254
/// - `timeout` -> the timeout to use for the request
///
pub fn listen(
    handle: &DeviceHandle<Context>,
    max_len: usize,
    timeout: Duration,
) -> Result<Vec<u8>> {
    let mut buffer: Vec<u8> = vec![0x00; max_len.min(misc::LISTEN_CHUNK_SIZE)];

    let bytes_read = handle.read_control(
        usb::REQUEST_TYPE_IN,
        bridge_requests::LISTEN,
        0x0000,
        0x0000,
        &mut buffer,
        timeout,
    )?;
    buffer.truncate(bytes_read);

    Ok(buffer)
}

fn read_byte(handle: &DeviceHandle<Context>, request: u8, timeout: Duration) -> Result<u8> {
    let mut buffer: [u8; 0x0001] = [0x00; 0x0001];

    let bytes_read = handle.read_control(
        usb::REQUEST_TYPE_IN,
        request,
        0x0000,
        0x0000,
        &mut buffer,
        timeout,
    )?;
    if bytes_read != buffer.len() {
        return Err(Error::ShortRead.into());
    }

    Ok(buffer[0])
}
