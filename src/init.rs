//! ## Initialization
//!
//! A set of functions to help find and open a bridge.
//!

use crate::{
    constants::usb::*,
    error::Error,
    types::{DeviceAddr, DeviceId, DeviceInfo},
    DeviceFilter,
};

use anyhow::Result;
use rusb::{Device, DeviceDescriptor, DeviceHandle, UsbContext};

/// Get first found Ful488 bridge
impl DeviceFilter for () {
    fn apply_filter<T: UsbContext>(
        &self,
        _device: &Device<T>,
        device_desc: &DeviceDescriptor,
    ) -> bool {
        is_ful488(device_desc)
    }
}

/// Get bridge by USB device address
impl DeviceFilter for DeviceAddr {
    fn apply_filter<T: UsbContext>(
        &self,
        device: &Device<T>,
        device_desc: &DeviceDescriptor,
    ) -> bool {
        is_ful488(device_desc) && self.bus == device.bus_number() && self.device == device.address()
    }
}

/// Get bridge by USB device address (bus, address)
impl DeviceFilter for (u8, u8) {
    fn apply_filter<T: UsbContext>(
        &self,
        device: &Device<T>,
        device_desc: &DeviceDescriptor,
    ) -> bool {
        DeviceAddr {
            bus: self.0,
            device: self.1,
        }
        .apply_filter(device, device_desc)
    }
}

/// Get bridge by USB identifiers, for boards flashed with other ids
impl DeviceFilter for DeviceId {
    fn apply_filter<T: UsbContext>(
        &self,
        _device: &Device<T>,
        device_desc: &DeviceDescriptor,
    ) -> bool {
        self.vendor_id == device_desc.vendor_id() && self.product_id == device_desc.product_id()
    }
}

/// Get bridge by USB identifiers (idVendor, idProduct)
impl DeviceFilter for (u16, u16) {
    fn apply_filter<T: UsbContext>(
        &self,
        device: &Device<T>,
        device_desc: &DeviceDescriptor,
    ) -> bool {
        DeviceId {
            vendor_id: self.0,
            product_id: self.1,
        }
        .apply_filter(device, device_desc)
    }
}

/// Get bridge by info (both USB identifiers and address)
impl DeviceFilter for DeviceInfo {
    fn apply_filter<T: UsbContext>(
        &self,
        device: &Device<T>,
        device_desc: &DeviceDescriptor,
    ) -> bool {
        self.id.apply_filter(device, device_desc)
            && self.address.bus == device.bus_number()
            && self.address.device == device.address()
    }
}

/// Allow apply filter by reference
impl<T: DeviceFilter> DeviceFilter for &T {
    fn apply_filter<X: UsbContext>(
        &self,
        device: &Device<X>,
        device_desc: &DeviceDescriptor,
    ) -> bool {
        (**self).apply_filter(device, device_desc)
    }
}

fn is_ful488(device_desc: &DeviceDescriptor) -> bool {
    device_desc.vendor_id() == FUL488_VENDOR_ID && device_desc.product_id() == FUL488_PRODUCT_ID
}

/// ### List Devices
///
/// List all Ful488 bridges using a libusb context.
///
pub fn list_devices<T: UsbContext>(context: &mut T) -> Result<Vec<DeviceInfo>> {
    Ok(context
        .devices()?
        .iter()
        .filter_map(|device| {
            let device_desc = device.device_descriptor().ok()?;
            if is_ful488(&device_desc) {
                Some(DeviceInfo {
                    id: DeviceId {
                        vendor_id: device_desc.vendor_id(),
                        product_id: device_desc.product_id(),
                    },
                    address: DeviceAddr {
                        bus: device.bus_number(),
                        device: device.address(),
                    },
                })
            } else {
                None
            }
        })
        .collect())
}

/// ### Open Device
///
/// Open the first device accepted by `filter`.
///
pub fn open_device<T: UsbContext>(
    context: &mut T,
    filter: impl DeviceFilter,
) -> Result<DeviceHandle<T>> {
    // list the devices
    let devices = context.devices()?;

    // find the one device we want and open it
    for device in devices.iter() {
        if let Ok(device_desc) = device.device_descriptor() {
            if filter.apply_filter(&device, &device_desc) {
                match device.open() {
                    Ok(handle) => {
                        log::debug!(
                            "opened bridge {:04x}:{:04x} at bus {} device {}",
                            device_desc.vendor_id(),
                            device_desc.product_id(),
                            device.bus_number(),
                            device.address()
                        );
                        return Ok(handle);
                    }
                    Err(e) => log::warn!(
                        "failed to open bridge at bus {} device {}: {}",
                        device.bus_number(),
                        device.address(),
                        e
                    ),
                }
            }
        }
    }

    Err(Error::DeviceNotFound.into())
}

/// ### Configure
///
/// Select the bridge configuration. The device may already be configured (or
/// owned by the OS in that configuration), so a failure is only logged.
///
pub fn configure<T: UsbContext>(handle: &mut DeviceHandle<T>) {
    if let Err(e) = handle.set_active_configuration(FUL488_CONFIGURATION) {
        log::warn!("failed to set bridge configuration: {}", e);
    }
}
