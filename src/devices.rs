use std::collections::HashMap;

use thiserror::Error;

use crate::config::DeviceConfig;
use crate::cutout::{Cutout, Cutouts, CUTOUT_NAMES};

/// A device that survived validation: its LED strip, the band it samples from
/// and where its channels start in the DMX universe. Immutable after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceBinding {
    pub name: String,
    pub cutout_name: String,
    pub cutout: Cutout,
    pub leds: usize,
    pub channel: u16,
}

#[derive(Debug, Error)]
pub enum BindingError {
    #[error(
        "device '{device}' references unknown cutout '{cutout}', available cutouts are: {}",
        CUTOUT_NAMES.join(", ")
    )]
    UnknownCutout { device: String, cutout: String },
    #[error("device '{device}' must have at least one LED")]
    NoLeds { device: String },
    #[error("no usable devices, perhaps none of them have a cutout assigned?")]
    NoUsableDevices,
}

/// Two-tier policy: a device without a cutout key is skipped with a warning,
/// a device naming a cutout that does not exist aborts startup. An empty
/// result also aborts. Devices are walked in name order to keep messages
/// deterministic.
pub fn validate_bindings(
    devices: &HashMap<String, DeviceConfig>,
    cutouts: &Cutouts,
) -> Result<Vec<DeviceBinding>, BindingError> {
    let mut names: Vec<&String> = devices.keys().collect();
    names.sort();

    let mut bindings = Vec::new();
    for name in names {
        let device = &devices[name];

        let cutout_name = match device.cutout.as_deref() {
            Some(cutout_name) => cutout_name,
            None => {
                log::warn!("Device '{}' has no cutout assigned, skipping it", name);
                continue;
            }
        };

        let cutout = match cutouts.get(cutout_name) {
            Some(cutout) => cutout,
            None => {
                return Err(BindingError::UnknownCutout {
                    device: name.clone(),
                    cutout: cutout_name.to_string(),
                })
            }
        };

        if device.leds == 0 {
            return Err(BindingError::NoLeds {
                device: name.clone(),
            });
        }

        bindings.push(DeviceBinding {
            name: name.clone(),
            cutout_name: cutout_name.to_string(),
            cutout,
            leds: device.leds,
            channel: device.channel,
        });
    }

    if bindings.is_empty() {
        return Err(BindingError::NoUsableDevices);
    }

    Ok(bindings)
}
