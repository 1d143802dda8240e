use serde::Serialize;

use crate::{core::reading::Reading, prelude::*};

/// Device identity, last known value wins.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeviceMetadata {
    pub manufacturer: String,
    pub model: String,
    pub firmware: String,
    pub serial_number: Option<String>,
}

impl Default for DeviceMetadata {
    fn default() -> Self {
        Self {
            manufacturer: "Solutronic".to_owned(),
            model: "Unknown model".to_owned(),
            firmware: "Unknown".to_owned(),
            serial_number: None,
        }
    }
}

impl DeviceMetadata {
    /// Overwrite the fields which have been extracted this time.
    pub fn merge(&mut self, partial: PartialMetadata) {
        if let Some(manufacturer) = partial.manufacturer {
            self.manufacturer = manufacturer;
        }
        if let Some(model) = partial.model {
            self.model = model;
        }
        if let Some(firmware) = partial.firmware {
            self.firmware = firmware;
        }
    }

    /// Update the serial number from the `SN` reading.
    pub fn set_serial_number(&mut self, reading: &Reading) {
        let serial_number = match reading {
            #[expect(clippy::cast_possible_truncation)]
            Reading::Number(number) if number.fract().abs() < f64::EPSILON => {
                format!("{}", *number as i64)
            }
            Reading::Number(number) => number.to_string(),
            Reading::Text(text) => text.trim().to_owned(),
        };
        if self.serial_number.as_deref() != Some(serial_number.as_str()) {
            info!(serial_number, "serial number");
            self.serial_number = Some(serial_number);
        }
    }
}

/// Whatever could be extracted from a single page.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialMetadata {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub firmware: Option<String>,
}
