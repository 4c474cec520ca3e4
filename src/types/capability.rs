// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hub capabilities written by the drivers.

use std::fmt;

/// An observable attribute of a hub device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Instantaneous power in watts.
    MeasurePower,
    /// Relay state of a switchable outlet.
    #[serde(rename = "onoff")]
    OnOff,
    /// Cumulative energy in kWh.
    MeterPower,
}

impl Capability {
    /// Returns the hub's name for the capability.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MeasurePower => "measure_power",
            Self::OnOff => "onoff",
            Self::MeterPower => "meter_power",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value written to a capability.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum CapabilityValue {
    /// Numeric reading.
    Number(f64),
    /// Boolean state.
    Bool(bool),
}

impl CapabilityValue {
    /// Returns the numeric value, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Bool(_) => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for CapabilityValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CapabilityValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_hub_capabilities() {
        assert_eq!(Capability::MeasurePower.as_str(), "measure_power");
        assert_eq!(Capability::OnOff.as_str(), "onoff");
        assert_eq!(Capability::MeterPower.to_string(), "meter_power");
    }

    #[test]
    fn serde_names_match_as_str() {
        for cap in [
            Capability::MeasurePower,
            Capability::OnOff,
            Capability::MeterPower,
        ] {
            let json = serde_json::to_value(cap).unwrap();
            assert_eq!(json, serde_json::Value::from(cap.as_str()));
        }
    }

    #[test]
    fn value_accessors() {
        assert_eq!(CapabilityValue::from(12.5).as_f64(), Some(12.5));
        assert_eq!(CapabilityValue::from(true).as_bool(), Some(true));
        assert_eq!(CapabilityValue::from(true).as_f64(), None);
    }
}
