// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of polled power into device capability updates.

use std::time::Duration;

use crate::error::DeviceError;
use crate::record::DeviceRecord;
use crate::types::{Capability, EnergyCounter};

/// Store key holding the accumulated energy of a device.
pub const METER_STORE_KEY: &str = "accumulated_kwh";

/// Pushes one poll's results into a device record.
///
/// Every poll covers `interval`; the average power of that interval is
/// integrated into the device's [`EnergyCounter`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use emvue_drivers::driver::Accumulator;
/// use emvue_drivers::record::MemoryDevice;
/// use emvue_drivers::types::{Capability, Credentials, DeviceIdentity};
///
/// let device = MemoryDevice::new(
///     DeviceIdentity::new("Dryer", 1, "1"),
///     Credentials::new("user", "pass"),
/// )
/// .with_capability(Capability::MeterPower);
///
/// let accumulator = Accumulator::new(Duration::from_secs(60));
/// accumulator.update_usage(&device, 600.0).unwrap();
///
/// assert!((Accumulator::counter(&device).kwh() - 0.01).abs() < 1e-12);
/// assert!(device.is_available());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Accumulator {
    interval: Duration,
}

impl Accumulator {
    /// Creates an accumulator for polls spaced `interval` apart.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the counter persisted in the device store, or zero.
    #[must_use]
    pub fn counter(device: &dyn DeviceRecord) -> EnergyCounter {
        device
            .store_value(METER_STORE_KEY)
            .and_then(|value| value.as_f64())
            .map(EnergyCounter::new)
            .unwrap_or_default()
    }

    /// Publishes the interval's average power and, if the device meters
    /// energy, adds the interval's energy to its counter.
    ///
    /// # Errors
    ///
    /// Returns the first `DeviceError` raised by the record. The device is
    /// only marked available when every write succeeded.
    ///
    /// The stored counter is the source of truth for accumulated energy and
    /// is persisted before `meter_power` is published. If publishing fails,
    /// the energy is kept and the next successful update publishes the
    /// caught-up total.
    pub fn update_usage(&self, device: &dyn DeviceRecord, watts: f64) -> Result<(), DeviceError> {
        device.set_capability_value(Capability::MeasurePower, watts.into())?;

        if device.has_capability(Capability::MeterPower) {
            let counter = Self::counter(device).add_power(watts, self.interval);
            device.set_store_value(METER_STORE_KEY, serde_json::Value::from(counter.kwh()))?;
            device.set_capability_value(Capability::MeterPower, counter.kwh().into())?;
        }

        device.set_available()
    }

    /// Publishes the relay state of an outlet.
    ///
    /// # Errors
    ///
    /// Returns the first `DeviceError` raised by the record.
    pub fn update_on(&self, device: &dyn DeviceRecord, on: bool) -> Result<(), DeviceError> {
        device.set_capability_value(Capability::OnOff, on.into())?;
        device.set_available()
    }
}

/// Writes a zero counter if the device has never stored one.
pub(crate) fn ensure_counter(device: &dyn DeviceRecord) -> Result<(), DeviceError> {
    if device.store_value(METER_STORE_KEY).is_none() {
        device.set_store_value(METER_STORE_KEY, serde_json::Value::from(0.0))?;
    }
    Ok(())
}
