// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accumulated energy counter.

use std::fmt;
use std::time::Duration;

/// Milliseconds in one hour.
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Energy accumulated by one device, in kWh.
///
/// The counter only grows as long as the power fed into it is non-negative.
/// It is persisted in the device's store between polls and never reset by
/// the drivers.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use emvue_drivers::types::EnergyCounter;
///
/// let counter = EnergyCounter::default().add_power(600.0, Duration::from_secs(60));
/// assert!((counter.kwh() - 0.01).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EnergyCounter(f64);

impl EnergyCounter {
    /// Creates a counter holding `kwh`.
    #[must_use]
    pub const fn new(kwh: f64) -> Self {
        Self(kwh)
    }

    /// Returns the accumulated energy in kWh.
    #[must_use]
    pub const fn kwh(&self) -> f64 {
        self.0
    }

    /// Energy contributed by `watts` sustained for `interval`, in kWh.
    ///
    /// For a 60 s interval this is `watts / 60_000`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn increment(watts: f64, interval: Duration) -> f64 {
        watts * interval.as_millis() as f64 / MS_PER_HOUR / 1000.0
    }

    /// Returns the counter after adding `watts` sustained for `interval`.
    #[must_use]
    pub fn add_power(self, watts: f64, interval: Duration) -> Self {
        Self(self.0 + Self::increment(watts, interval))
    }
}

impl fmt::Display for EnergyCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kWh", self.0)
    }
}
