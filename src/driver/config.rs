// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Driver configuration types.

use std::fmt;
use std::time::Duration;

use crate::api::RemoteDeviceKind;
use crate::types::UsageScale;

/// The kind of device a driver manages.
///
/// Outlet and monitor devices are handled by separate driver instances,
/// each with its own API client and timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Switchable smart plugs. Polls outlet state in addition to usage.
    Outlet,
    /// Passive monitors. Polls usage only.
    Monitor,
}

impl DriverKind {
    /// Returns true if devices of `kind` can be paired with this driver.
    #[must_use]
    pub fn manages(&self, kind: RemoteDeviceKind) -> bool {
        matches!(
            (self, kind),
            (Self::Outlet, RemoteDeviceKind::Outlet) | (Self::Monitor, RemoteDeviceKind::Monitor)
        )
    }

    /// Returns true if the driver reads and writes relay state.
    #[must_use]
    pub fn switchable(&self) -> bool {
        matches!(self, Self::Outlet)
    }

    /// Returns a short lowercase name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Outlet => "outlet",
            Self::Monitor => "monitor",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a driver instance.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use emvue_drivers::driver::{DriverConfig, DriverKind};
/// use emvue_drivers::types::UsageScale;
///
/// let config = DriverConfig::outlet();
/// assert_eq!(config.kind, DriverKind::Outlet);
/// assert_eq!(config.poll_interval(), Duration::from_secs(60));
///
/// let config = DriverConfig::monitor().with_usage_scale(UsageScale::FifteenMinutes);
/// assert_eq!(config.poll_interval(), Duration::from_secs(900));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DriverConfig {
    /// The kind of device managed.
    pub kind: DriverKind,
    /// Usage window queried on every poll.
    #[serde(default)]
    pub usage_scale: UsageScale,
}

impl DriverConfig {
    /// Creates a configuration for `kind` with the default one-minute window.
    #[must_use]
    pub fn new(kind: DriverKind) -> Self {
        Self {
            kind,
            usage_scale: UsageScale::default(),
        }
    }

    /// Creates a configuration for an outlet driver.
    #[must_use]
    pub fn outlet() -> Self {
        Self::new(DriverKind::Outlet)
    }

    /// Creates a configuration for a monitor driver.
    #[must_use]
    pub fn monitor() -> Self {
        Self::new(DriverKind::Monitor)
    }

    /// Sets the usage window.
    #[must_use]
    pub fn with_usage_scale(mut self, scale: UsageScale) -> Self {
        self.usage_scale = scale;
        self
    }

    /// Returns the timer period, which equals the usage window.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.usage_scale.duration()
    }
}
