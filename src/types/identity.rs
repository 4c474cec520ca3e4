// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote addressing of a monitored point.

use std::fmt;

/// Identifies one monitored circuit or outlet at the energy service.
///
/// The identity is captured at pairing time and never changes afterwards.
/// Lists of identities are sent to the service on every poll, and the
/// service answers with results aligned to the same order.
///
/// # Examples
///
/// ```
/// use emvue_drivers::types::DeviceIdentity;
///
/// let identity = DeviceIdentity::new("Dryer", 48_213, "1,2,3");
/// assert_eq!(identity.group_id(), 48_213);
/// assert_eq!(identity.to_string(), "Dryer (48213/1,2,3)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DeviceIdentity {
    name: String,
    #[serde(rename = "groupId")]
    group_id: u64,
    channel: String,
}

impl DeviceIdentity {
    /// Creates a new identity.
    #[must_use]
    pub fn new(name: impl Into<String>, group_id: u64, channel: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group_id,
            channel: channel.into(),
        }
    }

    /// Returns the display name reported by the service.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device group id.
    #[must_use]
    pub fn group_id(&self) -> u64 {
        self.group_id
    }

    /// Returns the channel string (e.g. `1,2,3` for mains).
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.group_id, self.channel)
    }
}
