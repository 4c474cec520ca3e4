// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pairing responses.

use crate::api::RemoteDevice;
use crate::types::{Credentials, DeviceIdentity};

/// A device the user can pair.
///
/// `data` becomes the record's immutable identity and `settings` its stored
/// credentials, so every paired device can authenticate on its own.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PairingCandidate {
    /// Name shown in the pairing list.
    pub name: String,
    /// Identity used to address the device at the service.
    pub data: DeviceIdentity,
    /// Account credentials for the device settings.
    pub settings: Credentials,
}

impl PairingCandidate {
    /// Builds the candidate for a listed remote device.
    #[must_use]
    pub fn new(device: &RemoteDevice, credentials: &Credentials) -> Self {
        Self {
            name: device.name.clone(),
            data: device.identity(),
            settings: credentials.clone(),
        }
    }
}

/// Next screen of the pairing UI after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStep {
    /// Ask the user for credentials.
    Login,
    /// Show the device list right away.
    ListDevices,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RemoteDeviceKind;

    #[test]
    fn candidate_serializes_for_pairing_ui() {
        let device = RemoteDevice {
            name: "Desk Plug".to_string(),
            group_id: 991,
            channel: "1,2,3".to_string(),
            kind: RemoteDeviceKind::Outlet,
        };
        let candidate = PairingCandidate::new(&device, &Credentials::new("user", "pass"));

        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Desk Plug",
                "data": { "name": "Desk Plug", "groupId": 991, "channel": "1,2,3" },
                "settings": { "username": "user", "password": "pass" }
            })
        );
    }

    #[test]
    fn step_serializes_in_snake_case() {
        assert_eq!(
            serde_json::to_value(PairingStep::ListDevices).unwrap(),
            serde_json::json!("list_devices")
        );
    }
}
