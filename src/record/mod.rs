// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hub device records.
//!
//! A [`DeviceRecord`] is the hub's persistent view of one paired device:
//! its remote identity, its settings (the account credentials), its
//! capabilities, a small key/value store and an availability flag. The hub
//! implements the trait; the drivers only read and write through it.
//!
//! [`MemoryDevice`] is a self-contained implementation for hosts that keep
//! device state in memory.
//!
//! # Examples
//!
//! ```
//! use emvue_drivers::record::{DeviceRecord, MemoryDevice};
//! use emvue_drivers::types::{Capability, Credentials, DeviceIdentity};
//!
//! let device = MemoryDevice::new(
//!     DeviceIdentity::new("Dryer", 48_213, "4"),
//!     Credentials::new("me@example.com", "secret"),
//! )
//! .with_capability(Capability::MeterPower);
//!
//! assert!(device.has_capability(Capability::MeterPower));
//! assert!(!device.is_available());
//! ```

mod device_id;
mod memory;

pub use device_id::DeviceId;
pub use memory::MemoryDevice;

use crate::error::DeviceError;
use crate::types::{Capability, CapabilityValue, Credentials, DeviceIdentity};

/// A paired device as known to the hub.
///
/// All methods are synchronous: the hub applies writes to its own state and
/// persists them on its own schedule. A write to a record that the hub has
/// already removed fails with [`DeviceError::Removed`].
pub trait DeviceRecord: Send + Sync {
    /// Returns the hub identifier of this record.
    fn id(&self) -> DeviceId;

    /// Returns the remote identity captured at pairing time.
    fn identity(&self) -> DeviceIdentity;

    /// Returns the account credentials stored in the device settings.
    fn credentials(&self) -> Credentials;

    /// Replaces the account credentials stored in the device settings.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the settings cannot be written.
    fn set_credentials(&self, credentials: &Credentials) -> Result<(), DeviceError>;

    /// Returns true if the device exposes `capability`.
    fn has_capability(&self, capability: Capability) -> bool;

    /// Adds `capability` to the device.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the capability cannot be added.
    fn add_capability(&self, capability: Capability) -> Result<(), DeviceError>;

    /// Publishes a new value for `capability`.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::MissingCapability` if the device does not expose
    /// `capability`, or another `DeviceError` if the write fails.
    fn set_capability_value(
        &self,
        capability: Capability,
        value: CapabilityValue,
    ) -> Result<(), DeviceError>;

    /// Reads a value from the device's durable store.
    fn store_value(&self, key: &str) -> Option<serde_json::Value>;

    /// Writes a value to the device's durable store.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the store rejects the write.
    fn set_store_value(&self, key: &str, value: serde_json::Value) -> Result<(), DeviceError>;

    /// Clears any "unreachable" flag on the device.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the flag cannot be written.
    fn set_available(&self) -> Result<(), DeviceError>;
}
