// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the drivers, the pairing flow and the API contract.
//!
//! # Types
//!
//! - [`Credentials`] - Account username and password, compared for equality only
//! - [`DeviceIdentity`] - Remote address of one monitored point (name, group id, channel)
//! - [`UsageScale`] - Width of the usage window queried on each poll
//! - [`UsageReading`] / [`UsageSample`] - Raw and converted usage per device
//! - [`OutletState`] - On/off state reported for an outlet
//! - [`EnergyCounter`] - Accumulated energy in kWh
//! - [`Capability`] / [`CapabilityValue`] - Observable device attributes

mod capability;
mod credentials;
mod energy;
mod identity;
mod usage;

pub use capability::{Capability, CapabilityValue};
pub use credentials::Credentials;
pub use energy::EnergyCounter;
pub use identity::DeviceIdentity;
pub use usage::{OutletState, UsageReading, UsageSample, UsageScale};
