// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `emvue_drivers` - Hub drivers for cloud-connected smart plugs and energy
//! monitors.
//!
//! The library implements the device-side logic of two hub drivers that
//! share one polling engine:
//!
//! - **Outlet driver**: smart plugs with a relay and power metering
//! - **Monitor driver**: passive panel-monitor circuits
//!
//! Each driver keeps one authenticated API client for all of its devices,
//! polls usage on a fixed interval, converts it into instantaneous power and
//! a cumulative energy counter, and guides the user through pairing.
//!
//! The network itself is out of scope: an adapter implements
//! [`api::Connector`] and [`api::EnergyApi`], and the hub implements
//! [`record::DeviceRecord`] for its device objects.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use emvue_drivers::api::Connector;
//! use emvue_drivers::driver::{Driver, DriverConfig};
//! use emvue_drivers::record::MemoryDevice;
//! use emvue_drivers::types::{Credentials, DeviceIdentity};
//!
//! # async fn example<C: Connector>(connector: C) -> emvue_drivers::Result<()> {
//! let driver = Driver::new(DriverConfig::outlet(), connector);
//!
//! // Pairing
//! let mut session = driver.pairing_session();
//! session.login(Credentials::new("me@example.com", "secret")).await;
//! let candidate = session.list_devices()?.remove(0);
//!
//! // Device added by the hub
//! let plug = Arc::new(MemoryDevice::new(candidate.data, candidate.settings));
//! driver.on_device_init(plug.clone()).await;
//!
//! // User toggles the relay
//! driver.set_outlet(&*plug, false).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod driver;
pub mod error;
pub mod pairing;
pub mod record;
pub mod types;

pub use driver::{Accumulator, Driver, DriverConfig, DriverKind};
pub use error::{ApiError, AuthError, DeviceError, Error, PairingError, Result};
pub use pairing::{PairingCandidate, PairingSession, PairingStep};
pub use record::{DeviceId, DeviceRecord, MemoryDevice};
pub use types::{Capability, Credentials, DeviceIdentity, EnergyCounter, UsageScale};
