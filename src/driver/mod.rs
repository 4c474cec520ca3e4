// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet and monitor drivers.
//!
//! A [`Driver`] manages every paired device of one [`DriverKind`]. It keeps
//! a single API client for all of them and polls the energy service on a
//! fixed interval:
//!
//! 1. The first device to start builds the client from its credentials and
//!    starts the timer.
//! 2. Each tick sends the identities of all active devices to the service,
//!    in registration order, and receives index-aligned usage (and, for
//!    outlets, relay state).
//! 3. The [`Accumulator`] turns each usage reading into a power reading and
//!    an energy increment on the matching device record.
//! 4. When the last device stops, the timer stops and the client is dropped.
//!
//! A device whose credentials differ from the client's triggers a rebuild,
//! and the new credentials are copied to its siblings so the whole driver
//! keeps sharing one account.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use emvue_drivers::api::Connector;
//! use emvue_drivers::driver::{Driver, DriverConfig};
//! use emvue_drivers::record::{DeviceRecord, MemoryDevice};
//! use emvue_drivers::types::{Credentials, DeviceIdentity};
//!
//! # async fn example<C: Connector>(connector: C) {
//! let driver = Driver::new(DriverConfig::outlet(), connector);
//!
//! let plug = Arc::new(MemoryDevice::new(
//!     DeviceIdentity::new("Desk Plug", 991, "1,2,3"),
//!     Credentials::new("me@example.com", "secret"),
//! ));
//!
//! driver.on_device_init(plug.clone()).await;
//! driver.on_onoff_changed(&*plug, false).await;
//! driver.on_device_deleted(plug.id()).await;
//! # }
//! ```

mod accumulator;
mod config;
mod lifecycle;
mod polling;

pub use accumulator::{Accumulator, METER_STORE_KEY};
pub use config::{DriverConfig, DriverKind};
pub use polling::Driver;
