// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pairing sessions.
//!
//! The hub's pairing UI drives a [`PairingSession`] with named requests:
//!
//! | Request        | Payload                  | Response                      |
//! |----------------|--------------------------|-------------------------------|
//! | `start`        | none                     | [`PairingStep`]               |
//! | `login`        | `{username, password}`   | `true` / `false`              |
//! | `list_devices` | none                     | array of [`PairingCandidate`] |
//!
//! A session starts unauthenticated. A successful `login` caches the
//! account's device listing and credentials; a failed one keeps whatever was
//! cached before. `list_devices` can be repeated and returns only devices
//! of the driver's kind.

mod candidate;

pub use candidate::{PairingCandidate, PairingStep};

use crate::api::{Connector, EnergyApi, RemoteDevice};
use crate::driver::Driver;
use crate::error::PairingError;
use crate::types::Credentials;

/// Request names understood by [`PairingSession::handle`].
pub mod request {
    /// Chooses between login and device listing.
    pub const START: &str = "start";
    /// Authenticates with a username and password.
    pub const LOGIN: &str = "login";
    /// Lists pairable devices.
    pub const LIST_DEVICES: &str = "list_devices";
}

#[derive(Debug)]
enum SessionState {
    NotAuthenticated,
    Authenticated {
        credentials: Credentials,
        devices: Vec<RemoteDevice>,
    },
}

/// One pairing session between the hub UI and a driver.
///
/// # Examples
///
/// ```no_run
/// use emvue_drivers::api::Connector;
/// use emvue_drivers::driver::{Driver, DriverConfig};
/// use emvue_drivers::types::Credentials;
///
/// # async fn example<C: Connector>(connector: C) -> emvue_drivers::Result<()> {
/// let driver = Driver::new(DriverConfig::outlet(), connector);
/// let mut session = driver.pairing_session();
///
/// if session.login(Credentials::new("me@example.com", "secret")).await {
///     for candidate in session.list_devices()? {
///         println!("{} -> {}", candidate.name, candidate.data);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PairingSession<C: Connector> {
    driver: Driver<C>,
    state: SessionState,
}

impl<C: Connector> PairingSession<C> {
    /// Creates an unauthenticated session for `driver`.
    #[must_use]
    pub fn new(driver: Driver<C>) -> Self {
        Self {
            driver,
            state: SessionState::NotAuthenticated,
        }
    }

    /// Returns true after a successful login or start.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    /// Returns the credentials of the authenticated account.
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        match &self.state {
            SessionState::Authenticated { credentials, .. } => Some(credentials),
            SessionState::NotAuthenticated => None,
        }
    }

    /// Decides whether the UI must ask for credentials.
    ///
    /// If the driver already has a live client, its account is reused and
    /// the session moves straight to device listing.
    pub async fn start(&mut self) -> PairingStep {
        let Some((api, credentials)) = self.driver.active_client().await else {
            return PairingStep::Login;
        };

        match api.get_devices().await {
            Ok(devices) => {
                tracing::debug!(
                    kind = %self.driver.kind(),
                    devices = devices.len(),
                    "Pairing reuses existing account"
                );
                self.state = SessionState::Authenticated {
                    credentials,
                    devices,
                };
                PairingStep::ListDevices
            }
            Err(e) => {
                tracing::warn!(kind = %self.driver.kind(), error = %e, "Failed to list devices");
                PairingStep::Login
            }
        }
    }

    /// Authenticates and caches the account's device listing.
    ///
    /// Returns `false` on any failure; the session keeps its previous state.
    pub async fn login(&mut self, credentials: Credentials) -> bool {
        let kind = self.driver.kind();

        let api = match self.driver.connector().connect(&credentials).await {
            Ok(api) => api,
            Err(e) => {
                tracing::warn!(%kind, username = credentials.username(), error = %e, "Login failed");
                return false;
            }
        };

        match api.get_devices().await {
            Ok(devices) => {
                tracing::info!(%kind, devices = devices.len(), "Login succeeded");
                self.state = SessionState::Authenticated {
                    credentials,
                    devices,
                };
                true
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "Failed to list devices after login");
                false
            }
        }
    }

    /// Returns one candidate per cached device of the driver's kind.
    ///
    /// # Errors
    ///
    /// Returns `PairingError::NotAuthenticated` before a successful login.
    pub fn list_devices(&self) -> Result<Vec<PairingCandidate>, PairingError> {
        let SessionState::Authenticated {
            credentials,
            devices,
        } = &self.state
        else {
            return Err(PairingError::NotAuthenticated);
        };

        let kind = self.driver.kind();
        Ok(devices
            .iter()
            .filter(|device| kind.manages(device.kind))
            .map(|device| PairingCandidate::new(device, credentials))
            .collect())
    }

    /// Serves a named request from the pairing UI.
    ///
    /// # Errors
    ///
    /// Returns `PairingError::UnknownRequest` for an unknown name,
    /// `PairingError::InvalidPayload` if the `login` payload cannot be
    /// decoded, and `PairingError::NotAuthenticated` for a premature
    /// `list_devices`.
    pub async fn handle(
        &mut self,
        name: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, PairingError> {
        tracing::debug!(kind = %self.driver.kind(), request = name, "Pairing request");

        match name {
            request::START => Ok(serde_json::to_value(self.start().await)?),
            request::LOGIN => {
                let credentials: Credentials = serde_json::from_value(payload)?;
                Ok(serde_json::Value::Bool(self.login(credentials).await))
            }
            request::LIST_DEVICES => Ok(serde_json::to_value(self.list_devices()?)?),
            other => Err(PairingError::UnknownRequest(other.to_string())),
        }
    }
}

impl<C: Connector> Driver<C> {
    /// Opens a pairing session for this driver.
    #[must_use]
    pub fn pairing_session(&self) -> PairingSession<C> {
        PairingSession::new(self.clone())
    }
}
