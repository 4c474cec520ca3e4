// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the driver library.
//!
//! Failures are split by where they originate: authenticating against the
//! energy service, calling the service once authenticated, writing to a hub
//! device record, and driving a pairing session.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Authenticating against the energy service failed.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A call to the energy service failed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// A hub device record rejected an operation.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// A pairing session request could not be served.
    #[error("pairing error: {0}")]
    Pairing(#[from] PairingError),

    /// The driver has no live API client.
    #[error("driver is not connected to the energy service")]
    NotConnected,
}

/// Errors raised while constructing an API client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The service rejected the username or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The authentication endpoint could not be reached.
    #[error("authentication service unreachable: {0}")]
    Unreachable(String),
}

/// Errors raised by calls on a live API client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be completed.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with something that could not be interpreted.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Errors raised by a hub device record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The record's durable storage rejected a write.
    #[error("storage failure: {0}")]
    Storage(String),

    /// The record does not expose the capability that was written.
    #[error("device has no {capability} capability")]
    MissingCapability {
        /// Name of the missing capability.
        capability: String,
    },

    /// The record has been removed from the hub.
    #[error("device has been removed")]
    Removed,
}

/// Errors related to pairing sessions.
#[derive(Debug, Error)]
pub enum PairingError {
    /// Device listing was requested before a successful login.
    #[error("session is not authenticated")]
    NotAuthenticated,

    /// The session received a request name it has no handler for.
    #[error("unknown pairing request: {0}")]
    UnknownRequest(String),

    /// The request payload did not match the expected shape.
    #[error("invalid pairing payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
