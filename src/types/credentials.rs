// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Account credentials for the energy service.

use std::fmt;

/// Username and password of an energy service account.
///
/// Credentials are opaque: the drivers only compare them for equality to
/// decide whether the shared API client has to be rebuilt. The `Debug`
/// output never contains the password.
///
/// # Examples
///
/// ```
/// use emvue_drivers::types::Credentials;
///
/// let a = Credentials::new("me@example.com", "hunter2");
/// let b = Credentials::new("me@example.com", "hunter2");
/// assert_eq!(a, b);
/// assert!(!format!("{a:?}").contains("hunter2"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
