// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling driver: shared API client, timer and per-tick fan-out.

use std::sync::{Arc, Weak};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::api::{Connector, EnergyApi, OutletCommand};
use crate::error::Error;
use crate::record::{DeviceId, DeviceRecord};
use crate::types::{Credentials, DeviceIdentity, UsageSample};

use super::accumulator::Accumulator;
use super::config::{DriverConfig, DriverKind};

/// Polls the energy service for every active device of one kind.
///
/// A driver owns at most one live API client, built from the credentials of
/// the devices that use it, and one repeating timer. Devices join with
/// [`device_started`](Self::device_started) and leave with
/// [`device_stopped`](Self::device_stopped); when the last one leaves, the
/// timer stops and the client is dropped.
///
/// `Driver` is a cheap handle: clones share the same state.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use emvue_drivers::api::Connector;
/// use emvue_drivers::driver::{Driver, DriverConfig};
/// use emvue_drivers::record::MemoryDevice;
/// use emvue_drivers::types::{Credentials, DeviceIdentity};
///
/// # async fn example<C: Connector>(connector: C) {
/// let driver = Driver::new(DriverConfig::monitor(), connector);
///
/// let device = Arc::new(MemoryDevice::new(
///     DeviceIdentity::new("Mains", 48_213, "1,2,3"),
///     Credentials::new("me@example.com", "secret"),
/// ));
///
/// // Builds the client, starts the timer and polls once right away.
/// driver.device_started(device.clone()).await;
/// # }
/// ```
pub struct Driver<C: Connector> {
    inner: Arc<Inner<C>>,
}

struct Inner<C: Connector> {
    config: DriverConfig,
    connector: C,
    accumulator: Accumulator,
    /// Client and timer. Held across client construction.
    state: Mutex<PollingState<C::Api>>,
    /// Active devices in registration order; the order is the correlation
    /// key for index-aligned API responses.
    devices: parking_lot::RwLock<Vec<Arc<dyn DeviceRecord>>>,
    /// Held for the duration of one tick.
    tick_guard: Mutex<()>,
}

struct PollingState<A> {
    client: Option<ActiveClient<A>>,
    timer: Option<JoinHandle<()>>,
}

struct ActiveClient<A> {
    api: Arc<A>,
    credentials: Credentials,
}

impl<A> PollingState<A> {
    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn teardown(&mut self) {
        self.stop_timer();
        self.client = None;
    }
}

impl<C: Connector> Driver<C> {
    /// Creates a driver with no client and no active devices.
    #[must_use]
    pub fn new(config: DriverConfig, connector: C) -> Self {
        let accumulator = Accumulator::new(config.poll_interval());
        Self {
            inner: Arc::new(Inner {
                config,
                connector,
                accumulator,
                state: Mutex::new(PollingState {
                    client: None,
                    timer: None,
                }),
                devices: parking_lot::RwLock::new(Vec::new()),
                tick_guard: Mutex::new(()),
            }),
        }
    }

    /// Returns the kind of device this driver manages.
    #[must_use]
    pub fn kind(&self) -> DriverKind {
        self.inner.config.kind
    }

    /// Returns the driver configuration.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.inner.config
    }

    /// Returns the accumulator applied to every poll result.
    #[must_use]
    pub fn accumulator(&self) -> &Accumulator {
        &self.inner.accumulator
    }

    pub(crate) fn connector(&self) -> &C {
        &self.inner.connector
    }

    /// Returns the number of active devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.inner.devices.read().len()
    }

    /// Returns the ids of the active devices in registration order.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.inner.devices.read().iter().map(|d| d.id()).collect()
    }

    /// Returns true if a live API client exists.
    pub async fn is_connected(&self) -> bool {
        self.inner.state.lock().await.client.is_some()
    }

    /// Returns true if the repeating timer is running.
    pub async fn is_polling(&self) -> bool {
        self.inner
            .state
            .lock()
            .await
            .timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Returns the credentials the live client was built with.
    pub async fn active_credentials(&self) -> Option<Credentials> {
        self.inner
            .state
            .lock()
            .await
            .client
            .as_ref()
            .map(|client| client.credentials.clone())
    }

    /// Returns the live client and its credentials.
    pub(crate) async fn active_client(&self) -> Option<(Arc<C::Api>, Credentials)> {
        self.inner
            .state
            .lock()
            .await
            .client
            .as_ref()
            .map(|client| (Arc::clone(&client.api), client.credentials.clone()))
    }

    async fn client_api(&self) -> Option<Arc<C::Api>> {
        self.inner
            .state
            .lock()
            .await
            .client
            .as_ref()
            .map(|client| Arc::clone(&client.api))
    }

    // =========================================================================
    // Device Lifecycle
    // =========================================================================

    /// Activates a device and makes sure a matching client exists.
    ///
    /// The client is (re)built when there is none or when the device's
    /// credentials differ from the ones the client was built with. After a
    /// rebuild the credentials are copied to every other active device and
    /// the timer is restarted. One poll runs immediately either way.
    ///
    /// Returns `false` if the client could not be built. The failure is
    /// logged; the device stays registered and the next call retries.
    pub async fn device_started(&self, device: Arc<dyn DeviceRecord>) -> bool {
        let device_id = device.id();
        tracing::debug!(kind = %self.kind(), %device_id, "Device started");

        self.register(&device);
        let credentials = device.credentials();

        {
            let mut state = self.inner.state.lock().await;
            let current = state.client.as_ref().map(|client| &client.credentials);

            if current != Some(&credentials) {
                state.teardown();
                tracing::info!(
                    kind = %self.kind(),
                    username = credentials.username(),
                    "Connecting to energy service"
                );

                match self.inner.connector.connect(&credentials).await {
                    Ok(api) => {
                        state.client = Some(ActiveClient {
                            api: Arc::new(api),
                            credentials: credentials.clone(),
                        });
                        self.propagate_credentials(device_id, &credentials);
                        state.timer = Some(self.spawn_timer());
                    }
                    Err(e) => {
                        tracing::warn!(
                            kind = %self.kind(),
                            %device_id,
                            error = %e,
                            "Failed to connect to energy service"
                        );
                        return false;
                    }
                }
            }
        }

        self.tick().await;
        true
    }

    /// Deactivates a device.
    ///
    /// When no active device remains, the timer is stopped and the client
    /// dropped. Polls already in flight finish but their results are not
    /// applied to the removed device.
    pub async fn device_stopped(&self, device_id: DeviceId) {
        let remaining = self.unregister(device_id);
        tracing::debug!(kind = %self.kind(), %device_id, remaining, "Device stopped");

        if remaining == 0 {
            let mut state = self.inner.state.lock().await;
            // A device may have started while the lock was contended.
            if self.device_count() == 0 {
                state.teardown();
                tracing::info!(kind = %self.kind(), "No active devices, polling stopped");
            }
        }
    }

    /// Switches an outlet through the live client.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` if there is no client, or `Error::Api`
    /// if the service rejects the request.
    pub async fn set_outlet(&self, device: &dyn DeviceRecord, on: bool) -> Result<(), Error> {
        let group_id = device.identity().group_id();
        let api = self.client_api().await.ok_or(Error::NotConnected)?;

        tracing::debug!(kind = %self.kind(), group_id, on, "Switching outlet");
        api.update_outlet_state(OutletCommand { group_id, on })
            .await?;
        Ok(())
    }

    // =========================================================================
    // Polling
    // =========================================================================

    /// Polls the service once and applies the results to every active device.
    ///
    /// Waits for a tick that is already running to finish first. Does nothing
    /// without a client or without active devices. Failures are logged.
    pub async fn tick(&self) {
        let _guard = self.inner.tick_guard.lock().await;
        self.poll().await;
    }

    /// Timer entry point: skips the tick if the previous one is still running.
    async fn scheduled_tick(&self) {
        let Ok(_guard) = self.inner.tick_guard.try_lock() else {
            tracing::warn!(kind = %self.kind(), "Previous poll still running, skipping tick");
            return;
        };
        self.poll().await;
    }

    async fn poll(&self) {
        let Some(api) = self.client_api().await else {
            tracing::debug!(kind = %self.kind(), "No client, skipping poll");
            return;
        };

        let devices: Vec<Arc<dyn DeviceRecord>> = self.inner.devices.read().clone();
        if devices.is_empty() {
            return;
        }

        let identities: Vec<DeviceIdentity> = devices.iter().map(|d| d.identity()).collect();
        let scale = self.inner.config.usage_scale;

        tracing::debug!(kind = %self.kind(), devices = devices.len(), %scale, "Polling usage");
        let usage = match api.get_device_timed_usage(scale, &identities).await {
            Ok(usage) => usage,
            Err(e) => {
                tracing::warn!(kind = %self.kind(), error = %e, "Failed to fetch usage");
                return;
            }
        };
        if usage.len() != identities.len() {
            tracing::warn!(
                kind = %self.kind(),
                expected = identities.len(),
                received = usage.len(),
                "Usage response does not match request"
            );
        }

        let states = if self.kind().switchable() {
            match api.get_outlet_state(&identities).await {
                Ok(states) => states,
                Err(e) => {
                    tracing::warn!(kind = %self.kind(), error = %e, "Failed to fetch outlet state");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let accumulator = &self.inner.accumulator;
        let mut updated = 0usize;
        let mut skipped = 0usize;

        for (index, (device, identity)) in devices.iter().zip(&identities).enumerate() {
            let device_id = device.id();
            if !self.is_registered(device_id) {
                tracing::debug!(%device_id, "Device stopped during poll, dropping result");
                continue;
            }

            let sample = usage
                .get(index)
                .and_then(|reading| UsageSample::from_reading(identity, reading, scale));
            match sample {
                Some(sample) => match accumulator.update_usage(&**device, sample.watts) {
                    Ok(()) => updated += 1,
                    Err(e) => {
                        tracing::warn!(%device_id, error = %e, "Failed to update usage");
                    }
                },
                None => {
                    skipped += 1;
                    tracing::debug!(%device_id, %identity, "No numeric usage reported");
                }
            }

            if let Some(state) = states.get(index)
                && let Err(e) = accumulator.update_on(&**device, state.on)
            {
                tracing::warn!(%device_id, error = %e, "Failed to update outlet state");
            }
        }

        tracing::debug!(kind = %self.kind(), updated, skipped, "Poll complete");
    }

    fn spawn_timer(&self) -> JoinHandle<()> {
        let weak: Weak<Inner<C>> = Arc::downgrade(&self.inner);
        let period = self.inner.config.poll_interval();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                Driver { inner }.scheduled_tick().await;
            }
        })
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Adds the device, or replaces the record registered under the same id.
    fn register(&self, device: &Arc<dyn DeviceRecord>) {
        let device_id = device.id();
        let mut devices = self.inner.devices.write();
        match devices.iter_mut().find(|d| d.id() == device_id) {
            Some(slot) => *slot = Arc::clone(device),
            None => devices.push(Arc::clone(device)),
        }
    }

    /// Removes the device and returns the number still active.
    fn unregister(&self, device_id: DeviceId) -> usize {
        let mut devices = self.inner.devices.write();
        devices.retain(|d| d.id() != device_id);
        devices.len()
    }

    fn is_registered(&self, device_id: DeviceId) -> bool {
        self.inner.devices.read().iter().any(|d| d.id() == device_id)
    }

    /// Copies `credentials` to every other active device that differs.
    fn propagate_credentials(&self, source: DeviceId, credentials: &Credentials) {
        let devices: Vec<Arc<dyn DeviceRecord>> = self.inner.devices.read().clone();
        for device in devices {
            let device_id = device.id();
            if device_id == source || device.credentials() == *credentials {
                continue;
            }
            match device.set_credentials(credentials) {
                Ok(()) => tracing::debug!(%device_id, "Propagated account credentials"),
                Err(e) => {
                    tracing::warn!(%device_id, error = %e, "Failed to propagate credentials");
                }
            }
        }
    }
}

impl<C: Connector> Clone for Driver<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Connector> std::fmt::Debug for Driver<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("kind", &self.kind())
            .field("devices", &self.device_count())
            .finish_non_exhaustive()
    }
}

impl<C: Connector> Drop for Inner<C> {
    fn drop(&mut self) {
        self.state.get_mut().stop_timer();
    }
}
