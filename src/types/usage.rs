// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Usage window and per-poll readings.

use std::fmt;
use std::time::Duration;

use super::DeviceIdentity;

/// Milliseconds in one hour.
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Width of the window the service aggregates usage over.
///
/// The drivers poll once per window, so the window width is also the timer
/// period.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use emvue_drivers::types::UsageScale;
///
/// let scale = UsageScale::default();
/// assert_eq!(scale.as_str(), "1MIN");
/// assert_eq!(scale.duration(), Duration::from_secs(60));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum UsageScale {
    /// One second.
    #[serde(rename = "1S")]
    OneSecond,
    /// One minute.
    #[default]
    #[serde(rename = "1MIN")]
    OneMinute,
    /// Fifteen minutes.
    #[serde(rename = "15MIN")]
    FifteenMinutes,
    /// One hour.
    #[serde(rename = "1H")]
    OneHour,
}

impl UsageScale {
    /// Returns the scale identifier understood by the service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneSecond => "1S",
            Self::OneMinute => "1MIN",
            Self::FifteenMinutes => "15MIN",
            Self::OneHour => "1H",
        }
    }

    /// Returns the window width.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        match self {
            Self::OneSecond => Duration::from_secs(1),
            Self::OneMinute => Duration::from_secs(60),
            Self::FifteenMinutes => Duration::from_secs(15 * 60),
            Self::OneHour => Duration::from_secs(60 * 60),
        }
    }

    /// Converts energy used over one window into the window's average power.
    ///
    /// `kwh * 1000 * 3_600_000 / window_ms`, i.e. `kwh * 60_000` for `1MIN`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_watts(&self, kwh: f64) -> f64 {
        let window_ms = self.duration().as_millis() as f64;
        kwh * MS_PER_HOUR / window_ms * 1000.0
    }
}

impl fmt::Display for UsageScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Usage reported by the service for one requested identity.
///
/// `usage` is the energy consumed over the window in kWh. The service leaves
/// it out (or sends garbage) when a device has not reported in time.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct UsageReading {
    /// Energy over the window in kWh, if reported.
    #[serde(default, deserialize_with = "lenient_number")]
    pub usage: Option<f64>,
}

impl UsageReading {
    /// Creates a reading with a reported value.
    #[must_use]
    pub fn new(kwh: f64) -> Self {
        Self { usage: Some(kwh) }
    }

    /// Creates a reading with no value.
    #[must_use]
    pub fn missing() -> Self {
        Self { usage: None }
    }

    /// Returns the usage if it is a finite number.
    #[must_use]
    pub fn kwh(&self) -> Option<f64> {
        self.usage.filter(|v| v.is_finite())
    }
}

/// Accepts any JSON value; anything other than a number becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Average power of one device over the last window.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSample {
    /// The device the sample belongs to.
    pub identity: DeviceIdentity,
    /// Average power over the window in watts.
    pub watts: f64,
}

impl UsageSample {
    /// Builds a sample from a raw reading, or `None` if the reading is not numeric.
    #[must_use]
    pub fn from_reading(
        identity: &DeviceIdentity,
        reading: &UsageReading,
        scale: UsageScale,
    ) -> Option<Self> {
        reading.kwh().map(|kwh| Self {
            identity: identity.clone(),
            watts: scale.average_watts(kwh),
        })
    }
}

/// On/off state of an outlet as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct OutletState {
    /// Whether the outlet relay is closed.
    pub on: bool,
}

impl From<bool> for OutletState {
    fn from(on: bool) -> Self {
        Self { on }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_minute_scale_converts_kwh_to_watts() {
        let watts = UsageScale::OneMinute.average_watts(0.01);
        assert!((watts - 600.0).abs() < 1e-9);
    }

    #[test]
    fn one_hour_scale_converts_kwh_to_watts() {
        let watts = UsageScale::OneHour.average_watts(1.5);
        assert!((watts - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn scale_serializes_as_service_identifier() {
        let json = serde_json::to_string(&UsageScale::FifteenMinutes).unwrap();
        assert_eq!(json, "\"15MIN\"");
    }

    #[test]
    fn reading_treats_non_numbers_as_missing() {
        let readings: Vec<UsageReading> =
            serde_json::from_str(r#"[{"usage":0.5},{"usage":null},{"usage":"n/a"},{}]"#).unwrap();
        assert_eq!(readings[0].kwh(), Some(0.5));
        assert_eq!(readings[1].kwh(), None);
        assert_eq!(readings[2].kwh(), None);
        assert_eq!(readings[3].kwh(), None);
    }

    #[test]
    fn reading_rejects_non_finite_values() {
        assert_eq!(UsageReading::new(f64::NAN).kwh(), None);
        assert_eq!(UsageReading::new(f64::INFINITY).kwh(), None);
    }

    #[test]
    fn sample_is_none_for_missing_reading() {
        let identity = DeviceIdentity::new("Kettle", 1, "1");
        let sample =
            UsageSample::from_reading(&identity, &UsageReading::missing(), UsageScale::OneMinute);
        assert!(sample.is_none());
    }
}
