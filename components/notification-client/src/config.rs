/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Provides configuration for the [NotificationClient](`crate::NotificationClient`)

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Path, relative to the backend URL, under which every notification endpoint lives.
pub(crate) const NOTIFICATION_PATH: &str = "custom/notification";

#[derive(Clone, Debug)]
pub struct NotificationClientConfig {
    /// Base URL of the backend, e.g. `https://api.example.com`
    pub url: String,

    /// Sent as the `applicationid` header when present
    pub app_id: Option<String>,

    /// URL-safe base64 VAPID public key handed to the platform on subscribe
    pub public_vapid_key: String,

    pub settings: ClientSettings,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSettings {
    /// Timeout for the entire request.
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl NotificationClientConfig {
    pub fn new(url: impl Into<String>, public_vapid_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            app_id: None,
            public_vapid_key: public_vapid_key.into(),
            settings: ClientSettings::default(),
        }
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Checked before anything touches the network.
    pub fn validate(&self) -> Result<()> {
        if self.public_vapid_key.trim().is_empty() {
            return Err(Error::MissingVapidKey);
        }
        Url::parse(&self.url)?;
        Ok(())
    }

    /// The URL of a single notification endpoint, e.g. `getUserNotifications`.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/{}/{}",
            self.url.trim_end_matches('/'),
            NOTIFICATION_PATH,
            endpoint
        ))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        assert_eq!(ClientSettings::default().timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let config = NotificationClientConfig::new("https://example.com", "");
        assert!(matches!(config.validate(), Err(Error::MissingVapidKey)));
        let config = NotificationClientConfig::new("https://example.com", "   ");
        assert!(matches!(config.validate(), Err(Error::MissingVapidKey)));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = NotificationClientConfig::new("not a url", "BKey");
        assert!(matches!(config.validate(), Err(Error::UrlParse(_))));
    }

    #[test]
    fn test_endpoint_url() {
        let config = NotificationClientConfig::new("https://example.com/", "BKey").with_app_id("app");
        assert_eq!(config.app_id.as_deref(), Some("app"));
        assert_eq!(
            config.endpoint_url("getUserNotifications").unwrap().as_str(),
            "https://example.com/custom/notification/getUserNotifications"
        );
        let config = NotificationClientConfig::new("http://localhost:1234/v1", "BKey");
        assert_eq!(
            config.endpoint_url("generateVAPIDKeys").unwrap().as_str(),
            "http://localhost:1234/v1/custom/notification/generateVAPIDKeys"
        );
    }
}
