/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The seam to the platform's push registration (the service worker's
//! `pushManager` in a browser). The client asks it once for a subscription and
//! only uses the result to match against backend records.

use async_trait::async_trait;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, Engine, GeneralPurpose, GeneralPurposeConfig};

use crate::error::Result;
use crate::models::PushSubscription;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscribeOptions {
    pub user_visible_only: bool,
    /// Decoded VAPID public key
    pub application_server_key: Vec<u8>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushRegistrar: Send + Sync {
    /// Subscribe with the platform push service.
    ///
    /// Returns `Ok(None)` when the platform has no service worker support.
    async fn subscribe(&self, options: SubscribeOptions) -> Result<Option<PushSubscription>>;
}

/// URL-safe alphabet, padding optional, lenient about trailing bits.
const VAPID_KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes a URL-safe base64 VAPID key, with or without padding, to raw bytes.
pub fn decode_application_server_key(key: &str) -> Result<Vec<u8>> {
    Ok(VAPID_KEY_ENGINE.decode(key.trim())?)
}
