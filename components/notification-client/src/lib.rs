/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Notification client
//!
//! Manages a signed-in user's notification preferences against a backend
//! notification service: one optional email subscription and any number of
//! web-push subscriptions, each carrying free-form tags.
//!
//! The [`NotificationClient`] owns the local state. It asks a
//! [`PushRegistrar`] for the platform's push handle, fetches what the backend
//! knows through a [`NotificationApi`], and marks the backend record whose
//! endpoint matches the local handle as the active subscription.
//!
//! Mutating calls return `None` on failure; the error itself is logged.

mod api;
mod client;
mod config;
mod environment;
mod error;
mod models;
mod registrar;
mod tags;

#[cfg(test)]
mod test_utils;

pub use api::{HttpNotificationApi, NotificationApi};
pub use client::{NotificationClient, NotificationState};
pub use config::{ClientSettings, NotificationClientConfig};
pub use environment::{parse_version_string, Browser, EnvironmentInfo, PlatformInfo};
pub use error::{check_http_status_for_error, Error, HttpError, Result};
pub use models::{
    PushSubscription, Session, SubscriptionKeys, TagValue, Tags, User, UserEmail,
    UserNotifications, UserSubscription, VapidKeys, WebPushPayload,
};
pub use registrar::{decode_application_server_key, PushRegistrar, SubscribeOptions};
pub use tags::{add_tags, delete_tags};
