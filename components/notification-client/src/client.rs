/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Main entrypoint for the component: owns the current user's notification
//! state and keeps it consistent with the backend after every mutation.
//!
//! The client holds two inputs that have to agree with each other: the local
//! push handle issued by the platform, and the list of web-push records the
//! backend knows for this user. The *active* subscription is the backend
//! record whose endpoint matches the local handle; it is recomputed every
//! time either input changes.
//!
//! Mutations take `&mut self`, so at most one is in flight per client.

use crate::api::{HttpNotificationApi, NotificationApi};
use crate::config::NotificationClientConfig;
use crate::environment::{EnvironmentInfo, PlatformInfo};
use crate::error::{handle_error, Result};
use crate::models::{
    PushSubscription, Session, Tags, User, UserEmail, UserNotifications, UserSubscription,
    VapidKeys, WebPushPayload,
};
use crate::registrar::{decode_application_server_key, PushRegistrar, SubscribeOptions};
use crate::tags::{add_tags, delete_tags};

/// Local view of the user's notification records.
#[derive(Clone, Debug, Default)]
pub struct NotificationState {
    session: Session,
    local_subscription: Option<PushSubscription>,
    subscriptions: Vec<UserSubscription>,
    active_subscription: Option<UserSubscription>,
    email: Option<UserEmail>,
}

impl NotificationState {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn local_subscription(&self) -> Option<&PushSubscription> {
        self.local_subscription.as_ref()
    }

    pub fn subscriptions(&self) -> &[UserSubscription] {
        &self.subscriptions
    }

    pub fn active_subscription(&self) -> Option<&UserSubscription> {
        self.active_subscription.as_ref()
    }

    pub fn email(&self) -> Option<&UserEmail> {
        self.email.as_ref()
    }

    fn set_local_subscription(&mut self, subscription: Option<PushSubscription>) {
        self.local_subscription = subscription;
        self.reconcile();
    }

    fn apply_notifications(&mut self, notifications: UserNotifications) {
        self.email = notifications.email;
        self.subscriptions = notifications.web_pushes;
        self.reconcile();
    }

    /// Recompute the active subscription from the list and the local handle.
    fn reconcile(&mut self) {
        self.active_subscription = self.local_subscription.as_ref().and_then(|local| {
            self.subscriptions
                .iter()
                .find(|us| us.subscription.endpoint == local.endpoint)
                .cloned()
        });
        log::debug!(
            "reconciled {} subscription(s), active: {:?}",
            self.subscriptions.len(),
            self.active_subscription.as_ref().map(|us| &us.id)
        );
    }

    /// Make `record` the active subscription, replacing any entry with the same id.
    fn adopt_web_push(&mut self, record: UserSubscription) {
        self.subscriptions.retain(|us| us.id != record.id);
        self.subscriptions.push(record.clone());
        self.active_subscription = Some(record);
    }

    fn remove_web_push(&mut self, id: &str) {
        self.subscriptions.retain(|us| us.id != id);
        self.active_subscription = None;
    }
}

pub struct NotificationClient<A, R> {
    api: A,
    registrar: R,
    application_server_key: Vec<u8>,
    environment: EnvironmentInfo,
    state: NotificationState,
}

impl<R: PushRegistrar> NotificationClient<HttpNotificationApi, R> {
    /// Build a client talking HTTP to the backend named in `config`.
    pub fn connect(
        config: NotificationClientConfig,
        registrar: R,
        platform: &PlatformInfo,
    ) -> Result<Self> {
        config.validate()?;
        let api = HttpNotificationApi::new(config.clone())?;
        Self::new(&config, api, registrar, platform)
    }
}

impl<A: NotificationApi, R: PushRegistrar> NotificationClient<A, R> {
    /// Fails fast, without touching the network, when the VAPID key is
    /// missing or not URL-safe base64.
    pub fn new(
        config: &NotificationClientConfig,
        api: A,
        registrar: R,
        platform: &PlatformInfo,
    ) -> Result<Self> {
        config.validate()?;
        let application_server_key = decode_application_server_key(&config.public_vapid_key)?;
        Ok(Self {
            api,
            registrar,
            application_server_key,
            environment: EnvironmentInfo::detect(platform),
            state: NotificationState::default(),
        })
    }

    /// Acquire the local push handle, then fetch the backend records and
    /// reconcile the two.
    pub async fn initialize(&mut self) {
        self.acquire_local_subscription().await;
        self.refresh_notifications().await;
    }

    /// Ask the platform for a push subscription. A failure is logged and
    /// leaves the client without a handle.
    pub async fn acquire_local_subscription(&mut self) -> Option<&PushSubscription> {
        let options = SubscribeOptions {
            user_visible_only: true,
            application_server_key: self.application_server_key.clone(),
        };
        let subscription =
            handle_error("push registration", self.registrar.subscribe(options).await).flatten();
        match &subscription {
            Some(s) => log::info!("acquired local push subscription for {}", s.endpoint),
            None => log::info!("no local push subscription available"),
        }
        self.state.set_local_subscription(subscription);
        self.state.local_subscription()
    }

    /// Replace the local handle, e.g. after the platform rotated it.
    pub fn set_local_subscription(&mut self, subscription: Option<PushSubscription>) {
        self.state.set_local_subscription(subscription);
    }

    /// Reload the email record and web-push list from the backend.
    pub async fn refresh_notifications(&mut self) {
        let notifications = self
            .api
            .fetch_user_notifications(&self.state.session)
            .await;
        self.state.apply_notifications(notifications);
    }

    /// Does not refetch; call [`Self::refresh_notifications`] after logging in.
    pub fn set_access_token(&mut self, access_token: Option<String>) {
        self.state.session.access_token = access_token;
    }

    pub fn set_current_user(&mut self, user: Option<User>) {
        self.state.session.current_user = user;
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.state.session
    }

    pub fn current_subscription(&self) -> Option<&PushSubscription> {
        self.state.local_subscription()
    }

    pub fn is_ready_for_web_push(&self) -> bool {
        self.state.local_subscription.is_some()
    }

    pub fn environment(&self) -> &EnvironmentInfo {
        &self.environment
    }

    pub fn user_email_notification(&self) -> Option<&UserEmail> {
        self.state.email()
    }

    /// The active subscription.
    pub fn user_subscription(&self) -> Option<&UserSubscription> {
        self.state.active_subscription()
    }

    pub fn user_subscriptions(&self) -> &[UserSubscription] {
        self.state.subscriptions()
    }

    pub fn email_tags(&self) -> Tags {
        self.state
            .email
            .as_ref()
            .and_then(|e| e.tags.clone())
            .unwrap_or_default()
    }

    pub fn web_push_tags(&self) -> Tags {
        self.state
            .active_subscription
            .as_ref()
            .and_then(|s| s.tags.clone())
            .unwrap_or_default()
    }

    pub async fn generate_vapid_keys(&self) -> Option<VapidKeys> {
        handle_error("generate_vapid_keys", self.api.generate_vapid_keys().await)
    }

    /// Register the local handle with the backend. Returns the existing
    /// active subscription without a network call if there is one.
    pub async fn create_web_push(&mut self, tags: Tags) -> Option<UserSubscription> {
        let local = self.state.local_subscription.clone()?;
        if let Some(active) = &self.state.active_subscription {
            return Some(active.clone());
        }
        let payload = WebPushPayload {
            subscription: local,
            environment_info: self.environment.clone(),
            tags,
        };
        let result = self
            .api
            .create_web_push_subscription(&self.state.session, &payload)
            .await;
        let created = handle_error("create_web_push", result)?;
        log::info!("created web push subscription {}", created.id);
        self.state.adopt_web_push(created.clone());
        Some(created)
    }

    /// Returns the deleted id.
    pub async fn delete_web_push(&mut self) -> Option<String> {
        let id = self.state.active_subscription.as_ref()?.id.clone();
        let result = self
            .api
            .delete_web_push_subscription(&self.state.session, &id)
            .await;
        let deleted = handle_error("delete_web_push", result)?;
        log::info!("deleted web push subscription {}", deleted);
        self.state.remove_web_push(&deleted);
        Some(deleted)
    }

    /// Overwrite all tags of the active subscription.
    pub async fn replace_web_push_tags(&mut self, tags: Tags) -> Option<UserSubscription> {
        self.update_web_push_tags("replace_web_push_tags", |_| tags)
            .await
    }

    pub async fn add_web_push_tags(&mut self, to_add: Tags) -> Option<UserSubscription> {
        self.update_web_push_tags("add_web_push_tags", |current| add_tags(current, &to_add))
            .await
    }

    /// Drops the tags whose key *and* value match an entry of `to_delete`.
    pub async fn delete_web_push_tags(&mut self, to_delete: Tags) -> Option<UserSubscription> {
        self.update_web_push_tags("delete_web_push_tags", |current| {
            delete_tags(current, &to_delete)
        })
        .await
    }

    async fn update_web_push_tags(
        &mut self,
        operation: &str,
        compute: impl FnOnce(&Tags) -> Tags,
    ) -> Option<UserSubscription> {
        let active = self.state.active_subscription.as_ref()?;
        let id = active.id.clone();
        let tags = compute(&active.tags.clone().unwrap_or_default());
        let result = self
            .api
            .replace_web_push_tags(&self.state.session, &id, &tags)
            .await;
        let updated = handle_error(operation, result)?;
        self.state.adopt_web_push(updated.clone());
        Some(updated)
    }

    /// Subscribe the current user's email. Returns the existing record
    /// without a network call if there is one.
    pub async fn create_email(&mut self, tags: Tags) -> Option<UserEmail> {
        if let Some(email) = &self.state.email {
            return Some(email.clone());
        }
        let result = self
            .api
            .create_email_subscription(&self.state.session, &tags)
            .await;
        let created = handle_error("create_email", result)?;
        log::info!("created email subscription {}", created.id);
        self.state.email = Some(created.clone());
        Some(created)
    }

    /// Returns the deleted id.
    pub async fn delete_email(&mut self) -> Option<String> {
        let id = self.state.email.as_ref()?.id.clone();
        let result = self
            .api
            .delete_email_subscription(&self.state.session, &id)
            .await;
        let deleted = handle_error("delete_email", result)?;
        log::info!("deleted email subscription {}", deleted);
        self.state.email = None;
        Some(deleted)
    }

    /// Overwrite all tags of the email record.
    pub async fn replace_email_tags(&mut self, tags: Tags) -> Option<UserEmail> {
        self.update_email_tags("replace_email_tags", |_| tags).await
    }

    pub async fn add_email_tags(&mut self, to_add: Tags) -> Option<UserEmail> {
        self.update_email_tags("add_email_tags", |current| add_tags(current, &to_add))
            .await
    }

    /// Drops the tags whose key *and* value match an entry of `to_delete`.
    pub async fn delete_email_tags(&mut self, to_delete: Tags) -> Option<UserEmail> {
        self.update_email_tags("delete_email_tags", |current| {
            delete_tags(current, &to_delete)
        })
        .await
    }

    async fn update_email_tags(
        &mut self,
        operation: &str,
        compute: impl FnOnce(&Tags) -> Tags,
    ) -> Option<UserEmail> {
        let email = self.state.email.as_ref()?;
        let id = email.id.clone();
        let tags = compute(&email.tags.clone().unwrap_or_default());
        let result = self
            .api
            .replace_email_tags(&self.state.session, &id, &tags)
            .await;
        let updated = handle_error(operation, result)?;
        self.state.email = Some(updated.clone());
        Some(updated)
    }
}
