/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Server Communications.
//!
//! Each operation maps to exactly one request against
//! `<url>/custom/notification`. The transport never panics: every failure
//! comes back as an `Err`, except for [`NotificationApi::fetch_user_notifications`]
//! which degrades to an empty result.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::NotificationClientConfig;
use crate::error::{check_http_status_for_error, Result};
use crate::models::{
    EmailPayload, IdPayload, Session, Tags, TagsPayload, UserEmail, UserNotifications,
    UserSubscription, VapidKeys, WebPushPayload,
};

const APPLICATION_ID_HEADER: &str = "applicationid";

/// The notification backend, as seen by the client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Ask the backend for a fresh VAPID key pair. Needs no credentials.
    async fn generate_vapid_keys(&self) -> Result<VapidKeys>;

    /// The current user's email record and web-push subscriptions. Without an
    /// access token, or on any failure, this is the empty result.
    async fn fetch_user_notifications(&self, session: &Session) -> UserNotifications;

    async fn create_web_push_subscription(
        &self,
        session: &Session,
        payload: &WebPushPayload,
    ) -> Result<UserSubscription>;

    /// The email address comes from the session's current user.
    async fn create_email_subscription(&self, session: &Session, tags: &Tags)
        -> Result<UserEmail>;

    /// Returns the id the backend reports as deleted.
    async fn delete_web_push_subscription(&self, session: &Session, id: &str) -> Result<String>;

    /// Returns the id the backend reports as deleted.
    async fn delete_email_subscription(&self, session: &Session, id: &str) -> Result<String>;

    /// Overwrites the whole tag set of a web-push subscription.
    async fn replace_web_push_tags(
        &self,
        session: &Session,
        id: &str,
        tags: &Tags,
    ) -> Result<UserSubscription>;

    /// Overwrites the whole tag set of an email record.
    async fn replace_email_tags(&self, session: &Session, id: &str, tags: &Tags)
        -> Result<UserEmail>;
}

/// Talks to the notification backend over HTTP.
pub struct HttpNotificationApi {
    config: NotificationClientConfig,
    http: reqwest::Client,
}

impl HttpNotificationApi {
    pub fn new(config: NotificationClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.settings.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    fn prepare_request(
        &self,
        method: Method,
        endpoint: &str,
        session: Option<&Session>,
    ) -> Result<RequestBuilder> {
        let url = self.config.endpoint_url(endpoint)?;
        log::trace!("making {} request to: {}", method, url);
        let mut request = self.http.request(method, url);
        if let Some(app_id) = &self.config.app_id {
            request = request.header(APPLICATION_ID_HEADER, app_id);
        }
        if let Some(token) = session.and_then(|s| s.access_token.as_deref()) {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        log::trace!("response ({}): {}", status, body);
        check_http_status_for_error(status, &body)?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post<B, T>(&self, session: &Session, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        session.access_token()?;
        let request = self
            .prepare_request(Method::POST, endpoint, Some(session))?
            .json(body);
        self.send(request).await
    }

    async fn try_fetch_user_notifications(&self, session: &Session) -> Result<UserNotifications> {
        let request = self.prepare_request(Method::GET, "getUserNotifications", Some(session))?;
        self.send(request).await
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn generate_vapid_keys(&self) -> Result<VapidKeys> {
        let request = self.prepare_request(Method::GET, "generateVAPIDKeys", None)?;
        self.send(request).await
    }

    async fn fetch_user_notifications(&self, session: &Session) -> UserNotifications {
        if !session.is_authenticated() {
            return UserNotifications::default();
        }
        match self.try_fetch_user_notifications(session).await {
            Ok(notifications) => notifications,
            Err(e) => {
                log::warn!("could not fetch user notifications: {}", e);
                UserNotifications::default()
            }
        }
    }

    async fn create_web_push_subscription(
        &self,
        session: &Session,
        payload: &WebPushPayload,
    ) -> Result<UserSubscription> {
        self.post(session, "setUserWebPushNotifications", payload)
            .await
    }

    async fn create_email_subscription(
        &self,
        session: &Session,
        tags: &Tags,
    ) -> Result<UserEmail> {
        let email = session.email()?;
        self.post(
            session,
            "setUserEmailNotifications",
            &EmailPayload { email, tags },
        )
        .await
    }

    async fn delete_web_push_subscription(&self, session: &Session, id: &str) -> Result<String> {
        let payload = IdPayload { id: id.to_string() };
        let deleted: IdPayload = self
            .post(session, "deleteUserWebPushNotifications", &payload)
            .await?;
        Ok(deleted.id)
    }

    async fn delete_email_subscription(&self, session: &Session, id: &str) -> Result<String> {
        let payload = IdPayload { id: id.to_string() };
        let deleted: IdPayload = self
            .post(session, "deleteUserEmailNotifications", &payload)
            .await?;
        Ok(deleted.id)
    }

    async fn replace_web_push_tags(
        &self,
        session: &Session,
        id: &str,
        tags: &Tags,
    ) -> Result<UserSubscription> {
        self.post(
            session,
            "setTagsUserWebPushNotifications",
            &TagsPayload { id, tags },
        )
        .await
    }

    async fn replace_email_tags(
        &self,
        session: &Session,
        id: &str,
        tags: &Tags,
    ) -> Result<UserEmail> {
        self.post(
            session,
            "setTagsUserEmailNotifications",
            &TagsPayload { id, tags },
        )
        .await
    }
}
