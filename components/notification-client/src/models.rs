/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize, Serializer};

use crate::environment::EnvironmentInfo;
use crate::error::{Error, Result};

/// Segmentation metadata attached to a subscription or email record.
pub type Tags = BTreeMap<String, TagValue>;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Serialize for TagValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TagValue::Bool(b) => serializer.serialize_bool(*b),
            TagValue::Number(n) => serialize_number(n, serializer),
            TagValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Writes whole numbers without a fractional part, so `3` stays `3` on the wire.
pub(crate) fn serialize_number<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl From<bool> for TagValue {
    fn from(v: bool) -> Self {
        TagValue::Bool(v)
    }
}

impl From<f64> for TagValue {
    fn from(v: f64) -> Self {
        TagValue::Number(v)
    }
}

impl From<i64> for TagValue {
    fn from(v: i64) -> Self {
        TagValue::Number(v as f64)
    }
}

impl From<i32> for TagValue {
    fn from(v: i32) -> Self {
        TagValue::Number(v.into())
    }
}

impl From<&str> for TagValue {
    fn from(v: &str) -> Self {
        TagValue::Text(v.to_string())
    }
}

impl From<String> for TagValue {
    fn from(v: String) -> Self {
        TagValue::Text(v)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    pub auth: String,
    pub p256dh: String,
}

/// A push registration as issued by the platform: where to send and how to encrypt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscription {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<f64>,
    pub keys: SubscriptionKeys,
}

/// The backend's record of a web-push subscription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSubscription {
    pub id: String,
    pub subscription: PushSubscription,
    // The backend spells it this way.
    #[serde(
        rename = "enviromentInfo",
        alias = "environmentInfo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub environment_info: Option<EnvironmentInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserEmail {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<String>>,
}

/// Everything the backend knows about the current user's notifications.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserNotifications {
    #[serde(rename = "users_email", default)]
    pub email: Option<UserEmail>,
    #[serde(rename = "webpushed", alias = "webpushes", default)]
    pub web_pushes: Vec<UserSubscription>,
}

impl UserNotifications {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.web_pushes.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "defaultRole", default)]
    pub default_role: String,
    #[serde(default)]
    pub roles: HashMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VapidKeys {
    pub public_key: String,
    pub private_key: String,
}

/// Credentials injected by the identity provider, passed to every backend call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub current_user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn access_token(&self) -> Result<&str> {
        match self.access_token.as_deref() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(Error::NotAuthenticated),
        }
    }

    /// Email of the current user; requires a token too.
    pub fn email(&self) -> Result<&str> {
        self.access_token()?;
        let user = self.current_user.as_ref().ok_or(Error::NotAuthenticated)?;
        user.email.as_deref().ok_or(Error::MissingEmail)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WebPushPayload {
    pub subscription: PushSubscription,
    #[serde(rename = "enviromentInfo")]
    pub environment_info: EnvironmentInfo,
    pub tags: Tags,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailPayload<'a> {
    pub email: &'a str,
    pub tags: &'a Tags,
}

#[derive(Debug, Serialize)]
pub(crate) struct TagsPayload<'a> {
    pub id: &'a str,
    pub tags: &'a Tags,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IdPayload {
    pub id: String,
}
