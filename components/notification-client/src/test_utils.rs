/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::collections::HashMap;

use crate::environment::{EnvironmentInfo, PlatformInfo};
use crate::models::{PushSubscription, Session, SubscriptionKeys, Tags, User, UserSubscription};

pub const TEST_TOKEN: &str = "mock_token";
pub const TEST_ENDPOINT: &str = "https://push.example.com/send/abad1dea";
pub const OTHER_ENDPOINT: &str = "https://push.example.com/send/deadbeef";
pub const TEST_VAPID_KEY: &str =
    "BBcJdfs1GtMyymFTtty6lIGWRFXrEtJP40Df0gOvRDR4D8CKVgqE6vlYR7tCYksIRdKD1MxDPhQVmKLnzuife50";
pub const FIREFOX_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_platform() -> PlatformInfo {
    PlatformInfo {
        user_agent: FIREFOX_UA.to_string(),
        protocol: "https:".to_string(),
        is_secure_context: true,
        supports_service_workers: true,
    }
}

pub fn test_environment() -> EnvironmentInfo {
    EnvironmentInfo::detect(&test_platform())
}

pub fn push_subscription(endpoint: &str) -> PushSubscription {
    PushSubscription {
        endpoint: endpoint.to_string(),
        expiration_time: None,
        keys: SubscriptionKeys {
            auth: "auth".to_string(),
            p256dh: "p256dh".to_string(),
        },
    }
}

pub fn test_push_subscription() -> PushSubscription {
    push_subscription(TEST_ENDPOINT)
}

pub fn user_subscription(id: &str, endpoint: &str, tags: Option<Tags>) -> UserSubscription {
    UserSubscription {
        id: id.to_string(),
        subscription: push_subscription(endpoint),
        environment_info: None,
        tags,
        segments: None,
    }
}

pub fn test_user() -> User {
    User {
        id: "user-1".to_string(),
        created_at: "2021-01-01T00:00:00Z".to_string(),
        display_name: "Test User".to_string(),
        avatar_url: String::new(),
        email: Some("me@example.com".to_string()),
        default_role: "user".to_string(),
        roles: HashMap::new(),
    }
}

pub fn authenticated_session() -> Session {
    Session {
        access_token: Some(TEST_TOKEN.to_string()),
        current_user: Some(test_user()),
    }
}
