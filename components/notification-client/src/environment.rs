/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Describes the browser and OS the client runs in.
//!
//! The description is computed once, when the client is built, and is sent
//! along with every new web-push subscription so the backend can segment on it.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Safari,
    Firefox,
    Chrome,
    Opera,
    Edge,
    #[default]
    Other,
}

impl Display for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Browser::Safari => "safari",
                Browser::Firefox => "firefox",
                Browser::Chrome => "chrome",
                Browser::Opera => "opera",
                Browser::Edge => "edge",
                Browser::Other => "other",
            }
        )
    }
}

/// What the hosting platform tells us about itself.
#[derive(Clone, Debug, Default)]
pub struct PlatformInfo {
    pub user_agent: String,
    /// Page protocol including the colon, e.g. `"https:"`
    pub protocol: String,
    pub is_secure_context: bool,
    pub supports_service_workers: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentInfo {
    pub browser_type: Browser,
    #[serde(serialize_with = "crate::models::serialize_number")]
    pub browser_version: f64,
    pub is_https: bool,
    pub is_browser_and_supports_service_workers: bool,
    pub requires_user_interaction: bool,
    pub os_name: String,
    pub os_version: String,
    pub can_talk_to_service_worker: bool,
}

impl EnvironmentInfo {
    pub fn detect(platform: &PlatformInfo) -> Self {
        let ua = platform.user_agent.as_str();
        let (browser_type, raw_version) = detect_browser(ua);
        let browser_version = parse_version_string(raw_version).unwrap_or_default();
        let (os_name, os_version) = detect_os(ua);

        let info = EnvironmentInfo {
            browser_type,
            browser_version,
            is_https: platform.protocol == "https:",
            is_browser_and_supports_service_workers: platform.supports_service_workers,
            requires_user_interaction: requires_user_interaction(browser_type, browser_version),
            os_name: os_name.to_string(),
            os_version,
            can_talk_to_service_worker: platform.is_secure_context,
        };
        log::debug!(
            "detected environment: {} {} on {} {}",
            info.browser_type,
            info.browser_version,
            info.os_name,
            info.os_version
        );
        info
    }
}

/// Converts `"major.minor[.patch]"` to a decimal `MM.mm`, each part
/// zero-padded to two digits. `"14"` is `14.0`, `"14.2"` is `14.02`,
/// `"10.15.7"` is `10.15`. Anything after the minor part is dropped.
pub fn parse_version_string(version: &str) -> Option<f64> {
    let mut parts = version.split('.');
    let major = format!("{:0>2}", parts.next().unwrap_or_default());
    let minor = match parts.next() {
        Some(minor) if !minor.is_empty() => format!("{:0>2}", minor),
        _ => "00".to_string(),
    };
    format!("{}.{}", major, minor).parse().ok()
}

fn requires_user_interaction(browser: Browser, version: f64) -> bool {
    match browser {
        Browser::Firefox => version >= 72.0,
        Browser::Safari => parse_version_string("12.1").is_some_and(|min| version >= min),
        _ => false,
    }
}

/// Version-looking text right after `token`, e.g. `"120.0.1"` for `"Chrome/"`.
fn version_after<'a>(ua: &'a str, token: &str) -> Option<&'a str> {
    let start = ua.find(token)? + token.len();
    let rest = &ua[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '_'))
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn detect_browser(ua: &str) -> (Browser, &str) {
    // Order matters: Edge and Opera both claim to be Chrome, and everything
    // claims to be Safari.
    const PROBES: &[(Browser, &[&str])] = &[
        (Browser::Edge, &["Edg/", "EdgA/", "EdgiOS/", "Edge/"]),
        (Browser::Opera, &["OPR/", "OPT/", "Opera/"]),
        (Browser::Firefox, &["Firefox/", "FxiOS/"]),
        (Browser::Chrome, &["Chrome/", "CriOS/", "Chromium/"]),
    ];
    for (browser, tokens) in PROBES {
        for token in tokens.iter() {
            if let Some(version) = version_after(ua, token) {
                return (*browser, version);
            }
        }
    }
    if ua.contains("Safari/") {
        return (Browser::Safari, version_after(ua, "Version/").unwrap_or(""));
    }
    (Browser::Other, "")
}

fn detect_os(ua: &str) -> (&'static str, String) {
    let dotted = |v: &str| v.replace('_', ".");
    if let Some(v) = version_after(ua, "iPhone OS ").or_else(|| version_after(ua, "CPU OS ")) {
        return ("iOS", dotted(v));
    }
    if let Some(v) = version_after(ua, "Windows NT ") {
        return ("Windows", v.to_string());
    }
    if let Some(v) = version_after(ua, "Mac OS X ") {
        return ("macOS", dotted(v));
    }
    if let Some(v) = version_after(ua, "Android ") {
        return ("Android", v.to_string());
    }
    if ua.contains("CrOS") {
        return ("Chrome OS", String::new());
    }
    if ua.contains("Linux") {
        return ("Linux", String::new());
    }
    ("Unknown", String::new())
}
