/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("You must provide a public VAPID key")]
    MissingVapidKey,

    #[error("Invalid public VAPID key: {0}")]
    InvalidVapidKey(#[from] base64::DecodeError),

    #[error("User not authenticated")]
    NotAuthenticated,

    #[error("Current user has no email address")]
    MissingEmail,

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Notification API error: {0}")]
    Http(#[from] HttpError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Push registration failed: {0}")]
    Registration(String),
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Bad request ({code}): {message}")]
    BadRequest { code: u16, message: String },

    #[error("Unauthorized ({code}): {message}")]
    Unauthorized { code: u16, message: String },

    #[error("Server error ({code}): {message}")]
    Server { code: u16, message: String },

    #[error("Unexpected response ({code}): {message}")]
    Unexpected { code: u16, message: String },
}

impl HttpError {
    pub fn code(&self) -> u16 {
        match self {
            HttpError::BadRequest { code, .. }
            | HttpError::Unauthorized { code, .. }
            | HttpError::Server { code, .. }
            | HttpError::Unexpected { code, .. } => *code,
        }
    }
}

/// Turns a non-2xx status and its body into the matching [`HttpError`].
pub fn check_http_status_for_error(status: u16, body: &str) -> std::result::Result<(), HttpError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = body.to_string();
    let error = match status {
        400 => HttpError::BadRequest {
            code: status,
            message,
        },
        401 | 403 => HttpError::Unauthorized {
            code: status,
            message,
        },
        500..=599 => HttpError::Server {
            code: status,
            message,
        },
        _ => HttpError::Unexpected {
            code: status,
            message,
        },
    };
    Err(error)
}

impl Error {
    /// The level at which this error is written to the log when it is swallowed.
    pub fn log_level(&self) -> log::Level {
        match self {
            Error::NotAuthenticated | Error::MissingEmail | Error::Request(_) => log::Level::Warn,
            Error::Http(HttpError::Unauthorized { .. }) => log::Level::Warn,
            _ => log::Level::Error,
        }
    }
}

/// The error boundary: callers of the client never see an `Err`. The error is
/// logged and the operation yields `None`.
pub(crate) fn handle_error<T>(operation: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::log!(e.log_level(), "{} failed: {}", operation, e);
            None
        }
    }
}
