// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `MimoMesh` library.
//!
//! Two layers: [`ApiError`] covers everything that can go wrong while
//! talking to the device over HTTP, and [`Error`] wraps it together with
//! the reconciler's own validation failures.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while communicating with the device API.
    #[error("device API error: {0}")]
    Api(#[from] ApiError),

    /// A submit was attempted with no cached snapshot for the session.
    ///
    /// The write path never fetches fresh data on its own; doing so would
    /// let index-based selections point at entries the user never saw.
    #[error("no cached device snapshot for this session; read the device state first")]
    MissingContext,

    /// The device reported an operating frequency index that is not
    /// covered by its own frequency list.
    #[error("operating frequency index {index} is out of bounds for a frequency list of length {len}")]
    InconsistentState {
        /// The index reported by `status.operatingFreq`.
        index: usize,
        /// The length of `config.freqList`.
        len: usize,
    },
}

/// Errors raised by the device HTTP client.
///
/// Every client operation normalizes its failures into exactly one of
/// these variants so callers never have to inspect transport internals.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure reaching the device (host unreachable,
    /// connection refused, broken transfer).
    #[error("device unreachable: {0}")]
    Unreachable(String),

    /// Request exceeded its fixed deadline.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Device responded with a non-success HTTP status.
    #[error("device rejected request: HTTP {status} - {body}")]
    RemoteRejected {
        /// HTTP status code returned by the device.
        status: u16,
        /// Raw response body, kept for diagnostics.
        body: String,
    },

    /// Response body could not be decoded as JSON where JSON was expected.
    #[error("malformed device response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Client could not be constructed (empty base URL, HTTP stack
    /// initialization failure).
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ApiError::RemoteRejected {
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(err.to_string(), "device rejected request: HTTP 503 - busy");
    }

    #[test]
    fn timeout_display() {
        let err = ApiError::Timeout(5000);
        assert_eq!(err.to_string(), "request timed out after 5000 ms");
    }

    #[test]
    fn error_from_api_error() {
        let err: Error = ApiError::Unreachable("connection refused".to_string()).into();
        assert!(matches!(err, Error::Api(ApiError::Unreachable(_))));
    }

    #[test]
    fn inconsistent_state_display() {
        let err = Error::InconsistentState { index: 7, len: 4 };
        assert_eq!(
            err.to_string(),
            "operating frequency index 7 is out of bounds for a frequency list of length 4"
        );
    }
}
