// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport abstraction over the service's HTTP API.
//!
//! The transport is selected once at startup: either the real
//! [`HttpTransport`] or the deterministic
//! [`MockTransport`](crate::mock::MockTransport). Nothing above this layer
//! knows which one it is talking to.

use crate::{creds::Credentials, errors::TransportError};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use debug_ignore::DebugIgnore;
use std::fmt;
use ureq::Agent;

/// A blocking JSON GET capability against the service API.
///
/// Paths are relative to the API root, e.g. `get_runs/12`. Each call is a
/// single network round trip; no retries, no internal timeouts.
pub trait Transport: fmt::Debug {
    /// Performs a GET request and decodes the response body as JSON.
    fn get_json(&self, path: &str) -> Result<serde_json::Value, TransportError>;
}

/// The real HTTP transport, backed by a blocking [`ureq::Agent`].
#[derive(Debug)]
pub struct HttpTransport {
    agent: Agent,
    base_url: String,
    // Basic credentials; kept out of Debug output.
    authorization: DebugIgnore<String>,
}

impl HttpTransport {
    /// Creates a transport for the given credentials.
    pub fn new(credentials: &Credentials) -> Self {
        let token = STANDARD.encode(format!("{}:{}", credentials.user, credentials.password));
        Self {
            agent: Agent::new_with_defaults(),
            base_url: credentials.api_url.trim_end_matches('/').to_owned(),
            authorization: format!("Basic {token}").into(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/index.php?/api/v2/{path}", self.base_url)
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, path: &str) -> Result<serde_json::Value, TransportError> {
        let url = self.url_for(path);
        tracing::debug!("GET {url}");

        let mut response = self
            .agent
            .get(&url)
            .header("Authorization", self.authorization.as_str())
            .call()
            .map_err(|err| match err {
                ureq::Error::StatusCode(status) => TransportError::Status {
                    path: path.to_owned(),
                    status,
                },
                err => TransportError::Request {
                    path: path.to_owned(),
                    err,
                },
            })?;

        response
            .body_mut()
            .read_json()
            .map_err(|err| TransportError::Request {
                path: path.to_owned(),
                err,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let transport = HttpTransport::new(&Credentials {
            api_url: "https://example.testrail.io/".to_owned(),
            user: "qa@example.com".to_owned(),
            password: "hunter2".to_owned(),
        });
        assert_eq!(
            transport.url_for("get_runs/12"),
            "https://example.testrail.io/index.php?/api/v2/get_runs/12"
        );
    }

    #[test]
    fn debug_output_does_not_leak_credentials() {
        let transport = HttpTransport::new(&Credentials {
            api_url: "https://example.testrail.io".to_owned(),
            user: "qa@example.com".to_owned(),
            password: "hunter2".to_owned(),
        });
        let debug = format!("{transport:?}");
        assert!(!debug.contains("hunter2"));
        let token = STANDARD.encode("qa@example.com:hunter2");
        assert!(!debug.contains(&token));
    }
}
