// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by runlist-client.

use crate::models::ProjectId;
use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurred while talking to the service.
///
/// Transport errors are not retried or otherwise handled here; the
/// pipeline issues strictly sequential requests and the first failure
/// aborts the whole invocation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The service answered with a non-success HTTP status.
    #[error("GET {path} returned HTTP {status}")]
    Status {
        /// API path of the failed request.
        path: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The request could not be performed or its body could not be read.
    #[error("GET {path} failed")]
    Request {
        /// API path of the failed request.
        path: String,
        /// The underlying error.
        #[source]
        err: ureq::Error,
    },

    /// A mock fixture was asked for a route it does not define.
    #[error("no mock fixture data for {path}")]
    UnknownMockRoute {
        /// The unrecognized API path.
        path: String,
    },
}

impl TransportError {
    /// Returns true if the failure indicates the addressed entity does not
    /// exist on the service.
    pub fn is_not_found(&self) -> bool {
        match self {
            TransportError::Status { status, .. } => *status == 400 || *status == 404,
            TransportError::UnknownMockRoute { .. } => true,
            TransportError::Request { .. } => false,
        }
    }
}

/// An error that occurred while resolving names or collecting runs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// No project with the requested name exists on the service.
    #[error("project `{name}` not found")]
    ProjectNotFound {
        /// The requested project name.
        name: String,
    },

    /// A requested status name is unknown to the service.
    #[error("unknown status `{name}`")]
    UnknownStatus {
        /// The unresolvable status name.
        name: String,
    },

    /// One or more requested configuration names did not resolve within
    /// the project. No partial results are produced.
    #[error(
        "one or more configurations does not exist in project {project} \
         (requested {requested}, resolved {resolved})"
    )]
    ConfigurationsNotFound {
        /// The project searched.
        project: ProjectId,
        /// How many configuration names were requested.
        requested: usize,
        /// How many configuration IDs resolved.
        resolved: usize,
    },

    /// A response could not be decoded into the expected shape.
    #[error("unexpected response shape from {path}")]
    Decode {
        /// API path whose response failed to decode.
        path: String,
        /// The underlying deserialization error.
        #[source]
        err: serde_json::Error,
    },

    /// The transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// An error reading or decoding the credential file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CredentialFileError {
    /// The file exists but could not be read.
    #[error("failed to read credential file `{path}`")]
    Read {
        /// Path of the credential file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        err: std::io::Error,
    },

    /// The home directory is not valid UTF-8, so the default credential
    /// file path cannot be represented.
    #[error("home directory `{}` is not valid UTF-8", .path.display())]
    NonUtf8Home {
        /// The offending home directory.
        path: std::path::PathBuf,
    },
}
