// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    exit_codes::RunListExitCode,
    output::{NO_HEADING_TARGET, StderrStyles},
};
use owo_colors::OwoColorize;
use runlist_client::errors::{ApiError, CredentialFileError};
use std::error::Error;
use thiserror::Error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the
// expected way to print out errors is with the display_to_stderr method,
// which colorizes errors.

/// An expected failure of a runlist invocation.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("missing {field}")]
    MissingCredentials { field: &'static str },
    #[error("missing project name")]
    MissingProject,
    #[error("error reading prompt")]
    DialoguerError {
        #[source]
        err: dialoguer::Error,
    },
    #[error("credential file error")]
    CredentialFileError {
        #[from]
        err: CredentialFileError,
    },
    #[error("api error")]
    ApiError {
        #[from]
        err: ApiError,
    },
    #[error("writing to output failed")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::MissingCredentials { .. }
            | Self::MissingProject
            | Self::DialoguerError { .. }
            | Self::CredentialFileError { .. }
            | Self::WriteOutputError { .. } => RunListExitCode::MISSING_CREDENTIALS,
            Self::ApiError { err } => match err {
                ApiError::UnknownStatus { .. } => RunListExitCode::UNKNOWN_STATUS,
                ApiError::ProjectNotFound { .. } => RunListExitCode::PROJECT_NOT_FOUND,
                ApiError::ConfigurationsNotFound { .. } => {
                    RunListExitCode::CONFIGURATION_NOT_FOUND
                }
                // Transport and decode failures are unexpected: generic
                // failure code.
                _ => 1,
            },
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::MissingCredentials { field } => {
                tracing::error!(
                    "no {} given on the command line, in the credential file, or at the prompt",
                    field.style(styles.bold)
                );
                None
            }
            Self::MissingProject => {
                tracing::error!(
                    "no project name given (pass {} or answer the prompt)",
                    "--project".style(styles.bold)
                );
                None
            }
            Self::DialoguerError { err } => {
                tracing::error!("error reading input prompt");
                Some(err as &dyn Error)
            }
            Self::CredentialFileError { err } => {
                tracing::error!("{err}");
                err.source()
            }
            Self::ApiError { err } => match err {
                ApiError::ProjectNotFound { name } => {
                    tracing::error!("project `{}` not found", name.style(styles.bold));
                    None
                }
                ApiError::UnknownStatus { name } => {
                    tracing::error!("unknown status `{}`", name.style(styles.bold));
                    None
                }
                ApiError::ConfigurationsNotFound { .. } => {
                    tracing::error!("{err}");
                    None
                }
                other => {
                    tracing::error!("{other}");
                    other.source()
                }
            },
            Self::WriteOutputError { err } => {
                tracing::error!("failed to write run list to output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runlist_client::models::ProjectId;

    fn api(err: ApiError) -> ExpectedError {
        ExpectedError::ApiError { err }
    }

    #[test]
    fn exit_code_mapping() {
        assert_eq!(
            ExpectedError::MissingCredentials { field: "password" }.process_exit_code(),
            RunListExitCode::MISSING_CREDENTIALS
        );
        assert_eq!(
            ExpectedError::MissingProject.process_exit_code(),
            RunListExitCode::MISSING_CREDENTIALS
        );
        assert_eq!(
            api(ApiError::UnknownStatus {
                name: "bogus".to_owned()
            })
            .process_exit_code(),
            RunListExitCode::UNKNOWN_STATUS
        );
        assert_eq!(
            api(ApiError::ProjectNotFound {
                name: "Nonesuch".to_owned()
            })
            .process_exit_code(),
            RunListExitCode::PROJECT_NOT_FOUND
        );
        assert_eq!(
            api(ApiError::ConfigurationsNotFound {
                project: ProjectId(1),
                requested: 2,
                resolved: 1,
            })
            .process_exit_code(),
            RunListExitCode::CONFIGURATION_NOT_FOUND
        );
    }
}
