// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential resolution.
//!
//! Credentials are assembled by the CLI in priority order: command-line
//! flags, then the credential file, then an interactive prompt. This
//! module owns the file half of that chain; the assembled [`Credentials`]
//! value is immutable once the pipeline starts.

use crate::errors::CredentialFileError;
use camino::Utf8PathBuf;
use std::io;

/// Fully resolved credentials for the service.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credentials {
    /// Base URL of the service, without the API suffix.
    pub api_url: String,
    /// User name (typically an email address).
    pub user: String,
    /// Password or API key.
    pub password: String,
}

/// Partial credentials read from the credential file.
///
/// The file lives at `~/.runlistrc` and consists of `key=value` lines for
/// the keys `apiurl`, `user` and `password`. Blank lines and `#` comments
/// are skipped; unknown keys are ignored so the file can be shared with
/// other tools.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CredentialFile {
    /// Value of the `apiurl` key, if present.
    pub api_url: Option<String>,
    /// Value of the `user` key, if present.
    pub user: Option<String>,
    /// Value of the `password` key, if present.
    pub password: Option<String>,
}

pub(crate) const CREDENTIAL_FILE_NAME: &str = ".runlistrc";

impl CredentialFile {
    /// Returns the default credential file path, `~/.runlistrc`.
    ///
    /// Returns `Ok(None)` if no home directory could be determined.
    pub fn default_path() -> Result<Option<Utf8PathBuf>, CredentialFileError> {
        let Some(home) = home::home_dir() else {
            return Ok(None);
        };
        let home = Utf8PathBuf::from_path_buf(home)
            .map_err(|path| CredentialFileError::NonUtf8Home { path })?;
        Ok(Some(home.join(CREDENTIAL_FILE_NAME)))
    }

    /// Loads the credential file at the default path.
    ///
    /// A missing file is not an error: the remaining resolution steps
    /// (interactive prompting) take over.
    pub fn load_default() -> Result<Self, CredentialFileError> {
        match Self::default_path()? {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads a credential file from the given path, treating a missing
    /// file as empty.
    pub fn load(path: &Utf8PathBuf) -> Result<Self, CredentialFileError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(CredentialFileError::Read {
                path: path.clone(),
                err,
            }),
        }
    }

    /// Parses credential file contents.
    pub fn parse(contents: &str) -> Self {
        let mut file = Self::default();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!("ignoring malformed credential file line: `{line}`");
                continue;
            };
            let value = value.trim().to_owned();
            match key.trim() {
                "apiurl" => file.api_url = Some(value),
                "user" => file.user = Some(value),
                "password" => file.password = Some(value),
                _ => {}
            }
        }
        file
    }
}
