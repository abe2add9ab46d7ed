// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `runlist` failures.
///
/// An invocation may fail for a variety of expected reasons; each maps to
/// a distinct exit code so scripts can react without scraping stderr.
///
/// Unknown/unexpected failures (including transport failures) always
/// result in exit code 1.
pub enum RunListExitCode {}

impl RunListExitCode {
    /// No errors occurred. This includes invocations that matched zero
    /// runs: an empty result is a success.
    pub const OK: i32 = 0;

    /// Credentials or the project name were still missing after flags,
    /// the credential file, and interactive prompting.
    pub const MISSING_CREDENTIALS: i32 = 1;

    /// A requested status name is unknown to the service.
    pub const UNKNOWN_STATUS: i32 = 4;

    /// No project with the requested name exists.
    pub const PROJECT_NOT_FOUND: i32 = 6;

    /// One or more requested configuration names do not exist in the
    /// project.
    pub const CONFIGURATION_NOT_FOUND: i32 = 7;
}
