// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argument parsing and command execution.

use crate::{
    errors::{ExpectedError, Result},
    exit_codes::RunListExitCode,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use clap::Parser;
use runlist_client::{
    client::Client,
    creds::{CredentialFile, Credentials},
    mock::MockTransport,
    select::{RunQuery, select_runs},
    transport::{HttpTransport, Transport},
};
use std::io::Write;

/// List test runs in a test-management project, filtered by configuration
/// and status.
///
/// Prints the name of every matching run to stdout, one per line. Plan
/// runs match a configuration filter only if their configuration set is
/// exactly the requested set.
#[derive(Debug, Parser)]
#[command(
    name = "runlist",
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub struct RunListApp {
    #[clap(flatten)]
    output: OutputOpts,

    /// Project to list runs from
    #[arg(short = 'j', long = "project", value_name = "NAME")]
    project: Option<String>,

    /// Configuration name a plan run must carry; repeat to require a set
    #[arg(short = 'c', long = "config", value_name = "NAME")]
    configs: Vec<String>,

    /// Status that must occur in a run; repeat to require several
    #[arg(short = 's', long = "status", value_name = "NAME")]
    statuses: Vec<String>,

    /// Base URL of the service
    #[arg(long = "apiurl", value_name = "URL")]
    api_url: Option<String>,

    /// User name to authenticate with
    #[arg(long, value_name = "NAME")]
    user: Option<String>,

    /// Password or API key
    #[arg(long, value_name = "SECRET")]
    password: Option<String>,

    /// Serve from a built-in in-memory fixture instead of the network
    #[arg(long)]
    mock: bool,
}

impl RunListApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the invocation.
    ///
    /// Returns the exit code on success; expected failures are translated
    /// to exit codes by the caller.
    pub fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        let Self {
            output: _,
            project,
            configs,
            statuses,
            api_url,
            user,
            password,
            mock,
        } = self;

        let transport: Box<dyn Transport> = if mock {
            Box::new(MockTransport::sample())
        } else {
            let file = CredentialFile::load_default()?;
            let credentials = Credentials {
                api_url: resolve_credential("apiurl", "API URL", api_url, file.api_url, false)?,
                user: resolve_credential("user", "User", user, file.user, false)?,
                password: resolve_credential("password", "Password", password, file.password, true)?,
            };
            Box::new(HttpTransport::new(&credentials))
        };
        let client = Client::new(transport);

        let project = match non_blank(project) {
            Some(name) => name,
            None => non_blank(Some(prompt("Project", false)?)).ok_or(ExpectedError::MissingProject)?,
        };

        let query = RunQuery {
            project,
            configs,
            statuses,
        };
        let runs = select_runs(&client, &query)?;
        tracing::debug!("{} runs matched", runs.len());

        let mut writer = output_writer.stdout_writer();
        for run in &runs {
            writeln!(writer, "{}", run.name)
                .map_err(|err| ExpectedError::WriteOutputError { err })?;
        }
        writer
            .flush()
            .map_err(|err| ExpectedError::WriteOutputError { err })?;

        Ok(RunListExitCode::OK)
    }
}

/// Resolves one credential field: flag, then credential file, then an
/// interactive prompt. Blank values don't count at any level.
fn resolve_credential(
    field: &'static str,
    prompt_label: &str,
    flag: Option<String>,
    file: Option<String>,
    secret: bool,
) -> Result<String> {
    let value = match non_blank(flag).or_else(|| non_blank(file)) {
        Some(value) => value,
        None => prompt(prompt_label, secret)?,
    };
    non_blank(Some(value)).ok_or(ExpectedError::MissingCredentials { field })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn prompt(label: &str, secret: bool) -> Result<String> {
    let result = if secret {
        dialoguer::Password::new()
            .with_prompt(label)
            .allow_empty_password(true)
            .interact()
    } else {
        dialoguer::Input::<String>::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
    };
    result.map_err(|err| ExpectedError::DialoguerError { err })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use runlist_client::errors::ApiError;

    fn exec_mock(args: &[&str]) -> (Result<i32>, String) {
        let app = RunListApp::try_parse_from(args).expect("arguments parse");
        let mut writer = OutputWriter::Test { stdout: Vec::new() };
        let result = app.exec(&mut writer);
        let stdout = String::from_utf8(writer.stdout().to_vec()).expect("stdout is UTF-8");
        (result, stdout)
    }

    #[test]
    fn unfiltered_invocation_lists_all_runs() {
        let (result, stdout) = exec_mock(&["runlist", "--mock", "-j", "Widgets"]);
        assert_eq!(result.expect("success"), RunListExitCode::OK);
        assert_eq!(stdout, "Nightly\nPlanA-Linux\nPlanA-Win\n");
    }

    #[test]
    fn configuration_filter_end_to_end() {
        let (result, stdout) = exec_mock(&["runlist", "--mock", "-j", "Widgets", "-c", "Linux"]);
        assert_eq!(result.expect("success"), RunListExitCode::OK);
        // Standalone "Nightly" is excluded: configuration filtering only
        // considers plan runs.
        assert_eq!(stdout, "PlanA-Linux\n");
    }

    #[test]
    fn status_filters_compose_with_and() {
        let (result, stdout) = exec_mock(&[
            "runlist", "--mock", "-j", "Widgets", "-s", "passed", "-s", "failed",
        ]);
        assert_eq!(result.expect("success"), RunListExitCode::OK);
        assert_eq!(stdout, "Nightly\nPlanA-Win\n");
    }

    #[test]
    fn zero_matches_is_success_with_empty_output() {
        let (result, stdout) = exec_mock(&["runlist", "--mock", "-j", "Widgets", "-s", "blocked"]);
        assert_eq!(result.expect("success"), RunListExitCode::OK);
        assert_eq!(stdout, "");
    }

    #[test]
    fn unknown_configuration_maps_to_exit_7() {
        let (result, stdout) = exec_mock(&[
            "runlist", "--mock", "-j", "Widgets", "-c", "Linux", "-c", "MacOS",
        ]);
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ExpectedError::ApiError {
                err: ApiError::ConfigurationsNotFound { .. }
            }
        ));
        assert_eq!(err.process_exit_code(), RunListExitCode::CONFIGURATION_NOT_FOUND);
        // No partial output on the error path.
        assert_eq!(stdout, "");
    }

    #[test]
    fn unknown_project_maps_to_exit_6() {
        let (result, stdout) = exec_mock(&["runlist", "--mock", "-j", "Gadgets"]);
        let err = result.unwrap_err();
        assert_eq!(err.process_exit_code(), RunListExitCode::PROJECT_NOT_FOUND);
        assert_eq!(stdout, "");
    }

    #[test]
    fn unknown_status_maps_to_exit_4() {
        let (result, stdout) = exec_mock(&["runlist", "--mock", "-j", "Widgets", "-s", "bogus"]);
        let err = result.unwrap_err();
        assert_eq!(err.process_exit_code(), RunListExitCode::UNKNOWN_STATUS);
        assert_eq!(stdout, "");
    }

    #[test]
    fn repeated_invocations_are_idempotent() {
        let first = exec_mock(&["runlist", "--mock", "-j", "Widgets", "-s", "passed"]);
        let second = exec_mock(&["runlist", "--mock", "-j", "Widgets", "-s", "passed"]);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn blank_credential_resolution_fails_without_prompting() {
        // A blank flag value falls through to the file layer; a blank
        // value there would fall through to the prompt, which tests can't
        // answer, so both layers supply non-blank values here.
        let resolved = resolve_credential(
            "apiurl",
            "API URL",
            Some(String::new()),
            Some("https://example.testrail.io".to_owned()),
            false,
        )
        .expect("file layer value wins");
        assert_eq!(resolved, "https://example.testrail.io");

        let resolved = resolve_credential(
            "user",
            "User",
            Some("qa@example.com".to_owned()),
            Some("other@example.com".to_owned()),
            false,
        )
        .expect("flag beats file");
        assert_eq!(resolved, "qa@example.com");
    }
}
