// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed API client over a [`Transport`].
//!
//! Each method is one capability of the service: name resolution, run and
//! plan listing, and the batch status rollup. Requests are issued strictly
//! sequentially; later calls depend on earlier results.

use crate::{
    errors::ApiError,
    models::{
        ConfigGroup, ConfigId, Plan, PlanDetail, Project, ProjectId, Run, RunId, Status, StatusId,
        StatusSummary,
    },
    transport::Transport,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// A client for the test-management service.
#[derive(Debug)]
pub struct Client {
    transport: Box<dyn Transport>,
}

impl Client {
    /// Creates a client over the given transport.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.transport.get_json(path)?;
        serde_json::from_value(value).map_err(|err| ApiError::Decode {
            path: path.to_owned(),
            err,
        })
    }

    /// Resolves a project by display name.
    pub fn project_by_name(&self, name: &str) -> Result<Project, ApiError> {
        let projects: Vec<Project> = self.get("get_projects")?;
        projects
            .into_iter()
            .find(|project| project.name == name)
            .ok_or_else(|| ApiError::ProjectNotFound {
                name: name.to_owned(),
            })
    }

    /// Resolves status names to status IDs.
    ///
    /// Names match the system `name` field exactly. The first unknown name
    /// aborts the resolution; this runs before any collection work so an
    /// invalid request fails fast.
    pub fn status_ids(&self, names: &[String]) -> Result<Vec<StatusId>, ApiError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let statuses: Vec<Status> = self.get("get_statuses")?;
        names
            .iter()
            .map(|name| {
                statuses
                    .iter()
                    .find(|status| &status.name == name)
                    .map(|status| status.id)
                    .ok_or_else(|| ApiError::UnknownStatus { name: name.clone() })
            })
            .collect()
    }

    /// Resolves configuration names to configuration IDs within a project.
    ///
    /// Every requested name must resolve; on any shortfall (or surplus,
    /// when distinct configurations share a name) no partial result is
    /// produced.
    pub fn configuration_ids(
        &self,
        project: ProjectId,
        names: &[String],
    ) -> Result<Vec<ConfigId>, ApiError> {
        let groups: Vec<ConfigGroup> = self.get(&format!("get_configs/{project}"))?;
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            for config in groups.iter().flat_map(|group| &group.configs) {
                if &config.name == name {
                    ids.push(config.id);
                }
            }
        }
        if ids.len() != names.len() {
            return Err(ApiError::ConfigurationsNotFound {
                project,
                requested: names.len(),
                resolved: ids.len(),
            });
        }
        Ok(ids)
    }

    /// Lists a project's standalone runs.
    ///
    /// The general run listing carries no configuration associations, so
    /// these runs always come back with an empty `config_ids`.
    pub fn runs(&self, project: ProjectId) -> Result<Vec<Run>, ApiError> {
        self.get(&format!("get_runs/{project}"))
    }

    /// Lists a project's plans.
    pub fn plans(&self, project: ProjectId) -> Result<Vec<Plan>, ApiError> {
        self.get(&format!("get_plans/{project}"))
    }

    /// Fetches a plan's child runs, flattened over its entries in order.
    ///
    /// A plan with no entries yields an empty list, not an error.
    pub fn plan_runs(&self, plan: &Plan) -> Result<Vec<Run>, ApiError> {
        let detail: PlanDetail = self.get(&format!("get_plan/{}", plan.id))?;
        Ok(detail
            .entries
            .into_iter()
            .flat_map(|entry| entry.runs)
            .collect())
    }

    /// Computes status rollups for the candidate run set.
    ///
    /// A run the service no longer knows about is omitted from the map
    /// rather than failing the batch; the status filter then treats it as
    /// non-matching. Transport failures other than not-found still
    /// propagate.
    pub fn status_summaries(
        &self,
        runs: &[Run],
    ) -> Result<BTreeMap<RunId, StatusSummary>, ApiError> {
        let mut summaries = BTreeMap::new();
        for run in runs {
            let path = format!("get_run/{}", run.id);
            match self.transport.get_json(&path) {
                Ok(payload) => {
                    summaries.insert(run.id, StatusSummary::from_run_payload(&payload));
                }
                Err(err) if err.is_not_found() => {
                    tracing::debug!("run {} has no status summary, skipping", run.id);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use pretty_assertions::assert_eq;

    fn sample_client() -> Client {
        Client::new(Box::new(MockTransport::sample()))
    }

    #[test]
    fn project_resolution() {
        let client = sample_client();
        let project = client.project_by_name("Widgets").expect("project exists");
        assert_eq!(project.id, ProjectId(1));

        let err = client.project_by_name("Gadgets").unwrap_err();
        assert!(matches!(err, ApiError::ProjectNotFound { name } if name == "Gadgets"));
    }

    #[test]
    fn status_resolution_fails_on_first_unknown_name() {
        let client = sample_client();
        let ids = client
            .status_ids(&["passed".to_owned(), "failed".to_owned()])
            .expect("system statuses resolve");
        assert_eq!(ids, vec![StatusId(1), StatusId(5)]);

        let err = client
            .status_ids(&["bogus".to_owned(), "passed".to_owned()])
            .unwrap_err();
        assert!(matches!(err, ApiError::UnknownStatus { name } if name == "bogus"));
    }

    #[test]
    fn empty_status_request_issues_no_lookup() {
        // An empty request resolves without touching the transport at all.
        let client = Client::new(Box::new(MockTransport::default()));
        assert_eq!(client.status_ids(&[]).expect("no-op"), Vec::new());
    }

    #[test]
    fn configuration_resolution_is_all_or_nothing() {
        let client = sample_client();
        let ids = client
            .configuration_ids(ProjectId(1), &["Linux".to_owned(), "Windows".to_owned()])
            .expect("both configurations exist");
        assert_eq!(ids, vec![ConfigId(1), ConfigId(2)]);

        let err = client
            .configuration_ids(ProjectId(1), &["Linux".to_owned(), "MacOS".to_owned()])
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::ConfigurationsNotFound {
                requested: 2,
                resolved: 1,
                ..
            }
        ));
    }

    #[test]
    fn configuration_matching_is_exact_string_equality() {
        let client = sample_client();
        // No case folding, no trimming.
        let err = client
            .configuration_ids(ProjectId(1), &["linux".to_owned()])
            .unwrap_err();
        assert!(matches!(err, ApiError::ConfigurationsNotFound { .. }));
    }

    #[test]
    fn plan_runs_flatten_entries_in_order() {
        let client = sample_client();
        let plans = client.plans(ProjectId(1)).expect("plans list");
        assert_eq!(plans.len(), 1);

        let runs = client.plan_runs(&plans[0]).expect("child runs");
        let names: Vec<_> = runs.iter().map(|run| run.name.as_str()).collect();
        assert_eq!(names, ["PlanA-Linux", "PlanA-Win"]);
        assert_eq!(runs[0].config_ids, vec![ConfigId(1)]);
    }

    #[test]
    fn status_summaries_skip_unknown_runs() {
        let client = sample_client();
        let known = Run {
            id: RunId(100),
            name: "Nightly".to_owned(),
            config_ids: Vec::new(),
        };
        let vanished = Run {
            id: RunId(999),
            name: "Vanished".to_owned(),
            config_ids: Vec::new(),
        };

        let summaries = client
            .status_summaries(&[known.clone(), vanished])
            .expect("batch succeeds despite the missing run");
        assert!(summaries.contains_key(&known.id));
        assert!(!summaries.contains_key(&RunId(999)));
    }
}
