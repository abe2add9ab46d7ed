// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic in-memory transport.
//!
//! Serves the same routes as the real service from fixture data, for tests
//! and for the `--mock` flag. Unknown entities answer with HTTP 400 the
//! way the service does; routes the fixture has no concept of are a
//! distinct error since they indicate a client bug.

use crate::{
    errors::TransportError,
    models::{
        ConfigGroup, Configuration, ConfigId, Plan, PlanEntry, PlanId, Project, ProjectId, Run,
        RunId, Status, StatusId,
    },
    transport::Transport,
};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// An in-memory [`Transport`] backed by fixture data.
#[derive(Debug, Default)]
pub struct MockTransport {
    projects: Vec<Project>,
    statuses: Vec<Status>,
    config_groups: BTreeMap<ProjectId, Vec<ConfigGroup>>,
    standalone_runs: BTreeMap<ProjectId, Vec<Run>>,
    plans: BTreeMap<ProjectId, Vec<Plan>>,
    plan_entries: BTreeMap<PlanId, Vec<PlanEntry>>,
    run_counts: BTreeMap<RunId, BTreeMap<String, u64>>,
}

impl MockTransport {
    /// Creates an empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixture served by `runlist --mock`.
    ///
    /// Project "Widgets" with one standalone run, and one plan whose child
    /// runs are pinned to the Linux and Windows configurations.
    pub fn sample() -> Self {
        Self::new()
            .with_system_statuses()
            .with_project(1, "Widgets")
            .with_config_group(
                ProjectId(1),
                1,
                "Operating Systems",
                &[(1, "Linux"), (2, "Windows")],
            )
            .with_standalone_run(ProjectId(1), 100, "Nightly")
            .with_plan(ProjectId(1), 10, "PlanA")
            .with_plan_entry(
                PlanId(10),
                vec![
                    run(101, "PlanA-Linux", &[1]),
                    run(102, "PlanA-Win", &[2]),
                ],
            )
            .with_run_counts(RunId(100), &[("passed_count", 12), ("failed_count", 3)])
            .with_run_counts(RunId(101), &[("passed_count", 8)])
            .with_run_counts(RunId(102), &[("passed_count", 5), ("failed_count", 1)])
    }

    /// Adds a project.
    pub fn with_project(mut self, id: u64, name: &str) -> Self {
        self.projects.push(Project {
            id: ProjectId(id),
            name: name.to_owned(),
        });
        self
    }

    /// Adds the five system statuses.
    pub fn with_system_statuses(mut self) -> Self {
        for (id, name, label) in [
            (1, "passed", "Passed"),
            (2, "blocked", "Blocked"),
            (3, "untested", "Untested"),
            (4, "retest", "Retest"),
            (5, "failed", "Failed"),
        ] {
            self.statuses.push(Status {
                id: StatusId(id),
                name: name.to_owned(),
                label: label.to_owned(),
            });
        }
        self
    }

    /// Adds a configuration group to a project.
    pub fn with_config_group(
        mut self,
        project: ProjectId,
        group_id: u64,
        name: &str,
        configs: &[(u64, &str)],
    ) -> Self {
        self.config_groups
            .entry(project)
            .or_default()
            .push(ConfigGroup {
                id: group_id,
                name: name.to_owned(),
                configs: configs
                    .iter()
                    .map(|(id, name)| Configuration {
                        id: ConfigId(*id),
                        name: (*name).to_owned(),
                    })
                    .collect(),
            });
        self
    }

    /// Adds a standalone run to a project.
    pub fn with_standalone_run(mut self, project: ProjectId, id: u64, name: &str) -> Self {
        self.standalone_runs
            .entry(project)
            .or_default()
            .push(run(id, name, &[]));
        self
    }

    /// Adds a plan to a project.
    pub fn with_plan(mut self, project: ProjectId, id: u64, name: &str) -> Self {
        self.plans.entry(project).or_default().push(Plan {
            id: PlanId(id),
            name: name.to_owned(),
        });
        self
    }

    /// Appends an entry with the given child runs to a plan.
    pub fn with_plan_entry(mut self, plan: PlanId, runs: Vec<Run>) -> Self {
        self.plan_entries
            .entry(plan)
            .or_default()
            .push(PlanEntry { runs });
        self
    }

    /// Sets raw `*_count` fields for a run's `get_run` payload.
    pub fn with_run_counts(mut self, run: RunId, counts: &[(&str, u64)]) -> Self {
        let fields = self.run_counts.entry(run).or_default();
        for (field, count) in counts {
            fields.insert((*field).to_owned(), *count);
        }
        self
    }

    fn find_run(&self, id: RunId) -> Option<&Run> {
        self.standalone_runs
            .values()
            .flatten()
            .chain(
                self.plan_entries
                    .values()
                    .flatten()
                    .flat_map(|entry| &entry.runs),
            )
            .find(|run| run.id == id)
    }

    // The service answers 400 for a well-formed request naming an unknown
    // entity.
    fn bad_request(path: &str) -> TransportError {
        TransportError::Status {
            path: path.to_owned(),
            status: 400,
        }
    }

    fn to_value<T: serde::Serialize>(value: T) -> Value {
        serde_json::to_value(value).expect("fixture data serializes to JSON")
    }
}

impl Transport for MockTransport {
    fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        let (endpoint, arg) = match path.split_once('/') {
            Some((endpoint, arg)) => (endpoint, Some(arg)),
            None => (path, None),
        };
        let id = arg.and_then(|arg| arg.parse::<u64>().ok());

        match (endpoint, id) {
            ("get_projects", None) => Ok(Self::to_value(&self.projects)),
            ("get_statuses", None) => Ok(Self::to_value(&self.statuses)),
            ("get_configs", Some(id)) => self
                .config_groups
                .get(&ProjectId(id))
                .map(Self::to_value)
                .ok_or_else(|| Self::bad_request(path)),
            ("get_runs", Some(id)) => self
                .standalone_runs
                .get(&ProjectId(id))
                .map(Self::to_value)
                .ok_or_else(|| Self::bad_request(path)),
            ("get_plans", Some(id)) => self
                .plans
                .get(&ProjectId(id))
                .map(Self::to_value)
                .ok_or_else(|| Self::bad_request(path)),
            ("get_plan", Some(id)) => {
                let plan = self
                    .plans
                    .values()
                    .flatten()
                    .find(|plan| plan.id == PlanId(id))
                    .ok_or_else(|| Self::bad_request(path))?;
                let entries = self.plan_entries.get(&plan.id).cloned().unwrap_or_default();
                Ok(json!({
                    "id": plan.id,
                    "name": plan.name,
                    "entries": entries,
                }))
            }
            ("get_run", Some(id)) => {
                let run = self.find_run(RunId(id)).ok_or_else(|| Self::bad_request(path))?;
                let mut payload = Self::to_value(run);
                let object = payload.as_object_mut().expect("runs serialize to objects");
                for (field, count) in self.run_counts.get(&run.id).into_iter().flatten() {
                    object.insert(field.clone(), json!(count));
                }
                Ok(payload)
            }
            _ => Err(TransportError::UnknownMockRoute {
                path: path.to_owned(),
            }),
        }
    }
}

/// Shorthand for building a fixture [`Run`].
pub fn run(id: u64, name: &str, config_ids: &[u64]) -> Run {
    Run {
        id: RunId(id),
        name: name.to_owned(),
        config_ids: config_ids.iter().copied().map(ConfigId).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_project_is_a_bad_request() {
        let transport = MockTransport::sample();
        let err = transport.get_json("get_runs/77").unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 400, .. }));
        assert!(err.is_not_found());
    }

    #[test]
    fn unknown_route_is_distinct_from_unknown_entity() {
        let transport = MockTransport::sample();
        let err = transport.get_json("get_sections/1").unwrap_err();
        assert!(matches!(err, TransportError::UnknownMockRoute { .. }));
    }

    #[test]
    fn get_run_merges_count_fields() {
        let transport = MockTransport::sample();
        let payload = transport.get_json("get_run/100").expect("run exists");
        assert_eq!(payload["name"], "Nightly");
        assert_eq!(payload["passed_count"], 12);
        assert_eq!(payload["failed_count"], 3);
    }
}
