// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model for the test-management service.
//!
//! Standalone runs and plan-nested child runs arrive through different
//! endpoints but are normalized into the same [`Run`] shape before any
//! matching happens. Unknown JSON fields are ignored throughout: the
//! service returns far more metadata than this tool consumes.

use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeMap, fmt};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Identifier of a project.
    ProjectId
}
define_id! {
    /// Identifier of a configuration within a project.
    ConfigId
}
define_id! {
    /// Identifier of a result status, global to the service.
    StatusId
}
define_id! {
    /// Identifier of a run, standalone or plan-nested.
    RunId
}
define_id! {
    /// Identifier of a plan.
    PlanId
}

/// A project, looked up once by name at the start of the pipeline.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// The project's identifier.
    pub id: ProjectId,
    /// The project's display name.
    pub name: String,
}

/// A group of configurations sharing an axis (e.g. "Operating Systems").
///
/// The `get_configs` endpoint returns configurations nested in groups;
/// name resolution searches every group's members.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConfigGroup {
    /// The group's identifier.
    pub id: u64,
    /// The axis name.
    pub name: String,
    /// Configurations in this group.
    pub configs: Vec<Configuration>,
}

/// A single named configuration within a project.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// The configuration's identifier.
    pub id: ConfigId,
    /// The configuration's name; matched with exact string equality.
    pub name: String,
}

/// A result status known to the service.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// The status identifier.
    pub id: StatusId,
    /// The system name (e.g. `passed`). Name resolution matches this
    /// field, not the display label.
    pub name: String,
    /// The display label (e.g. `Passed`).
    pub label: String,
}

/// A run: a named collection of test-case executions.
///
/// Both provenances deserialize into this shape. Standalone runs carry no
/// configuration associations, so `config_ids` comes back empty for them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// The run's identifier.
    pub id: RunId,
    /// The run's display name.
    pub name: String,
    /// Configuration IDs this run is associated with. Treated as a set:
    /// unordered, no duplicates.
    #[serde(default, deserialize_with = "null_to_default")]
    pub config_ids: Vec<ConfigId>,
}

/// A plan: a container whose child runs are fetched separately.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// The plan's identifier.
    pub id: PlanId,
    /// The plan's display name.
    pub name: String,
}

/// Full plan payload from `get_plan`, carrying the child runs.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlanDetail {
    /// Entries in declaration order. A plan with no entries contributes
    /// nothing.
    #[serde(default, deserialize_with = "null_to_default")]
    pub entries: Vec<PlanEntry>,
}

/// One entry of a plan, owning zero or more child runs.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Child runs in declaration order.
    #[serde(default, deserialize_with = "null_to_default")]
    pub runs: Vec<Run>,
}

/// Per-run rollup: which statuses occurred in the run, and how often.
///
/// Derived from the `*_count` fields of a run payload. The service exposes
/// the five system statuses as named fields and custom statuses as
/// `custom_statusN_count`, where `N + 5` is the status ID.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StatusSummary {
    counts: BTreeMap<StatusId, u64>,
}

const SYSTEM_COUNT_FIELDS: &[(&str, StatusId)] = &[
    ("passed_count", StatusId(1)),
    ("blocked_count", StatusId(2)),
    ("untested_count", StatusId(3)),
    ("retest_count", StatusId(4)),
    ("failed_count", StatusId(5)),
];

impl StatusSummary {
    /// Extracts a summary from a raw run payload.
    pub fn from_run_payload(payload: &serde_json::Value) -> Self {
        let mut counts = BTreeMap::new();
        let Some(object) = payload.as_object() else {
            return Self { counts };
        };

        for (field, id) in SYSTEM_COUNT_FIELDS {
            if let Some(count) = object.get(*field).and_then(serde_json::Value::as_u64) {
                counts.insert(*id, count);
            }
        }
        for (field, value) in object {
            let Some(rest) = field.strip_prefix("custom_status") else {
                continue;
            };
            let Some(index) = rest.strip_suffix("_count") else {
                continue;
            };
            if let (Ok(index), Some(count)) = (index.parse::<u64>(), value.as_u64()) {
                counts.insert(StatusId(index + 5), count);
            }
        }

        Self { counts }
    }

    /// Returns the number of tests in this run with the given status.
    pub fn count(&self, id: StatusId) -> u64 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Returns true if at least one test in this run received the status.
    pub fn satisfies(&self, id: StatusId) -> bool {
        self.count(id) > 0
    }
}

// The service serializes "no associations" as either a missing field or an
// explicit null; serde's #[serde(default)] only covers the former.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn run_without_config_ids_deserializes_empty() {
        let standalone: Run = serde_json::from_value(json!({
            "id": 100,
            "name": "Nightly",
            "is_completed": false,
        }))
        .expect("standalone run payload should deserialize");
        assert_eq!(standalone.config_ids, Vec::<ConfigId>::new());

        let null_configs: Run = serde_json::from_value(json!({
            "id": 101,
            "name": "PlanA-Linux",
            "config_ids": null,
        }))
        .expect("null config_ids should deserialize");
        assert_eq!(null_configs.config_ids, Vec::<ConfigId>::new());

        let with_configs: Run = serde_json::from_value(json!({
            "id": 102,
            "name": "PlanA-Win",
            "config_ids": [2, 4],
        }))
        .expect("config_ids should deserialize");
        assert_eq!(with_configs.config_ids, vec![ConfigId(2), ConfigId(4)]);
    }

    #[test]
    fn summary_maps_system_and_custom_counts() {
        let summary = StatusSummary::from_run_payload(&json!({
            "id": 100,
            "name": "Nightly",
            "passed_count": 12,
            "blocked_count": 0,
            "untested_count": 3,
            "retest_count": 0,
            "failed_count": 2,
            "custom_status1_count": 0,
            "custom_status3_count": 7,
        }));

        assert_eq!(summary.count(StatusId(1)), 12);
        assert_eq!(summary.count(StatusId(3)), 3);
        assert_eq!(summary.count(StatusId(5)), 2);
        // custom_status3 maps to status ID 8.
        assert_eq!(summary.count(StatusId(8)), 7);

        assert!(summary.satisfies(StatusId(1)));
        assert!(!summary.satisfies(StatusId(2)));
        assert!(!summary.satisfies(StatusId(6)));
    }

    #[test]
    fn summary_of_non_object_payload_is_empty() {
        let summary = StatusSummary::from_run_payload(&json!([1, 2, 3]));
        assert_eq!(summary, StatusSummary::default());
        assert!(!summary.satisfies(StatusId(1)));
    }
}
