// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The run selection pipeline.
//!
//! A single forward pass with no branching back: resolve names, collect
//! candidates, filter, return. Each stage either hands its output to the
//! next or aborts the invocation with a tagged error; no partial result
//! ever escapes.

use crate::{
    client::Client,
    errors::ApiError,
    models::{ConfigId, Run},
};

/// What to select: a project plus optional configuration and status
/// filters.
///
/// Assembled once from flags/prompts and passed by reference; the
/// pipeline never mutates it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RunQuery {
    /// Project name, resolved against `get_projects`.
    pub project: String,
    /// Configuration names; when non-empty, only plan-child runs whose
    /// configuration set is exactly this set qualify.
    pub configs: Vec<String>,
    /// Status names; when non-empty, a run must contain every one of
    /// these statuses to qualify.
    pub statuses: Vec<String>,
}

/// Runs the selection pipeline and returns matching runs in collection
/// order: standalone runs first (when no configuration filter is active),
/// then qualifying plan-child runs in plan/entry iteration order.
pub fn select_runs(client: &Client, query: &RunQuery) -> Result<Vec<Run>, ApiError> {
    // Statuses resolve before anything project-scoped: an unknown status
    // name must not cost a single collection request.
    let status_ids = client.status_ids(&query.statuses)?;
    let project = client.project_by_name(&query.project)?;

    let config_filter = if query.configs.is_empty() {
        Vec::new()
    } else {
        client.configuration_ids(project.id, &query.configs)?
    };

    // The general run listing carries no configuration associations, so
    // standalone runs are not eligible for configuration filtering. They
    // drop out entirely when a filter is active.
    let mut runs = if config_filter.is_empty() {
        client.runs(project.id)?
    } else {
        Vec::new()
    };

    for plan in client.plans(project.id)? {
        for run in client.plan_runs(&plan)? {
            if config_filter.is_empty() || config_set_matches(&config_filter, &run) {
                runs.push(run);
            }
        }
    }

    if !status_ids.is_empty() {
        let summaries = client.status_summaries(&runs)?;
        // Requested statuses compose with AND semantics. A run without a
        // summary is non-matching, not an error.
        for status_id in &status_ids {
            runs.retain(|run| {
                summaries
                    .get(&run.id)
                    .is_some_and(|summary| summary.satisfies(*status_id))
            });
        }
    }

    Ok(runs)
}

/// Exact-set comparison of a run's configuration IDs against the filter.
///
/// Equal cardinality plus containment implies set equality, given no
/// duplicates on either side. A run configured for {A, B} does not match
/// a filter of {A} alone: this is deliberate, not an overlap test.
fn config_set_matches(filter: &[ConfigId], run: &Run) -> bool {
    run.config_ids.len() == filter.len()
        && filter.iter().all(|id| run.config_ids.contains(id))
}
