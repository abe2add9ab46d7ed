// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client and run-selection logic for runlist.
//!
//! This crate talks to a TestRail-compatible test-management service and
//! implements the run enumeration pipeline used by the `runlist` binary:
//! resolving names to service identifiers, collecting standalone and
//! plan-nested runs, exact-set configuration matching, and status rollup
//! filtering.
//!
//! All network access goes through the [`Transport`](transport::Transport)
//! trait, so everything above the wire can be exercised against the
//! deterministic [`MockTransport`](mock::MockTransport).

#![warn(missing_docs)]

pub mod client;
pub mod creds;
pub mod errors;
pub mod mock;
pub mod models;
pub mod select;
pub mod transport;
