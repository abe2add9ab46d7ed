// Copyright (c) The runlist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! List test runs in a test-management project, filtered by configuration
//! and status.
//!
//! This crate is the CLI surface over [`runlist_client`]; the selection
//! algorithm lives there.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod exit_codes;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use exit_codes::*;
#[doc(hidden)]
pub use output::OutputWriter;
