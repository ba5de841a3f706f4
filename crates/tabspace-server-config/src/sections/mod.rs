// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod database;
mod limits;
mod logging;
mod permissions;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use limits::{
	LimitsConfig, LimitsConfigLayer, DEFAULT_MAX_CONTRIBUTORS, DEFAULT_MAX_DESCRIPTION_LEN,
	DEFAULT_MAX_NAME_LEN, DEFAULT_MAX_TABS,
};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use permissions::{PermissionsConfig, PermissionsConfigLayer};
