// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Input limits.

use std::collections::HashSet;

use tabspace_server_auth::{Directory, RepositoryTab};
use tabspace_server_config::LimitsConfig;

use crate::error::{Result, ServiceError};

pub(crate) fn validate_name(limits: &LimitsConfig, name: &str) -> Result<()> {
	if name.trim().is_empty() {
		return Err(ServiceError::Validation("name must not be empty".to_string()));
	}
	if name.chars().count() > limits.max_name_len {
		return Err(ServiceError::Validation(format!(
			"name is longer than {} characters",
			limits.max_name_len
		)));
	}
	Ok(())
}

pub(crate) fn validate_description(limits: &LimitsConfig, description: Option<&str>) -> Result<()> {
	match description {
		Some(d) if d.chars().count() > limits.max_description_len => Err(ServiceError::Validation(format!(
			"description is longer than {} characters",
			limits.max_description_len
		))),
		_ => Ok(()),
	}
}

pub(crate) fn validate_contributor_count(limits: &LimitsConfig, count: usize) -> Result<()> {
	if count > limits.max_contributors {
		return Err(ServiceError::Validation(format!(
			"a repository can have at most {} contributors",
			limits.max_contributors
		)));
	}
	Ok(())
}

/// Checks the tab count and that every tab's parent directory exists.
pub(crate) fn validate_tabs(
	limits: &LimitsConfig,
	tabs: &[RepositoryTab],
	directories: &[Directory],
) -> Result<()> {
	if tabs.len() > limits.max_tabs {
		return Err(ServiceError::Validation(format!(
			"a repository can have at most {} tabs",
			limits.max_tabs
		)));
	}

	let known: HashSet<_> = directories.iter().map(|d| d.id).collect();
	if let Some(tab) = tabs
		.iter()
		.find(|t| t.parent_directory.is_some_and(|p| !known.contains(&p)))
	{
		return Err(ServiceError::Validation(format!(
			"tab {} refers to an unknown directory",
			tab.id
		)));
	}
	Ok(())
}
