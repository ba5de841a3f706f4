// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One-off access decisions against the stored documents.

use std::fmt;

use anyhow::{bail, Context};
use tabspace_server_auth::{
	AccessControl, ActionPath, AuthzError, RepositoryId, UserId, WorkspaceId,
};
use tabspace_server_db::{RepositoryStore, WorkspaceStore};

/// Outcome of a `check` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
	Allow,
	Deny(AuthzError),
}

impl fmt::Display for Decision {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Decision::Allow => f.write_str("allow"),
			Decision::Deny(reason) => write!(f, "deny ({reason})"),
		}
	}
}

pub struct CheckRequest {
	pub workspace: WorkspaceId,
	pub repository: Option<RepositoryId>,
	pub user: Option<UserId>,
	pub action: ActionPath,
}

/// Runs the request through [`AccessControl`]. Denials are a [`Decision`];
/// authorization defects and storage failures are errors.
pub async fn run_check(
	workspaces: &dyn WorkspaceStore,
	repositories: &dyn RepositoryStore,
	access: &AccessControl,
	request: &CheckRequest,
) -> anyhow::Result<Decision> {
	let workspace = workspaces
		.get_workspace_by_id(&request.workspace)
		.await
		.context("loading workspace")?;

	let result = match &request.repository {
		Some(id) => {
			let Some(repository) = repositories
				.get_repository_by_id(id)
				.await
				.context("loading repository")?
			else {
				bail!("repository {id} does not exist");
			};
			access.check_repository_access(
				&repository,
				workspace.as_ref(),
				request.user.as_ref(),
				&request.action,
			)
		}
		None => match &workspace {
			Some(ws) => access.check_workspace_access(ws, request.user.as_ref(), &request.action),
			None => Err(AuthzError::ResourceNotFound),
		},
	};

	match result {
		Ok(()) => Ok(Decision::Allow),
		Err(e) if e.is_defect() => Err(e.into()),
		Err(e) => Ok(Decision::Deny(e)),
	}
}
