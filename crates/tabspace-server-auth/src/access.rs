// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access checks on workspaces and repositories.
//!
//! [`AccessControl`] is the single entry point the service layer calls. For a
//! repository action it applies, in order:
//!
//! 1. the permitted-user allow-list, which grants everything
//! 2. the owning workspace, which must be present ([`AuthzError::ResourceNotFound`])
//! 3. the actor's workspace role
//! 4. the contributor fallback for actors with no workspace role
//! 5. the role's permission matrix
//!
//! Workspace actions use the role alone. Read actions on public resources
//! pass through the [`Visible`] gate first.
//!
//! All checks are pure functions of the documents passed in. Callers load
//! fresh documents immediately before the check and save immediately after;
//! a concurrent revocation between the two is not detected.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::access_override::is_overridden;
use crate::error::AuthzError;
use crate::membership::MembershipResolver;
use crate::permission::{actions, ActionPath, PermissionEvaluator, RoleRegistry};
use crate::repository::Repository;
use crate::types::{Role, UserId};
use crate::visibility::Visible;
use crate::workspace::Workspace;

/// Composes membership, allow-list, visibility and matrix evaluation.
#[derive(Debug, Clone)]
pub struct AccessControl {
	evaluator: PermissionEvaluator,
}

impl AccessControl {
	pub fn new(evaluator: PermissionEvaluator) -> Self {
		Self { evaluator }
	}

	/// Access control over the given registry.
	pub fn with_registry(registry: RoleRegistry) -> Self {
		Self::new(PermissionEvaluator::new(Arc::new(registry)))
	}

	/// Access control over the compiled-in permission documents.
	pub fn builtin() -> Result<Self, AuthzError> {
		Ok(Self::with_registry(RoleRegistry::builtin()?))
	}

	pub fn evaluator(&self) -> &PermissionEvaluator {
		&self.evaluator
	}

	/// The user's role in the workspace, for display.
	pub fn role_of(&self, workspace: &Workspace, user_id: &UserId) -> Option<Role> {
		MembershipResolver::role_of(workspace, user_id)
	}

	/// The role used to evaluate `user_id` against `repository`: their
	/// workspace role, else [`Role::RepositoryContributor`] if they are a
	/// contributor, else none.
	pub fn effective_repository_role(
		&self,
		repository: &Repository,
		workspace: &Workspace,
		user_id: Option<&UserId>,
	) -> Option<Role> {
		let user_id = user_id?;
		MembershipResolver::role_of(workspace, user_id).or_else(|| {
			repository
				.is_contributor(user_id)
				.then_some(Role::RepositoryContributor)
		})
	}

	/// Checks a workspace action against the actor's role.
	#[instrument(
		level = "debug",
		skip(self, workspace),
		fields(workspace_id = %workspace.id, action = %action)
	)]
	pub fn check_workspace_access(
		&self,
		workspace: &Workspace,
		actor: Option<&UserId>,
		action: &ActionPath,
	) -> Result<(), AuthzError> {
		let role = actor.and_then(|id| MembershipResolver::role_of(workspace, id));
		let result = self.evaluator.require_or_fail(role, action);
		log_decision(&result, role);
		result
	}

	/// Checks a repository action. `workspace` is the owning workspace as
	/// loaded by the caller, or `None` if it no longer exists.
	#[instrument(
		level = "debug",
		skip(self, repository, workspace),
		fields(repository_id = %repository.id, action = %action)
	)]
	pub fn check_repository_access(
		&self,
		repository: &Repository,
		workspace: Option<&Workspace>,
		actor: Option<&UserId>,
		action: &ActionPath,
	) -> Result<(), AuthzError> {
		if is_overridden(repository, actor) {
			debug!("permitted user");
			return Ok(());
		}

		let Some(workspace) = workspace.filter(|ws| ws.id == repository.workspace_id) else {
			debug!("owning workspace missing");
			return Err(AuthzError::ResourceNotFound);
		};

		let role = self.effective_repository_role(repository, workspace, actor);
		let result = self.evaluator.require_or_fail(role, action);
		log_decision(&result, role);
		result
	}

	/// Read check on a workspace: public workspaces are open to anyone,
	/// private ones need `workspace.read`.
	pub fn check_workspace_read(
		&self,
		workspace: &Workspace,
		actor: Option<&UserId>,
	) -> Result<(), AuthzError> {
		if workspace.can_read_publicly() {
			return Ok(());
		}
		self.check_workspace_access(workspace, actor, &actions::WORKSPACE_READ.into())
	}

	/// Read check on a repository: public repositories open to everyone with
	/// the link skip the chain, all others need `repository.read`.
	pub fn check_repository_read(
		&self,
		repository: &Repository,
		workspace: Option<&Workspace>,
		actor: Option<&UserId>,
	) -> Result<(), AuthzError> {
		if repository.can_read_publicly() {
			return Ok(());
		}
		self.check_repository_access(repository, workspace, actor, &actions::REPOSITORY_READ.into())
	}
}

fn log_decision(result: &Result<(), AuthzError>, role: Option<Role>) {
	match result {
		Ok(()) => debug!(role = ?role, "access granted"),
		Err(e) if e.is_defect() => error!(role = ?role, error = %e, "authorization defect"),
		Err(_) => debug!(role = ?role, "access denied"),
	}
}
