// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role to permission matrix lookup.

use crate::error::AuthzError;
use crate::types::Role;

use super::matrix::PermissionMatrix;

const WORKSPACE_OWNER: &str = include_str!("../../permissions/workspace-owner.json");
const WORKSPACE_MODERATOR: &str = include_str!("../../permissions/workspace-moderator.json");
const WORKSPACE_MEMBER: &str = include_str!("../../permissions/workspace-member.json");
const REPOSITORY_CONTRIBUTOR: &str = include_str!("../../permissions/repository-contributor.json");

/// Raw JSON permission documents, one per role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDocuments {
	pub workspace_owner: String,
	pub workspace_moderator: String,
	pub workspace_member: String,
	pub repository_contributor: String,
}

impl PermissionDocuments {
	/// The documents compiled into this crate.
	pub fn builtin() -> Self {
		Self {
			workspace_owner: WORKSPACE_OWNER.to_string(),
			workspace_moderator: WORKSPACE_MODERATOR.to_string(),
			workspace_member: WORKSPACE_MEMBER.to_string(),
			repository_contributor: REPOSITORY_CONTRIBUTOR.to_string(),
		}
	}

	/// The document for the given role.
	pub fn for_role(&self, role: Role) -> &str {
		match role {
			Role::WorkspaceOwner => &self.workspace_owner,
			Role::WorkspaceModerator => &self.workspace_moderator,
			Role::WorkspaceMember => &self.workspace_member,
			Role::RepositoryContributor => &self.repository_contributor,
		}
	}
}

/// Fixed table of one [`PermissionMatrix`] per [`Role`].
///
/// Built once at startup and shared read-only; lookups never allocate or fail
/// for a known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
	matrices: [PermissionMatrix; 4],
}

impl RoleRegistry {
	pub fn new(
		workspace_owner: PermissionMatrix,
		workspace_moderator: PermissionMatrix,
		workspace_member: PermissionMatrix,
		repository_contributor: PermissionMatrix,
	) -> Self {
		Self {
			matrices: [
				workspace_owner,
				workspace_moderator,
				workspace_member,
				repository_contributor,
			],
		}
	}

	/// Parses all four documents.
	///
	/// # Errors
	/// Returns the first [`AuthzError::InvalidPermissionDocument`] encountered.
	pub fn from_documents(documents: &PermissionDocuments) -> Result<Self, AuthzError> {
		let load = |role: Role| PermissionMatrix::from_json(role.as_str(), documents.for_role(role));
		Ok(Self::new(
			load(Role::WorkspaceOwner)?,
			load(Role::WorkspaceModerator)?,
			load(Role::WorkspaceMember)?,
			load(Role::RepositoryContributor)?,
		))
	}

	/// Registry over the compiled-in documents.
	pub fn builtin() -> Result<Self, AuthzError> {
		Self::from_documents(&PermissionDocuments::builtin())
	}

	pub fn matrix_for(&self, role: Role) -> &PermissionMatrix {
		&self.matrices[role.index()]
	}

	/// Looks up a matrix by persisted role index.
	///
	/// # Errors
	/// Returns [`AuthzError::UnknownRole`] for indices outside the enum.
	pub fn matrix_for_index(&self, index: i64) -> Result<&PermissionMatrix, AuthzError> {
		Role::from_index(index).map(|role| self.matrix_for(role))
	}
}
