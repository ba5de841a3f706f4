// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workspace documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthzError;
use crate::membership::WorkspaceMembers;
use crate::types::{Role, UserId, Visibility, WorkspaceId};

/// A workspace groups repositories under one membership list.
///
/// Serializes as the stored document shape, with parallel `members` / `roles`
/// arrays; deserializing a document whose arrays do not correspond fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WorkspaceDocument", into = "WorkspaceDocument")]
pub struct Workspace {
	pub id: WorkspaceId,
	pub owner: UserId,
	pub name: String,
	pub description: Option<String>,
	pub visibility: Visibility,
	pub members: WorkspaceMembers,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Workspace {
	/// Creates a workspace whose only member is `owner`, holding
	/// [`Role::WorkspaceOwner`].
	pub fn new(
		owner: UserId,
		name: impl Into<String>,
		description: Option<String>,
		visibility: Visibility,
	) -> Self {
		let now = Utc::now();
		Self {
			id: WorkspaceId::generate(),
			owner,
			name: name.into(),
			description,
			visibility,
			members: WorkspaceMembers::with_owner(owner),
			created_at: now,
			updated_at: now,
		}
	}

	pub fn role_of(&self, user_id: &UserId) -> Option<Role> {
		self.members.role_of(user_id)
	}

	pub fn is_member(&self, user_id: &UserId) -> bool {
		self.members.contains(user_id)
	}

	pub fn is_public(&self) -> bool {
		self.visibility == Visibility::Public
	}

	/// Bumps `updated_at`.
	pub fn touch(&mut self) {
		self.updated_at = Utc::now();
	}
}

/// Stored shape of a [`Workspace`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceDocument {
	pub id: WorkspaceId,
	pub owner: UserId,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub visibility: Visibility,
	pub members: Vec<UserId>,
	pub roles: Vec<i64>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl TryFrom<WorkspaceDocument> for Workspace {
	type Error = AuthzError;

	fn try_from(doc: WorkspaceDocument) -> Result<Self, Self::Error> {
		Ok(Self {
			id: doc.id,
			owner: doc.owner,
			name: doc.name,
			description: doc.description,
			visibility: doc.visibility,
			members: WorkspaceMembers::from_parallel(doc.members, doc.roles)?,
			created_at: doc.created_at,
			updated_at: doc.updated_at,
		})
	}
}

impl From<Workspace> for WorkspaceDocument {
	fn from(workspace: Workspace) -> Self {
		let (members, roles) = workspace.members.to_parallel();
		Self {
			id: workspace.id,
			owner: workspace.owner,
			name: workspace.name,
			description: workspace.description,
			visibility: workspace.visibility,
			members,
			roles,
			created_at: workspace.created_at,
			updated_at: workspace.updated_at,
		}
	}
}
