// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for workspace and repository authorization.
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs ([`UserId`], [`WorkspaceId`],
//!   [`RepositoryId`], ...) preventing accidental mixing
//! - **Roles**: the three workspace roles plus the repository-scoped
//!   contributor ([`Role`])
//! - **Visibility**: coarse public/private flag ([`Visibility`])
//! - **Link access**: who may open a public repository ([`AccessPermission`])
//!
//! Role identifiers are persisted. [`Role`] serializes as its integer index
//! and displays as its stable name; neither may change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AuthzError;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(WorkspaceId, "Unique identifier for a workspace.");
define_id_type!(RepositoryId, "Unique identifier for a repository.");
define_id_type!(TabId, "Unique identifier for a repository tab.");
define_id_type!(DirectoryId, "Unique identifier for a repository directory.");

// =============================================================================
// Roles
// =============================================================================

/// Roles a user can hold relative to a workspace or repository.
///
/// The three workspace roles nest by convention (owner ⊇ moderator ⊇ member).
/// [`Role::RepositoryContributor`] is repository-scoped and never appears in a
/// workspace's member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Role {
	/// Created the workspace; holds every permission.
	WorkspaceOwner,
	/// Manages members and repositories, cannot delete the workspace.
	WorkspaceModerator,
	/// Standard member access.
	WorkspaceMember,
	/// Granted on a single repository, independent of workspace membership.
	RepositoryContributor,
}

impl Role {
	/// Returns all roles in index order.
	pub fn all() -> &'static [Role] {
		&[
			Role::WorkspaceOwner,
			Role::WorkspaceModerator,
			Role::WorkspaceMember,
			Role::RepositoryContributor,
		]
	}

	/// Persisted integer index of this role.
	pub fn index(self) -> usize {
		match self {
			Role::WorkspaceOwner => 0,
			Role::WorkspaceModerator => 1,
			Role::WorkspaceMember => 2,
			Role::RepositoryContributor => 3,
		}
	}

	/// Resolves a persisted integer index.
	///
	/// # Errors
	/// Returns [`AuthzError::UnknownRole`] for indices outside `0..=3`.
	pub fn from_index(index: i64) -> Result<Self, AuthzError> {
		match index {
			0 => Ok(Role::WorkspaceOwner),
			1 => Ok(Role::WorkspaceModerator),
			2 => Ok(Role::WorkspaceMember),
			3 => Ok(Role::RepositoryContributor),
			other => Err(AuthzError::UnknownRole(other)),
		}
	}

	/// Stable role name.
	pub fn as_str(self) -> &'static str {
		match self {
			Role::WorkspaceOwner => "WorkspaceOwner",
			Role::WorkspaceModerator => "WorkspaceModerator",
			Role::WorkspaceMember => "WorkspaceMember",
			Role::RepositoryContributor => "RepositoryContributor",
		}
	}

	/// File name of this role's permission document.
	pub fn document_name(self) -> &'static str {
		match self {
			Role::WorkspaceOwner => "workspace-owner.json",
			Role::WorkspaceModerator => "workspace-moderator.json",
			Role::WorkspaceMember => "workspace-member.json",
			Role::RepositoryContributor => "repository-contributor.json",
		}
	}

	/// Returns true for the roles stored in a workspace's member list.
	pub fn is_workspace_role(self) -> bool {
		!matches!(self, Role::RepositoryContributor)
	}

	/// Returns true if this role has at least the permissions of the given
	/// workspace role. The contributor role is comparable only to itself.
	pub fn has_permission_of(&self, other: &Role) -> bool {
		matches!(
			(self, other),
			(Role::WorkspaceOwner, Role::WorkspaceOwner | Role::WorkspaceModerator | Role::WorkspaceMember)
				| (Role::WorkspaceModerator, Role::WorkspaceModerator | Role::WorkspaceMember)
				| (Role::WorkspaceMember, Role::WorkspaceMember)
				| (Role::RepositoryContributor, Role::RepositoryContributor)
		)
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Role {
	type Err = AuthzError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Role::all()
			.iter()
			.copied()
			.find(|role| role.as_str() == s)
			.ok_or_else(|| match s.parse::<i64>() {
				Ok(index) => AuthzError::UnknownRole(index),
				Err(_) => AuthzError::UnknownRoleName(s.to_string()),
			})
	}
}

impl TryFrom<i64> for Role {
	type Error = AuthzError;

	fn try_from(index: i64) -> Result<Self, Self::Error> {
		Role::from_index(index)
	}
}

impl From<Role> for i64 {
	fn from(role: Role) -> Self {
		role.index() as i64
	}
}

// =============================================================================
// Visibility
// =============================================================================

/// Visibility of a workspace or repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
	/// Readable by members, contributors and permitted users only.
	#[default]
	Private,
	/// Readable by anyone, including anonymous callers.
	Public,
}

impl Visibility {
	pub fn as_str(&self) -> &'static str {
		match self {
			Visibility::Private => "private",
			Visibility::Public => "public",
		}
	}
}

impl fmt::Display for Visibility {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Visibility {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"private" => Ok(Visibility::Private),
			"public" => Ok(Visibility::Public),
			_ => Err(()),
		}
	}
}

// =============================================================================
// Link Access
// =============================================================================

/// Who may open a repository through its link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPermission {
	/// Anyone holding the link, when the repository is public.
	EveryoneWithTheLink,
	/// Only members, contributors and permitted users.
	OnlyPeopleWhoHasAccess,
}

impl AccessPermission {
	/// Default link access for a newly created repository.
	pub fn default_for(visibility: Visibility) -> Self {
		match visibility {
			Visibility::Public => AccessPermission::EveryoneWithTheLink,
			Visibility::Private => AccessPermission::OnlyPeopleWhoHasAccess,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			AccessPermission::EveryoneWithTheLink => "everyone_with_the_link",
			AccessPermission::OnlyPeopleWhoHasAccess => "only_people_who_has_access",
		}
	}
}

impl fmt::Display for AccessPermission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for AccessPermission {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"everyone_with_the_link" => Ok(AccessPermission::EveryoneWithTheLink),
			"only_people_who_has_access" => Ok(AccessPermission::OnlyPeopleWhoHasAccess),
			_ => Err(()),
		}
	}
}
