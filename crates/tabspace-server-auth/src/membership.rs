// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workspace membership.
//!
//! Membership is held as one ordered list of `(user, role)` pairs so that a
//! user and their role can never drift apart. The persisted document still
//! carries two parallel arrays (`members`, `roles`); [`WorkspaceMembers::from_parallel`]
//! and [`WorkspaceMembers::to_parallel`] are the only bridge between the two
//! shapes, and decoding rejects arrays that do not correspond.

use serde::{Deserialize, Serialize};

use crate::error::AuthzError;
use crate::types::{Role, UserId};
use crate::workspace::Workspace;

/// A user's role within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMember {
	pub user_id: UserId,
	pub role: Role,
}

/// Ordered member list of a workspace. Each user appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceMembers(Vec<WorkspaceMember>);

impl WorkspaceMembers {
	/// A member list containing only the owner.
	pub fn with_owner(owner: UserId) -> Self {
		Self(vec![WorkspaceMember {
			user_id: owner,
			role: Role::WorkspaceOwner,
		}])
	}

	/// Decodes the persisted parallel arrays, where `roles[i]` is the role of
	/// `members[i]`.
	///
	/// # Errors
	/// - [`AuthzError::CorruptMembershipData`] if the arrays differ in length or
	///   a user is listed twice
	/// - [`AuthzError::UnknownRole`] if a role index is out of range
	pub fn from_parallel(members: Vec<UserId>, roles: Vec<i64>) -> Result<Self, AuthzError> {
		if members.len() != roles.len() {
			return Err(AuthzError::CorruptMembershipData(format!(
				"{} members but {} roles",
				members.len(),
				roles.len()
			)));
		}

		let mut list = Self::default();
		for (user_id, role) in members.into_iter().zip(roles) {
			let role = Role::from_index(role)?;
			if !list.insert(user_id, role) {
				return Err(AuthzError::CorruptMembershipData(format!(
					"user {user_id} listed more than once"
				)));
			}
		}
		Ok(list)
	}

	/// Encodes into the persisted parallel arrays. Both arrays are produced
	/// from the same list, in the same order.
	pub fn to_parallel(&self) -> (Vec<UserId>, Vec<i64>) {
		self.0.iter().map(|m| (m.user_id, i64::from(m.role))).unzip()
	}

	pub fn role_of(&self, user_id: &UserId) -> Option<Role> {
		self.0.iter().find(|m| m.user_id == *user_id).map(|m| m.role)
	}

	pub fn contains(&self, user_id: &UserId) -> bool {
		self.role_of(user_id).is_some()
	}

	/// Appends a member. Returns false if the user is already listed.
	pub fn insert(&mut self, user_id: UserId, role: Role) -> bool {
		if self.contains(&user_id) {
			return false;
		}
		self.0.push(WorkspaceMember { user_id, role });
		true
	}

	/// Removes a member, returning the role they held.
	pub fn remove(&mut self, user_id: &UserId) -> Option<Role> {
		let index = self.0.iter().position(|m| m.user_id == *user_id)?;
		Some(self.0.remove(index).role)
	}

	/// Changes a member's role, returning the previous one.
	pub fn set_role(&mut self, user_id: &UserId, role: Role) -> Option<Role> {
		let member = self.0.iter_mut().find(|m| m.user_id == *user_id)?;
		Some(std::mem::replace(&mut member.role, role))
	}

	pub fn iter(&self) -> impl Iterator<Item = &WorkspaceMember> {
		self.0.iter()
	}

	pub fn user_ids(&self) -> impl Iterator<Item = UserId> + '_ {
		self.0.iter().map(|m| m.user_id)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Resolves a user's role inside a workspace.
pub struct MembershipResolver;

impl MembershipResolver {
	/// The user's role in `workspace`, or `None` if they are not a member.
	pub fn role_of(workspace: &Workspace, user_id: &UserId) -> Option<Role> {
		workspace.members.role_of(user_id)
	}

	/// Resolves a role directly from persisted parallel arrays without decoding
	/// the whole list.
	///
	/// # Errors
	/// Returns [`AuthzError::CorruptMembershipData`] if the user's index has no
	/// corresponding role, and [`AuthzError::UnknownRole`] for an out of range
	/// role index.
	pub fn role_in_parallel(
		members: &[UserId],
		roles: &[i64],
		user_id: &UserId,
	) -> Result<Option<Role>, AuthzError> {
		let Some(index) = members.iter().position(|m| m == user_id) else {
			return Ok(None);
		};
		let role = roles.get(index).ok_or_else(|| {
			AuthzError::CorruptMembershipData(format!(
				"member index {index} has no role ({} roles)",
				roles.len()
			))
		})?;
		Role::from_index(*role).map(Some)
	}
}
