// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Action paths addressing a boolean leaf of a permission matrix.

use std::fmt;

use crate::error::AuthzError;

/// Ordered path of matrix keys, e.g. `["repository", "tabs", "update"]`.
///
/// Segments never contain `.`; the dotted form is only a display and
/// command-line convenience.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionPath {
	segments: Vec<String>,
}

impl ActionPath {
	pub fn new<I, S>(segments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			segments: segments.into_iter().map(Into::into).collect(),
		}
	}

	/// Parses `repository.tabs.update` into its segments.
	///
	/// # Errors
	/// Returns [`AuthzError::MalformedPermissionPath`] when the input is empty
	/// or contains an empty segment.
	pub fn from_dotted(dotted: &str) -> Result<Self, AuthzError> {
		let segments: Vec<&str> = dotted.split('.').collect();
		if segments.iter().any(|s| s.trim().is_empty()) {
			return Err(AuthzError::MalformedPermissionPath {
				path: dotted.to_string(),
			});
		}
		Ok(Self::new(segments))
	}

	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.segments.iter().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.segments.len()
	}

	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	/// Returns a new path with `segment` appended.
	pub fn child(&self, segment: impl Into<String>) -> Self {
		let mut segments = self.segments.clone();
		segments.push(segment.into());
		Self { segments }
	}
}

impl fmt::Display for ActionPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.segments.join("."))
	}
}

impl<const N: usize> From<[&str; N]> for ActionPath {
	fn from(segments: [&str; N]) -> Self {
		Self::new(segments)
	}
}

impl From<&[&str]> for ActionPath {
	fn from(segments: &[&str]) -> Self {
		Self::new(segments.iter().copied())
	}
}

/// The action paths used by the service layer.
pub mod actions {
	pub const WORKSPACE_READ: [&str; 2] = ["workspace", "read"];
	pub const WORKSPACE_UPDATE: [&str; 2] = ["workspace", "update"];
	pub const WORKSPACE_DELETE: [&str; 2] = ["workspace", "delete"];
	pub const WORKSPACE_UPDATE_PERMISSION: [&str; 2] = ["workspace", "updatePermission"];
	pub const WORKSPACE_TRANSFER_OWNERSHIP: [&str; 2] = ["workspace", "transferOwnership"];
	pub const WORKSPACE_MODERATOR_CREATE: [&str; 3] = ["workspace", "moderator", "create"];
	pub const WORKSPACE_MODERATOR_DELETE: [&str; 3] = ["workspace", "moderator", "delete"];
	pub const WORKSPACE_MEMBER_CREATE: [&str; 3] = ["workspace", "member", "create"];
	pub const WORKSPACE_MEMBER_DELETE: [&str; 3] = ["workspace", "member", "delete"];

	pub const REPOSITORY_CREATE: [&str; 2] = ["repository", "create"];
	pub const REPOSITORY_READ: [&str; 2] = ["repository", "read"];
	pub const REPOSITORY_UPDATE: [&str; 2] = ["repository", "update"];
	pub const REPOSITORY_DELETE: [&str; 2] = ["repository", "delete"];
	pub const REPOSITORY_TABS_CREATE: [&str; 3] = ["repository", "tabs", "create"];
	pub const REPOSITORY_TABS_UPDATE: [&str; 3] = ["repository", "tabs", "update"];
	pub const REPOSITORY_TABS_DELETE: [&str; 3] = ["repository", "tabs", "delete"];
	pub const REPOSITORY_ACCESS_CREATE: [&str; 3] = ["repository", "access", "create"];
	pub const REPOSITORY_ACCESS_UPDATE: [&str; 3] = ["repository", "access", "update"];
	pub const REPOSITORY_ACCESS_DELETE: [&str; 3] = ["repository", "access", "delete"];
	pub const REPOSITORY_CONTRIBUTOR_CREATE: [&str; 3] = ["repository", "contributor", "create"];
	pub const REPOSITORY_CONTRIBUTOR_DELETE: [&str; 3] = ["repository", "contributor", "delete"];
}
