// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission matrix documents.
//!
//! By default the compiled-in documents are used. When `dir` is set, all four
//! role documents are read from that directory instead; a missing file or a
//! document with missing keys fails configuration loading.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tabspace_server_auth::{PermissionDocuments, Role, RoleRegistry};
use tracing::debug;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PermissionsConfigLayer {
	#[serde(default)]
	pub dir: Option<PathBuf>,
}

impl PermissionsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.dir.is_some() {
			self.dir = other.dir;
		}
	}

	/// Reads and validates the documents.
	///
	/// # Errors
	/// - [`ConfigError::FileRead`] if a role document cannot be read
	/// - [`ConfigError::Permissions`] if a document is incomplete or malformed
	pub fn finalize(self) -> Result<PermissionsConfig, ConfigError> {
		let documents = match &self.dir {
			Some(dir) => read_documents(dir)?,
			None => PermissionDocuments::builtin(),
		};
		let registry = RoleRegistry::from_documents(&documents)?;

		Ok(PermissionsConfig {
			dir: self.dir,
			registry,
		})
	}
}

/// Resolved permission configuration holding the validated registry.
#[derive(Debug, Clone)]
pub struct PermissionsConfig {
	pub dir: Option<PathBuf>,
	pub registry: RoleRegistry,
}

fn read_documents(dir: &Path) -> Result<PermissionDocuments, ConfigError> {
	let read = |role: Role| {
		let path = dir.join(role.document_name());
		debug!(path = %path.display(), role = %role, "reading permission document");
		std::fs::read_to_string(&path).map_err(|source| ConfigError::FileRead { path, source })
	};

	Ok(PermissionDocuments {
		workspace_owner: read(Role::WorkspaceOwner)?,
		workspace_moderator: read(Role::WorkspaceModerator)?,
		workspace_member: read(Role::WorkspaceMember)?,
		repository_contributor: read(Role::RepositoryContributor)?,
	})
}
