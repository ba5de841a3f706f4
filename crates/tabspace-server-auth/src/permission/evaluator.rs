// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission evaluation over a [`RoleRegistry`].

use std::sync::Arc;

use tracing::instrument;

use super::action::ActionPath;
use super::registry::RoleRegistry;
use crate::error::AuthzError;
use crate::types::Role;

/// Answers "may role R perform action P" from the registry's matrices.
///
/// Holds no mutable state; clones share the registry.
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
	registry: Arc<RoleRegistry>,
}

impl PermissionEvaluator {
	pub fn new(registry: Arc<RoleRegistry>) -> Self {
		Self { registry }
	}

	pub fn registry(&self) -> &RoleRegistry {
		&self.registry
	}

	/// Resolves `path` in the matrix of `role`.
	///
	/// An actor without a role is never granted anything; no lookup happens.
	///
	/// # Errors
	/// Returns [`AuthzError::MalformedPermissionPath`] if `path` does not name
	/// a boolean leaf.
	pub fn evaluate(&self, role: Option<Role>, path: &ActionPath) -> Result<bool, AuthzError> {
		match role {
			Some(role) => self.registry.matrix_for(role).resolve(path),
			None => Ok(false),
		}
	}

	/// Like [`evaluate`](Self::evaluate) but turns `false` into
	/// [`AuthzError::PermissionDenied`].
	#[instrument(level = "debug", skip(self), fields(action = %path))]
	pub fn require_or_fail(&self, role: Option<Role>, path: &ActionPath) -> Result<(), AuthzError> {
		let Some(role) = role else {
			return Err(AuthzError::denied(path));
		};
		if self.evaluate(Some(role), path)? {
			Ok(())
		} else {
			Err(AuthzError::denied(path))
		}
	}
}
