// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization error types.
//!
//! Two families share this enum and must never be conflated:
//!
//! - **Outcomes**: [`AuthzError::PermissionDenied`] and
//!   [`AuthzError::ResourceNotFound`] are expected results surfaced to users.
//! - **Defects**: malformed action paths, unknown roles, corrupt membership
//!   data and invalid permission documents are programming or data errors.
//!   See [`AuthzError::is_defect`].

use thiserror::Error;

/// Errors produced while deciding access to a workspace or repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
	// =========================================================================
	// Outcomes
	// =========================================================================
	/// The actor lacks the requested right.
	#[error("permission denied for {action}")]
	PermissionDenied { action: String },

	/// The resource or its owning workspace does not exist.
	#[error("resource not found")]
	ResourceNotFound,

	// =========================================================================
	// Defects
	// =========================================================================
	/// The action path does not resolve to a boolean leaf of the matrix.
	#[error("malformed permission path: {path}")]
	MalformedPermissionPath { path: String },

	/// A persisted role index is outside the known range.
	#[error("unknown role index: {0}")]
	UnknownRole(i64),

	/// A role name is not one of the four stable identifiers.
	#[error("unknown role name: {0}")]
	UnknownRoleName(String),

	/// A workspace's member and role lists do not correspond.
	#[error("corrupt membership data: {0}")]
	CorruptMembershipData(String),

	/// A role's permission document is missing keys or has the wrong shape.
	#[error("invalid permission document for {role}: {message}")]
	InvalidPermissionDocument { role: String, message: String },
}

impl AuthzError {
	/// Builds a denial for the given action path.
	pub fn denied(action: impl ToString) -> Self {
		AuthzError::PermissionDenied {
			action: action.to_string(),
		}
	}

	/// Returns true for invariant violations that must be logged as failures
	/// rather than reported as a denial.
	pub fn is_defect(&self) -> bool {
		!matches!(
			self,
			AuthzError::PermissionDenied { .. } | AuthzError::ResourceNotFound
		)
	}

	/// Returns true for a normal "not authorized" outcome.
	pub fn is_denial(&self) -> bool {
		matches!(self, AuthzError::PermissionDenied { .. })
	}
}

pub type Result<T> = std::result::Result<T, AuthzError>;
