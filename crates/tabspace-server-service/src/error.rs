// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Service error types.
//!
//! Authorization outcomes keep their own variants so that handlers can map
//! them to user-facing responses; authorization defects and storage failures
//! are kept whole for logging.

use tabspace_server_auth::AuthzError;
use tabspace_server_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
	/// The resource does not exist or the caller may not know it exists.
	#[error("not found")]
	NotFound,

	#[error("permission denied for {action}")]
	PermissionDenied { action: String },

	#[error("invalid request: {0}")]
	Validation(String),

	#[error("conflict: {0}")]
	Conflict(String),

	/// An authorization invariant was violated.
	#[error("authorization failure: {0}")]
	Authorization(AuthzError),

	#[error("storage failure: {0}")]
	Database(DbError),
}

impl ServiceError {
	/// Returns true for errors that indicate a bug or corrupt data rather than
	/// a rejected request.
	pub fn is_internal(&self) -> bool {
		matches!(
			self,
			ServiceError::Authorization(_) | ServiceError::Database(_)
		)
	}
}

impl From<AuthzError> for ServiceError {
	fn from(e: AuthzError) -> Self {
		match e {
			AuthzError::PermissionDenied { action } => ServiceError::PermissionDenied { action },
			AuthzError::ResourceNotFound => ServiceError::NotFound,
			defect => ServiceError::Authorization(defect),
		}
	}
}

impl From<DbError> for ServiceError {
	fn from(e: DbError) -> Self {
		match e {
			DbError::NotFound(_) => ServiceError::NotFound,
			DbError::Conflict(message) => ServiceError::Conflict(message),
			DbError::Corrupt(defect) => ServiceError::Authorization(defect),
			other => ServiceError::Database(other),
		}
	}
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Maps the outcome of a mutation check. A denial is reported as
/// [`ServiceError::NotFound`] when `read` shows the actor cannot see the
/// resource at all, so that private ids cannot be told apart from missing ones.
pub(crate) fn conceal_denial(
	check: std::result::Result<(), AuthzError>,
	read: impl FnOnce() -> std::result::Result<(), AuthzError>,
) -> Result<()> {
	match check {
		Ok(()) => Ok(()),
		Err(denial) if denial.is_denial() => match read() {
			Ok(()) => Err(denial.into()),
			Err(e) if e.is_defect() => Err(e.into()),
			Err(_) => Err(ServiceError::NotFound),
		},
		Err(e) => Err(e.into()),
	}
}
