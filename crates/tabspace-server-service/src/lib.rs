// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # tabspace-server-service
//!
//! Workspace and repository operations. Each one follows the same shape:
//! load the current documents, ask [`tabspace_server_auth::AccessControl`]
//! for a decision, change the document in memory and save it once.
//!
//! A denial on a resource the caller cannot read is reported as
//! [`ServiceError::NotFound`], the same as a missing id. Callers who can read
//! it get [`ServiceError::PermissionDenied`] for the actions they lack.

mod error;
pub mod repository;
mod validation;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use error::{Result, ServiceError};
pub use repository::{AccessKind, NewRepository, RepositoryService, RepositoryUpdate, UserAccess};
pub use workspace::{WorkspaceService, WorkspaceUpdate};
