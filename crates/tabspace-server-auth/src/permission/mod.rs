// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role-indexed permission matrices and their evaluation.
//!
//! - [`PermissionMatrix`]: one immutable boolean table per role
//! - [`RoleRegistry`]: maps each [`Role`](crate::Role) to its matrix
//! - [`PermissionEvaluator`]: walks an [`ActionPath`] through a role's matrix

pub mod action;
pub mod evaluator;
pub mod matrix;
pub mod registry;

pub use action::{actions, ActionPath};
pub use evaluator::PermissionEvaluator;
pub use matrix::{
	CreateDelete, CreateUpdateDelete, PermissionMatrix, RepositoryPermissions, RolePermissions,
	WorkspacePermissions,
};
pub use registry::{PermissionDocuments, RoleRegistry};
