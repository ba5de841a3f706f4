// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization and visibility resolution for Tabspace.
//!
//! Four mechanisms decide whether an actor may act on a workspace or
//! repository:
//!
//! - **Visibility**: public resources are readable by anyone ([`Visible`])
//! - **Roles**: owner, moderator and member of the owning workspace, plus the
//!   repository-scoped contributor ([`Role`], [`MembershipResolver`])
//! - **Permission matrices**: one boolean table per role, addressed by
//!   [`ActionPath`] ([`PermissionMatrix`], [`RoleRegistry`])
//! - **Permitted users**: a per-repository allow-list that bypasses roles
//!   ([`is_overridden`])
//!
//! [`AccessControl`] composes them in a fixed order and is what callers use.
//! Everything here is synchronous and free of I/O; documents are loaded and
//! saved by the caller.

pub mod access;
pub mod access_override;
pub mod error;
pub mod membership;
pub mod permission;
pub mod repository;
pub mod types;
pub mod visibility;
pub mod workspace;

pub use access::AccessControl;
pub use access_override::is_overridden;
pub use error::{AuthzError, Result};
pub use membership::{MembershipResolver, WorkspaceMember, WorkspaceMembers};
pub use permission::{
	actions, ActionPath, PermissionDocuments, PermissionEvaluator, PermissionMatrix, RoleRegistry,
	RolePermissions,
};
pub use repository::{build_slug, slugify, Directory, Repository, RepositoryTab};
pub use types::{
	AccessPermission, DirectoryId, RepositoryId, Role, TabId, UserId, Visibility, WorkspaceId,
};
pub use visibility::Visible;
pub use workspace::{Workspace, WorkspaceDocument};
