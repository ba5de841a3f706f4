// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-only gate on public resources.
//!
//! Consulted only for `read` actions. Writes always go through the full
//! role and allow-list chain in [`AccessControl`](crate::AccessControl).

use crate::repository::Repository;
use crate::types::{AccessPermission, Visibility};
use crate::workspace::Workspace;

/// A resource carrying a coarse visibility flag.
pub trait Visible {
	fn visibility(&self) -> Visibility;

	/// Returns true if the resource is readable without any role check.
	fn can_read_publicly(&self) -> bool {
		self.visibility() == Visibility::Public
	}
}

impl Visible for Workspace {
	fn visibility(&self) -> Visibility {
		self.visibility
	}
}

impl Visible for Repository {
	fn visibility(&self) -> Visibility {
		self.visibility
	}

	/// A public repository restricted to people with access is not open to
	/// anyone holding the link.
	fn can_read_publicly(&self) -> bool {
		self.visibility == Visibility::Public
			&& self.access_permission == AccessPermission::EveryoneWithTheLink
	}
}
