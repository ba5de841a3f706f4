// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-role permission matrices.
//!
//! A matrix is authored as a JSON document whose shape is fixed by
//! [`RolePermissions`]: every key is required, so an incomplete document fails
//! to load instead of silently denying. Once loaded, the document is flattened
//! into a key tree that [`PermissionMatrix::resolve`] walks one segment at a
//! time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::action::ActionPath;
use crate::error::AuthzError;

/// The complete permission document for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RolePermissions {
	pub workspace: WorkspacePermissions,
	pub repository: RepositoryPermissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkspacePermissions {
	pub read: bool,
	pub update: bool,
	pub delete: bool,
	pub update_permission: bool,
	pub moderator: CreateDelete,
	pub member: CreateDelete,
	pub transfer_ownership: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryPermissions {
	pub create: bool,
	pub read: bool,
	pub update: bool,
	pub delete: bool,
	pub tabs: CreateUpdateDelete,
	pub access: CreateUpdateDelete,
	pub contributor: CreateDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateDelete {
	pub create: bool,
	pub delete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUpdateDelete {
	pub create: bool,
	pub update: bool,
	pub delete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PermissionNode {
	Grant(bool),
	Branch(BTreeMap<String, PermissionNode>),
}

impl PermissionNode {
	fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Bool(granted) => Some(PermissionNode::Grant(*granted)),
			Value::Object(map) => map
				.iter()
				.map(|(key, child)| Some((key.clone(), PermissionNode::from_value(child)?)))
				.collect::<Option<BTreeMap<_, _>>>()
				.map(PermissionNode::Branch),
			_ => None,
		}
	}

	fn collect_leaves(&self, prefix: &mut Vec<String>, out: &mut Vec<ActionPath>) {
		match self {
			PermissionNode::Grant(_) => out.push(ActionPath::new(prefix.iter().cloned())),
			PermissionNode::Branch(children) => {
				for (key, child) in children {
					prefix.push(key.clone());
					child.collect_leaves(prefix, out);
					prefix.pop();
				}
			}
		}
	}
}

/// Immutable permission table for a single role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMatrix {
	document: RolePermissions,
	root: PermissionNode,
}

impl PermissionMatrix {
	/// Builds a matrix from a typed document.
	pub fn from_document(document: RolePermissions) -> Result<Self, AuthzError> {
		let invalid = |message: String| AuthzError::InvalidPermissionDocument {
			role: "<document>".to_string(),
			message,
		};
		let value = serde_json::to_value(document).map_err(|e| invalid(e.to_string()))?;
		let root = PermissionNode::from_value(&value)
			.ok_or_else(|| invalid("non-boolean leaf".to_string()))?;
		Ok(Self { document, root })
	}

	/// Parses a JSON permission document. `role` only labels errors.
	///
	/// # Errors
	/// Returns [`AuthzError::InvalidPermissionDocument`] when a key is missing,
	/// unknown, or not a boolean.
	pub fn from_json(role: &str, json: &str) -> Result<Self, AuthzError> {
		let document: RolePermissions =
			serde_json::from_str(json).map_err(|e| AuthzError::InvalidPermissionDocument {
				role: role.to_string(),
				message: e.to_string(),
			})?;
		Self::from_document(document).map_err(|e| match e {
			AuthzError::InvalidPermissionDocument { message, .. } => {
				AuthzError::InvalidPermissionDocument {
					role: role.to_string(),
					message,
				}
			}
			other => other,
		})
	}

	/// The typed document this matrix was built from.
	pub fn document(&self) -> &RolePermissions {
		&self.document
	}

	/// Walks `path` through the matrix and returns the boolean leaf.
	///
	/// # Errors
	/// Returns [`AuthzError::MalformedPermissionPath`] if the path is empty,
	/// names a key that does not exist, or stops on a branch.
	pub fn resolve(&self, path: &ActionPath) -> Result<bool, AuthzError> {
		let malformed = || AuthzError::MalformedPermissionPath {
			path: path.to_string(),
		};

		if path.is_empty() {
			return Err(malformed());
		}

		let mut node = &self.root;
		for segment in path.segments() {
			node = match node {
				PermissionNode::Branch(children) => children.get(segment).ok_or_else(malformed)?,
				PermissionNode::Grant(_) => return Err(malformed()),
			};
		}

		match node {
			PermissionNode::Grant(granted) => Ok(*granted),
			PermissionNode::Branch(_) => Err(malformed()),
		}
	}

	/// Every path that resolves to a leaf, in key order.
	pub fn leaf_paths(&self) -> Vec<ActionPath> {
		let mut out = Vec::new();
		self.root.collect_leaves(&mut Vec::new(), &mut out);
		out
	}

	/// Leaf paths that resolve to `true`.
	pub fn granted_paths(&self) -> Vec<ActionPath> {
		self.leaf_paths()
			.into_iter()
			.filter(|path| matches!(self.resolve(path), Ok(true)))
			.collect()
	}
}
