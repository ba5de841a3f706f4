// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository documents and their child content.
//!
//! Tabs and directories carry no access control of their own; every check
//! on them is a check on the owning [`Repository`].

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{AccessPermission, DirectoryId, RepositoryId, TabId, UserId, Visibility, WorkspaceId};

/// Length of the random suffix appended to every slug.
pub const SLUG_SUFFIX_LEN: usize = 5;

/// A named collection of tabs inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
	pub id: RepositoryId,
	pub workspace_id: WorkspaceId,
	pub owner: UserId,
	pub name: String,
	pub slug: String,
	#[serde(default)]
	pub icon: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	pub visibility: Visibility,
	pub access_permission: AccessPermission,
	/// Repository-scoped grantees, independent of workspace membership.
	#[serde(default)]
	pub contributors: Vec<UserId>,
	/// Allow-list bypassing every role check on this repository.
	#[serde(default)]
	pub permitted_users: Vec<UserId>,
	#[serde(default)]
	pub tabs: Vec<RepositoryTab>,
	#[serde(default)]
	pub directories: Vec<Directory>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Repository {
	/// Creates an empty repository. Link access defaults from `visibility`.
	pub fn new(
		workspace_id: WorkspaceId,
		owner: UserId,
		name: impl Into<String>,
		visibility: Visibility,
	) -> Self {
		let name = name.into();
		let now = Utc::now();
		Self {
			id: RepositoryId::generate(),
			workspace_id,
			owner,
			slug: build_slug(&name),
			name,
			icon: None,
			description: None,
			visibility,
			access_permission: AccessPermission::default_for(visibility),
			contributors: Vec::new(),
			permitted_users: Vec::new(),
			tabs: Vec::new(),
			directories: Vec::new(),
			created_at: now,
			updated_at: now,
		}
	}

	pub fn is_contributor(&self, user_id: &UserId) -> bool {
		self.contributors.contains(user_id)
	}

	pub fn is_permitted(&self, user_id: &UserId) -> bool {
		self.permitted_users.contains(user_id)
	}

	pub fn is_public(&self) -> bool {
		self.visibility == Visibility::Public
	}

	/// Renames the repository and gives it a fresh slug.
	pub fn rename(&mut self, name: impl Into<String>) {
		self.name = name.into();
		self.slug = build_slug(&self.name);
	}

	pub fn touch(&mut self) {
		self.updated_at = Utc::now();
	}
}

/// A saved browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryTab {
	pub id: TabId,
	pub url: String,
	pub title: String,
	#[serde(default)]
	pub custom_name: Option<String>,
	#[serde(default)]
	pub fav_icon_url: Option<String>,
	/// `None` places the tab at the repository root.
	#[serde(default)]
	pub parent_directory: Option<DirectoryId>,
}

impl RepositoryTab {
	pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			id: TabId::generate(),
			url: url.into(),
			title: title.into(),
			custom_name: None,
			fav_icon_url: None,
			parent_directory: None,
		}
	}
}

/// A folder grouping tabs inside a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
	pub id: DirectoryId,
	pub name: String,
	#[serde(default)]
	pub parent_directory: Option<DirectoryId>,
}

impl Directory {
	pub fn new(name: impl Into<String>, parent_directory: Option<DirectoryId>) -> Self {
		Self {
			id: DirectoryId::generate(),
			name: name.into(),
			parent_directory,
		}
	}
}

/// Lowercase ascii words of `name` joined by `-`.
pub fn slugify(name: &str) -> String {
	name.split(|c: char| !c.is_ascii_alphanumeric())
		.filter(|word| !word.is_empty())
		.map(str::to_ascii_lowercase)
		.collect::<Vec<_>>()
		.join("-")
}

/// [`slugify`] plus a random `-xxxxx` suffix.
pub fn build_slug(name: &str) -> String {
	let suffix: String = rand::thread_rng()
		.sample_iter(&Alphanumeric)
		.take(SLUG_SUFFIX_LEN)
		.map(|b| char::from(b).to_ascii_lowercase())
		.collect();
	let base = slugify(name);
	if base.is_empty() {
		suffix
	} else {
		format!("{base}-{suffix}")
	}
}
