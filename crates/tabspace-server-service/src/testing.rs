// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use tabspace_server_auth::{AccessControl, Repository, UserId, Visibility, Workspace, WorkspaceId};
use tabspace_server_config::LimitsConfig;
use tabspace_server_db::testing::create_migrated_test_pool;
use tabspace_server_db::{RepositoryRepository, WorkspaceRepository};

use crate::repository::{NewRepository, RepositoryService};
use crate::workspace::WorkspaceService;

/// Both services over one in-memory database with the built-in matrices.
pub(crate) struct Fixture {
	pub workspaces: WorkspaceService,
	pub repositories: RepositoryService,
	pub workspace_store: Arc<WorkspaceRepository>,
}

impl Fixture {
	pub async fn new() -> Self {
		let pool = create_migrated_test_pool().await;
		let workspace_store = Arc::new(WorkspaceRepository::new(pool.clone()));
		let repository_store = Arc::new(RepositoryRepository::new(pool));
		let access = AccessControl::builtin().unwrap();
		let limits = LimitsConfig::default();

		Self {
			workspaces: WorkspaceService::new(
				workspace_store.clone(),
				repository_store.clone(),
				access.clone(),
				limits,
			),
			repositories: RepositoryService::new(workspace_store.clone(), repository_store, access, limits),
			workspace_store,
		}
	}

	pub async fn workspace(&self, owner: &UserId, visibility: Visibility) -> Workspace {
		self.workspaces
			.create_workspace(owner, "Workspace", None, visibility)
			.await
			.unwrap()
	}

	pub async fn repository(&self, actor: &UserId, workspace_id: &WorkspaceId, visibility: Visibility) -> Repository {
		self.repositories
			.create_repository(
				actor,
				workspace_id,
				NewRepository {
					name: "Repository".to_string(),
					visibility,
					..Default::default()
				},
			)
			.await
			.unwrap()
	}
}
