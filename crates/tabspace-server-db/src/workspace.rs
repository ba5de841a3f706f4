// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workspace persistence.
//!
//! A workspace row holds the member list as two JSON columns, `members` and
//! `roles`, written together by [`WorkspaceRepository::save_workspace`]. Rows
//! whose arrays disagree fail to load with [`DbError::Corrupt`].

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, sqlite::SqliteRow, Row};
use tabspace_server_auth::{UserId, Workspace, WorkspaceId, WorkspaceMembers};

use crate::error::DbError;
use crate::row::{parse_enum, parse_id, parse_json, parse_timestamp};

const WORKSPACE_COLUMNS: &str =
	"id, owner_id, name, description, visibility, members, roles, created_at, updated_at";

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
	async fn get_workspace_by_id(&self, id: &WorkspaceId) -> Result<Option<Workspace>, DbError>;
	async fn get_workspace_by_name(&self, name: &str) -> Result<Option<Workspace>, DbError>;
	async fn save_workspace(&self, workspace: &Workspace) -> Result<(), DbError>;
	async fn delete_workspace(&self, id: &WorkspaceId) -> Result<bool, DbError>;
	async fn list_public_workspaces(&self) -> Result<Vec<Workspace>, DbError>;
	async fn list_workspaces_for_member(&self, user_id: &UserId) -> Result<Vec<Workspace>, DbError>;
}

#[derive(Clone)]
pub struct WorkspaceRepository {
	pool: SqlitePool,
}

impl WorkspaceRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self), fields(workspace_id = %id))]
	pub async fn get_workspace_by_id(&self, id: &WorkspaceId) -> Result<Option<Workspace>, DbError> {
		let row = sqlx::query(&format!("SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_workspace(&r)).transpose()
	}

	/// Names are not unique; the oldest workspace with `name` wins.
	#[tracing::instrument(skip(self))]
	pub async fn get_workspace_by_name(&self, name: &str) -> Result<Option<Workspace>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE name = ? ORDER BY created_at ASC LIMIT 1"
		))
		.bind(name)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_workspace(&r)).transpose()
	}

	/// Inserts or replaces the whole document.
	#[tracing::instrument(skip(self, workspace), fields(workspace_id = %workspace.id))]
	pub async fn save_workspace(&self, workspace: &Workspace) -> Result<(), DbError> {
		let (members, roles) = workspace.members.to_parallel();

		sqlx::query(
			r#"
			INSERT INTO workspaces (id, owner_id, name, description, visibility, members, roles, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			ON CONFLICT(id) DO UPDATE SET
				owner_id = excluded.owner_id,
				name = excluded.name,
				description = excluded.description,
				visibility = excluded.visibility,
				members = excluded.members,
				roles = excluded.roles,
				updated_at = excluded.updated_at
			"#,
		)
		.bind(workspace.id.to_string())
		.bind(workspace.owner.to_string())
		.bind(&workspace.name)
		.bind(&workspace.description)
		.bind(workspace.visibility.as_str())
		.bind(serde_json::to_string(&members)?)
		.bind(serde_json::to_string(&roles)?)
		.bind(workspace.created_at.to_rfc3339())
		.bind(workspace.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	#[tracing::instrument(skip(self), fields(workspace_id = %id))]
	pub async fn delete_workspace(&self, id: &WorkspaceId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM workspaces WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self))]
	pub async fn list_public_workspaces(&self) -> Result<Vec<Workspace>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {WORKSPACE_COLUMNS} FROM workspaces WHERE visibility = 'public' ORDER BY name ASC"
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_workspace).collect()
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_workspaces_for_member(&self, user_id: &UserId) -> Result<Vec<Workspace>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {WORKSPACE_COLUMNS} FROM workspaces
			WHERE EXISTS (SELECT 1 FROM json_each(workspaces.members) WHERE json_each.value = ?)
			ORDER BY name ASC
			"#
		))
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_workspace).collect()
	}
}

#[async_trait]
impl WorkspaceStore for WorkspaceRepository {
	async fn get_workspace_by_id(&self, id: &WorkspaceId) -> Result<Option<Workspace>, DbError> {
		WorkspaceRepository::get_workspace_by_id(self, id).await
	}

	async fn get_workspace_by_name(&self, name: &str) -> Result<Option<Workspace>, DbError> {
		WorkspaceRepository::get_workspace_by_name(self, name).await
	}

	async fn save_workspace(&self, workspace: &Workspace) -> Result<(), DbError> {
		WorkspaceRepository::save_workspace(self, workspace).await
	}

	async fn delete_workspace(&self, id: &WorkspaceId) -> Result<bool, DbError> {
		WorkspaceRepository::delete_workspace(self, id).await
	}

	async fn list_public_workspaces(&self) -> Result<Vec<Workspace>, DbError> {
		WorkspaceRepository::list_public_workspaces(self).await
	}

	async fn list_workspaces_for_member(&self, user_id: &UserId) -> Result<Vec<Workspace>, DbError> {
		WorkspaceRepository::list_workspaces_for_member(self, user_id).await
	}
}

fn row_to_workspace(row: &SqliteRow) -> Result<Workspace, DbError> {
	let id: WorkspaceId = parse_id(row, "id")?;
	let members: Vec<UserId> = parse_json(row, "members")?;
	let roles: Vec<i64> = parse_json(row, "roles")?;
	let members = WorkspaceMembers::from_parallel(members, roles).map_err(|e| {
		tracing::error!(workspace_id = %id, error = %e, "stored membership is corrupt");
		DbError::Corrupt(e)
	})?;

	Ok(Workspace {
		id,
		owner: parse_id(row, "owner_id")?,
		name: row.get("name"),
		description: row.get("description"),
		visibility: parse_enum(row, "visibility")?,
		members,
		created_at: parse_timestamp(row, "created_at")?,
		updated_at: parse_timestamp(row, "updated_at")?,
	})
}
