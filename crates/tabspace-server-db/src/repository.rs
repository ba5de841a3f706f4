// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository persistence.
//!
//! Contributors, permitted users, tabs and directories live in JSON columns
//! of the repository row; tabs and directories have no table of their own.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, sqlite::SqliteRow, Row};
use tabspace_server_auth::{Repository, RepositoryId, UserId, WorkspaceId};

use crate::error::DbError;
use crate::row::{parse_enum, parse_id, parse_json, parse_timestamp};

const REPOSITORY_COLUMNS: &str = "id, workspace_id, owner_id, name, slug, icon, description, \
	visibility, access_permission, contributors, permitted_users, tabs, directories, created_at, updated_at";

#[async_trait]
pub trait RepositoryStore: Send + Sync {
	async fn get_repository_by_id(&self, id: &RepositoryId) -> Result<Option<Repository>, DbError>;
	async fn get_repository_by_slug(
		&self,
		workspace_id: &WorkspaceId,
		slug: &str,
	) -> Result<Option<Repository>, DbError>;
	async fn save_repository(&self, repository: &Repository) -> Result<(), DbError>;
	async fn delete_repository(&self, id: &RepositoryId) -> Result<bool, DbError>;
	async fn delete_repositories_in_workspace(&self, workspace_id: &WorkspaceId) -> Result<u64, DbError>;
	async fn list_repositories_in_workspace(
		&self,
		workspace_id: &WorkspaceId,
	) -> Result<Vec<Repository>, DbError>;
	async fn list_public_repositories(&self, limit: u32, offset: u32) -> Result<Vec<Repository>, DbError>;
	async fn list_repositories_for_contributor(&self, user_id: &UserId) -> Result<Vec<Repository>, DbError>;
}

#[derive(Clone)]
pub struct RepositoryRepository {
	pool: SqlitePool,
}

impl RepositoryRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self), fields(repository_id = %id))]
	pub async fn get_repository_by_id(&self, id: &RepositoryId) -> Result<Option<Repository>, DbError> {
		let row = sqlx::query(&format!("SELECT {REPOSITORY_COLUMNS} FROM repositories WHERE id = ?"))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		row.map(|r| row_to_repository(&r)).transpose()
	}

	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id, slug = %slug))]
	pub async fn get_repository_by_slug(
		&self,
		workspace_id: &WorkspaceId,
		slug: &str,
	) -> Result<Option<Repository>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {REPOSITORY_COLUMNS} FROM repositories WHERE workspace_id = ? AND slug = ?"
		))
		.bind(workspace_id.to_string())
		.bind(slug)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_repository(&r)).transpose()
	}

	/// Inserts or replaces the whole document. A slug already used by another
	/// repository of the same workspace is a [`DbError::Conflict`].
	#[tracing::instrument(skip(self, repository), fields(repository_id = %repository.id, slug = %repository.slug))]
	pub async fn save_repository(&self, repository: &Repository) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO repositories (id, workspace_id, owner_id, name, slug, icon, description, visibility,
				access_permission, contributors, permitted_users, tabs, directories, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			ON CONFLICT(id) DO UPDATE SET
				owner_id = excluded.owner_id,
				name = excluded.name,
				slug = excluded.slug,
				icon = excluded.icon,
				description = excluded.description,
				visibility = excluded.visibility,
				access_permission = excluded.access_permission,
				contributors = excluded.contributors,
				permitted_users = excluded.permitted_users,
				tabs = excluded.tabs,
				directories = excluded.directories,
				updated_at = excluded.updated_at
			"#,
		)
		.bind(repository.id.to_string())
		.bind(repository.workspace_id.to_string())
		.bind(repository.owner.to_string())
		.bind(&repository.name)
		.bind(&repository.slug)
		.bind(&repository.icon)
		.bind(&repository.description)
		.bind(repository.visibility.as_str())
		.bind(repository.access_permission.as_str())
		.bind(serde_json::to_string(&repository.contributors)?)
		.bind(serde_json::to_string(&repository.permitted_users)?)
		.bind(serde_json::to_string(&repository.tabs)?)
		.bind(serde_json::to_string(&repository.directories)?)
		.bind(repository.created_at.to_rfc3339())
		.bind(repository.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
				DbError::Conflict(format!("Slug {} already exists", repository.slug))
			}
			_ => DbError::Sqlx(e),
		})?;

		Ok(())
	}

	#[tracing::instrument(skip(self), fields(repository_id = %id))]
	pub async fn delete_repository(&self, id: &RepositoryId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM repositories WHERE id = ?")
			.bind(id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id))]
	pub async fn delete_repositories_in_workspace(&self, workspace_id: &WorkspaceId) -> Result<u64, DbError> {
		let result = sqlx::query("DELETE FROM repositories WHERE workspace_id = ?")
			.bind(workspace_id.to_string())
			.execute(&self.pool)
			.await?;

		Ok(result.rows_affected())
	}

	#[tracing::instrument(skip(self), fields(workspace_id = %workspace_id))]
	pub async fn list_repositories_in_workspace(
		&self,
		workspace_id: &WorkspaceId,
	) -> Result<Vec<Repository>, DbError> {
		let rows = sqlx::query(&format!(
			"SELECT {REPOSITORY_COLUMNS} FROM repositories WHERE workspace_id = ? ORDER BY name ASC"
		))
		.bind(workspace_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_repository).collect()
	}

	/// Public repositories open to everyone with the link, newest first.
	#[tracing::instrument(skip(self))]
	pub async fn list_public_repositories(&self, limit: u32, offset: u32) -> Result<Vec<Repository>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {REPOSITORY_COLUMNS} FROM repositories
			WHERE visibility = 'public' AND access_permission = 'everyone_with_the_link'
			ORDER BY created_at DESC, id ASC
			LIMIT ? OFFSET ?
			"#
		))
		.bind(i64::from(limit))
		.bind(i64::from(offset))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_repository).collect()
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn list_repositories_for_contributor(&self, user_id: &UserId) -> Result<Vec<Repository>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {REPOSITORY_COLUMNS} FROM repositories
			WHERE EXISTS (SELECT 1 FROM json_each(repositories.contributors) WHERE json_each.value = ?)
			ORDER BY name ASC
			"#
		))
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_repository).collect()
	}
}

#[async_trait]
impl RepositoryStore for RepositoryRepository {
	async fn get_repository_by_id(&self, id: &RepositoryId) -> Result<Option<Repository>, DbError> {
		RepositoryRepository::get_repository_by_id(self, id).await
	}

	async fn get_repository_by_slug(
		&self,
		workspace_id: &WorkspaceId,
		slug: &str,
	) -> Result<Option<Repository>, DbError> {
		RepositoryRepository::get_repository_by_slug(self, workspace_id, slug).await
	}

	async fn save_repository(&self, repository: &Repository) -> Result<(), DbError> {
		RepositoryRepository::save_repository(self, repository).await
	}

	async fn delete_repository(&self, id: &RepositoryId) -> Result<bool, DbError> {
		RepositoryRepository::delete_repository(self, id).await
	}

	async fn delete_repositories_in_workspace(&self, workspace_id: &WorkspaceId) -> Result<u64, DbError> {
		RepositoryRepository::delete_repositories_in_workspace(self, workspace_id).await
	}

	async fn list_repositories_in_workspace(
		&self,
		workspace_id: &WorkspaceId,
	) -> Result<Vec<Repository>, DbError> {
		RepositoryRepository::list_repositories_in_workspace(self, workspace_id).await
	}

	async fn list_public_repositories(&self, limit: u32, offset: u32) -> Result<Vec<Repository>, DbError> {
		RepositoryRepository::list_public_repositories(self, limit, offset).await
	}

	async fn list_repositories_for_contributor(&self, user_id: &UserId) -> Result<Vec<Repository>, DbError> {
		RepositoryRepository::list_repositories_for_contributor(self, user_id).await
	}
}

fn row_to_repository(row: &SqliteRow) -> Result<Repository, DbError> {
	Ok(Repository {
		id: parse_id(row, "id")?,
		workspace_id: parse_id(row, "workspace_id")?,
		owner: parse_id(row, "owner_id")?,
		name: row.get("name"),
		slug: row.get("slug"),
		icon: row.get("icon"),
		description: row.get("description"),
		visibility: parse_enum(row, "visibility")?,
		access_permission: parse_enum(row, "access_permission")?,
		contributors: parse_json(row, "contributors")?,
		permitted_users: parse_json(row, "permitted_users")?,
		tabs: parse_json(row, "tabs")?,
		directories: parse_json(row, "directories")?,
		created_at: parse_timestamp(row, "created_at")?,
		updated_at: parse_timestamp(row, "updated_at")?,
	})
}
