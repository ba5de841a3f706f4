// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Repository operations.
//!
//! Each operation loads the repository and its owning workspace, runs
//! [`AccessControl::check_repository_access`] against that snapshot and saves
//! the whole repository once.
//!
//! A denied action on a repository the actor cannot even read reports
//! [`ServiceError::NotFound`], the same as a repository that does not exist.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tabspace_server_auth::{
	actions, AccessControl, AccessPermission, ActionPath, Directory, Repository,
	RepositoryId, RepositoryTab, TabId, UserId, Visibility, Workspace, WorkspaceId,
};
use tabspace_server_config::LimitsConfig;
use tabspace_server_db::{RepositoryStore, WorkspaceStore};
use tracing::{info, instrument};

use crate::error::{conceal_denial, Result, ServiceError};
use crate::validation::{validate_contributor_count, validate_description, validate_name, validate_tabs};

/// Input to [`RepositoryService::create_repository`].
#[derive(Debug, Clone, Default)]
pub struct NewRepository {
	pub name: String,
	/// When set and already used in the workspace, the tabs are appended to
	/// that repository instead of creating a new one.
	pub slug: Option<String>,
	pub description: Option<String>,
	pub icon: Option<String>,
	pub visibility: Visibility,
	pub tabs: Vec<RepositoryTab>,
	pub directories: Vec<Directory>,
	pub contributors: Vec<UserId>,
}

/// Editable repository metadata. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct RepositoryUpdate {
	pub name: Option<String>,
	pub description: Option<Option<String>>,
	pub icon: Option<Option<String>>,
	pub visibility: Option<Visibility>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
	Contributor,
	Permitted,
}

/// A user holding repository-scoped access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserAccess {
	pub user_id: UserId,
	pub kind: AccessKind,
}

#[derive(Clone)]
pub struct RepositoryService {
	workspaces: Arc<dyn WorkspaceStore>,
	repositories: Arc<dyn RepositoryStore>,
	access: AccessControl,
	limits: LimitsConfig,
}

impl RepositoryService {
	pub fn new(
		workspaces: Arc<dyn WorkspaceStore>,
		repositories: Arc<dyn RepositoryStore>,
		access: AccessControl,
		limits: LimitsConfig,
	) -> Self {
		Self {
			workspaces,
			repositories,
			access,
			limits,
		}
	}

	/// Creates a repository, or appends the tabs to the repository already
	/// using `new.slug` in this workspace.
	#[instrument(skip(self, new), fields(%actor, %workspace_id, name = %new.name))]
	pub async fn create_repository(
		&self,
		actor: &UserId,
		workspace_id: &WorkspaceId,
		new: NewRepository,
	) -> Result<Repository> {
		let workspace = self
			.workspaces
			.get_workspace_by_id(workspace_id)
			.await?
			.ok_or(ServiceError::NotFound)?;
		conceal_denial(
			self.access
				.check_workspace_access(&workspace, Some(actor), &actions::REPOSITORY_CREATE.into()),
			|| self.access.check_workspace_read(&workspace, Some(actor)),
		)?;

		if let Some(slug) = new.slug.as_deref() {
			if let Some(existing) = self.repositories.get_repository_by_slug(workspace_id, slug).await? {
				return self.append_tabs(actor, Some(&workspace), existing, new.tabs, new.directories).await;
			}
		}

		validate_name(&self.limits, &new.name)?;
		validate_description(&self.limits, new.description.as_deref())?;
		validate_tabs(&self.limits, &new.tabs, &new.directories)?;

		let mut repository = Repository::new(*workspace_id, *actor, new.name.trim(), new.visibility);
		repository.description = new.description;
		repository.icon = new.icon;
		repository.tabs = new.tabs;
		repository.directories = new.directories;
		for contributor in new.contributors {
			if !repository.contributors.contains(&contributor) {
				repository.contributors.push(contributor);
			}
		}
		validate_contributor_count(&self.limits, repository.contributors.len())?;

		self.repositories.save_repository(&repository).await?;
		info!(repository_id = %repository.id, slug = %repository.slug, "repository created");
		Ok(repository)
	}

	/// Reads a repository. A missing repository, a missing workspace and a
	/// denied read are indistinguishable to the caller.
	#[instrument(skip(self), fields(actor = ?actor, repository_id = %id))]
	pub async fn get_repository(&self, actor: Option<&UserId>, id: &RepositoryId) -> Result<Repository> {
		let repository = self.load(id).await?;
		self.readable(actor, repository).await
	}

	/// Looks a repository up by its slug within a workspace, subject to the
	/// same read check as [`get_repository`](Self::get_repository).
	#[instrument(skip(self), fields(actor = ?actor, %workspace_id, %slug))]
	pub async fn get_repository_by_slug(
		&self,
		actor: Option<&UserId>,
		workspace_id: &WorkspaceId,
		slug: &str,
	) -> Result<Repository> {
		let repository = self
			.repositories
			.get_repository_by_slug(workspace_id, slug)
			.await?
			.ok_or(ServiceError::NotFound)?;
		self.readable(actor, repository).await
	}

	/// One page of the repositories anyone may open, newest first.
	pub async fn list_public_repositories(&self, limit: u32, offset: u32) -> Result<Vec<Repository>> {
		Ok(self.repositories.list_public_repositories(limit, offset).await?)
	}

	/// Repositories shown for `user`. The user themselves sees every
	/// repository of their workspaces; anyone else sees the readable ones in
	/// `user`'s public workspaces. Repositories `user` contributes to are
	/// included either way, subject to the same read check.
	#[instrument(skip(self), fields(actor = ?actor, %user))]
	pub async fn list_user_repositories(&self, actor: Option<&UserId>, user: &UserId) -> Result<Vec<Repository>> {
		let own = actor == Some(user);
		let mut seen = HashSet::new();
		let mut listed = Vec::new();

		for workspace in self.workspaces.list_workspaces_for_member(user).await? {
			if !own && !workspace.is_public() {
				continue;
			}
			for repository in self
				.repositories
				.list_repositories_in_workspace(&workspace.id)
				.await?
			{
				if !own && !self.can_read(&repository, Some(&workspace), actor)? {
					continue;
				}
				if seen.insert(repository.id) {
					listed.push(repository);
				}
			}
		}

		for repository in self.repositories.list_repositories_for_contributor(user).await? {
			if seen.contains(&repository.id) {
				continue;
			}
			let workspace = self.workspaces.get_workspace_by_id(&repository.workspace_id).await?;
			if self.can_read(&repository, workspace.as_ref(), actor)? {
				seen.insert(repository.id);
				listed.push(repository);
			}
		}

		Ok(listed)
	}

	/// Repositories of a workspace visible to `actor`. Members see every
	/// repository; anyone else sees those whose read check passes.
	#[instrument(skip(self), fields(actor = ?actor, %workspace_id))]
	pub async fn list_workspace_repositories(
		&self,
		actor: Option<&UserId>,
		workspace_id: &WorkspaceId,
	) -> Result<Vec<Repository>> {
		let workspace = self
			.workspaces
			.get_workspace_by_id(workspace_id)
			.await?
			.ok_or(ServiceError::NotFound)?;
		let repositories = self.repositories.list_repositories_in_workspace(workspace_id).await?;

		if actor.is_some_and(|a| workspace.is_member(a)) {
			return Ok(repositories);
		}

		let mut visible = Vec::new();
		for repository in repositories {
			if self.can_read(&repository, Some(&workspace), actor)? {
				visible.push(repository);
			}
		}
		if visible.is_empty() && !self.can_see_workspace(&workspace, actor)? {
			return Err(ServiceError::NotFound);
		}
		Ok(visible)
	}

	/// Replaces the whole tab and directory tree.
	#[instrument(skip(self, tabs, directories), fields(%actor, repository_id = %id, tabs = tabs.len()))]
	pub async fn set_repository_tabs(
		&self,
		actor: &UserId,
		id: &RepositoryId,
		tabs: Vec<RepositoryTab>,
		directories: Vec<Directory>,
	) -> Result<Repository> {
		let mut repository = self.load_for(actor, id, actions::REPOSITORY_TABS_UPDATE).await?;
		validate_tabs(&self.limits, &tabs, &directories)?;

		repository.tabs = tabs;
		repository.directories = directories;
		self.save(repository).await
	}

	#[instrument(skip(self, tabs, directories), fields(%actor, repository_id = %id, tabs = tabs.len()))]
	pub async fn add_repository_tabs(
		&self,
		actor: &UserId,
		id: &RepositoryId,
		tabs: Vec<RepositoryTab>,
		directories: Vec<Directory>,
	) -> Result<Repository> {
		let repository = self.load(id).await?;
		let workspace = self.workspaces.get_workspace_by_id(&repository.workspace_id).await?;
		self.append_tabs(actor, workspace.as_ref(), repository, tabs, directories).await
	}

	/// Removes the given tabs. Ids not in the repository are ignored.
	#[instrument(skip(self, tab_ids), fields(%actor, repository_id = %id))]
	pub async fn remove_repository_tabs(
		&self,
		actor: &UserId,
		id: &RepositoryId,
		tab_ids: &[TabId],
	) -> Result<Repository> {
		let mut repository = self.load_for(actor, id, actions::REPOSITORY_TABS_DELETE).await?;

		let doomed: HashSet<_> = tab_ids.iter().collect();
		repository.tabs.retain(|t| !doomed.contains(&t.id));
		self.save(repository).await
	}

	#[instrument(skip(self), fields(%actor, repository_id = %id, %user))]
	pub async fn add_contributor(&self, actor: &UserId, id: &RepositoryId, user: &UserId) -> Result<Repository> {
		let mut repository = self
			.load_for(actor, id, actions::REPOSITORY_CONTRIBUTOR_CREATE)
			.await?;

		if repository.is_contributor(user) {
			return Err(ServiceError::Conflict(format!("{user} is already a contributor")));
		}
		validate_contributor_count(&self.limits, repository.contributors.len() + 1)?;

		repository.contributors.push(*user);
		self.save(repository).await
	}

	#[instrument(skip(self), fields(%actor, repository_id = %id, %user))]
	pub async fn remove_contributor(&self, actor: &UserId, id: &RepositoryId, user: &UserId) -> Result<Repository> {
		let mut repository = self
			.load_for(actor, id, actions::REPOSITORY_CONTRIBUTOR_DELETE)
			.await?;

		let Some(index) = repository.contributors.iter().position(|c| c == user) else {
			return Err(ServiceError::Validation(format!("{user} is not a contributor")));
		};
		repository.contributors.remove(index);
		self.save(repository).await
	}

	/// Replaces the link access mode and the permitted-user allow-list.
	#[instrument(skip(self, permitted_users), fields(%actor, repository_id = %id, %access_permission))]
	pub async fn update_repository_access(
		&self,
		actor: &UserId,
		id: &RepositoryId,
		access_permission: AccessPermission,
		permitted_users: Vec<UserId>,
	) -> Result<Repository> {
		let mut repository = self
			.load_for(actor, id, actions::REPOSITORY_ACCESS_UPDATE)
			.await?;

		let mut seen = HashSet::new();
		repository.access_permission = access_permission;
		repository.permitted_users = permitted_users.into_iter().filter(|u| seen.insert(*u)).collect();
		self.save(repository).await
	}

	/// Renaming gives the repository a new slug. Changing the visibility
	/// resets the link access mode to the default for the new visibility.
	#[instrument(skip(self, update), fields(%actor, repository_id = %id))]
	pub async fn update_repository_info(
		&self,
		actor: &UserId,
		id: &RepositoryId,
		update: RepositoryUpdate,
	) -> Result<Repository> {
		let mut repository = self.load_for(actor, id, actions::REPOSITORY_UPDATE).await?;

		if let Some(name) = update.name {
			validate_name(&self.limits, &name)?;
			repository.rename(name.trim());
		}
		if let Some(description) = update.description {
			validate_description(&self.limits, description.as_deref())?;
			repository.description = description;
		}
		if let Some(icon) = update.icon {
			repository.icon = icon;
		}
		if let Some(visibility) = update.visibility {
			if visibility != repository.visibility {
				repository.visibility = visibility;
				repository.access_permission = AccessPermission::default_for(visibility);
			}
		}

		self.save(repository).await
	}

	#[instrument(skip(self), fields(%actor, repository_id = %id))]
	pub async fn delete_repository(&self, actor: &UserId, id: &RepositoryId) -> Result<()> {
		self.load_for(actor, id, actions::REPOSITORY_DELETE).await?;
		self.repositories.delete_repository(id).await?;
		info!("repository deleted");
		Ok(())
	}

	/// Contributors followed by permitted users, for a caller allowed to
	/// read the repository.
	#[instrument(skip(self), fields(actor = ?actor, repository_id = %id))]
	pub async fn users_with_access(&self, actor: Option<&UserId>, id: &RepositoryId) -> Result<Vec<UserAccess>> {
		let repository = self.get_repository(actor, id).await?;

		let contributors = repository.contributors.iter().map(|u| UserAccess {
			user_id: *u,
			kind: AccessKind::Contributor,
		});
		let permitted = repository.permitted_users.iter().map(|u| UserAccess {
			user_id: *u,
			kind: AccessKind::Permitted,
		});
		Ok(contributors.chain(permitted).collect())
	}

	async fn append_tabs(
		&self,
		actor: &UserId,
		workspace: Option<&Workspace>,
		mut repository: Repository,
		tabs: Vec<RepositoryTab>,
		directories: Vec<Directory>,
	) -> Result<Repository> {
		self.check(&repository, workspace, actor, actions::REPOSITORY_TABS_CREATE)?;

		repository.directories.extend(directories);
		repository.tabs.extend(tabs);
		validate_tabs(&self.limits, &repository.tabs, &repository.directories)?;

		self.save(repository).await
	}

	async fn load(&self, id: &RepositoryId) -> Result<Repository> {
		self.repositories
			.get_repository_by_id(id)
			.await?
			.ok_or(ServiceError::NotFound)
	}

	/// Loads the repository and its workspace and checks `action`.
	async fn load_for(
		&self,
		actor: &UserId,
		id: &RepositoryId,
		action: impl Into<ActionPath>,
	) -> Result<Repository> {
		let repository = self.load(id).await?;
		let workspace = self.workspaces.get_workspace_by_id(&repository.workspace_id).await?;
		self.check(&repository, workspace.as_ref(), actor, action)?;
		Ok(repository)
	}

	fn check(
		&self,
		repository: &Repository,
		workspace: Option<&Workspace>,
		actor: &UserId,
		action: impl Into<ActionPath>,
	) -> Result<()> {
		conceal_denial(
			self.access
				.check_repository_access(repository, workspace, Some(actor), &action.into()),
			|| self.access.check_repository_read(repository, workspace, Some(actor)),
		)
	}

	async fn readable(&self, actor: Option<&UserId>, repository: Repository) -> Result<Repository> {
		let workspace = self.workspaces.get_workspace_by_id(&repository.workspace_id).await?;
		if self.can_read(&repository, workspace.as_ref(), actor)? {
			Ok(repository)
		} else {
			Err(ServiceError::NotFound)
		}
	}

	fn can_read(&self, repository: &Repository, workspace: Option<&Workspace>, actor: Option<&UserId>) -> Result<bool> {
		match self.access.check_repository_read(repository, workspace, actor) {
			Ok(()) => Ok(true),
			Err(e) if e.is_defect() => Err(e.into()),
			Err(_) => Ok(false),
		}
	}

	fn can_see_workspace(&self, workspace: &Workspace, actor: Option<&UserId>) -> Result<bool> {
		match self.access.check_workspace_read(workspace, actor) {
			Ok(()) => Ok(true),
			Err(e) if e.is_defect() => Err(e.into()),
			Err(_) => Ok(false),
		}
	}

	async fn save(&self, mut repository: Repository) -> Result<Repository> {
		repository.touch();
		self.repositories.save_repository(&repository).await?;
		Ok(repository)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::Fixture;
	use tabspace_server_auth::Role;

	fn tabs(n: usize) -> Vec<RepositoryTab> {
		(0..n)
			.map(|i| RepositoryTab::new(format!("https://example.com/{i}"), format!("Tab {i}")))
			.collect()
	}

	/// Owner U1, member U2, contributor U3 on a private repository.
	struct Scenario {
		fx: Fixture,
		u1: UserId,
		u2: UserId,
		u3: UserId,
		workspace: Workspace,
		repository: Repository,
	}

	async fn scenario() -> Scenario {
		let fx = Fixture::new().await;
		let (u1, u2, u3) = (UserId::generate(), UserId::generate(), UserId::generate());
		let workspace = fx.workspace(&u1, Visibility::Private).await;
		fx.workspaces
			.add_member(&u1, &workspace.id, &u2, Role::WorkspaceMember)
			.await
			.unwrap();
		let repository = fx.repository(&u1, &workspace.id, Visibility::Private).await;
		fx.repositories.add_contributor(&u1, &repository.id, &u3).await.unwrap();
		Scenario {
			fx,
			u1,
			u2,
			u3,
			workspace,
			repository,
		}
	}

	mod create {
		use super::*;

		#[tokio::test]
		async fn member_creates_with_defaults() {
			let s = scenario().await;
			let repo = s
				.fx
				.repositories
				.create_repository(
					&s.u2,
					&s.workspace.id,
					NewRepository {
						name: "Reading List".to_string(),
						visibility: Visibility::Public,
						tabs: tabs(2),
						..Default::default()
					},
				)
				.await
				.unwrap();
			assert!(repo.slug.starts_with("reading-list-"));
			assert_eq!(repo.owner, s.u2);
			assert_eq!(repo.access_permission, AccessPermission::EveryoneWithTheLink);
			assert_eq!(repo.tabs.len(), 2);
		}

		#[tokio::test]
		async fn outsiders_and_contributors_cannot_create() {
			let s = scenario().await;
			let public = s.fx.workspace(&s.u1, Visibility::Public).await;
			let attempt = |actor: UserId, workspace_id: WorkspaceId| {
				let repos = s.fx.repositories.clone();
				async move {
					repos
						.create_repository(
							&actor,
							&workspace_id,
							NewRepository {
								name: "Nope".to_string(),
								..Default::default()
							},
						)
						.await
						.unwrap_err()
				}
			};

			for actor in [s.u3, UserId::generate()] {
				let err = attempt(actor, s.workspace.id).await;
				assert!(matches!(err, ServiceError::NotFound));
				let err = attempt(actor, public.id).await;
				assert!(matches!(err, ServiceError::PermissionDenied { .. }));
			}
		}

		#[tokio::test]
		async fn existing_slug_appends_tabs() {
			let s = scenario().await;
			let repo = s
				.fx
				.repositories
				.create_repository(
					&s.u2,
					&s.workspace.id,
					NewRepository {
						name: "Ignored".to_string(),
						slug: Some(s.repository.slug.clone()),
						tabs: tabs(3),
						..Default::default()
					},
				)
				.await
				.unwrap();
			assert_eq!(repo.id, s.repository.id);
			assert_eq!(repo.name, s.repository.name);
			assert_eq!(repo.tabs.len(), 3);
		}

		#[tokio::test]
		async fn limits_are_enforced() {
			let s = scenario().await;
			let err = s
				.fx
				.repositories
				.create_repository(
					&s.u1,
					&s.workspace.id,
					NewRepository {
						name: "Big".to_string(),
						tabs: tabs(501),
						..Default::default()
					},
				)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::Validation(_)));

			let err = s
				.fx
				.repositories
				.create_repository(
					&s.u1,
					&s.workspace.id,
					NewRepository {
						name: "Crowded".to_string(),
						contributors: (0..61).map(|_| UserId::generate()).collect(),
						..Default::default()
					},
				)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::Validation(_)));
		}
	}

	mod access {
		use super::*;

		#[tokio::test]
		async fn owner_member_and_contributor_rights() {
			let s = scenario().await;
			let repos = &s.fx.repositories;

			let err = repos.delete_repository(&s.u2, &s.repository.id).await.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));

			let updated = repos
				.set_repository_tabs(&s.u3, &s.repository.id, tabs(2), Vec::new())
				.await
				.unwrap();
			assert_eq!(updated.tabs.len(), 2);

			let err = repos
				.remove_repository_tabs(&s.u3, &s.repository.id, &[updated.tabs[0].id])
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));

			repos.delete_repository(&s.u1, &s.repository.id).await.unwrap();
			assert!(matches!(
				repos.get_repository(Some(&s.u1), &s.repository.id).await,
				Err(ServiceError::NotFound)
			));
		}

		#[tokio::test]
		async fn private_repository_hidden_from_outsiders() {
			let s = scenario().await;
			let repos = &s.fx.repositories;
			for actor in [Some(&s.u1), Some(&s.u2), Some(&s.u3)] {
				assert!(repos.get_repository(actor, &s.repository.id).await.is_ok());
			}
			let stranger = UserId::generate();
			for actor in [None, Some(&stranger)] {
				assert!(matches!(
					repos.get_repository(actor, &s.repository.id).await,
					Err(ServiceError::NotFound)
				));
			}
		}

		#[tokio::test]
		async fn permitted_user_bypasses_roles() {
			let s = scenario().await;
			let guest = UserId::generate();
			let repos = &s.fx.repositories;
			repos
				.update_repository_access(
					&s.u1,
					&s.repository.id,
					AccessPermission::OnlyPeopleWhoHasAccess,
					vec![guest, guest],
				)
				.await
				.unwrap();

			let repo = repos.get_repository(Some(&guest), &s.repository.id).await.unwrap();
			assert_eq!(repo.permitted_users, vec![guest]);
			repos
				.remove_repository_tabs(&guest, &s.repository.id, &[])
				.await
				.unwrap();
		}

		#[tokio::test]
		async fn link_access_governs_public_reads() {
			let s = scenario().await;
			let repos = &s.fx.repositories;
			let stranger = UserId::generate();
			let repo = repos
				.update_repository_info(
					&s.u1,
					&s.repository.id,
					RepositoryUpdate {
						visibility: Some(Visibility::Public),
						..Default::default()
					},
				)
				.await
				.unwrap();
			assert_eq!(repo.access_permission, AccessPermission::EveryoneWithTheLink);
			assert!(repos.get_repository(None, &s.repository.id).await.is_ok());

			let err = repos
				.set_repository_tabs(&stranger, &s.repository.id, tabs(1), Vec::new())
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));

			repos
				.update_repository_access(
					&s.u1,
					&s.repository.id,
					AccessPermission::OnlyPeopleWhoHasAccess,
					Vec::new(),
				)
				.await
				.unwrap();
			assert!(matches!(
				repos.get_repository(None, &s.repository.id).await,
				Err(ServiceError::NotFound)
			));
			let err = repos
				.set_repository_tabs(&stranger, &s.repository.id, tabs(1), Vec::new())
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::NotFound));
		}

		#[tokio::test]
		async fn outsiders_cannot_tell_private_repositories_from_missing_ones() {
			let s = scenario().await;
			let repos = &s.fx.repositories;
			let stranger = UserId::generate();

			for id in [s.repository.id, RepositoryId::generate()] {
				let err = repos.delete_repository(&stranger, &id).await.unwrap_err();
				assert!(matches!(err, ServiceError::NotFound));
				let err = repos
					.add_repository_tabs(&stranger, &id, tabs(1), Vec::new())
					.await
					.unwrap_err();
				assert!(matches!(err, ServiceError::NotFound));
			}

			// Readers still learn that they lack the right.
			let err = repos.delete_repository(&s.u3, &s.repository.id).await.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));
		}

		#[tokio::test]
		async fn visibility_change_resets_link_access() {
			let s = scenario().await;
			let public = s.fx.repository(&s.u1, &s.workspace.id, Visibility::Public).await;
			let repo = s
				.fx
				.repositories
				.update_repository_info(
					&s.u1,
					&public.id,
					RepositoryUpdate {
						visibility: Some(Visibility::Private),
						..Default::default()
					},
				)
				.await
				.unwrap();
			assert_eq!(repo.access_permission, AccessPermission::OnlyPeopleWhoHasAccess);

			// Same visibility keeps an explicit choice.
			s.fx.repositories
				.update_repository_access(&s.u1, &public.id, AccessPermission::EveryoneWithTheLink, Vec::new())
				.await
				.unwrap();
			let repo = s
				.fx
				.repositories
				.update_repository_info(
					&s.u1,
					&public.id,
					RepositoryUpdate {
						visibility: Some(Visibility::Private),
						..Default::default()
					},
				)
				.await
				.unwrap();
			assert_eq!(repo.access_permission, AccessPermission::EveryoneWithTheLink);
		}

		#[tokio::test]
		async fn orphaned_repository_is_not_found() {
			let s = scenario().await;
			s.fx.workspace_store.delete_workspace(&s.workspace.id).await.unwrap();

			let err = s
				.fx
				.repositories
				.set_repository_tabs(&s.u1, &s.repository.id, Vec::new(), Vec::new())
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::NotFound));
		}

		#[tokio::test]
		async fn listing_filters_for_non_members() {
			let s = scenario().await;
			let public = s.fx.repository(&s.u1, &s.workspace.id, Visibility::Public).await;
			let repos = &s.fx.repositories;

			let all = repos
				.list_workspace_repositories(Some(&s.u2), &s.workspace.id)
				.await
				.unwrap();
			assert_eq!(all.len(), 2);

			let ids = |list: Vec<Repository>| list.into_iter().map(|r| r.id).collect::<HashSet<_>>();
			let contributor = repos
				.list_workspace_repositories(Some(&s.u3), &s.workspace.id)
				.await
				.unwrap();
			assert_eq!(ids(contributor), HashSet::from([public.id, s.repository.id]));

			let anonymous = repos.list_workspace_repositories(None, &s.workspace.id).await.unwrap();
			assert_eq!(ids(anonymous), HashSet::from([public.id]));

			repos.delete_repository(&s.u1, &public.id).await.unwrap();
			assert!(matches!(
				repos.list_workspace_repositories(None, &s.workspace.id).await,
				Err(ServiceError::NotFound)
			));
		}
	}

	mod lookup {
		use super::*;

		#[tokio::test]
		async fn slug_lookup_applies_the_read_check() {
			let s = scenario().await;
			let repos = &s.fx.repositories;

			let found = repos
				.get_repository_by_slug(Some(&s.u3), &s.workspace.id, &s.repository.slug)
				.await
				.unwrap();
			assert_eq!(found.id, s.repository.id);

			for slug in [s.repository.slug.as_str(), "missing"] {
				assert!(matches!(
					repos.get_repository_by_slug(None, &s.workspace.id, slug).await,
					Err(ServiceError::NotFound)
				));
			}
		}

		#[tokio::test]
		async fn public_repositories_are_paged() {
			let s = scenario().await;
			let open = s.fx.repository(&s.u1, &s.workspace.id, Visibility::Public).await;
			s.fx.repository(&s.u1, &s.workspace.id, Visibility::Public).await;
			let repos = &s.fx.repositories;

			let first = repos.list_public_repositories(1, 0).await.unwrap();
			let second = repos.list_public_repositories(1, 1).await.unwrap();
			assert_eq!(first.len(), 1);
			assert_eq!(second.len(), 1);
			assert_ne!(first[0].id, second[0].id);
			assert!(repos.list_public_repositories(10, 2).await.unwrap().is_empty());

			repos
				.update_repository_access(&s.u1, &open.id, AccessPermission::OnlyPeopleWhoHasAccess, Vec::new())
				.await
				.unwrap();
			let all = repos.list_public_repositories(10, 0).await.unwrap();
			assert_eq!(all.len(), 1);
			assert_ne!(all[0].id, open.id);
		}

		#[tokio::test]
		async fn user_repositories_depend_on_who_asks() {
			let s = scenario().await;
			let shared = s.fx.workspace(&s.u1, Visibility::Public).await;
			let open = s.fx.repository(&s.u1, &shared.id, Visibility::Public).await;
			let closed = s.fx.repository(&s.u1, &shared.id, Visibility::Private).await;
			let repos = &s.fx.repositories;
			let ids = |list: Vec<Repository>| list.into_iter().map(|r| r.id).collect::<HashSet<_>>();

			let own = repos.list_user_repositories(Some(&s.u1), &s.u1).await.unwrap();
			assert_eq!(ids(own), HashSet::from([s.repository.id, open.id, closed.id]));

			let stranger = UserId::generate();
			let seen = repos.list_user_repositories(Some(&stranger), &s.u1).await.unwrap();
			assert_eq!(ids(seen), HashSet::from([open.id]));

			let contributed = repos.list_user_repositories(Some(&s.u3), &s.u3).await.unwrap();
			assert_eq!(ids(contributed), HashSet::from([s.repository.id]));
			assert!(repos.list_user_repositories(None, &s.u3).await.unwrap().is_empty());
		}
	}

	mod contributors {
		use super::*;

		#[tokio::test]
		async fn add_and_remove() {
			let s = scenario().await;
			let repos = &s.fx.repositories;
			let newcomer = UserId::generate();

			let err = repos.add_contributor(&s.u1, &s.repository.id, &s.u3).await.unwrap_err();
			assert!(matches!(err, ServiceError::Conflict(_)));

			repos.add_contributor(&s.u2, &s.repository.id, &newcomer).await.unwrap();
			let err = repos
				.remove_contributor(&s.u2, &s.repository.id, &newcomer)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));

			let repo = repos.remove_contributor(&s.u1, &s.repository.id, &newcomer).await.unwrap();
			assert_eq!(repo.contributors, vec![s.u3]);

			let err = repos
				.remove_contributor(&s.u1, &s.repository.id, &newcomer)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::Validation(_)));
		}

		#[tokio::test]
		async fn users_with_access_tags_each_kind() {
			let s = scenario().await;
			let guest = UserId::generate();
			let repos = &s.fx.repositories;
			repos
				.update_repository_access(
					&s.u1,
					&s.repository.id,
					AccessPermission::OnlyPeopleWhoHasAccess,
					vec![guest],
				)
				.await
				.unwrap();

			let users = repos.users_with_access(Some(&s.u2), &s.repository.id).await.unwrap();
			assert_eq!(
				users,
				vec![
					UserAccess {
						user_id: s.u3,
						kind: AccessKind::Contributor
					},
					UserAccess {
						user_id: guest,
						kind: AccessKind::Permitted
					},
				]
			);
			let json = serde_json::to_value(&users[1]).unwrap();
			assert_eq!(json["kind"], "permitted");

			assert!(repos.users_with_access(None, &s.repository.id).await.is_err());
		}
	}

	mod info {
		use super::*;

		#[tokio::test]
		async fn rename_changes_slug() {
			let s = scenario().await;
			let repo = s
				.fx
				.repositories
				.update_repository_info(
					&s.u2,
					&s.repository.id,
					RepositoryUpdate {
						name: Some("Fresh Name".to_string()),
						icon: Some(Some("📚".to_string())),
						..Default::default()
					},
				)
				.await
				.unwrap();
			assert_eq!(repo.name, "Fresh Name");
			assert!(repo.slug.starts_with("fresh-name-"));
			assert_eq!(repo.icon.as_deref(), Some("📚"));

			let err = s
				.fx
				.repositories
				.update_repository_info(&s.u3, &s.repository.id, RepositoryUpdate::default())
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));
		}
	}
}
