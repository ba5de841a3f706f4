// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Workspace operations.
//!
//! Every mutation loads the workspace fresh, checks access against that
//! snapshot, changes it in memory and saves the whole document once. Two
//! concurrent mutations of the same workspace race; the later save wins.
//!
//! Actors who cannot read a private workspace get [`ServiceError::NotFound`]
//! from every operation on it, exactly as for an id that does not exist.

use std::sync::Arc;

use tabspace_server_auth::{
	actions, AccessControl, ActionPath, Role, UserId, Visibility, Workspace, WorkspaceId,
};
use tabspace_server_config::LimitsConfig;
use tabspace_server_db::{RepositoryStore, WorkspaceStore};
use tracing::{info, instrument};

use crate::error::{conceal_denial, Result, ServiceError};
use crate::validation::{validate_description, validate_name};

/// Editable workspace fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceUpdate {
	pub name: Option<String>,
	pub description: Option<Option<String>>,
	pub visibility: Option<Visibility>,
}

#[derive(Clone)]
pub struct WorkspaceService {
	workspaces: Arc<dyn WorkspaceStore>,
	repositories: Arc<dyn RepositoryStore>,
	access: AccessControl,
	limits: LimitsConfig,
}

impl WorkspaceService {
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

	/// Creates a workspace owned by `actor`.
	#[instrument(skip(self, description), fields(%actor))]
	pub async fn create_workspace(
		&self,
		actor: &UserId,
		name: &str,
		description: Option<String>,
		visibility: Visibility,
	) -> Result<Workspace> {
		validate_name(&self.limits, name)?;
		validate_description(&self.limits, description.as_deref())?;

		let workspace = Workspace::new(*actor, name.trim(), description, visibility);
		self.workspaces.save_workspace(&workspace).await?;

		info!(workspace_id = %workspace.id, "workspace created");
		Ok(workspace)
	}

	/// Public workspaces are visible to anyone; private ones need
	/// `workspace.read`. A missing workspace and a denied read look the same.
	#[instrument(skip(self), fields(actor = ?actor, workspace_id = %id))]
	pub async fn get_workspace(&self, actor: Option<&UserId>, id: &WorkspaceId) -> Result<Workspace> {
		let workspace = self.load(id).await?;
		match self.access.check_workspace_read(&workspace, actor) {
			Ok(()) => Ok(workspace),
			Err(e) if e.is_defect() => Err(e.into()),
			Err(_) => Err(ServiceError::NotFound),
		}
	}

	#[instrument(skip(self, update), fields(%actor, workspace_id = %id))]
	pub async fn update_workspace(
		&self,
		actor: &UserId,
		id: &WorkspaceId,
		update: WorkspaceUpdate,
	) -> Result<Workspace> {
		let mut workspace = self.load_for(actor, id, actions::WORKSPACE_UPDATE).await?;

		if let Some(name) = update.name {
			validate_name(&self.limits, &name)?;
			workspace.name = name.trim().to_string();
		}
		if let Some(description) = update.description {
			validate_description(&self.limits, description.as_deref())?;
			workspace.description = description;
		}
		if let Some(visibility) = update.visibility {
			workspace.visibility = visibility;
		}

		self.save(workspace).await
	}

	/// Deletes the workspace and every repository in it.
	#[instrument(skip(self), fields(%actor, workspace_id = %id))]
	pub async fn delete_workspace(&self, actor: &UserId, id: &WorkspaceId) -> Result<()> {
		self.load_for(actor, id, actions::WORKSPACE_DELETE).await?;

		let removed = self.repositories.delete_repositories_in_workspace(id).await?;
		self.workspaces.delete_workspace(id).await?;

		info!(repositories = removed, "workspace deleted");
		Ok(())
	}

	/// Adds `user` as a moderator or member.
	#[instrument(skip(self), fields(%actor, workspace_id = %id, %user, %role))]
	pub async fn add_member(
		&self,
		actor: &UserId,
		id: &WorkspaceId,
		user: &UserId,
		role: Role,
	) -> Result<Workspace> {
		let action = member_action(role, Grant::Create)?;
		let mut workspace = self.load_for(actor, id, action).await?;

		if !workspace.members.insert(*user, role) {
			return Err(ServiceError::Conflict(format!("{user} is already a member")));
		}

		self.save(workspace).await
	}

	/// Removes `user`. The right needed depends on the role they hold.
	///
	/// Only members learn whether `user` belongs to the workspace; anyone
	/// else gets the same denial either way.
	#[instrument(skip(self), fields(%actor, workspace_id = %id, %user))]
	pub async fn remove_member(&self, actor: &UserId, id: &WorkspaceId, user: &UserId) -> Result<Workspace> {
		let mut workspace = self.load(id).await?;
		if !workspace.is_member(actor) {
			self.check(&workspace, actor, actions::WORKSPACE_MEMBER_DELETE)?;
		}

		let role = workspace
			.role_of(user)
			.ok_or_else(|| ServiceError::Validation(format!("{user} is not a member")))?;
		self.check(&workspace, actor, member_action(role, Grant::Delete)?)?;

		workspace.members.remove(user);
		self.save(workspace).await
	}

	/// Switches `user` between moderator and member. Besides
	/// `workspace.updatePermission` the actor needs the rights to revoke the
	/// current role and to grant the new one, so a role change never
	/// reaches further than a remove followed by an add.
	#[instrument(skip(self), fields(%actor, workspace_id = %id, %user, %role))]
	pub async fn update_member_role(
		&self,
		actor: &UserId,
		id: &WorkspaceId,
		user: &UserId,
		role: Role,
	) -> Result<Workspace> {
		let grant = member_action(role, Grant::Create)?;
		let mut workspace = self
			.load_for(actor, id, actions::WORKSPACE_UPDATE_PERMISSION)
			.await?;

		let current = match workspace.role_of(user) {
			None => return Err(ServiceError::Validation(format!("{user} is not a member"))),
			Some(Role::WorkspaceOwner) => {
				return Err(ServiceError::Validation(
					"the owner's role changes only through an ownership transfer".to_string(),
				))
			}
			Some(current) => current,
		};
		self.check(&workspace, actor, member_action(current, Grant::Delete)?)?;
		self.check(&workspace, actor, grant)?;

		workspace.members.set_role(user, role);
		self.save(workspace).await
	}

	/// Makes `new_owner` the owner; the previous owner stays on as moderator.
	#[instrument(skip(self), fields(%actor, workspace_id = %id, %new_owner))]
	pub async fn transfer_ownership(
		&self,
		actor: &UserId,
		id: &WorkspaceId,
		new_owner: &UserId,
	) -> Result<Workspace> {
		let mut workspace = self
			.load_for(actor, id, actions::WORKSPACE_TRANSFER_OWNERSHIP)
			.await?;

		if *new_owner == workspace.owner {
			return Err(ServiceError::Validation(format!("{new_owner} already owns the workspace")));
		}
		if !workspace.is_member(new_owner) {
			return Err(ServiceError::Validation(format!("{new_owner} is not a member")));
		}

		let previous = workspace.owner;
		workspace.members.set_role(&previous, Role::WorkspaceModerator);
		workspace.members.set_role(new_owner, Role::WorkspaceOwner);
		workspace.owner = *new_owner;

		info!(%previous, "ownership transferred");
		self.save(workspace).await
	}

	pub async fn list_public_workspaces(&self) -> Result<Vec<Workspace>> {
		Ok(self.workspaces.list_public_workspaces().await?)
	}

	/// Workspaces `user` belongs to, in any role.
	pub async fn list_member_workspaces(&self, user: &UserId) -> Result<Vec<Workspace>> {
		Ok(self.workspaces.list_workspaces_for_member(user).await?)
	}

	/// Public workspaces `user` belongs to, as shown on their profile.
	pub async fn list_user_public_workspaces(&self, user: &UserId) -> Result<Vec<Workspace>> {
		let workspaces = self.workspaces.list_workspaces_for_member(user).await?;
		Ok(workspaces.into_iter().filter(Workspace::is_public).collect())
	}

	/// Looks a workspace up by name, subject to the same read check as
	/// [`get_workspace`](Self::get_workspace).
	#[instrument(skip(self), fields(actor = ?actor))]
	pub async fn get_workspace_by_name(&self, actor: Option<&UserId>, name: &str) -> Result<Workspace> {
		let workspace = self
			.workspaces
			.get_workspace_by_name(name)
			.await?
			.ok_or(ServiceError::NotFound)?;
		match self.access.check_workspace_read(&workspace, actor) {
			Ok(()) => Ok(workspace),
			Err(e) if e.is_defect() => Err(e.into()),
			Err(_) => Err(ServiceError::NotFound),
		}
	}

	/// `user`'s role in a workspace the actor can read.
	pub async fn role_of(
		&self,
		actor: Option<&UserId>,
		id: &WorkspaceId,
		user: &UserId,
	) -> Result<Option<Role>> {
		let workspace = self.get_workspace(actor, id).await?;
		Ok(self.access.role_of(&workspace, user))
	}

	async fn load(&self, id: &WorkspaceId) -> Result<Workspace> {
		self.workspaces
			.get_workspace_by_id(id)
			.await?
			.ok_or(ServiceError::NotFound)
	}

	async fn load_for(
		&self,
		actor: &UserId,
		id: &WorkspaceId,
		action: impl Into<ActionPath>,
	) -> Result<Workspace> {
		let workspace = self.load(id).await?;
		self.check(&workspace, actor, action)?;
		Ok(workspace)
	}

	fn check(&self, workspace: &Workspace, actor: &UserId, action: impl Into<ActionPath>) -> Result<()> {
		conceal_denial(
			self.access
				.check_workspace_access(workspace, Some(actor), &action.into()),
			|| self.access.check_workspace_read(workspace, Some(actor)),
		)
	}

	async fn save(&self, mut workspace: Workspace) -> Result<Workspace> {
		workspace.touch();
		self.workspaces.save_workspace(&workspace).await?;
		Ok(workspace)
	}
}

enum Grant {
	Create,
	Delete,
}

/// The action guarding a membership change for `role`. Owners and
/// contributors are never granted or revoked through membership changes.
fn member_action(role: Role, grant: Grant) -> Result<[&'static str; 3]> {
	match (role, grant) {
		(Role::WorkspaceModerator, Grant::Create) => Ok(actions::WORKSPACE_MODERATOR_CREATE),
		(Role::WorkspaceModerator, Grant::Delete) => Ok(actions::WORKSPACE_MODERATOR_DELETE),
		(Role::WorkspaceMember, Grant::Create) => Ok(actions::WORKSPACE_MEMBER_CREATE),
		(Role::WorkspaceMember, Grant::Delete) => Ok(actions::WORKSPACE_MEMBER_DELETE),
		(Role::WorkspaceOwner, Grant::Create) => Err(ServiceError::Validation(
			"ownership is granted only by transfer".to_string(),
		)),
		(Role::WorkspaceOwner, Grant::Delete) => Err(ServiceError::Validation(
			"the owner cannot be removed".to_string(),
		)),
		(Role::RepositoryContributor, _) => Err(ServiceError::Validation(
			"contributors are managed per repository".to_string(),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::Fixture;

	mod lifecycle {
		use super::*;

		#[tokio::test]
		async fn create_makes_actor_owner() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let ws = fx
				.workspaces
				.create_workspace(&owner, "  Research ", None, Visibility::Private)
				.await
				.unwrap();
			assert_eq!(ws.name, "Research");
			assert_eq!(ws.role_of(&owner), Some(Role::WorkspaceOwner));
			assert_eq!(ws.members.len(), 1);
		}

		#[tokio::test]
		async fn create_rejects_long_names() {
			let fx = Fixture::new().await;
			let err = fx
				.workspaces
				.create_workspace(&UserId::generate(), &"n".repeat(101), None, Visibility::Private)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::Validation(_)));
		}

		#[tokio::test]
		async fn private_workspace_hidden_from_outsiders() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let ws = fx.workspace(&owner, Visibility::Private).await;

			assert!(fx.workspaces.get_workspace(Some(&owner), &ws.id).await.is_ok());
			let err = fx
				.workspaces
				.get_workspace(Some(&UserId::generate()), &ws.id)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::NotFound));
			let err = fx.workspaces.get_workspace(None, &ws.id).await.unwrap_err();
			assert!(matches!(err, ServiceError::NotFound));
		}

		#[tokio::test]
		async fn public_workspace_visible_to_anonymous() {
			let fx = Fixture::new().await;
			let ws = fx.workspace(&UserId::generate(), Visibility::Public).await;
			assert_eq!(fx.workspaces.get_workspace(None, &ws.id).await.unwrap().id, ws.id);
		}

		#[tokio::test]
		async fn update_requires_workspace_update() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let member = UserId::generate();
			let ws = fx.workspace(&owner, Visibility::Private).await;
			fx.workspaces
				.add_member(&owner, &ws.id, &member, Role::WorkspaceMember)
				.await
				.unwrap();

			let update = WorkspaceUpdate {
				name: Some("Renamed".to_string()),
				visibility: Some(Visibility::Public),
				..Default::default()
			};
			let err = fx
				.workspaces
				.update_workspace(&member, &ws.id, update.clone())
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));

			let updated = fx.workspaces.update_workspace(&owner, &ws.id, update).await.unwrap();
			assert_eq!(updated.name, "Renamed");
			assert_eq!(updated.visibility, Visibility::Public);
		}

		#[tokio::test]
		async fn delete_cascades_to_repositories() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let ws = fx.workspace(&owner, Visibility::Private).await;
			let repo = fx.repository(&owner, &ws.id, Visibility::Private).await;

			fx.workspaces.delete_workspace(&owner, &ws.id).await.unwrap();

			assert!(matches!(
				fx.workspaces.get_workspace(Some(&owner), &ws.id).await,
				Err(ServiceError::NotFound)
			));
			assert!(matches!(
				fx.repositories.get_repository(Some(&owner), &repo.id).await,
				Err(ServiceError::NotFound)
			));
		}

		#[tokio::test]
		async fn outsiders_cannot_tell_private_workspaces_from_missing_ones() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let outsider = UserId::generate();
			let private = fx.workspace(&owner, Visibility::Private).await;
			let public = fx.workspace(&owner, Visibility::Public).await;

			for id in [private.id, WorkspaceId::generate()] {
				let err = fx.workspaces.delete_workspace(&outsider, &id).await.unwrap_err();
				assert!(matches!(err, ServiceError::NotFound));
				let err = fx
					.workspaces
					.add_member(&outsider, &id, &outsider, Role::WorkspaceMember)
					.await
					.unwrap_err();
				assert!(matches!(err, ServiceError::NotFound));
			}

			let err = fx.workspaces.delete_workspace(&outsider, &public.id).await.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));
		}

		#[tokio::test]
		async fn lookup_by_name_respects_visibility() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			fx.workspaces
				.create_workspace(&owner, "Open", None, Visibility::Public)
				.await
				.unwrap();
			let closed = fx
				.workspaces
				.create_workspace(&owner, "Closed", None, Visibility::Private)
				.await
				.unwrap();

			assert_eq!(fx.workspaces.get_workspace_by_name(None, "Open").await.unwrap().name, "Open");
			assert_eq!(
				fx.workspaces
					.get_workspace_by_name(Some(&owner), "Closed")
					.await
					.unwrap()
					.id,
				closed.id
			);
			for name in ["Closed", "Nowhere"] {
				let err = fx
					.workspaces
					.get_workspace_by_name(Some(&UserId::generate()), name)
					.await
					.unwrap_err();
				assert!(matches!(err, ServiceError::NotFound), "{name}");
			}
		}

		#[tokio::test]
		async fn mutating_missing_workspace_is_not_found() {
			let fx = Fixture::new().await;
			let err = fx
				.workspaces
				.delete_workspace(&UserId::generate(), &WorkspaceId::generate())
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::NotFound));
		}
	}

	mod membership {
		use super::*;

		#[tokio::test]
		async fn moderator_manages_members_but_not_moderators() {
			let fx = Fixture::new().await;
			let (owner, moderator, member, other) = (
				UserId::generate(),
				UserId::generate(),
				UserId::generate(),
				UserId::generate(),
			);
			let ws = fx.workspace(&owner, Visibility::Private).await;
			fx.workspaces
				.add_member(&owner, &ws.id, &moderator, Role::WorkspaceModerator)
				.await
				.unwrap();

			fx.workspaces
				.add_member(&moderator, &ws.id, &member, Role::WorkspaceMember)
				.await
				.unwrap();
			let err = fx
				.workspaces
				.add_member(&moderator, &ws.id, &other, Role::WorkspaceModerator)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));

			let err = fx
				.workspaces
				.remove_member(&moderator, &ws.id, &moderator)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));

			let ws = fx.workspaces.remove_member(&moderator, &ws.id, &member).await.unwrap();
			assert!(!ws.is_member(&member));
		}

		#[tokio::test]
		async fn outsiders_learn_nothing_about_membership() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let member = UserId::generate();
			let outsider = UserId::generate();
			for visibility in [Visibility::Private, Visibility::Public] {
				let ws = fx.workspace(&owner, visibility).await;
				fx.workspaces
					.add_member(&owner, &ws.id, &member, Role::WorkspaceMember)
					.await
					.unwrap();

				let on_member = fx
					.workspaces
					.remove_member(&outsider, &ws.id, &member)
					.await
					.unwrap_err();
				let on_stranger = fx
					.workspaces
					.remove_member(&outsider, &ws.id, &UserId::generate())
					.await
					.unwrap_err();
				assert_eq!(on_member.to_string(), on_stranger.to_string(), "{visibility:?}");
				match visibility {
					Visibility::Private => assert!(matches!(on_member, ServiceError::NotFound)),
					Visibility::Public => {
						assert!(matches!(on_member, ServiceError::PermissionDenied { .. }))
					}
				}
			}
		}

		#[tokio::test]
		async fn moderators_cannot_change_roles_they_cannot_grant_or_revoke() {
			let fx = Fixture::new().await;
			let (owner, moderator, peer, member) = (
				UserId::generate(),
				UserId::generate(),
				UserId::generate(),
				UserId::generate(),
			);
			let ws = fx.workspace(&owner, Visibility::Private).await;
			for (user, role) in [
				(&moderator, Role::WorkspaceModerator),
				(&peer, Role::WorkspaceModerator),
				(&member, Role::WorkspaceMember),
			] {
				fx.workspaces.add_member(&owner, &ws.id, user, role).await.unwrap();
			}

			let err = fx
				.workspaces
				.update_member_role(&moderator, &ws.id, &peer, Role::WorkspaceMember)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));
			let err = fx
				.workspaces
				.update_member_role(&moderator, &ws.id, &member, Role::WorkspaceModerator)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));

			let stored = fx.workspaces.get_workspace(Some(&owner), &ws.id).await.unwrap();
			assert_eq!(stored.role_of(&peer), Some(Role::WorkspaceModerator));
			assert_eq!(stored.role_of(&member), Some(Role::WorkspaceMember));

			let ws = fx
				.workspaces
				.update_member_role(&owner, &ws.id, &peer, Role::WorkspaceMember)
				.await
				.unwrap();
			assert_eq!(ws.role_of(&peer), Some(Role::WorkspaceMember));
		}

		#[tokio::test]
		async fn duplicates_and_reserved_roles_are_rejected() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let user = UserId::generate();
			let ws = fx.workspace(&owner, Visibility::Private).await;
			fx.workspaces
				.add_member(&owner, &ws.id, &user, Role::WorkspaceMember)
				.await
				.unwrap();

			let err = fx
				.workspaces
				.add_member(&owner, &ws.id, &user, Role::WorkspaceModerator)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::Conflict(_)));

			for role in [Role::WorkspaceOwner, Role::RepositoryContributor] {
				let err = fx
					.workspaces
					.add_member(&owner, &ws.id, &UserId::generate(), role)
					.await
					.unwrap_err();
				assert!(matches!(err, ServiceError::Validation(_)), "{role}");
			}
		}

		#[tokio::test]
		async fn owner_cannot_be_removed() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let ws = fx.workspace(&owner, Visibility::Private).await;
			let err = fx.workspaces.remove_member(&owner, &ws.id, &owner).await.unwrap_err();
			assert!(matches!(err, ServiceError::Validation(_)));
		}

		#[tokio::test]
		async fn members_and_roles_stay_aligned_after_save() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let ws = fx.workspace(&owner, Visibility::Private).await;
			let users: Vec<UserId> = (0..4).map(|_| UserId::generate()).collect();
			for (i, user) in users.iter().enumerate() {
				let role = if i % 2 == 0 {
					Role::WorkspaceMember
				} else {
					Role::WorkspaceModerator
				};
				fx.workspaces.add_member(&owner, &ws.id, user, role).await.unwrap();
			}
			fx.workspaces.remove_member(&owner, &ws.id, &users[1]).await.unwrap();

			let stored = fx.workspaces.get_workspace(Some(&owner), &ws.id).await.unwrap();
			let (ids, roles) = stored.members.to_parallel();
			assert_eq!(ids, vec![owner, users[0], users[2], users[3]]);
			assert_eq!(roles, vec![0, 2, 2, 1]);
		}

		#[tokio::test]
		async fn update_member_role() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let user = UserId::generate();
			let ws = fx.workspace(&owner, Visibility::Private).await;
			fx.workspaces
				.add_member(&owner, &ws.id, &user, Role::WorkspaceMember)
				.await
				.unwrap();

			let err = fx
				.workspaces
				.update_member_role(&user, &ws.id, &user, Role::WorkspaceModerator)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));

			let ws = fx
				.workspaces
				.update_member_role(&owner, &ws.id, &user, Role::WorkspaceModerator)
				.await
				.unwrap();
			assert_eq!(ws.role_of(&user), Some(Role::WorkspaceModerator));

			let err = fx
				.workspaces
				.update_member_role(&owner, &ws.id, &owner, Role::WorkspaceMember)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::Validation(_)));
		}

		#[tokio::test]
		async fn transfer_ownership() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let heir = UserId::generate();
			let ws = fx.workspace(&owner, Visibility::Private).await;

			let err = fx
				.workspaces
				.transfer_ownership(&owner, &ws.id, &heir)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::Validation(_)));

			fx.workspaces
				.add_member(&owner, &ws.id, &heir, Role::WorkspaceMember)
				.await
				.unwrap();
			let ws = fx.workspaces.transfer_ownership(&owner, &ws.id, &heir).await.unwrap();
			assert_eq!(ws.owner, heir);
			assert_eq!(ws.role_of(&heir), Some(Role::WorkspaceOwner));
			assert_eq!(ws.role_of(&owner), Some(Role::WorkspaceModerator));

			let err = fx
				.workspaces
				.transfer_ownership(&owner, &ws.id, &owner)
				.await
				.unwrap_err();
			assert!(matches!(err, ServiceError::PermissionDenied { .. }));
		}

		#[tokio::test]
		async fn listings() {
			let fx = Fixture::new().await;
			let owner = UserId::generate();
			let member = UserId::generate();
			let public = fx.workspace(&owner, Visibility::Public).await;
			let private = fx.workspace(&owner, Visibility::Private).await;
			fx.workspaces
				.add_member(&owner, &private.id, &member, Role::WorkspaceMember)
				.await
				.unwrap();

			let listed = fx.workspaces.list_public_workspaces().await.unwrap();
			assert_eq!(listed.iter().map(|w| w.id).collect::<Vec<_>>(), vec![public.id]);

			let mine = fx.workspaces.list_member_workspaces(&member).await.unwrap();
			assert_eq!(mine.iter().map(|w| w.id).collect::<Vec<_>>(), vec![private.id]);

			assert_eq!(
				fx.workspaces.role_of(Some(&member), &private.id, &member).await.unwrap(),
				Some(Role::WorkspaceMember)
			);
			assert!(fx.workspaces.role_of(None, &private.id, &member).await.is_err());

			let profile = fx.workspaces.list_user_public_workspaces(&owner).await.unwrap();
			assert_eq!(profile.iter().map(|w| w.id).collect::<Vec<_>>(), vec![public.id]);
			assert!(fx.workspaces.list_user_public_workspaces(&member).await.unwrap().is_empty());
		}
	}
}
