// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-repository allow-list.

use crate::repository::Repository;
use crate::types::UserId;

/// Returns true if `user_id` is on the repository's permitted-user list.
///
/// A permitted user is allowed every action on the repository, whatever
/// their role. Anonymous callers are never overridden.
pub fn is_overridden(repository: &Repository, user_id: Option<&UserId>) -> bool {
	user_id.is_some_and(|id| repository.is_permitted(id))
}
