// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! # tabspace-server-db
//!
//! SQLite document stores for workspaces and repositories.
//!
//! Each document type has a `*Store` trait, which is what the service layer
//! depends on, and a `*Repository` struct implementing it over a
//! `SqlitePool`. Saves replace the whole document; there are no partial
//! field updates.
//!
//! | Operation | Return type |
//! |-----------|-------------|
//! | Get by id / slug | `Result<Option<T>>` |
//! | List | `Result<Vec<T>>` |
//! | Save (insert or replace) | `Result<()>` |
//! | Delete | `Result<bool>` (true if deleted) |

mod error;
pub mod pool;
pub mod repository;
mod row;
pub mod schema;
pub mod workspace;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{DbError, Result};
pub use pool::create_pool;
pub use repository::{RepositoryRepository, RepositoryStore};
pub use schema::run_migrations;
pub use workspace::{WorkspaceRepository, WorkspaceStore};
