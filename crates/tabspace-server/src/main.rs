// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tabspace administrative command line.

use clap::{Parser, Subcommand};
use tabspace_server_auth::{AccessControl, ActionPath, RepositoryId, Role, UserId, WorkspaceId};
use tabspace_server_db::{create_pool, run_migrations, RepositoryRepository, WorkspaceRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod check;
mod version;

use check::{run_check, CheckRequest, Decision};

#[derive(Parser, Debug)]
#[command(
	name = "tabspace-server",
	about = "Tabspace authorization administration",
	version
)]
struct Args {
	/// Config file to read instead of /etc/tabspace/server.toml
	#[arg(long, env = "TABSPACE_SERVER_CONFIG")]
	config: Option<std::path::PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Decide whether a user may perform an action
	Check {
		#[arg(long)]
		workspace: WorkspaceId,
		#[arg(long)]
		repository: Option<RepositoryId>,
		/// Omit for an anonymous actor
		#[arg(long)]
		user: Option<UserId>,
		/// Dotted action path, e.g. repository.tabs.update
		#[arg(long)]
		action: String,
	},
	/// Print the effective permission matrix of a role as JSON
	Matrix {
		#[arg(long)]
		role: Role,
	},
	/// Apply database migrations
	Migrate,
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	if let Command::Version = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => tabspace_server_config::load_config_with_file(path)?,
		None => tabspace_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	let access = AccessControl::with_registry(config.permissions.registry.clone());

	match args.command {
		Command::Matrix { role } => {
			let matrix = access.evaluator().registry().matrix_for(role);
			println!("{}", serde_json::to_string_pretty(matrix.document())?);
		}
		Command::Migrate => {
			let pool = create_pool(&config.database.url).await?;
			run_migrations(&pool).await?;
			tracing::info!(database = %config.database.url, "migrations applied");
		}
		Command::Check {
			workspace,
			repository,
			user,
			action,
		} => {
			let pool = create_pool(&config.database.url).await?;
			run_migrations(&pool).await?;

			let request = CheckRequest {
				workspace,
				repository,
				user,
				action: ActionPath::from_dotted(&action)?,
			};
			let decision = run_check(
				&WorkspaceRepository::new(pool.clone()),
				&RepositoryRepository::new(pool),
				&access,
				&request,
			)
			.await?;

			match &decision {
				Decision::Allow => tracing::info!(action = %request.action, "allowed"),
				Decision::Deny(reason) => tracing::info!(action = %request.action, %reason, "denied"),
			}
			println!("{decision}");
		}
		Command::Version => println!("{}", version::format_version_info()),
	}

	Ok(())
}
