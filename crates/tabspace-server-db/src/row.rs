// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column decoding shared by the stores.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::{sqlite::SqliteRow, Row};

use crate::error::DbError;

pub(crate) fn parse_id<T: FromStr<Err = uuid::Error>>(row: &SqliteRow, column: &str) -> Result<T, DbError> {
	let value: String = row.get(column);
	value
		.parse()
		.map_err(|e: uuid::Error| DbError::Internal(format!("{column}: {e}")))
}

pub(crate) fn parse_timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, DbError> {
	let value: String = row.get(column);
	DateTime::parse_from_rfc3339(&value)
		.map(|d| d.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("{column}: {e}")))
}

pub(crate) fn parse_json<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T, DbError> {
	let value: String = row.get(column);
	Ok(serde_json::from_str(&value)?)
}

pub(crate) fn parse_enum<T: FromStr>(row: &SqliteRow, column: &str) -> Result<T, DbError> {
	let value: String = row.get(column);
	value
		.parse()
		.map_err(|_| DbError::Internal(format!("{column}: unexpected value {value:?}")))
}
