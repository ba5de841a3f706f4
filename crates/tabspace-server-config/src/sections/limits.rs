// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Size limits enforced when creating and editing repositories.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_MAX_CONTRIBUTORS: usize = 60;
pub const DEFAULT_MAX_TABS: usize = 500;
pub const DEFAULT_MAX_NAME_LEN: usize = 100;
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 255;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LimitsConfigLayer {
	#[serde(default)]
	pub max_contributors: Option<usize>,
	#[serde(default)]
	pub max_tabs: Option<usize>,
	#[serde(default)]
	pub max_name_len: Option<usize>,
	#[serde(default)]
	pub max_description_len: Option<usize>,
}

impl LimitsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.max_contributors.is_some() {
			self.max_contributors = other.max_contributors;
		}
		if other.max_tabs.is_some() {
			self.max_tabs = other.max_tabs;
		}
		if other.max_name_len.is_some() {
			self.max_name_len = other.max_name_len;
		}
		if other.max_description_len.is_some() {
			self.max_description_len = other.max_description_len;
		}
	}

	/// # Errors
	/// Returns [`ConfigError::Validation`] if any limit is zero.
	pub fn finalize(self) -> Result<LimitsConfig, ConfigError> {
		let config = LimitsConfig {
			max_contributors: self.max_contributors.unwrap_or(DEFAULT_MAX_CONTRIBUTORS),
			max_tabs: self.max_tabs.unwrap_or(DEFAULT_MAX_TABS),
			max_name_len: self.max_name_len.unwrap_or(DEFAULT_MAX_NAME_LEN),
			max_description_len: self.max_description_len.unwrap_or(DEFAULT_MAX_DESCRIPTION_LEN),
		};

		for (key, value) in [
			("limits.max_contributors", config.max_contributors),
			("limits.max_tabs", config.max_tabs),
			("limits.max_name_len", config.max_name_len),
			("limits.max_description_len", config.max_description_len),
		] {
			if value == 0 {
				return Err(ConfigError::Validation(format!("{key} must be greater than zero")));
			}
		}

		Ok(config)
	}
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LimitsConfig {
	pub max_contributors: usize,
	pub max_tabs: usize,
	pub max_name_len: usize,
	pub max_description_len: usize,
}

impl Default for LimitsConfig {
	fn default() -> Self {
		Self {
			max_contributors: DEFAULT_MAX_CONTRIBUTORS,
			max_tabs: DEFAULT_MAX_TABS,
			max_name_len: DEFAULT_MAX_NAME_LEN,
			max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
		}
	}
}
