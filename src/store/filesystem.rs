/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use crate::book::error::BookError;
use crate::book::ledger::Ledger;
use crate::config::config_file::Config;
use anyhow::{anyhow, Context, Error};
use dirs::home_dir;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub struct Filesystem;

impl Filesystem {
	pub fn new() -> Self {
		Self
	}

	/// Fetches the config from the given path, or the default path if
	/// none. A missing file at the default path is created empty, so the
	/// first run works without setup; a missing file at a custom path is
	/// an error, since the user asked for it specifically.
	pub fn get_config(
		&self,
		custom_config_path: Option<&String>,
	) -> Result<Config, Error> {
		let config_path = match &custom_config_path {
			None => {
				let home_dir = home_dir().ok_or_else(|| {
					anyhow!("Unable to determine home directory")
				})?;
				home_dir.join(".config/lotbook/config.toml")
			},
			Some(p) => PathBuf::from(p),
		};

		if !config_path.exists() && custom_config_path.is_none() {
			if let Some(parent) = config_path.parent() {
				fs::create_dir_all(parent)?;
			}
			File::create(config_path.clone())?;
		}

		let content = fs::read_to_string(&config_path).with_context(|| {
			format!("failed to read config at {}", config_path.display())
		})?;

		let config: Config = toml::from_str(&content)
			.map_err(|e| anyhow!("failed to parse config: {}", e))?;

		Ok(config)
	}

	/// Reads a book file into a ledger. A missing or empty file is an
	/// empty book; anything present must be the symbol -> lot-triples
	/// mapping, with every triple describing a valid lot.
	pub fn load_book(&self, path: &str) -> Result<Ledger, Error> {
		let path = Path::new(path);
		if !path.exists() {
			return Ok(Ledger::new());
		}

		let content = fs::read_to_string(path).with_context(|| {
			format!("failed to read book file at {}", path.display())
		})?;

		if content.trim().is_empty() {
			return Ok(Ledger::new());
		}

		let mut ledger: Ledger = serde_json::from_str(&content).map_err(
			|e| BookError::InvalidLotFormat {
				reason: e.to_string(),
			},
		)?;

		ledger.validate()?;

		// A hand-edited file may carry exhausted lots or empty symbols;
		// in memory those never survive a completed operation
		ledger.prune();

		Ok(ledger)
	}

	/// Writes the ledger to the book file, creating parent directories as
	/// needed. Callers save only after a whole operation has succeeded.
	pub fn save_book(&self, ledger: &Ledger, path: &str) -> Result<(), Error> {
		let path = Path::new(path);
		if let Some(parent) = path.parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent)?;
			}
		}

		let content = serde_json::to_string_pretty(ledger)?;
		fs::write(path, content).with_context(|| {
			format!("failed to write book file at {}", path.display())
		})?;

		Ok(())
	}
}
