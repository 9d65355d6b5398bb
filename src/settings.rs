//! Runtime settings for the bot, layered from defaults, an optional config file, and the environment.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Prefix that marks a message as a command when nothing else is configured
pub const DEFAULT_PREFIX: &str = "!";

/// Name (without extension) of the config file that is looked for in the working directory
pub const DEFAULT_FILE: &str = "rollbot";

/// Prefix of environment variables that override settings (`ROLLBOT_TOKEN`, `ROLLBOT_PREFIX`)
pub const ENV_PREFIX: &str = "ROLLBOT";

/// Settings read once at startup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct Settings {
	/// Credential for the chat service
	pub token: String,

	/// Prefix that marks a message as a command
	pub prefix: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			token: String::new(),
			prefix: DEFAULT_PREFIX.to_owned(),
		}
	}
}

impl Settings {
	/// Loads settings with layered precedence, lowest first:
	/// 1. compiled defaults
	/// 2. the config file at `path` if given (which must exist), otherwise `rollbot.{ini,toml,...}` in the working
	///    directory if there is one
	/// 3. `ROLLBOT_*` environment variables
	///
	/// # Errors
	/// If the given file is missing, any config file is malformed, or the merged values don't fit the settings, an
	/// error is returned.
	pub fn load(path: Option<&Path>) -> Result<Self, Error> {
		let defaults = Self::default();
		let file = match path {
			Some(path) => File::from(path).required(true),
			None => File::with_name(DEFAULT_FILE).required(false),
		};

		let settings: Self = Config::builder()
			.set_default("token", defaults.token)?
			.set_default("prefix", defaults.prefix)?
			.add_source(file)
			.add_source(Environment::with_prefix(ENV_PREFIX))
			.build()?
			.try_deserialize()?;

		if settings.prefix.is_empty() {
			return Err(Error::EmptyPrefix);
		}

		tracing::debug!(prefix = %settings.prefix, has_token = !settings.token.is_empty(), "loaded settings");
		Ok(settings)
	}
}

/// Error that can occur while loading [`Settings`]
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// A config source couldn't be read or deserialized.
	#[error("unable to load settings: {0}")]
	Config(#[from] ConfigError),

	/// The prefix was configured as an empty string, which would treat every message as a command.
	#[error("the command prefix must not be empty")]
	EmptyPrefix,
}
