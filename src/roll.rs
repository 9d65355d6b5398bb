//! Turning chat messages into roll replies.
//!
//! A [`Dispatcher`] watches for messages that start with its prefix, picks the command out of them, and produces the
//! text to reply with. The chat connection itself lives outside of the library; anything that can hand over message
//! text and post a reply can drive it.

use crate::{dice::Roller, eval, format, parse};

/// Text that precedes the message of any error that stops a roll
pub const APOLOGY: &str = "Sorry, I couldn't roll that: ";

/// Whitespace that replaces every run of whitespace in a reply's result line
pub const RESULT_SEPARATOR: &str = "    ";

/// Outcome of rolling an expression
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Roll {
	/// Canonical form of the expression that was rolled
	pub expression: String,

	/// Breakdown of the evaluated expression, as rendered with a single space separator
	pub result: String,

	/// Total of the expression
	pub total: i32,
}

impl Roll {
	/// Builds the reply text: the expression on one line and the result on the next, both trimmed and with every run
	/// of whitespace in the result replaced by [`RESULT_SEPARATOR`].
	///
	/// # Examples
	/// ```
	/// use rollbot::{dice::roller::Avg as AvgRoller, roll::roll};
	///
	/// let roll = roll("3d10 stuff name-7", &mut AvgRoller)?;
	/// assert_eq!(roll.reply(), "3d10 stuff name - 7\n**11**    (**18**    stuff    name    (6,    6,    6),    **-7**)");
	/// # Ok::<(), rollbot::roll::Error>(())
	/// ```
	#[must_use]
	pub fn reply(&self) -> String {
		let result = self.result.split_whitespace().collect::<Vec<_>>().join(RESULT_SEPARATOR);
		format!("{}\n{result}", self.expression.trim())
	}
}

/// Parses, evaluates, and renders an expression in one go.
///
/// # Errors
/// If the expression can't be parsed or evaluated, an error variant describing the problem is returned.
///
/// # Examples
/// ```
/// use rollbot::{dice::roller::Avg as AvgRoller, roll::roll};
///
/// let roll = roll("min(2d20)+7", &mut AvgRoller)?;
/// assert_eq!(roll.expression, "min(2d20) + 7");
/// assert_eq!(roll.result, "**18** (**11** (11, 11), **7**)");
/// assert_eq!(roll.total, 18);
/// # Ok::<(), rollbot::roll::Error>(())
/// ```
pub fn roll<R: Roller>(text: &str, roller: &mut R) -> Result<Roll, Error> {
	let mut tree = parse::parse(text)?;
	let expression = tree.render_expression();
	let total = tree.eval(roller)?;
	let result = tree.render_result(" ")?;

	tracing::debug!(%expression, total, "rolled expression");
	Ok(Roll {
		expression,
		result,
		total,
	})
}

/// Command found in a message, with the prefix already removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command<'a> {
	/// `roll <expression>`: replies with the roll as-is
	Roll(&'a str),

	/// `rollcode <expression>`: replies with the roll wrapped in backticks
	RollCode(&'a str),

	/// Any other word
	Unknown(&'a str),
}

impl<'a> Command<'a> {
	/// Picks the command out of the text that followed the prefix. The command keyword is the first
	/// whitespace-delimited word; everything after it is the expression.
	///
	/// # Examples
	/// ```
	/// use rollbot::roll::Command;
	///
	/// assert_eq!(Command::parse("roll 3d8 + 2"), Command::Roll("3d8 + 2"));
	/// assert_eq!(Command::parse("rollcode d20"), Command::RollCode("d20"));
	/// assert_eq!(Command::parse("roll"), Command::Roll(""));
	/// assert_eq!(Command::parse("dance now"), Command::Unknown("dance"));
	/// ```
	#[must_use]
	pub fn parse(text: &'a str) -> Self {
		let text = text.trim_start();
		let (keyword, rest) = text
			.split_once(char::is_whitespace)
			.map_or((text, ""), |(keyword, rest)| (keyword, rest.trim()));

		match keyword {
			"roll" => Self::Roll(rest),
			"rollcode" => Self::RollCode(rest),
			_ => Self::Unknown(keyword),
		}
	}
}

/// Handles chat messages, rolling with the roller it owns.
///
/// # Examples
/// ```
/// use rollbot::{dice::roller::Avg as AvgRoller, Dispatcher};
///
/// let mut dispatcher = Dispatcher::new("!", AvgRoller);
/// assert_eq!(dispatcher.handle("!roll d20").as_deref(), Some("1d20\n**11**"));
/// assert_eq!(dispatcher.handle("!rollcode d20").as_deref(), Some("`1d20\n**11**`"));
/// assert_eq!(dispatcher.handle("!dance").as_deref(), Some("Unknown command: dance"));
/// assert_eq!(dispatcher.handle("roll d20"), None);
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher<R: Roller> {
	prefix: String,
	roller: R,
}

impl<R: Roller> Dispatcher<R> {
	/// Creates a dispatcher that responds to messages starting with `prefix`.
	#[must_use]
	pub fn new(prefix: impl Into<String>, roller: R) -> Self {
		Self {
			prefix: prefix.into(),
			roller,
		}
	}

	/// Prefix that marks a message as a command
	#[must_use]
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Handles a single message, returning the text to reply with.
	/// Messages that don't start with the prefix aren't meant for the bot, so they result in [`None`].
	pub fn handle(&mut self, message: &str) -> Option<String> {
		let text = message.strip_prefix(self.prefix.as_str())?;
		let command = Command::parse(text);
		tracing::debug!(?command, "received command");
		Some(self.execute(command))
	}

	/// Runs a command and produces its reply. Errors become an apology that includes the error's message.
	pub fn execute(&mut self, command: Command<'_>) -> String {
		let (expression, code) = match command {
			Command::Roll(expression) => (expression, false),
			Command::RollCode(expression) => (expression, true),
			Command::Unknown(command) => {
				tracing::warn!(command, "unknown command");
				return format!("Unknown command: {command}");
			}
		};

		match roll(expression, &mut self.roller) {
			Ok(roll) => {
				let reply = roll.reply();
				tracing::info!(expression, total = roll.total, "replying with roll");
				if code {
					format!("`{reply}`")
				} else {
					reply
				}
			}
			Err(err) => {
				tracing::warn!(expression, %err, "unable to roll");
				format!("{APOLOGY}{err}")
			}
		}
	}
}

/// Error that can occur while rolling an expression from start to finish
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// The expression couldn't be parsed.
	#[error(transparent)]
	Parse(#[from] parse::Error),

	/// The expression couldn't be evaluated.
	#[error(transparent)]
	Eval(#[from] eval::Error),

	/// The evaluated expression couldn't be rendered.
	#[error(transparent)]
	Format(#[from] format::Error),
}
