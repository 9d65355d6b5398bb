//! Rendering expression trees as text: the canonical form of the expression, and the breakdown of an evaluated roll.

use core::fmt;

use crate::tree::{NodeId, Term, Tree};

impl Tree {
	/// Builds the canonical expression string, normalizing spacing and signs and filling in implied values.
	/// This is safe to call before or after evaluation, and always gives the same output for the same tree.
	///
	/// # Examples
	/// ```
	/// let tree = rollbot::parse("3d10 stuff name-7 some modifier+d4 guidance")?;
	/// assert_eq!(tree.render_expression(), "3d10 stuff name - 7 some modifier + 1d4 guidance");
	///
	/// let tree = rollbot::parse("max(2d20,-d4)")?;
	/// assert_eq!(tree.render_expression(), "max(2d20, -1d4)");
	/// # Ok::<(), rollbot::parse::Error>(())
	/// ```
	#[must_use]
	pub fn render_expression(&self) -> String {
		self.render_children(self.root())
	}

	/// Builds the expression string for a single node, including the sign that separates it from its siblings.
	/// `first` indicates whether the node is the first child of its parent, in which case a positive sign is left out.
	#[must_use]
	pub fn render_node(&self, id: NodeId, first: bool) -> String {
		let node = self.node(id);
		let sign = self.sign_prefix(id, !first);
		let name = name_suffix(node.name());

		match node.term() {
			Term::Fixed(val) => format!("{sign}{val}{name}"),
			Term::Dice { dice, .. } => format!("{sign}{dice}{name}"),
			Term::Aggregate { function, .. } => {
				format!("{sign}{}({}){name}", function.keyword(), self.render_children(id))
			}
		}
	}

	/// Builds the expression string for all of a node's children. Summed children are joined by their own signs, while
	/// the children of min/max are separated by commas.
	#[must_use]
	pub fn render_children(&self, id: NodeId) -> String {
		let separator = match self.node(id).term() {
			Term::Aggregate { function, .. } if function.is_selection() => ", ",
			_ => "",
		};

		self.children(id)
			.iter()
			.enumerate()
			.map(|(idx, &child)| self.render_node(child, idx == 0))
			.collect::<Vec<_>>()
			.join(separator)
	}

	/// Gets the sign to write in front of a node, which depends on its parent.
	///
	/// Children of min/max are separated by commas, so they only carry a bare `-` when negative. Everywhere else, a
	/// negative node is preceded by ` - `, and a positive one by ` + ` if `include_positive` is set.
	#[must_use]
	pub fn sign_prefix(&self, id: NodeId, include_positive: bool) -> &'static str {
		let sign = self.node(id).sign();
		if self.parent_function(id).is_some_and(|function| function.is_selection()) {
			return if sign.is_negative() { "-" } else { "" };
		}

		match (sign.is_positive(), include_positive) {
			(true, true) => " + ",
			(true, false) => "",
			(false, _) => " - ",
		}
	}

	/// Builds the result string for an evaluated tree: each value in bold, followed by its name and, for anything made
	/// up of multiple values, a parenthesized breakdown of them. Breakdowns are separated from what they belong to by
	/// `separator`, which also follows the commas between items.
	///
	/// # Errors
	/// If the tree hasn't been evaluated, [`Error::NotEvaluated`] is returned.
	///
	/// # Examples
	/// ```
	/// use rollbot::dice::roller::Avg as AvgRoller;
	///
	/// let mut tree = rollbot::parse("3d8 cold + 1d6 bludgeoning dmg+3d4 piercing-1 STR mod")?;
	/// tree.eval(&mut AvgRoller)?;
	/// assert_eq!(
	/// 	tree.render_result(" ")?,
	/// 	"**27** (**15** cold (5, 5, 5), **4** bludgeoning dmg, **9** piercing (3, 3, 3), **-1** STR mod)"
	/// );
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn render_result(&self, separator: &str) -> Result<String, Error> {
		self.render_node_result(self.root(), separator)
	}

	/// Builds the result string for a single evaluated node. See [`Self::render_result()`].
	///
	/// # Errors
	/// If the node hasn't been evaluated, [`Error::NotEvaluated`] is returned.
	pub fn render_node_result(&self, id: NodeId, separator: &str) -> Result<String, Error> {
		let node = self.node(id);
		let val = node
			.value()
			.ok_or_else(|| Error::NotEvaluated(self.render_node(id, true).trim().to_owned()))?;
		let name = name_suffix(node.name());

		match node.term() {
			Term::Fixed(..) => Ok(format!("**{val}**{name}")),

			Term::Dice { rolls, .. } => {
				// A lone die stands in for its negated group, so it shows the group's sign
				let shown = match node.parent() {
					Some(parent)
						if self.children(parent).len() == 1 && self.node(parent).sign().is_negative() =>
					{
						val.saturating_neg()
					}
					_ => val,
				};

				let mut text = format!("**{shown}**{name}");
				if !rolls.is_empty() {
					let rolls = rolls.iter().map(ToString::to_string).collect::<Vec<_>>();
					text.push_str(&paren_list(&rolls, separator));
				}
				Ok(text)
			}

			Term::Aggregate { children, .. } => match children.as_slice() {
				[] => Ok(format!("**{val}**{name}")),
				[child] => self.render_node_result(*child, separator),
				children => {
					let parts = children
						.iter()
						.map(|&child| self.render_node_result(child, separator))
						.collect::<Result<Vec<_>, _>>()?;
					Ok(format!("**{val}**{name}{}", paren_list(&parts, separator)))
				}
			},
		}
	}
}

impl fmt::Display for Tree {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::render_expression()`].
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render_expression())
	}
}

/// Builds the text that follows a value for its name, if it has one.
fn name_suffix(name: Option<&str>) -> String {
	name.map(|name| format!(" {name}")).unwrap_or_default()
}

/// Wraps a list of items in parentheses, preceded by the separator and with the separator after each comma.
fn paren_list(items: &[String], separator: &str) -> String {
	format!("{separator}({})", items.join(&format!(",{separator}")))
}

/// Error that can occur while rendering a result
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// The result of an expression was requested before it was evaluated.
	#[error("\"{0}\" has not been evaluated yet")]
	NotEvaluated(String),
}
