//! Resolving an expression tree into numbers by rolling its dice.

use crate::{
	dice::Roller,
	tree::{Kind, NodeId, Term, Tree},
};

impl Kind {
	/// Combines a sequence of values the way this kind of aggregate does: [`Kind::Add`] sums them, while
	/// [`Kind::Min`] and [`Kind::Max`] pick the lowest and highest respectively. An empty sequence combines to `0`.
	///
	/// # Errors
	/// Leaf kinds ([`Kind::Fixed`] and [`Kind::Dice`]) don't combine anything, so they result in
	/// [`Error::UnimplementedFunction`]. A sum that overflows results in [`Error::Overflow`].
	///
	/// # Examples
	/// ```
	/// use rollbot::tree::Kind;
	///
	/// assert_eq!(Kind::Add.combine([10, -20, 5])?, -5);
	/// assert_eq!(Kind::Min.combine([10, -20, 5])?, -20);
	/// assert_eq!(Kind::Max.combine([10, -20, 5])?, 10);
	/// assert!(Kind::Dice.combine([1, 2]).is_err());
	/// # Ok::<(), rollbot::eval::Error>(())
	/// ```
	pub fn combine(self, vals: impl IntoIterator<Item = i32>) -> Result<i32, Error> {
		let mut vals = vals.into_iter();
		match self {
			Self::Add => vals.try_fold(0_i32, |sum, val| {
				sum.checked_add(val)
					.ok_or_else(|| Error::Overflow(format!("{sum} + {val}")))
			}),
			Self::Min => Ok(vals.reduce(i32::min).unwrap_or_default()),
			Self::Max => Ok(vals.reduce(i32::max).unwrap_or_default()),
			Self::Fixed | Self::Dice => Err(Error::UnimplementedFunction(self)),
		}
	}
}

impl Tree {
	/// Evaluates the whole tree, rolling every set of dice with the given roller and storing the resolved value on each
	/// node. Nodes are evaluated depth-first, children before their parents, in the order they were written.
	/// A tree is only ever evaluated once; its values don't change afterwards.
	///
	/// Returns the total of the expression.
	///
	/// # Errors
	/// If any node already has a value from an earlier evaluation, [`Error::AlreadyEvaluated`] is returned.
	/// If an integer overflow occurs while combining values, or an aggregate somehow ends up with a kind that can't
	/// combine values, another error variant is returned.
	///
	/// # Examples
	/// ```
	/// use rollbot::dice::roller::Val as ValRoller;
	///
	/// let mut tree = rollbot::parse("3d6 - 2")?;
	/// assert_eq!(tree.eval(&mut ValRoller(4))?, 10);
	/// assert_eq!(tree.total(), Some(10));
	/// assert!(tree.eval(&mut ValRoller(6)).is_err());
	/// # Ok::<(), Box<dyn std::error::Error>>(())
	/// ```
	pub fn eval<R: Roller>(&mut self, roller: &mut R) -> Result<i32, Error> {
		if self.iter().any(|(_, node)| node.value().is_some()) {
			return Err(Error::AlreadyEvaluated);
		}

		let total = self.eval_node(self.root(), roller)?;
		tracing::debug!(total, nodes = self.len(), "evaluated dice expression");
		Ok(total)
	}

	/// Evaluates a single node and everything beneath it.
	fn eval_node<R: Roller>(&mut self, id: NodeId, roller: &mut R) -> Result<i32, Error> {
		let val = match self.node(id).term().clone() {
			Term::Fixed(val) => val,

			Term::Dice { dice, .. } => {
				let rolls = roller.roll(&dice);
				tracing::trace!(%dice, ?rolls, "rolled dice");

				let vals = rolls
					.iter()
					.map(|&roll| i32::try_from(roll).map_err(|_err| self.overflow(id)))
					.collect::<Result<Vec<_>, _>>()?;

				// Multiple dice combine the same way their parent combines its children
				let combined = if dice.is_multiple() {
					let kind = self.parent_function(id).map_or(Kind::Add, Kind::from);
					kind.combine(vals).map_err(|err| match err {
						Error::Overflow(..) => self.overflow(id),
						err => err,
					})?
				} else {
					vals.first().copied().unwrap_or_default()
				};

				if let Term::Dice { rolls: stored, .. } = self.node_mut(id).term_mut() {
					*stored = if dice.is_multiple() { rolls } else { Vec::new() };
				}

				combined
			}

			Term::Aggregate { function, children } => {
				let mut vals = Vec::with_capacity(children.len());
				for child in children {
					vals.push(self.eval_node(child, roller)?);
				}

				Kind::from(function).combine(vals).map_err(|err| match err {
					Error::Overflow(..) => self.overflow(id),
					err => err,
				})?
			}
		};

		let val = self.node(id).sign().apply(val).ok_or_else(|| self.overflow(id))?;
		self.node_mut(id).set_value(val);
		Ok(val)
	}

	/// Builds an overflow error describing the node it occurred in.
	fn overflow(&self, id: NodeId) -> Error {
		Error::Overflow(self.render_node(id, true).trim().to_owned())
	}
}

/// Error that can occur during [`Tree::eval()`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// Values were asked to combine using a kind of node that doesn't combine values.
	/// The parser never produces such a tree, so this indicates a bug.
	#[error("unimplemented function type {0}")]
	UnimplementedFunction(Kind),

	/// Integer overflow while summing or negating values
	#[error("integer overflow while evaluating {0}")]
	Overflow(String),

	/// The tree was evaluated before.
	#[error("expression has already been evaluated")]
	AlreadyEvaluated,
}
