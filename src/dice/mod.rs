//! Dice primitives: the `<count>d<sides>` term and the limits placed on it.
//!
//! For using dice as part of a larger expression, see [`Term::Dice`].
//!
//! [`Term::Dice`]: crate::tree::Term::Dice

pub mod roller;

use core::fmt;

pub use self::roller::Roller;

/// Smallest number of dice a single term may roll
pub const MIN_COUNT: u8 = 1;

/// Largest number of dice a single term may roll
pub const MAX_COUNT: u8 = 200;

/// Smallest number of sides a die may have
pub const MIN_SIDES: u32 = 2;

/// Largest number of sides a die may have
pub const MAX_SIDES: u32 = 999_999;

/// A set of one or more rollable dice with a specific number of sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Dice {
	/// Number of dice to roll
	pub count: u8,

	/// Number of sides for each die
	pub sides: u32,
}

impl Dice {
	/// Creates a new set of dice with a given count and number of sides.
	///
	/// No bounds are enforced here; the parser rejects dice outside of [`MIN_COUNT`]..=[`MAX_COUNT`] and
	/// [`MIN_SIDES`]..=[`MAX_SIDES`] before they are ever constructed.
	#[must_use]
	pub const fn new(count: u8, sides: u32) -> Self {
		Self { count, sides }
	}

	/// Checks whether rolling these dice produces a list of individual rolls rather than a single value.
	#[must_use]
	#[inline]
	pub const fn is_multiple(&self) -> bool {
		self.count > 1
	}
}

impl Default for Dice {
	/// Creates the default dice (1d20), which is also what an empty expression rolls.
	#[inline]
	fn default() -> Self {
		Self::new(1, 20)
	}
}

impl fmt::Display for Dice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}d{}", self.count, self.sides)
	}
}
