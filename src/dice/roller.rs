//! Sources of die rolls. Everything that rolls dice takes a [`Roller`] so that real randomness can be swapped out for
//! something predictable in tests.

use core::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;

use super::Dice;

/// Rolls dice - what else is there to say?
pub trait Roller {
	/// Produces a value in the inclusive range `min..=max`.
	///
	/// Callers must ensure `min <= max`.
	#[must_use]
	fn roll_range(&mut self, min: u32, max: u32) -> u32;

	/// Rolls a single die.
	#[must_use]
	#[inline]
	fn roll_die(&mut self, sides: u32) -> u32 {
		self.roll_range(1, sides)
	}

	/// Rolls every die in a set of dice, in order.
	#[must_use]
	fn roll(&mut self, dice: &Dice) -> Vec<u32>
	where
		Self: Sized,
	{
		(0..dice.count).map(|_| self.roll_die(dice.sides)).collect()
	}
}

impl<R: Roller + ?Sized> Roller for &mut R {
	#[inline]
	fn roll_range(&mut self, min: u32, max: u32) -> u32 {
		(**self).roll_range(min, max)
	}
}

/// Generates rolls with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// # Examples
///
/// ## Default fastrand roller
/// ```
/// use rollbot::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
///
/// let mut roller = FastRandRoller::default();
///
/// let rolls = roller.roll(&Dice::new(4, 6));
/// assert_eq!(rolls.len(), 4);
/// assert!(rolls.iter().all(|roll| (1..=6).contains(roll)));
/// ```
///
/// ## Manually seeded fastrand roller
/// ```
/// use rollbot::dice::{roller::{FastRand as FastRandRoller, Roller}, Dice};
///
/// let dice = Dice::new(4, 6);
/// let first = FastRandRoller::with_seed(0x750c38d574400).roll(&dice);
/// let second = FastRandRoller::with_seed(0x750c38d574400).roll(&dice);
/// assert_eq!(first, second);
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone, Default)]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	/// Rolls uniformly using the [`fastrand::Rng`] the roller was created with.
	#[inline]
	fn roll_range(&mut self, min: u32, max: u32) -> u32 {
		debug_assert!(min <= max, "roll range {min}..={max} is empty");
		self.0.u32(min..=max)
	}
}

/// Generates rolls that always have a specific value, clamped into the requested range.
///
/// # Examples
/// ```
/// use rollbot::dice::{roller::{Roller, Val as ValRoller}, Dice};
///
/// let mut roller = ValRoller(4);
/// assert_eq!(roller.roll(&Dice::new(3, 6)), vec![4, 4, 4]);
///
/// // Clamped to the die's faces
/// assert_eq!(roller.roll_die(2), 2);
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub u32);

impl Roller for Val {
	#[inline]
	fn roll_range(&mut self, min: u32, max: u32) -> u32 {
		self.0.clamp(min, max)
	}
}

/// Generates rolls that always have their max value.
///
/// # Examples
/// ```
/// use rollbot::dice::{roller::{Max as MaxRoller, Roller}, Dice};
///
/// let mut roller = MaxRoller;
/// assert_eq!(roller.roll(&Dice::new(2, 20)), vec![20, 20]);
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	#[inline]
	fn roll_range(&mut self, _min: u32, max: u32) -> u32 {
		max
	}
}

/// Generates rolls that always land on the middle of the range, rounded up (10.5 on a d20 becomes 11).
/// Handy for showing what an "average" roll looks like and for deterministic tests.
///
/// # Examples
/// ```
/// use rollbot::dice::{roller::{Avg as AvgRoller, Roller}, Dice};
///
/// let mut roller = AvgRoller;
/// assert_eq!(roller.roll_die(20), 11);
/// assert_eq!(roller.roll_die(8), 5);
/// assert_eq!(roller.roll_range(3, 3), 3);
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Avg;

impl Roller for Avg {
	#[inline]
	fn roll_range(&mut self, min: u32, max: u32) -> u32 {
		min.saturating_add(max.saturating_sub(min).div_ceil(2))
	}
}

/// Generates rolls from an iterator of values. Mainly useful for testing purposes.
///
/// # Examples
/// ```
/// use rollbot::dice::{roller::{Iter as IterRoller, Roller}, Dice};
///
/// let mut roller = IterRoller::new(vec![1, 2, 3, 4, 10]);
/// assert_eq!(roller.roll(&Dice::new(5, 6)), vec![1, 2, 3, 4, 10]);
/// assert!(!roller.can_roll());
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u32>>(Peekable<I>);

impl<I: Iterator<Item = u32>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new roller that uses the given iterator to provide roll values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = u32>> Roller for Iter<I> {
	/// Rolls a die with the value from the next iteration, ignoring the requested range.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn roll_range(&mut self, _min: u32, _max: u32) -> u32 {
		self.0.next().expect("iterator is finished")
	}
}
