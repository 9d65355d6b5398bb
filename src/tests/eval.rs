use crate::{
	dice::{
		roller::{Avg as AvgRoller, Iter as IterRoller, Val as ValRoller},
		Dice,
	},
	eval::Error,
	parse::{parse, parse_as},
	tree::{Function, Kind, Node, Sign, Tree},
};

/// Builds a tree with a single aggregate of the given function holding 10 and 20.
fn ten_and_twenty(function: Function) -> Tree {
	let mut tree = Tree::new(Function::Add);
	let group = tree.push(tree.root(), Node::aggregate(function));
	tree.push(group, Node::fixed(10));
	tree.push(group, Node::fixed(20));
	tree
}

#[test]
fn add_sums() {
	let mut tree = ten_and_twenty(Function::Add);
	assert_eq!(tree.eval(&mut AvgRoller), Ok(30));
}

#[test]
fn min_picks_lowest() {
	let mut tree = ten_and_twenty(Function::Min);
	assert_eq!(tree.eval(&mut AvgRoller), Ok(10));
}

#[test]
fn max_picks_highest() {
	let mut tree = ten_and_twenty(Function::Max);
	assert_eq!(tree.eval(&mut AvgRoller), Ok(20));
}

#[test]
fn root_function_applies() {
	assert_eq!(parse_as("10, 20", Function::Min).unwrap().eval(&mut AvgRoller), Ok(10));
	assert_eq!(parse_as("10, 20", Function::Max).unwrap().eval(&mut AvgRoller), Ok(20));
	assert_eq!(parse_as("10, 20", Function::Add).unwrap().eval(&mut AvgRoller), Ok(30));
}

#[test]
fn single_die_value() {
	let mut tree = Tree::new(Function::Add);
	let id = tree.push(tree.root(), Node::dice(Dice::new(1, 20)));
	assert_eq!(tree.eval(&mut ValRoller(11)), Ok(11));
	assert_eq!(tree.node(id).value(), Some(11));
	assert!(tree.node(id).rolls().is_empty());
}

#[test]
fn negative_single_die_value() {
	let mut tree = Tree::new(Function::Add);
	let id = tree.push(tree.root(), Node::dice(Dice::new(1, 20)).with_sign(Sign::Negative));
	assert_eq!(tree.eval(&mut ValRoller(11)), Ok(-11));
	assert_eq!(tree.node(id).value(), Some(-11));
}

#[test]
fn multiple_dice_combine_with_parent_function() {
	let cases = [(Function::Add, 18), (Function::Min, 3), (Function::Max, 15)];
	for (function, expected) in cases {
		let mut tree = Tree::new(Function::Add);
		let group = tree.push(tree.root(), Node::aggregate(function));
		let dice = tree.push(group, Node::dice(Dice::new(2, 20)));

		assert_eq!(tree.eval(&mut IterRoller::new([3, 15])), Ok(expected), "{function:?}");
		assert_eq!(tree.node(dice).rolls(), &[3, 15]);
	}
}

#[test]
fn negative_multiple_dice_value() {
	let mut tree = Tree::new(Function::Add);
	let group = tree.push(tree.root(), Node::aggregate(Function::Max));
	let dice = tree.push(group, Node::dice(Dice::new(2, 20)).with_sign(Sign::Negative));

	assert_eq!(tree.eval(&mut IterRoller::new([3, 15])), Ok(-15));
	assert_eq!(tree.node(dice).value(), Some(-15));
}

#[test]
fn children_evaluate_in_written_order() {
	let mut tree = parse("d6 + max(d6, d6) + d6").unwrap();
	let mut roller = IterRoller::new([1, 2, 3, 4]);
	assert_eq!(tree.eval(&mut roller), Ok(8));
	assert!(!roller.can_roll());
}

#[test]
fn empty_aggregate_is_zero() {
	let mut tree = Tree::new(Function::Max);
	assert_eq!(tree.eval(&mut AvgRoller), Ok(0));
	assert_eq!(tree.total(), Some(0));
}

#[test]
fn second_evaluation_is_rejected() {
	let mut tree = parse("3d6").unwrap();
	assert_eq!(tree.eval(&mut ValRoller(2)), Ok(6));
	assert_eq!(tree.eval(&mut ValRoller(5)), Err(Error::AlreadyEvaluated));

	let dice = tree.children(tree.root())[0];
	assert_eq!(tree.total(), Some(6));
	assert_eq!(tree.node(dice).value(), Some(6));
	assert_eq!(tree.node(dice).rolls(), &[2, 2, 2]);
}

#[test]
fn evaluation_after_overflow_is_rejected() {
	let mut tree = parse(&format!("d20 + {} + 1", i32::MAX)).unwrap();
	assert!(matches!(tree.eval(&mut AvgRoller), Err(Error::Overflow(..))));
	assert_eq!(tree.eval(&mut AvgRoller), Err(Error::AlreadyEvaluated));
}

#[test]
fn unevaluated_total_is_none() {
	let tree = parse("3d6").unwrap();
	assert_eq!(tree.total(), None);
}

#[test]
fn sum_overflow() {
	let mut tree = parse(&format!("{} + 1", i32::MAX)).unwrap();
	assert!(matches!(tree.eval(&mut AvgRoller), Err(Error::Overflow(..))));
}

#[test]
fn leaf_kinds_cannot_combine() {
	assert_eq!(Kind::Fixed.combine([1, 2]), Err(Error::UnimplementedFunction(Kind::Fixed)));
	assert_eq!(Kind::Dice.combine([1, 2]), Err(Error::UnimplementedFunction(Kind::Dice)));
	assert_eq!(
		Error::UnimplementedFunction(Kind::Dice).to_string(),
		"unimplemented function type dice"
	);
}
