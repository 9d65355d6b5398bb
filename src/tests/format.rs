use crate::{
	dice::{roller::Avg as AvgRoller, Dice},
	format::Error,
	parse::parse,
	tree::{Function, Node, Sign, Tree},
};

#[test]
fn sign_prefix_in_sum() {
	let mut tree = Tree::new(Function::Add);
	let positive = tree.push(tree.root(), Node::fixed(1));
	let negative = tree.push(tree.root(), Node::fixed(1).with_sign(Sign::Negative));

	assert_eq!(tree.sign_prefix(positive, true), " + ");
	assert_eq!(tree.sign_prefix(positive, false), "");
	assert_eq!(tree.sign_prefix(negative, true), " - ");
	assert_eq!(tree.sign_prefix(negative, false), " - ");
}

#[test]
fn sign_prefix_in_selection() {
	for function in [Function::Min, Function::Max] {
		let mut tree = Tree::new(function);
		let positive = tree.push(tree.root(), Node::fixed(1));
		let negative = tree.push(tree.root(), Node::fixed(1).with_sign(Sign::Negative));

		assert_eq!(tree.sign_prefix(positive, true), "");
		assert_eq!(tree.sign_prefix(positive, false), "");
		assert_eq!(tree.sign_prefix(negative, true), "-");
		assert_eq!(tree.sign_prefix(negative, false), "-");
	}
}

#[test]
fn fixed_value_result() {
	let mut tree = Tree::new(Function::Add);
	tree.push(tree.root(), Node::fixed(7).with_name("STR mod"));
	tree.eval(&mut AvgRoller).unwrap();
	assert_eq!(tree.render_result(" ").unwrap(), "**7** STR mod");
}

#[test]
fn single_die_result() {
	let mut tree = Tree::new(Function::Add);
	tree.push(tree.root(), Node::dice(Dice::new(1, 20)));
	tree.eval(&mut AvgRoller).unwrap();
	assert_eq!(tree.render_result(" ").unwrap(), "**11**");
}

#[test]
fn lone_die_borrows_negative_group_sign() {
	let mut tree = parse("-(d20)").unwrap();
	tree.eval(&mut AvgRoller).unwrap();
	assert_eq!(tree.render_expression(), " - (1d20)");
	assert_eq!(tree.render_result(" ").unwrap(), "**-11**");
}

#[test]
fn die_among_siblings_keeps_own_sign() {
	let mut tree = parse("min(1d20, -1d6)").unwrap();
	tree.eval(&mut AvgRoller).unwrap();
	assert_eq!(tree.render_expression(), "min(1d20, -1d6)");
	assert_eq!(tree.render_result(" ").unwrap(), "**-4** (**11**, **-4**)");
}

#[test]
fn leading_negative_term() {
	let mut tree = parse("-d20").unwrap();
	tree.eval(&mut AvgRoller).unwrap();
	assert_eq!(tree.render_expression(), " - 1d20");
	assert_eq!(tree.render_result(" ").unwrap(), "**-11**");
}

#[test]
fn empty_aggregate_result() {
	let mut tree = Tree::new(Function::Max);
	tree.eval(&mut AvgRoller).unwrap();
	assert_eq!(tree.render_expression(), "");
	assert_eq!(tree.render_result(" ").unwrap(), "**0**");
}

#[test]
fn custom_separator() {
	let mut tree = parse("2d6 + 1").unwrap();
	tree.eval(&mut AvgRoller).unwrap();
	assert_eq!(tree.render_result("\t").unwrap(), "**9**\t(**8**\t(4,\t4),\t**1**)");
}

#[test]
fn unevaluated_result_errors() {
	let tree = parse("d20").unwrap();
	assert!(matches!(tree.render_result(" "), Err(Error::NotEvaluated(..))));
}

#[test]
fn rendering_is_idempotent() {
	let mut tree = parse("3d10 stuff name-7 some modifier+max(2d4, -d6) guidance").unwrap();
	let before = tree.render_expression();
	assert_eq!(tree.render_expression(), before);

	tree.eval(&mut AvgRoller).unwrap();
	assert_eq!(tree.render_expression(), before);

	let result = tree.render_result(" ").unwrap();
	assert_eq!(tree.render_result(" ").unwrap(), result);
}

#[test]
fn display_matches_expression() {
	let tree = parse("max(2d20,-d4)+3").unwrap();
	assert_eq!(tree.to_string(), tree.render_expression());
	assert_eq!(tree.to_string(), "max(2d20, -1d4) + 3");
}
