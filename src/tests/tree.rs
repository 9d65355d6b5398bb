use crate::{
	dice::Dice,
	tree::{Function, Kind, Node, Sign, Term, Tree},
};

#[test]
fn new_tree_has_only_root() {
	let tree = Tree::new(Function::Min);
	assert_eq!(tree.len(), 1);
	assert!(tree.is_empty());
	assert_eq!(tree.node(tree.root()).kind(), Kind::Min);
	assert_eq!(tree.node(tree.root()).parent(), None);
}

#[test]
fn default_tree_is_single_d20() {
	let tree = Tree::default();
	let children = tree.children(tree.root());
	assert_eq!(children.len(), 1);
	assert_eq!(
		tree.node(children[0]).term(),
		&Term::Dice {
			dice: Dice::new(1, 20),
			rolls: Vec::new()
		}
	);
}

#[test]
fn push_links_parent_and_child() {
	let mut tree = Tree::new(Function::Add);
	let group = tree.push(tree.root(), Node::aggregate(Function::Max));
	let fixed = tree.push(group, Node::fixed(4));

	assert_eq!(tree.children(tree.root()), &[group]);
	assert_eq!(tree.children(group), &[fixed]);
	assert_eq!(tree.node(fixed).parent(), Some(group));
	assert_eq!(tree.parent_function(fixed), Some(Function::Max));
	assert_eq!(tree.parent_function(group), Some(Function::Add));
	assert_eq!(tree.parent_function(tree.root()), None);
}

#[test]
#[should_panic(expected = "not an aggregate")]
fn push_onto_leaf_panics() {
	let mut tree = Tree::new(Function::Add);
	let fixed = tree.push(tree.root(), Node::fixed(1));
	tree.push(fixed, Node::fixed(2));
}

#[test]
fn pop_unlinks_empty_group() {
	let mut tree = Tree::new(Function::Add);
	tree.push(tree.root(), Node::fixed(1));
	let group = tree.push(tree.root(), Node::aggregate(Function::Min));
	tree.pop(group);

	assert_eq!(tree.len(), 2);
	assert_eq!(tree.children(tree.root()).len(), 1);
}

#[test]
fn names_are_trimmed() {
	assert_eq!(Node::fixed(1).with_name("  STR mod ").name(), Some("STR mod"));
	assert_eq!(Node::fixed(1).with_name("   ").name(), None);
	assert_eq!(Node::fixed(1).name(), None);
}

#[test]
fn kinds_match_terms() {
	assert_eq!(Node::fixed(1).kind(), Kind::Fixed);
	assert_eq!(Node::dice(Dice::default()).kind(), Kind::Dice);
	assert_eq!(Node::aggregate(Function::Add).kind(), Kind::Add);
	assert_eq!(Node::aggregate(Function::Min).kind(), Kind::Min);
	assert_eq!(Node::aggregate(Function::Max).kind(), Kind::Max);
}

#[test]
fn sign_from_symbol() {
	assert_eq!(Sign::from_symbol("+"), Ok(Sign::Positive));
	assert_eq!(Sign::from_symbol(""), Ok(Sign::Positive));
	assert_eq!(Sign::from_symbol("-"), Ok(Sign::Negative));
	assert!(Sign::from_symbol("n").is_err());
	assert!(Sign::from_symbol("--").is_err());
}

#[test]
fn sign_apply() {
	assert_eq!(Sign::Positive.apply(5), Some(5));
	assert_eq!(Sign::Negative.apply(5), Some(-5));
	assert_eq!(Sign::Negative.apply(i32::MIN), None);
}

#[test]
fn function_keywords() {
	assert_eq!(Function::from_keyword("min"), Some(Function::Min));
	assert_eq!(Function::from_keyword("MAX"), Some(Function::Max));
	assert_eq!(Function::from_keyword("Add"), Some(Function::Add));
	assert_eq!(Function::from_keyword("nonexistent"), None);
	assert_eq!(Function::Add.keyword(), "");
	assert_eq!(Function::Min.keyword(), "min");
}
