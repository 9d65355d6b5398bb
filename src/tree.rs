//! The expression tree built by the parser, evaluated by a [`Roller`], and rendered back into text.
//!
//! Nodes live in an arena owned by the [`Tree`] and refer to each other with [`NodeId`]s. Children are owned by
//! exactly one aggregate; the parent link is a plain index that is only consulted for rendering and for choosing how
//! multiple dice combine.
//!
//! [`Roller`]: crate::dice::Roller

use core::fmt;

use crate::{dice::Dice, parse::Error as ParseError};

/// Index of a node within the [`Tree`] that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Position of the node within its tree's arena
	#[must_use]
	#[inline]
	pub const fn index(self) -> usize {
		self.0
	}
}

/// Whether a node adds to or subtracts from its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[expect(clippy::exhaustive_enums, reason = "Highly unlikely to change")]
pub enum Sign {
	/// Contributes its value as-is
	#[default]
	Positive,

	/// Contributes the negation of its value
	Negative,
}

impl Sign {
	/// Interprets a sign symbol as written in an expression.
	///
	/// # Errors
	/// Anything other than `+`, `-`, or nothing at all results in [`ParseError::InvalidSymbol`].
	///
	/// # Examples
	/// ```
	/// use rollbot::tree::Sign;
	///
	/// assert_eq!(Sign::from_symbol("+")?, Sign::Positive);
	/// assert_eq!(Sign::from_symbol("")?, Sign::Positive);
	/// assert_eq!(Sign::from_symbol("-")?, Sign::Negative);
	/// assert!(Sign::from_symbol("n").is_err());
	/// # Ok::<(), rollbot::parse::Error>(())
	/// ```
	pub fn from_symbol(symbol: &str) -> Result<Self, ParseError> {
		match symbol {
			"" | "+" => Ok(Self::Positive),
			"-" => Ok(Self::Negative),
			_ => Err(ParseError::InvalidSymbol(symbol.to_owned())),
		}
	}

	/// Checks whether this is [`Self::Positive`].
	#[must_use]
	#[inline]
	pub const fn is_positive(self) -> bool {
		matches!(self, Self::Positive)
	}

	/// Checks whether this is [`Self::Negative`].
	#[must_use]
	#[inline]
	pub const fn is_negative(self) -> bool {
		matches!(self, Self::Negative)
	}

	/// Applies the sign to a value, returning [`None`] on overflow.
	#[must_use]
	pub const fn apply(self, val: i32) -> Option<i32> {
		match self {
			Self::Positive => Some(val),
			Self::Negative => val.checked_neg(),
		}
	}
}

/// How an aggregate node combines the values of its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[expect(clippy::exhaustive_enums, reason = "Highly unlikely to change")]
pub enum Function {
	/// Sum of all children
	#[default]
	Add,

	/// Lowest child
	Min,

	/// Highest child
	Max,
}

impl Function {
	/// Looks up a function by the keyword used to call it in an expression (`add`, `min`, or `max`).
	/// Matching ignores ASCII case.
	#[must_use]
	pub fn from_keyword(keyword: &str) -> Option<Self> {
		[Self::Add, Self::Min, Self::Max]
			.into_iter()
			.find(|function| function.name().eq_ignore_ascii_case(keyword))
	}

	/// Keyword that calls this function in an expression.
	#[must_use]
	pub const fn name(self) -> &'static str {
		match self {
			Self::Add => "add",
			Self::Min => "min",
			Self::Max => "max",
		}
	}

	/// Keyword written in front of the function's parentheses in a canonical expression.
	/// Addition is implied by plain parentheses, so it has none.
	#[must_use]
	pub const fn keyword(self) -> &'static str {
		match self {
			Self::Add => "",
			Self::Min | Self::Max => self.name(),
		}
	}

	/// Checks whether this is a selecting function (min or max), where signs are implied by the selection rather than
	/// by addition.
	#[must_use]
	#[inline]
	pub const fn is_selection(self) -> bool {
		matches!(self, Self::Min | Self::Max)
	}
}

/// Flat classification of a node, covering both leaves and aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(clippy::exhaustive_enums, reason = "Highly unlikely to change")]
pub enum Kind {
	/// Fixed number
	Fixed,

	/// Set of dice
	Dice,

	/// Sum aggregate
	Add,

	/// Minimum aggregate
	Min,

	/// Maximum aggregate
	Max,
}

impl From<Function> for Kind {
	fn from(function: Function) -> Self {
		match function {
			Function::Add => Self::Add,
			Function::Min => Self::Min,
			Function::Max => Self::Max,
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Fixed => "fixed",
			Self::Dice => "dice",
			Self::Add => "add",
			Self::Min => "min",
			Self::Max => "max",
		})
	}
}

/// What a node represents
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Term {
	/// Literal integer
	Fixed(i32),

	/// Dice to roll, along with the individual rolls from the most recent evaluation.
	/// Rolls are only kept when more than one die is rolled; a single die's roll is the node's value.
	Dice {
		/// Dice to roll
		dice: Dice,

		/// Individual rolls, in roll order
		rolls: Vec<u32>,
	},

	/// Group of child nodes combined with a function
	Aggregate {
		/// How the children combine
		function: Function,

		/// Child nodes, in the order they were written
		children: Vec<NodeId>,
	},
}

/// Single element of an expression tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
	term: Term,
	sign: Sign,
	name: Option<String>,
	parent: Option<NodeId>,
	value: Option<i32>,
}

impl Node {
	/// Creates a node for a literal integer.
	#[must_use]
	pub const fn fixed(val: i32) -> Self {
		Self::new(Term::Fixed(val))
	}

	/// Creates a node for a set of dice.
	#[must_use]
	pub const fn dice(dice: Dice) -> Self {
		Self::new(Term::Dice {
			dice,
			rolls: Vec::new(),
		})
	}

	/// Creates an aggregate node without any children.
	#[must_use]
	pub const fn aggregate(function: Function) -> Self {
		Self::new(Term::Aggregate {
			function,
			children: Vec::new(),
		})
	}

	/// Creates a positive, unnamed node.
	const fn new(term: Term) -> Self {
		Self {
			term,
			sign: Sign::Positive,
			name: None,
			parent: None,
			value: None,
		}
	}

	/// Sets the sign of the node.
	#[must_use]
	pub fn with_sign(mut self, sign: Sign) -> Self {
		self.sign = sign;
		self
	}

	/// Sets the name of the node. The name is trimmed, and a name that is empty after trimming means no name.
	#[must_use]
	pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
		let name = name.as_ref().trim();
		self.name = (!name.is_empty()).then(|| name.to_owned());
		self
	}

	/// What the node represents
	#[must_use]
	#[inline]
	pub const fn term(&self) -> &Term {
		&self.term
	}

	/// Flat classification of the node
	#[must_use]
	pub const fn kind(&self) -> Kind {
		match self.term {
			Term::Fixed(..) => Kind::Fixed,
			Term::Dice { .. } => Kind::Dice,
			Term::Aggregate { function, .. } => match function {
				Function::Add => Kind::Add,
				Function::Min => Kind::Min,
				Function::Max => Kind::Max,
			},
		}
	}

	/// Whether the node adds to or subtracts from its parent
	#[must_use]
	#[inline]
	pub const fn sign(&self) -> Sign {
		self.sign
	}

	/// Label given to the node in the expression, if any
	#[must_use]
	#[inline]
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Aggregate that owns the node, or [`None`] for the root
	#[must_use]
	#[inline]
	pub const fn parent(&self) -> Option<NodeId> {
		self.parent
	}

	/// Signed value resolved by the most recent evaluation, or [`None`] if the node hasn't been evaluated
	#[must_use]
	#[inline]
	pub const fn value(&self) -> Option<i32> {
		self.value
	}

	/// Child nodes, which is empty for anything other than an aggregate
	#[must_use]
	pub fn children(&self) -> &[NodeId] {
		match &self.term {
			Term::Aggregate { children, .. } => children,
			Term::Fixed(..) | Term::Dice { .. } => &[],
		}
	}

	/// Individual rolls from the most recent evaluation, which is empty for anything other than multiple dice
	#[must_use]
	pub fn rolls(&self) -> &[u32] {
		match &self.term {
			Term::Dice { rolls, .. } => rolls,
			Term::Fixed(..) | Term::Aggregate { .. } => &[],
		}
	}

	pub(crate) fn set_value(&mut self, val: i32) {
		self.value = Some(val);
	}

	pub(crate) fn term_mut(&mut self) -> &mut Term {
		&mut self.term
	}
}

/// Arena-backed tree of [`Node`]s with an aggregate at its root.
///
/// # Examples
/// ```
/// use rollbot::{dice::{roller::Avg as AvgRoller, Dice}, tree::{Function, Node, Sign, Tree}};
///
/// let mut tree = Tree::new(Function::Add);
/// tree.push(tree.root(), Node::dice(Dice::new(2, 6)).with_name("fire"));
/// tree.push(tree.root(), Node::fixed(3).with_sign(Sign::Negative));
///
/// assert_eq!(tree.render_expression(), "2d6 fire - 3");
/// assert_eq!(tree.eval(&mut AvgRoller)?, 5);
/// # Ok::<(), rollbot::eval::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
	nodes: Vec<Node>,
}

impl Tree {
	/// Creates a tree containing only a root aggregate with the given function.
	#[must_use]
	pub fn new(function: Function) -> Self {
		Self {
			nodes: vec![Node::aggregate(function)],
		}
	}

	/// Root aggregate of the tree
	#[must_use]
	#[inline]
	pub const fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Adds a node as the last child of an aggregate, returning its ID.
	///
	/// # Panics
	/// Panics if `parent` is not an aggregate node of this tree.
	pub fn push(&mut self, parent: NodeId, mut node: Node) -> NodeId {
		let id = NodeId(self.nodes.len());
		node.parent = Some(parent);

		match self.nodes.get_mut(parent.0).map(|parent| &mut parent.term) {
			Some(Term::Aggregate { children, .. }) => children.push(id),
			_ => panic!("adding a child to {parent:?}, which is not an aggregate in this tree"),
		}

		self.nodes.push(node);
		id
	}

	/// Removes the most recently added node, provided nothing has been added beneath it.
	/// Used by the parser to drop groups that turned out to be empty.
	pub(crate) fn pop(&mut self, id: NodeId) {
		debug_assert_eq!(id.0.checked_add(1), Some(self.nodes.len()), "only the last node can be removed");
		debug_assert!(self.node(id).children().is_empty(), "removing a node that has children");

		if let Some(parent) = self.node(id).parent {
			if let Term::Aggregate { children, .. } = &mut self.node_mut(parent).term {
				children.retain(|child| *child != id);
			}
		}
		self.nodes.truncate(id.0);
	}

	/// Gets a node by its ID.
	///
	/// # Panics
	/// Panics if the ID didn't come from this tree.
	#[must_use]
	pub fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.0]
	}

	/// Child nodes of the given node
	#[must_use]
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.node(id).children()
	}

	/// Function of the aggregate that owns the given node, if it has a parent
	#[must_use]
	pub fn parent_function(&self, id: NodeId) -> Option<Function> {
		self.node(id).parent.and_then(|parent| match self.node(parent).term {
			Term::Aggregate { function, .. } => Some(function),
			Term::Fixed(..) | Term::Dice { .. } => None,
		})
	}

	/// Total of the whole expression, or [`None`] if it hasn't been evaluated
	#[must_use]
	pub fn total(&self) -> Option<i32> {
		self.node(self.root()).value
	}

	/// Number of nodes in the tree, including the root
	#[must_use]
	#[inline]
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Checks whether the root has no children.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.children(self.root()).is_empty()
	}

	/// Iterates over every node along with its ID, in the order they were added.
	pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
		self.nodes.iter().enumerate().map(|(idx, node)| (NodeId(idx), node))
	}
}

impl Default for Tree {
	/// Creates the tree for an empty expression: a single 1d20.
	fn default() -> Self {
		let mut tree = Self::new(Function::Add);
		tree.push(tree.root(), Node::dice(Dice::default()));
		tree
	}
}
