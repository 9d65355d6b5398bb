//! Parsing free-form dice expressions into [`Tree`]s.
//!
//! The grammar is deliberately forgiving. An expression is a list of terms separated by `+`, `-`, or `,`, where each
//! term is one of:
//! - a fixed number (`7`) or dice (`3d8`, `d20`), followed by an optional name (`3d8 cold`)
//! - a group in parentheses, optionally prefixed by a function (`min(...)`, `max(...)`, `add(...)`) and followed by an
//!   optional name (`max(2d20) advantage`)
//!
//! Parsing happens in two steps: a [chumsky] grammar splits the text into raw terms, and then each raw term is
//! validated and added to the tree.

use core::{iter, ops::Range, str::FromStr};

use chumsky::{prelude::*, span::Span as _};

use crate::{
	dice::{Dice, MAX_COUNT, MAX_SIDES, MIN_COUNT, MIN_SIDES},
	tree::{Function, Node, NodeId, Sign, Tree},
};

/// Deepest that groups may be nested within each other
pub const MAX_DEPTH: usize = 50;

/// Parses an expression into a tree with a summing root.
/// Blank input is shorthand for a single d20.
///
/// # Errors
/// If the expression is malformed or contains dice outside of the accepted bounds, an error variant is returned
/// describing the first problem found.
///
/// # Examples
/// ```
/// let tree = rollbot::parse("min(2d20)+7")?;
/// assert_eq!(tree.render_expression(), "min(2d20) + 7");
///
/// let tree = rollbot::parse("")?;
/// assert_eq!(tree.render_expression(), "1d20");
///
/// assert!(rollbot::parse("d1").is_err());
/// # Ok::<(), rollbot::parse::Error>(())
/// ```
pub fn parse(text: &str) -> Result<Tree, Error> {
	parse_as(text, Function::Add)
}

/// Parses an expression into a tree whose root combines its terms with the given function.
/// Blank input is shorthand for a single d20.
///
/// # Errors
/// See [`parse()`].
pub fn parse_as(text: &str, function: Function) -> Result<Tree, Error> {
	let mut tree = Tree::new(function);
	if text.trim().is_empty() {
		tree.push(tree.root(), Node::dice(Dice::default()));
		return Ok(tree);
	}

	check_depth(text)?;
	let terms = expr().parse(text).into_result().map_err(|errs| {
		// Only the first syntax error is reported
		errs.into_iter().next().map_or_else(
			|| Error::InvalidExpression {
				text: text.trim().to_owned(),
				reason: "unable to parse".to_owned(),
				span: 0..text.len(),
			},
			|err| {
				let span = err.span().start()..err.span().end();
				Error::InvalidExpression {
					text: snippet(text, &span),
					reason: err.to_string(),
					span,
				}
			},
		)
	})?;

	let root = tree.root();
	Lowerer { text, tree: &mut tree }.lower(root, terms)?;
	tracing::trace!(expression = %tree, "parsed dice expression");
	Ok(tree)
}

impl FromStr for Tree {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse(s)
	}
}

/// Term as it was written, before validation
#[derive(Debug, Clone)]
struct RawTerm {
	/// Separator that precedes the term: `+`, `-`, `,`, or none for the first term
	sign: Option<char>,

	/// Contents of the term
	body: RawBody,

	/// Location of the term in the expression, not including its sign or leading whitespace
	span: SimpleSpan,
}

/// Contents of a raw term
#[derive(Debug, Clone)]
enum RawBody {
	/// Number or dice: digits, then optionally `d` and more digits, then a name.
	/// `sides` is empty if the `d` wasn't followed by any digits.
	Value {
		count: Option<String>,
		sides: Option<String>,
		name: String,
	},

	/// Parenthesized group with an optional function keyword in front and a name after
	Group {
		keyword: Option<String>,
		terms: Vec<RawTerm>,
		name: String,
	},
}

/// Generates a parser that splits a whole expression into raw terms, recursing into groups.
fn expr<'src>() -> impl Parser<'src, &'src str, Vec<RawTerm>, extra::Err<Rich<'src, char>>> + Clone {
	terms().then_ignore(end())
}

/// Generates a parser for a list of terms, as found at the top level of an expression or between parentheses.
fn terms<'src>() -> impl Parser<'src, &'src str, Vec<RawTerm>, extra::Err<Rich<'src, char>>> + Clone {
	recursive(|terms| {
		let digits = any()
			.filter(|c: &char| c.is_ascii_digit())
			.repeated()
			.at_least(1)
			.collect::<String>();

		// Left empty when a `d` has no size after it, which is rejected when lowering
		let sides = any()
			.filter(|c: &char| c.is_ascii_digit())
			.repeated()
			.collect::<String>();

		// Names run until the next separator or parenthesis
		let name = none_of("+-,()")
			.repeated()
			.collect::<String>()
			.map(|name| name.trim().to_owned());

		let keyword = any()
			.filter(|c: &char| c.is_alphabetic())
			.repeated()
			.at_least(1)
			.collect::<String>();

		// Groups like "(2d20)", "min(2d20, 3d6) disadvantage", or "nonexistent(d20)" (rejected during validation)
		let group = keyword
			.or_not()
			.then_ignore(text::whitespace())
			.then(terms.delimited_by(just('('), just(')')))
			.then(name.clone())
			.map(|((keyword, terms), name)| RawBody::Group { keyword, terms, name });

		// Values like "3d8 cold", "d20", or "7 STR mod". Every part is optional; blank terms are rejected when lowering.
		let value = digits
			.or_not()
			.then(just('d').ignore_then(sides).or_not())
			.then(name)
			.map(|((count, sides), name)| RawBody::Value { count, sides, name });

		let body = text::whitespace().ignore_then(group.or(value).map_with(|body, e| (body, e.span())));

		// A comma may be directly followed by a sign, as in "min(1d20, -1d6)"
		let sign = choice((
			just(',')
				.then(one_of("+-").padded().or_not())
				.map(|(comma, sign)| sign.unwrap_or(comma)),
			one_of("+-"),
		));

		let first = body.clone().map(|(body, span)| RawTerm { sign: None, body, span });
		let rest = sign.then(body).map(|(sign, (body, span))| RawTerm {
			sign: Some(sign),
			body,
			span,
		});

		first
			.then(rest.repeated().collect::<Vec<_>>())
			.map(|(first, rest)| iter::once(first).chain(rest).collect::<Vec<_>>())
	})
}

/// Validates raw terms and adds them to a tree
struct Lowerer<'a> {
	text: &'a str,
	tree: &'a mut Tree,
}

impl Lowerer<'_> {
	/// Adds a list of raw terms as children of an aggregate, returning how many were added.
	fn lower(&mut self, parent: NodeId, terms: Vec<RawTerm>) -> Result<usize, Error> {
		let mut added = 0_usize;

		for (idx, term) in terms.into_iter().enumerate() {
			let span = term.span.start()..term.span.end();
			let sign = match term.sign {
				None | Some(',') => Sign::Positive,
				Some(symbol) => Sign::from_symbol(symbol.encode_utf8(&mut [0; 4]))?,
			};

			match term.body {
				RawBody::Value {
					count: None,
					sides: None,
					name,
				} => {
					// Nothing at all before the first separator, as in "-d20" or "min()"
					if idx == 0 && name.is_empty() {
						continue;
					}

					return Err(self.invalid_expression(
						span,
						if name.is_empty() {
							"missing a number or dice after the sign"
						} else {
							"expected a number or dice before the name"
						},
					));
				}

				RawBody::Value {
					count: Some(count),
					sides: None,
					name,
				} => {
					let val = count.parse::<i32>().map_err(|_err| Error::InvalidNumber {
						text: snippet(self.text, &span),
						span: span.clone(),
					})?;
					self.tree.push(parent, Node::fixed(val).with_sign(sign).with_name(name));
				}

				RawBody::Value {
					count,
					sides: Some(sides),
					name,
				} => {
					let dice = self.dice(count.as_deref(), &sides, &span)?;
					self.tree.push(parent, Node::dice(dice).with_sign(sign).with_name(name));
				}

				RawBody::Group { keyword, terms, name } => {
					let function = match keyword.as_deref() {
						None => Function::Add,
						Some(keyword) => Function::from_keyword(keyword).ok_or_else(|| {
							self.invalid_expression(span.clone(), &format!("unknown function \"{keyword}\""))
						})?,
					};

					let id = self.tree.push(
						parent,
						Node::aggregate(function).with_sign(sign).with_name(name),
					);

					// Groups that end up without anything in them are left out entirely
					if self.lower(id, terms)? == 0 {
						self.tree.pop(id);
						continue;
					}
				}
			}

			added = added.saturating_add(1);
		}

		Ok(added)
	}

	/// Validates the parts of a dice term. The number of sides is checked before the count.
	fn dice(&self, count: Option<&str>, sides: &str, span: &Range<usize>) -> Result<Dice, Error> {
		let sides = sides
			.parse::<u32>()
			.ok()
			.filter(|sides| (MIN_SIDES..=MAX_SIDES).contains(sides))
			.ok_or_else(|| Error::InvalidDieSize {
				text: snippet(self.text, span),
				span: span.clone(),
			})?;

		let count = count
			.map_or(Ok(1), str::parse::<u8>)
			.ok()
			.filter(|count| (MIN_COUNT..=MAX_COUNT).contains(count))
			.ok_or_else(|| Error::InvalidDiceCount {
				text: snippet(self.text, span),
				span: span.clone(),
			})?;

		Ok(Dice::new(count, sides))
	}

	/// Builds an [`Error::InvalidExpression`] for the part of the expression covered by a span.
	fn invalid_expression(&self, span: Range<usize>, reason: &str) -> Error {
		Error::InvalidExpression {
			text: snippet(self.text, &span),
			reason: reason.to_owned(),
			span,
		}
	}
}

/// Rejects expressions with groups nested deeper than [`MAX_DEPTH`], pointing at the first parenthesis past the limit.
fn check_depth(text: &str) -> Result<(), Error> {
	let mut depth = 0_usize;
	for (idx, c) in text.char_indices() {
		match c {
			'(' => {
				depth = depth.saturating_add(1);
				if depth > MAX_DEPTH {
					return Err(Error::InvalidExpression {
						text: "(".to_owned(),
						reason: format!("groups nested too deeply (at most {MAX_DEPTH} levels are allowed)"),
						span: idx..idx.saturating_add(1),
					});
				}
			}
			')' => depth = depth.saturating_sub(1),
			_ => {}
		}
	}
	Ok(())
}

/// Gets the trimmed piece of the expression covered by a span.
fn snippet(text: &str, span: &Range<usize>) -> String {
	text.get(span.clone()).unwrap_or_default().trim().to_owned()
}

/// Error that can occur while parsing an expression
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// Part of the expression is neither a number, dice, nor a known function.
	#[error("invalid expression [{text}]: {reason}")]
	InvalidExpression {
		/// Offending part of the expression
		text: String,

		/// What was wrong with it
		reason: String,

		/// Byte range of the offending part within the expression
		span: Range<usize>,
	},

	/// Dice have a number of sides outside of the accepted bounds.
	#[error("invalid die size [{text}]: dice must have between 2 and 999999 sides")]
	InvalidDieSize {
		/// Offending term
		text: String,

		/// Byte range of the offending term within the expression
		span: Range<usize>,
	},

	/// Dice have a count outside of the accepted bounds.
	#[error("invalid dice count [{text}]: between 1 and 200 dice can be rolled at once")]
	InvalidDiceCount {
		/// Offending term
		text: String,

		/// Byte range of the offending term within the expression
		span: Range<usize>,
	},

	/// A fixed number is too large to work with.
	#[error("invalid number [{text}]: too large")]
	InvalidNumber {
		/// Offending term
		text: String,

		/// Byte range of the offending term within the expression
		span: Range<usize>,
	},

	/// A sign is something other than `+`, `-`, or nothing.
	#[error("invalid symbol [{0}]")]
	InvalidSymbol(String),
}

impl Error {
	/// Byte range of the expression that caused the error, if it is tied to a specific location
	#[must_use]
	pub fn span(&self) -> Option<Range<usize>> {
		match self {
			Self::InvalidExpression { span, .. }
			| Self::InvalidDieSize { span, .. }
			| Self::InvalidDiceCount { span, .. }
			| Self::InvalidNumber { span, .. } => Some(span.clone()),
			Self::InvalidSymbol(..) => None,
		}
	}
}
