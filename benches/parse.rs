#![feature(test)]

extern crate test;

use rollbot::Tree;
use test::Bencher;

const DAMAGE_EXPR: &str = "3d8 cold + 1d6 bludgeoning dmg+3d4 piercing-1 STR mod";
const NESTED_EXPR: &str = "max(2d20 advantage, min(3d6, -1d4) penalty) + (4d8 + 2) smite - d12";

#[bench]
fn parse_basic(b: &mut Bencher) {
	b.iter(|| rollbot::parse("4d8 + 4").unwrap());
}

#[bench]
fn parse_damage(b: &mut Bencher) {
	b.iter(|| rollbot::parse(DAMAGE_EXPR).unwrap());
}

#[bench]
fn parse_nested(b: &mut Bencher) {
	b.iter(|| rollbot::parse(NESTED_EXPR).unwrap());
}

#[bench]
fn fromstr_nested(b: &mut Bencher) {
	b.iter(|| NESTED_EXPR.parse::<Tree>().unwrap());
}

#[bench]
fn render_expression_nested(b: &mut Bencher) {
	let tree = rollbot::parse(NESTED_EXPR).unwrap();
	b.iter(|| tree.render_expression());
}
