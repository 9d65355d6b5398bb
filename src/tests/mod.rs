mod eval;
mod format;
mod tree;
