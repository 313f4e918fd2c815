//! probtree: hierarchical probability distributions
//!
//! A tree of named beliefs, each carrying a probability weight, together with
//! the algorithms that keep it consistent while it is edited: mutation,
//! normalization honoring locked values, and conversion between absolute and
//! relative representation.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
