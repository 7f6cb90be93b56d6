//! A log-line normalizer: compiles a library of rules (literal fragments
//! and typed field parsers, e.g. IPv4 addresses, quoted strings, bare
//! numbers) into a single **Parse DAG (PDAG)**, then matches unstructured
//! log records against it to produce structured key/value objects.
//!
//! # Overview
//!
//! A rule is a linear sequence of steps — literal bytes or a named
//! built-in parser — each optionally attaching its parsed value under a
//! field name. Loading many rules shares their common prefixes in one
//! PDAG ([`pdag::Context`]); [`pdag::Context::optimize`] then collapses
//! runs of single-character literal edges into longer literal matches.
//! [`matcher::normalize`] walks the compiled PDAG against one input record,
//! backtracking across sibling edges until a terminal node is reached (or
//! every alternative has been exhausted), and reports the furthest offset
//! it was able to parse to even on failure.
//!
//! ```
//! use lognorm::pdag::{add_rule, Context, EdgeName, ParserEdge, RootRef};
//! use lognorm::registry::parser_name_to_id;
//! use lognorm::matcher::{normalize, NormalizeOutcome};
//!
//! let mut ctx = Context::new();
//! let steps = vec![
//!     ParserEdge::new_literal(b'u'),
//!     ParserEdge::new_literal(b'i'),
//!     ParserEdge::new_literal(b'd'),
//!     ParserEdge::new_literal(b'='),
//!     ParserEdge::new_builtin(
//!         EdgeName::parse("uid"),
//!         parser_name_to_id("number").unwrap(),
//!         None,
//!         None,
//!         0,
//!     )
//!     .unwrap(),
//! ];
//! add_rule(&mut ctx, RootRef::Main, steps, None).unwrap();
//! ctx.optimize();
//!
//! match normalize(&ctx, b"uid=42") {
//!     NormalizeOutcome::Matched(success) => assert_eq!(success.object["uid"], 42),
//!     NormalizeOutcome::NoRuleMatched { .. } => unreachable!(),
//! }
//! ```
//!
//! # Non-goals
//!
//! This crate compiles and matches PDAGs; it does not parse any
//! particular rule-file syntax, load rules from disk, or provide a CLI —
//! those are the responsibility of a caller that owns the rule source.

pub mod diagnostics;
pub mod error;
pub mod matcher;
pub mod pdag;
pub mod registry;
#[cfg(test)]
mod scenarios;
mod util;
pub mod value;

pub use error::{BuildError, Unmatched};
pub use matcher::{normalize, normalize_with, Annotator, MatchSuccess, NoopAnnotator, NormalizeOutcome};
pub use pdag::{add_rule, Context, EdgeKind, EdgeName, ParserEdge, PdagNode, RootRef, TypeId, TypePdag};
pub use registry::{ParserData, ParserId};
pub use util::{Code, Log, Position};
