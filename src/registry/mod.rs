//! Component A: the parser registry.
//!
//! A static, compile-time-fixed table mapping a parser identifier (its
//! index) to a `(name, construct?, match, destruct?)` row. Registry order
//! defines identifier values (invariant I1); rows are never reordered.
//!
//! `CUSTOM_TYPE` is deliberately *not* a row here — it is dispatched
//! specially by the matcher via [`crate::pdag::EdgeKind::CustomType`].

mod ipv4;
mod literal;
mod number;
mod quoted_string;
mod stop_field;

use crate::error::{BuildError, Unmatched};
use serde_json::Value;


/// Index into [`PARSER_REGISTRY`]. Stable for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParserId(pub usize);

/// The registry row special-cased by the builder's merge-key exemption
/// (§4.3) and the optimizer's literal-path compaction (§4.4).
pub const LITERAL_ID: ParserId = ParserId(0);

/// Per-edge state produced by a registry row's constructor. Closed, one arm
/// per built-in row, rather than an open `Box<dyn Any>`: the registry is a
/// fixed array, so there is no need to support third-party `ParserData`
/// variants at this layer (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserData {
    None,
    /// The literal byte string to match. A single character at insertion
    /// time (`newLiteralParserEdge`); possibly a longer run after the
    /// optimizer's literal-path compaction combines adjacent literals.
    Literal(Vec<u8>),
    /// The set of bytes that terminate a `stop_field` run.
    StopSet(std::collections::BTreeSet<u8>),
}

impl ParserData {
    pub fn as_literal(&self) -> Option<&[u8]> {
        match self {
            ParserData::Literal(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Result of a successful `match` call: how far it advanced `offs` before
/// it even started matching (§4.1, "advances `*offs` past anything it
/// pre-skipped"), how many bytes it then consumed from that new offset,
/// and, if requested, the value to attach to the result object. None of
/// the bundled rows pre-skip, so `skipped` is always 0 for them, but the
/// field exists so a future registry row (e.g. one that skips leading
/// whitespace before matching) can actually realize the contract.
pub struct MatchOutcome {
    pub skipped: usize,
    pub parsed: usize,
    pub value: Option<Value>,
}

impl MatchOutcome {
    pub fn new(parsed: usize, value: Option<Value>) -> Self {
        Self { skipped: 0, parsed, value }
    }

    pub fn with_skip(skipped: usize, parsed: usize, value: Option<Value>) -> Self {
        Self { skipped, parsed, value }
    }
}

/// One row of the parser registry (§4.1). `destruct` is carried for parity
/// with the external interface contract but every built-in row leaves it
/// `None`: `ParserData` is an ordinary owned Rust value, so `Drop` already
/// performs the release invariant I3 asks for.
///
/// `match_fn` takes the entry offset `offs` and reports, via
/// [`MatchOutcome::skipped`] and [`MatchOutcome::parsed`], both how far it
/// moved `offs` before matching began and how much it then consumed - the
/// Rust substitute for the spec's in/out `*offs` parameter.
pub struct ParserInfo {
    pub name: &'static str,
    pub construct: Option<fn(extra: Option<&[u8]>, params: Option<&Value>) -> Result<ParserData, BuildError>>,
    pub match_fn: fn(input: &[u8], offs: usize, data: &ParserData, want_value: bool) -> Result<MatchOutcome, Unmatched>,
    pub destruct: Option<fn(ParserData)>,
}

pub static PARSER_REGISTRY: &[ParserInfo] = &[
    literal::INFO,
    number::INFO,
    ipv4::INFO,
    quoted_string::INFO,
    stop_field::INFO,
];

/// `parserName2ID` — look up a registry row by its canonical rule-file name.
pub fn parser_name_to_id(name: &str) -> Option<ParserId> {
    PARSER_REGISTRY
        .iter()
        .position(|row| row.name == name)
        .map(ParserId)
}

pub fn parser_info(id: ParserId) -> &'static ParserInfo {
    &PARSER_REGISTRY[id.0]
}

pub(crate) fn construct(
    id: ParserId,
    extra: Option<&[u8]>,
    params: Option<&Value>,
) -> Result<ParserData, BuildError> {
    match parser_info(id).construct {
        Some(ctor) => ctor(extra, params),
        None => Ok(ParserData::None),
    }
}
