//! Component E: `normalize` and the recursive backtracking matcher.
//!
//! The result object is threaded through the recursion by value rather
//! than through a shared `&mut` with manual snapshot/restore: a failed
//! branch's `Err` carries the object straight back to the caller, who
//! tries the next edge with it unchanged. A successful branch attaches its
//! own edge's value only after its continuation has already succeeded, so
//! attachment order runs leaf-to-root exactly as §4.5 describes.

use crate::error::Unmatched;
use crate::pdag::{Context, EdgeKind, EdgeName, PdagNode};
use crate::registry;
use crate::util::{Code, Position};
use crate::value;
use serde_json::{Map, Value};
use std::rc::Rc;

/// Reserved key holding the full input, attached only when no rule matched.
pub const ORIGINAL_MSG_KEY: &str = "original_message";
/// Reserved key holding the unparsed tail, attached only when no rule matched.
pub const UNPARSED_DATA_KEY: &str = "unparsed_data";
/// Reserved key a matched rule's terminal-node tags are attached under.
pub const EVENT_TAGS_KEY: &str = "event.tags";

/// A successful top-level `normalize` call.
#[derive(Debug, Clone)]
pub struct MatchSuccess {
    /// Bytes consumed — always the full input length for a top-level match
    /// (§4.5.2 requires full consumption there; `partial` recursion into a
    /// type PDAG is the only place a shorter match is accepted).
    pub parsed: usize,
    pub object: Value,
}

/// Result of `normalize`. `NoRuleMatched` is the library's everyday "this
/// line didn't match any rule" outcome, not a fault — see
/// [`crate::error::Unmatched`] for the distinct internal backtracking
/// signal this is built from.
#[derive(Debug, Clone)]
pub enum NormalizeOutcome {
    Matched(MatchSuccess),
    NoRuleMatched {
        /// The partially built object, carrying the two diagnostic keys.
        object: Value,
        parsed_to: usize,
        parsed_to_position: Position,
    },
}

impl NormalizeOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, NormalizeOutcome::Matched(_))
    }
}

/// Observes a matched rule's tags once, after the reserved `event.tags`
/// key has already been attached. A no-op default ([`NoopAnnotator`])
/// covers callers that don't need this.
pub trait Annotator {
    fn annotate(&self, tags: &Value, out: &mut Value);
}

pub struct NoopAnnotator;

impl Annotator for NoopAnnotator {
    fn annotate(&self, _tags: &Value, _out: &mut Value) {}
}

/// Match `input` against `ctx`'s main PDAG from byte 0, with no annotator.
pub fn normalize(ctx: &Context, input: &[u8]) -> NormalizeOutcome {
    normalize_with(ctx, input, None)
}

/// Match `input` against `ctx`'s main PDAG from byte 0, invoking
/// `annotator` once on a successful match that carries tags.
pub fn normalize_with(ctx: &Context, input: &[u8], annotator: Option<&dyn Annotator>) -> NormalizeOutcome {
    let mut parsed_to = 0usize;
    ctx.debug.match_step(format_args!("normalize: {} bytes", input.len()));

    match normalize_rec(ctx, &ctx.main, input, 0, false, &mut parsed_to, Map::new()) {
        Ok(completion) => {
            let mut object = completion.object;
            if let Some(tags) = completion.tags {
                object.insert(EVENT_TAGS_KEY.to_string(), (*tags).clone());
                if let Some(annotator) = annotator {
                    let mut wrapped = Value::Object(object);
                    annotator.annotate(&tags, &mut wrapped);
                    object = match wrapped {
                        Value::Object(map) => map,
                        other => {
                            // an annotator that replaces the object wholesale with a
                            // non-object value has nothing left to return structured
                            // fields in; fall back to wrapping it under the same key.
                            let mut fallback = Map::new();
                            fallback.insert(EVENT_TAGS_KEY.to_string(), other);
                            fallback
                        }
                    };
                }
            }
            NormalizeOutcome::Matched(MatchSuccess {
                parsed: completion.end_offset,
                object: Value::Object(object),
            })
        }
        Err(mut object) => {
            let clamped = parsed_to.min(input.len());
            object.insert(
                ORIGINAL_MSG_KEY.to_string(),
                Value::String(String::from_utf8_lossy(input).into_owned()),
            );
            object.insert(
                UNPARSED_DATA_KEY.to_string(),
                Value::String(String::from_utf8_lossy(&input[clamped..]).into_owned()),
            );
            NormalizeOutcome::NoRuleMatched {
                object: Value::Object(object),
                parsed_to,
                parsed_to_position: Code::from(input).position_at(clamped),
            }
        }
    }
}

/// The object under construction at a successful stopping point, plus the
/// absolute offset reached and the terminal node's shared tags.
struct Completion {
    object: Map<String, Value>,
    end_offset: usize,
    tags: Option<Rc<Value>>,
}

/// `normalizeRec`. Returns the built object back to the caller on failure
/// (`Err`) exactly as it was handed in, so a loop over sibling edges can
/// try the next one with it unchanged.
fn normalize_rec(
    ctx: &Context,
    node: &PdagNode,
    input: &[u8],
    offs: usize,
    partial: bool,
    parsed_to: &mut usize,
    mut obj: Map<String, Value>,
) -> Result<Completion, Map<String, Value>> {
    if offs > *parsed_to {
        *parsed_to = offs;
    }

    for edge in &node.parsers {
        let local = match try_parser(ctx, edge, input, offs, parsed_to) {
            Ok(local) => local,
            Err(Unmatched) => continue,
        };
        let next_offs = offs + local.parsed;
        match normalize_rec(ctx, &edge.node, input, next_offs, partial, parsed_to, obj) {
            Ok(mut completion) => {
                value::attach(&mut completion.object, &edge.name, local.value);
                return Ok(completion);
            }
            Err(returned) => obj = returned,
        }
    }

    if node.terminal && (offs == input.len() || partial) {
        Ok(Completion {
            object: obj,
            end_offset: offs,
            tags: node.tags.clone(),
        })
    } else {
        Err(obj)
    }
}

struct ParserOutcome {
    parsed: usize,
    value: Option<Value>,
}

/// `tryParser`. Dispatches a builtin registry row's `match_fn`, or recurses
/// into a named type PDAG with `partial = true` using a fresh result
/// object, whose own built object becomes this edge's produced value.
fn try_parser(
    ctx: &Context,
    edge: &crate::pdag::ParserEdge,
    input: &[u8],
    offs: usize,
    parsed_to: &mut usize,
) -> Result<ParserOutcome, Unmatched> {
    match &edge.kind {
        EdgeKind::Builtin { id, data } => {
            let want_value = edge.name != EdgeName::Discard;
            let info = registry::parser_info(*id);
            match (info.match_fn)(input, offs, data, want_value) {
                Ok(outcome) => {
                    let total = outcome.skipped + outcome.parsed;
                    let end = offs + total;
                    if end > *parsed_to {
                        *parsed_to = end;
                    }
                    ctx.debug.match_step(format_args!(
                        "'{}' matched {} bytes (after skipping {}) at {}",
                        info.name, outcome.parsed, outcome.skipped, offs
                    ));
                    Ok(ParserOutcome {
                        parsed: total,
                        value: outcome.value,
                    })
                }
                Err(Unmatched) => {
                    if offs > *parsed_to {
                        *parsed_to = offs;
                    }
                    Err(Unmatched)
                }
            }
        }
        EdgeKind::CustomType(type_id) => {
            let type_pdag = ctx.type_pdag(*type_id);
            match normalize_rec(ctx, &type_pdag.root, input, offs, true, parsed_to, Map::new()) {
                Ok(completion) => Ok(ParserOutcome {
                    parsed: completion.end_offset - offs,
                    value: Some(Value::Object(completion.object)),
                }),
                Err(_) => Err(Unmatched),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdag::{add_rule, EdgeName, ParserEdge, RootRef};
    use crate::registry::parser_name_to_id;
    use serde_json::json;

    fn literal(ch: u8) -> ParserEdge {
        ParserEdge::new_literal(ch)
    }

    fn literal_str(bytes: &[u8]) -> Vec<ParserEdge> {
        bytes.iter().map(|b| literal(*b)).collect()
    }

    fn named_number(name: &str) -> ParserEdge {
        ParserEdge::new_builtin(EdgeName::parse(name), parser_name_to_id("number").unwrap(), None, None, 0)
            .unwrap()
    }

    /// Rule `"user=" N ":" L('x')` named `{uid, -}`, mirrored from the
    /// worked examples: a matching "x" suffix succeeds, anything else
    /// reports the furthest-parsed diagnostic fields.
    fn build_user_rule() -> Context {
        let mut ctx = Context::new();
        let mut steps = literal_str(b"user=");
        steps.push(named_number("uid"));
        steps.push(literal(b':'));
        steps.push(literal(b'x'));
        add_rule(&mut ctx, RootRef::Main, steps, None).unwrap();
        ctx.optimize();
        ctx
    }

    #[test]
    fn matches_full_rule_and_attaches_named_fields() {
        let ctx = build_user_rule();
        match normalize(&ctx, b"user=42:x") {
            NormalizeOutcome::Matched(success) => {
                assert_eq!(success.parsed, 9);
                assert_eq!(success.object, json!({"uid": 42}));
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn reports_unparsed_tail_on_failed_suffix() {
        let ctx = build_user_rule();
        match normalize(&ctx, b"user=42:y") {
            NormalizeOutcome::NoRuleMatched { object, parsed_to, .. } => {
                assert_eq!(parsed_to, 8);
                assert_eq!(object.get(ORIGINAL_MSG_KEY), Some(&json!("user=42:y")));
                assert_eq!(object.get(UNPARSED_DATA_KEY), Some(&json!("y")));
            }
            other => panic!("expected no rule matched, got {:?}", other),
        }
    }

    #[test]
    fn attaches_tags_under_reserved_key() {
        let mut ctx = Context::new();
        add_rule(&mut ctx, RootRef::Main, literal_str(b"ping"), Some(json!({"kind": "heartbeat"}))).unwrap();
        ctx.optimize();

        match normalize(&ctx, b"ping") {
            NormalizeOutcome::Matched(success) => {
                assert_eq!(success.object.get(EVENT_TAGS_KEY), Some(&json!({"kind": "heartbeat"})));
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn merges_custom_type_fields_into_parent_object() {
        let mut ctx = Context::new();
        let ip_type = ctx.new_type("ip").unwrap();
        add_rule(
            &mut ctx,
            RootRef::Type(ip_type),
            vec![ParserEdge::new_builtin(EdgeName::parse("addr"), parser_name_to_id("ipv4").unwrap(), None, None, 0).unwrap()],
            None,
        )
        .unwrap();

        let mut steps = literal_str(b"src=");
        steps.push(ParserEdge::new_custom_type(EdgeName::Merge, ip_type, 0));
        add_rule(&mut ctx, RootRef::Main, steps, None).unwrap();
        ctx.optimize();

        match normalize(&ctx, b"src=10.0.0.1") {
            NormalizeOutcome::Matched(success) => {
                assert_eq!(success.object, json!({"addr": "10.0.0.1"}));
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn discard_named_parser_never_attaches_a_value() {
        let mut ctx = Context::new();
        add_rule(
            &mut ctx,
            RootRef::Main,
            vec![named_number("-")],
            None,
        )
        .unwrap();
        ctx.optimize();

        match normalize(&ctx, b"123") {
            NormalizeOutcome::Matched(success) => {
                assert_eq!(success.object, json!({}));
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }
}
