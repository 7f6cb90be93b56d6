//! End-to-end scenario tests, one per worked example in the specification's
//! testable-properties section. Each builds a small PDAG by hand, matches an
//! input against it, and checks the resulting object — these are the
//! scenario-level counterparts to the unit tests scattered through
//! `matcher`, `pdag`, and `value`.

use crate::matcher::{normalize, NormalizeOutcome};
use crate::pdag::{add_rule, Context, EdgeName, ParserEdge, RootRef};
use crate::registry::parser_name_to_id;
use serde_json::json;

fn literal_str(bytes: &[u8]) -> Vec<ParserEdge> {
    bytes.iter().map(|b| ParserEdge::new_literal(*b)).collect()
}

fn builtin(name: &str, parser: &str) -> ParserEdge {
    ParserEdge::new_builtin(EdgeName::parse(name), parser_name_to_id(parser).unwrap(), None, None, 0).unwrap()
}

/// Scenario 1: `"user="` `N` `":"` `L('x')` named `{uid, -}`; a matching `"x"`
/// suffix succeeds with only the named field attached.
#[test]
fn scenario_1_matches_named_field_and_discards_literal_suffix() {
    let mut ctx = Context::new();
    let mut steps = literal_str(b"user=");
    steps.push(builtin("uid", "number"));
    steps.push(ParserEdge::new_literal(b':'));
    steps.push(ParserEdge::new_literal(b'x'));
    add_rule(&mut ctx, RootRef::Main, steps, None).unwrap();
    ctx.optimize();

    match normalize(&ctx, b"user=42:x") {
        NormalizeOutcome::Matched(success) => assert_eq!(success.object, json!({"uid": 42})),
        other => panic!("expected a match, got {:?}", other),
    }
}

/// Scenario 2: the same rule against a non-matching suffix reports
/// `NoRuleMatched` with the original message and the furthest-parsed tail.
#[test]
fn scenario_2_mismatched_suffix_reports_unparsed_diagnostics() {
    let mut ctx = Context::new();
    let mut steps = literal_str(b"user=");
    steps.push(builtin("uid", "number"));
    steps.push(ParserEdge::new_literal(b':'));
    steps.push(ParserEdge::new_literal(b'x'));
    add_rule(&mut ctx, RootRef::Main, steps, None).unwrap();
    ctx.optimize();

    match normalize(&ctx, b"user=42:y") {
        NormalizeOutcome::NoRuleMatched { object, parsed_to, .. } => {
            assert_eq!(parsed_to, 8);
            assert_eq!(object.get("original_message"), Some(&json!("user=42:y")));
            assert_eq!(object.get("unparsed_data"), Some(&json!("y")));
        }
        other => panic!("expected no rule matched, got {:?}", other),
    }
}

/// Scenario 3: two rules sharing the `"src="` prefix and then diverging into
/// `" dst="` and `" port="` must share exactly one edge for the prefix.
#[test]
fn scenario_3_shared_prefix_produces_one_merged_edge() {
    let mut ctx = Context::new();

    let mut dst_rule = literal_str(b"src=");
    dst_rule.push(builtin("src", "ipv4"));
    dst_rule.extend(literal_str(b" dst="));
    dst_rule.push(builtin("dst", "ipv4"));
    add_rule(&mut ctx, RootRef::Main, dst_rule, None).unwrap();

    let mut port_rule = literal_str(b"src=");
    port_rule.push(builtin("src", "ipv4"));
    port_rule.extend(literal_str(b" port="));
    port_rule.push(builtin("port", "number"));
    add_rule(&mut ctx, RootRef::Main, port_rule, None).unwrap();

    ctx.optimize();

    // One shared entry edge for the "src=" prefix at the root.
    assert_eq!(ctx.main.parsers.len(), 1);
    // After the shared "src=" + ipv4 parser, both continuations start with
    // a literal space, so that single byte is shared too before " dst="
    // and " port=" diverge on their next character.
    let after_src = &ctx.main.parsers[0].node.parsers[0].node;
    assert_eq!(after_src.parsers.len(), 1, "the leading space of ' dst=' and ' port=' is still a shared prefix");

    match normalize(&ctx, b"src=1.2.3.4 dst=5.6.7.8") {
        NormalizeOutcome::Matched(success) => {
            assert_eq!(success.object, json!({"src": "1.2.3.4", "dst": "5.6.7.8"}));
        }
        other => panic!("expected a match, got {:?}", other),
    }

    match normalize(&ctx, b"src=1.2.3.4 port=80") {
        NormalizeOutcome::Matched(success) => {
            assert_eq!(success.object, json!({"src": "1.2.3.4", "port": 80}));
        }
        other => panic!("expected a match, got {:?}", other),
    }
}

/// Scenario 4: inserting the three-literal rule `"abc"` and then optimizing
/// collapses the root to a single literal edge carrying `"abc"`, and the
/// rule still matches.
#[test]
fn scenario_4_literal_compaction_preserves_matching() {
    let mut ctx = Context::new();
    add_rule(&mut ctx, RootRef::Main, literal_str(b"abc"), Some(json!({}))).unwrap();
    ctx.optimize();

    assert_eq!(ctx.main.parsers.len(), 1);
    match &ctx.main.parsers[0].kind {
        crate::pdag::EdgeKind::Builtin { data, .. } => {
            assert_eq!(data.as_literal(), Some(b"abc".as_slice()));
        }
        other => panic!("expected a builtin literal edge, got {:?}", other),
    }

    assert!(normalize(&ctx, b"abc").is_matched());
}

/// Scenario 5: a custom type `fruit` with two rules `"apple"` and `"pear"`,
/// invoked from a main rule `"got "` `CUSTOM_TYPE(fruit)` `"!"`.
#[test]
fn scenario_5_custom_type_is_invoked_from_main_rule() {
    let mut ctx = Context::new();
    let fruit = ctx.new_type("fruit").unwrap();
    add_rule(&mut ctx, RootRef::Type(fruit), literal_str(b"apple"), None).unwrap();
    add_rule(&mut ctx, RootRef::Type(fruit), literal_str(b"pear"), None).unwrap();

    let mut steps = literal_str(b"got ");
    steps.push(ParserEdge::new_custom_type(EdgeName::parse("fruit"), fruit, 0));
    steps.push(ParserEdge::new_literal(b'!'));
    add_rule(&mut ctx, RootRef::Main, steps, None).unwrap();
    ctx.optimize();

    match normalize(&ctx, b"got apple!") {
        NormalizeOutcome::Matched(success) => {
            assert_eq!(success.parsed, 10);
            assert_eq!(success.object, json!({"fruit": {}}));
        }
        other => panic!("expected a match, got {:?}", other),
    }

    match normalize(&ctx, b"got pear!") {
        NormalizeOutcome::Matched(success) => assert_eq!(success.object, json!({"fruit": {}})),
        other => panic!("expected a match, got {:?}", other),
    }
}

/// Scenario 6: a custom type producing `{"a":1,"b":2}` attached under the
/// merge name `"."` splices both keys into the parent object directly,
/// rather than nesting them under a `"."` key.
#[test]
fn scenario_6_merge_name_splices_custom_type_keys_into_parent() {
    let mut ctx = Context::new();
    let pair = ctx.new_type("pair").unwrap();
    let mut pair_steps = vec![builtin("a", "number")];
    pair_steps.push(ParserEdge::new_literal(b','));
    pair_steps.push(builtin("b", "number"));
    add_rule(&mut ctx, RootRef::Type(pair), pair_steps, None).unwrap();

    let mut steps = vec![ParserEdge::new_custom_type(EdgeName::Merge, pair, 0)];
    steps.push(ParserEdge::new_literal(b'!'));
    add_rule(&mut ctx, RootRef::Main, steps, None).unwrap();
    ctx.optimize();

    match normalize(&ctx, b"1,2!") {
        NormalizeOutcome::Matched(success) => {
            assert_eq!(success.object, json!({"a": 1, "b": 2}));
        }
        other => panic!("expected a match, got {:?}", other),
    }
}
