//! Component C: `addParser` / `addRule` — inserting one sample's parser
//! sequence into a PDAG, merging with an existing edge wherever the merge
//! key matches and extending with a new edge otherwise.

use super::{Context, EdgeKind, ParserEdge, PdagNode, TypeId};
use crate::error::BuildError;
use crate::registry::LITERAL_ID;
use crate::util::Log;
use serde_json::Value;
use std::rc::Rc;

/// Which PDAG a rule is being inserted into.
#[derive(Debug, Clone, Copy)]
pub enum RootRef {
    Main,
    Type(TypeId),
}

/// `addParser` — merge `edge` into `node` if an existing sibling edge
/// shares its merge key (I2), otherwise append it as a new sibling. Returns
/// the successor node to continue building the rest of the rule from,
/// whichever node that turned out to be.
pub fn add_parser<'a>(
    node_count: &mut usize,
    debug: Log<&'static str>,
    node: &'a mut PdagNode,
    edge: ParserEdge,
) -> &'a mut PdagNode {
    let existing = node.parsers.iter().position(|sibling| is_merge_match(sibling, &edge));

    match existing {
        Some(idx) => {
            debug.build_step(format_args!(
                "merging '{}' into existing edge at position {}",
                edge.name, idx
            ));
            &mut node.parsers[idx].node
        }
        None => {
            *node_count += 1;
            debug.build_step(format_args!("extending with new edge '{}'", edge.name));
            node.parsers.push(edge);
            let last = node.parsers.len() - 1;
            &mut node.parsers[last].node
        }
    }
}

/// Two edges share a merge key (and thus the same successor node) when
/// their `(name, prsid)` pair matches, with one exemption: two `literal`
/// edges only merge when their single matched character is also equal —
/// otherwise each distinct character needs its own branch so the matcher
/// can tell them apart (I2). `CUSTOM_TYPE` is one `prsid` regardless of
/// which type it invokes, so two `CUSTOM_TYPE` edges under the same name
/// merge even when they name different types (§4.3; the source's own
/// `addParser` compares only `prsid` and `name`, never the invoked type).
fn is_merge_match(existing: &ParserEdge, candidate: &ParserEdge) -> bool {
    if existing.name != candidate.name {
        return false;
    }
    match (&existing.kind, &candidate.kind) {
        (EdgeKind::Builtin { id: a, data: data_a }, EdgeKind::Builtin { id: b, data: data_b }) => {
            if a != b {
                return false;
            }
            if *a == LITERAL_ID {
                data_a.as_literal() == data_b.as_literal()
            } else {
                true
            }
        }
        (EdgeKind::CustomType(_), EdgeKind::CustomType(_)) => true,
        _ => false,
    }
}

/// `addRule` — walk `steps` through `root`, calling `addParser` at each
/// position, then mark the final node terminal and attach `tags` (the
/// value a successful match through this rule reports to the annotator).
///
/// Takes `&mut Context` rather than a bare `&mut PdagNode` so that the
/// node counter and debug level travel with the walk; the destructuring
/// borrow below lets the loop hold a `&mut PdagNode` into `main`/`types`
/// alongside a `&mut usize` into `node_count` without upsetting the borrow
/// checker, since the two never alias.
pub fn add_rule(
    ctx: &mut Context,
    root: RootRef,
    steps: Vec<ParserEdge>,
    tags: Option<Value>,
) -> Result<(), BuildError> {
    let Context {
        main,
        types,
        node_count,
        debug,
    } = ctx;

    let mut current: &mut PdagNode = match root {
        RootRef::Main => main,
        RootRef::Type(TypeId(idx)) => {
            &mut types
                .get_mut(idx)
                .ok_or_else(|| BuildError::UnknownType(format!("#{}", idx)))?
                .root
        }
    };

    for edge in steps {
        current = add_parser(node_count, *debug, current, edge);
    }

    current.terminal = true;
    if let Some(tags) = tags {
        current.tags = Some(Rc::new(tags));
    }
    Ok(())
}
