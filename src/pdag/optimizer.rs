//! Component D: literal-path compaction. Collapses a chain of single-child
//! discard-named literal edges into one edge carrying the concatenated
//! byte string, cutting both node count and backtracking depth without
//! changing what the PDAG matches.

use super::{EdgeKind, EdgeName, ParserEdge, PdagNode};
use crate::registry::{ParserData, LITERAL_ID};

fn is_compactable_literal(edge: &ParserEdge) -> bool {
    edge.name == EdgeName::Discard
        && matches!(
            &edge.kind,
            EdgeKind::Builtin { id, data: ParserData::Literal(_) } if *id == LITERAL_ID
        )
}

/// Whether `edge` may be fused with its single literal child.
///
/// `guard` is the spec's recommended default: refuse to compact across a
/// node where a rule already terminates. Doing so anyway would still
/// *match* the same strings, but it would erase the shorter literal as an
/// independently reachable, independently diagnosable stopping point —
/// losing it would make `parsed_to` diagnostics on a truncated input point
/// past where the data actually ran out.
fn can_compact(edge: &ParserEdge, guard: bool) -> bool {
    if !is_compactable_literal(edge) {
        return false;
    }
    if edge.node.parsers.len() != 1 {
        return false;
    }
    if guard && edge.node.terminal {
        return false;
    }
    is_compactable_literal(&edge.node.parsers[0])
}

fn compact_chain(edge: &mut ParserEdge, guard: bool) {
    while can_compact(edge, guard) {
        let child = edge.node.parsers.pop().expect("can_compact checked len == 1");
        let appended = match &child.kind {
            EdgeKind::Builtin { data: ParserData::Literal(bytes), .. } => bytes.clone(),
            _ => unreachable!("is_compactable_literal guarantees a Literal payload"),
        };
        match &mut edge.kind {
            EdgeKind::Builtin { data: ParserData::Literal(bytes), .. } => bytes.extend_from_slice(&appended),
            _ => unreachable!("is_compactable_literal guarantees a Literal payload"),
        }
        edge.node = child.node;
    }
}

/// Walk the whole sub-PDAG rooted at `node`, compacting every literal chain
/// reachable from it. `guard` selects the terminal-node guard described on
/// [`can_compact`]; pass `true` for the spec's recommended default.
pub fn optimize_with_guard(node: &mut PdagNode, guard: bool) {
    for edge in node.parsers.iter_mut() {
        compact_chain(edge, guard);
        optimize_with_guard(&mut edge.node, guard);
    }
}
