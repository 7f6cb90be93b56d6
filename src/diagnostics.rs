//! Diagnostics: an interactive tree dump (via `ptree`), a hand-written DOT
//! export, and plain-text structural statistics over a PDAG.

use crate::pdag::{Context, EdgeKind, ParserEdge, PdagNode};
use crate::registry::{parser_info, ParserData};
use ptree::TreeItem;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io;

/// A `ptree` adapter over one [`ParserEdge`], used only for the interactive
/// `display_pdag` dump — kept separate from [`gen_dot_pdag_graph`]'s
/// hand-written format, which callers may embed verbatim in a report.
#[derive(Clone)]
struct EdgeItem<'a> {
    label: String,
    children: Vec<&'a ParserEdge>,
}

impl<'a> EdgeItem<'a> {
    fn new(edge: &'a ParserEdge) -> Self {
        let parser_name = match &edge.kind {
            EdgeKind::Builtin { id, .. } => parser_info(*id).name,
            EdgeKind::CustomType(_) => "custom_type",
        };
        let mut label = format!("{} [{}]", edge.name, parser_name);
        if let EdgeKind::Builtin { data: ParserData::Literal(bytes), .. } = &edge.kind {
            let _ = write!(label, " \"{}\"", String::from_utf8_lossy(bytes));
        }
        if edge.node.terminal {
            label.push_str(" *");
        }
        Self {
            label,
            children: edge.node.parsers.iter().collect(),
        }
    }
}

impl<'a> TreeItem for EdgeItem<'a> {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, _: &ptree::Style) -> io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::Owned(self.children.iter().map(|e| EdgeItem::new(*e)).collect())
    }
}

/// Print an interactive tree view of the PDAG rooted at `node` to stdout.
pub fn display_pdag(node: &PdagNode) -> io::Result<()> {
    for edge in &node.parsers {
        ptree::print_tree(&EdgeItem::new(edge))?;
    }
    Ok(())
}

/// `genDotPDAGGraph` — emit `node`'s sub-PDAG as a Graphviz DOT digraph.
/// Node identifiers are assigned by depth-first discovery order. Leaves
/// (nodes with no outbound parser edges) are styled `bold` — not the same
/// thing as a terminal node, since a rule can terminate at a node that
/// still has continuations (e.g. "ab" terminal, "abc" extending it); every
/// edge is styled `dotted` and labeled `"<parser-name>:<literal-chars-if-any>"`,
/// with `"` and `\` elided from the literal text.
pub fn gen_dot_pdag_graph(node: &PdagNode) -> String {
    let mut out = String::new();
    let mut ids: BTreeMap<*const PdagNode, usize> = BTreeMap::new();
    let mut next_id = 0usize;

    writeln!(out, "digraph pdag {{").unwrap();
    emit_node(node, &mut out, &mut ids, &mut next_id);
    writeln!(out, "}}").unwrap();
    out
}

fn node_id(node: &PdagNode, ids: &mut BTreeMap<*const PdagNode, usize>, next_id: &mut usize) -> usize {
    *ids.entry(node as *const PdagNode).or_insert_with(|| {
        let id = *next_id;
        *next_id += 1;
        id
    })
}

fn emit_node(
    node: &PdagNode,
    out: &mut String,
    ids: &mut BTreeMap<*const PdagNode, usize>,
    next_id: &mut usize,
) {
    let id = node_id(node, ids, next_id);
    let style = if node.parsers.is_empty() { "bold" } else { "solid" };
    writeln!(out, "  n{} [style={}];", id, style).unwrap();

    for edge in &node.parsers {
        let child_id = node_id(&edge.node, ids, next_id);
        let parser_name = match &edge.kind {
            EdgeKind::Builtin { id, .. } => parser_info(*id).name,
            EdgeKind::CustomType(_) => "custom_type",
        };
        let literal = match &edge.kind {
            EdgeKind::Builtin { data: ParserData::Literal(bytes), .. } => elide_dot_unsafe(bytes),
            _ => String::new(),
        };
        writeln!(
            out,
            "  n{} -> n{} [label=\"{}:{}\", style=dotted];",
            id, child_id, parser_name, literal
        )
        .unwrap();
        emit_node(&edge.node, out, ids, next_id);
    }
}

fn elide_dot_unsafe(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|c| *c != '"' && *c != '\\')
        .collect()
}

/// Plain-text, key-aligned structural statistics over the sub-PDAG rooted
/// at `node`: node/terminal/edge counts, longest path, a per-parser-kind
/// histogram (rows with zero count suppressed), and a per-node fan-out
/// histogram bucketed 0..99 plus a "100+" overflow bucket.
pub fn pdag_stats(node: &PdagNode) -> String {
    let mut stats = Stats::default();
    walk_stats(node, 0, &mut stats);
    stats.render()
}

/// Statistics over every PDAG owned by `ctx`: the main PDAG plus every
/// named type PDAG.
pub fn full_pdag_stats(ctx: &Context) -> String {
    let mut stats = Stats::default();
    walk_stats(&ctx.main, 0, &mut stats);
    for type_pdag in &ctx.types {
        walk_stats(&type_pdag.root, 0, &mut stats);
    }
    stats.render()
}

#[derive(Default)]
struct Stats {
    nodes: usize,
    terminal_nodes: usize,
    parser_entries: usize,
    longest_path: usize,
    by_parser: BTreeMap<&'static str, usize>,
    fan_out: BTreeMap<usize, usize>,
}

fn walk_stats(node: &PdagNode, depth: usize, stats: &mut Stats) {
    stats.nodes += 1;
    if node.terminal {
        stats.terminal_nodes += 1;
    }
    stats.longest_path = stats.longest_path.max(depth);

    let bucket = node.parsers.len().min(100);
    *stats.fan_out.entry(bucket).or_insert(0) += 1;

    for edge in &node.parsers {
        stats.parser_entries += 1;
        let name = match &edge.kind {
            EdgeKind::Builtin { id, .. } => parser_info(*id).name,
            EdgeKind::CustomType(_) => "custom_type",
        };
        *stats.by_parser.entry(name).or_insert(0) += 1;
        walk_stats(&edge.node, depth + 1, stats);
    }
}

impl Stats {
    fn render(&self) -> String {
        let mut out = String::new();
        writeln!(out, "nodes: {}", self.nodes).unwrap();
        writeln!(out, "terminal nodes: {}", self.terminal_nodes).unwrap();
        writeln!(out, "parser entries: {}", self.parser_entries).unwrap();
        writeln!(out, "longest path: {}", self.longest_path).unwrap();
        for (name, count) in &self.by_parser {
            if *count > 0 {
                writeln!(out, "  {}: {}", name, count).unwrap();
            }
        }
        for (bucket, count) in &self.fan_out {
            if *bucket == 100 {
                writeln!(out, "  100+: {}", count).unwrap();
            } else {
                writeln!(out, "  {}: {}", bucket, count).unwrap();
            }
        }
        out
    }
}
