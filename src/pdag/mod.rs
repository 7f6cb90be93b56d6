//! Components B, process-wide compilation state: PDAG nodes, parser edges,
//! and the [`Context`] that owns every PDAG reachable from the main root or
//! a named type root (invariant I4).

mod builder;
mod optimizer;

pub use builder::{add_rule, RootRef};
pub use optimizer::optimize_with_guard;

use crate::error::BuildError;
use crate::registry::{ParserData, ParserId};
use crate::util::Log;
use serde_json::Value;
use std::rc::Rc;


/// The reserved edge names `"-"` (discard) and `"."` (merge), or an
/// ordinary output field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeName {
    /// `"-"`: the parser is used only to advance the offset; its value, if
    /// any, is never attached to the result object.
    Discard,
    /// `"."`: splice the produced object's own top-level keys into the
    /// parent object instead of nesting it under a key.
    Merge,
    /// Any other name: attach the produced value under this key.
    Field(String),
}

impl EdgeName {
    pub fn parse(name: &str) -> Self {
        match name {
            "-" => EdgeName::Discard,
            "." => EdgeName::Merge,
            other => EdgeName::Field(other.to_string()),
        }
    }
}

impl std::fmt::Display for EdgeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeName::Discard => write!(f, "-"),
            EdgeName::Merge => write!(f, "."),
            EdgeName::Field(name) => write!(f, "{}", name),
        }
    }
}

/// Index into [`Context::types`]. Non-owning — a `CUSTOM_TYPE` edge never
/// owns the type PDAG it invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub usize);

/// What a parser edge dispatches to: a registry row plus its per-edge
/// instance data, or a named type PDAG invoked as `CUSTOM_TYPE`. The tagged
/// variant realizes the design note in §9 ("matcher dispatch becomes a
/// single switch") rather than an opaque `prsid` integer plus a void
/// pointer.
#[derive(Debug, Clone)]
pub enum EdgeKind {
    Builtin { id: ParserId, data: ParserData },
    CustomType(TypeId),
}

/// One entry in a node's `parsers` sequence (§3, "Parser edge").
#[derive(Debug)]
pub struct ParserEdge {
    pub name: EdgeName,
    /// Reserved for a future priority scheme; never consulted by the
    /// matcher, which always tries edges in insertion order (§4.5.3).
    pub prio: i32,
    pub kind: EdgeKind,
    pub node: Box<PdagNode>,
}

impl ParserEdge {
    pub fn new_builtin(
        name: EdgeName,
        id: ParserId,
        extra: Option<&[u8]>,
        params: Option<&Value>,
        prio: i32,
    ) -> Result<Self, BuildError> {
        let data = crate::registry::construct(id, extra, params)?;
        Ok(Self {
            name,
            prio,
            kind: EdgeKind::Builtin { id, data },
            node: Box::new(PdagNode::new()),
        })
    }

    pub fn new_custom_type(name: EdgeName, type_id: TypeId, prio: i32) -> Self {
        Self {
            name,
            prio,
            kind: EdgeKind::CustomType(type_id),
            node: Box::new(PdagNode::new()),
        }
    }

    /// `newLiteralParserEdge` — a one-character literal edge named `"-"`.
    pub fn new_literal(ch: u8) -> Self {
        Self {
            name: EdgeName::Discard,
            prio: 0,
            kind: EdgeKind::Builtin {
                id: crate::registry::LITERAL_ID,
                data: ParserData::Literal(vec![ch]),
            },
            node: Box::new(PdagNode::new()),
        }
    }
}

/// A state in the matcher (§3, "PDAG node").
#[derive(Debug)]
pub struct PdagNode {
    pub parsers: Vec<ParserEdge>,
    /// True iff at least one complete rule ends here.
    pub terminal: bool,
    /// Set by the external loader on terminal nodes; read-only to the core
    /// (I5) and passed through to the annotator on a successful match.
    /// `Rc` clone *is* the reference-count increment the spec calls for.
    pub tags: Option<Rc<Value>>,
}

impl PdagNode {
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
            terminal: false,
            tags: None,
        }
    }
}

impl Default for PdagNode {
    fn default() -> Self {
        Self::new()
    }
}

/// A named, independently rooted sub-DAG invocable from any position via a
/// `CustomType` edge.
#[derive(Debug)]
pub struct TypePdag {
    pub name: String,
    pub root: PdagNode,
}

/// Process-wide compilation state: the main PDAG root, every named type
/// PDAG, a node counter (for diagnostics), and a debug-narration level.
/// Owns every [`PdagNode`]/[`ParserEdge`] reachable from `main` or any
/// `types[i].root` (I4). Created before any rule is loaded, dropped after
/// the last match — there is no explicit `destroyContext`, since `Drop`
/// already walks and releases the owned tree.
#[derive(Debug)]
pub struct Context {
    pub main: PdagNode,
    pub types: Vec<TypePdag>,
    pub node_count: usize,
    pub debug: Log<&'static str>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            main: PdagNode::new(),
            types: Vec::new(),
            node_count: 1,
            debug: Log::None,
        }
    }

    pub fn with_debug(level: Log<&'static str>) -> Self {
        let mut ctx = Self::new();
        ctx.debug = level;
        ctx
    }

    /// Register a new, empty named type PDAG. Errors if the name is
    /// already taken.
    pub fn new_type(&mut self, name: impl Into<String>) -> Result<TypeId, BuildError> {
        let name = name.into();
        if self.types.iter().any(|t| t.name == name) {
            return Err(BuildError::DuplicateType(name));
        }
        let id = TypeId(self.types.len());
        self.types.push(TypePdag {
            name,
            root: PdagNode::new(),
        });
        self.node_count += 1;
        Ok(id)
    }

    pub fn type_id(&self, name: &str) -> Option<TypeId> {
        self.types.iter().position(|t| t.name == name).map(TypeId)
    }

    pub fn type_pdag(&self, id: TypeId) -> &TypePdag {
        &self.types[id.0]
    }

    /// Run the literal-path optimizer (component D) over the main PDAG and
    /// every type PDAG, with the default, spec-recommended guard (skip
    /// compaction across a terminal node or a non-discard-named edge).
    pub fn optimize(&mut self) {
        optimizer::optimize_with_guard(&mut self.main, true);
        for type_pdag in &mut self.types {
            optimizer::optimize_with_guard(&mut type_pdag.root, true);
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
