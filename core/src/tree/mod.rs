//! The expression tree, stored as an index arena.
//!
//! Nodes refer to each other by [`NodeId`]. Children are always created
//! before their parent, and every node except the root has exactly one
//! parent, so the tree is acyclic by construction.

mod builder;

pub use builder::build_tree;

use core::fmt::Write;

use smallvec::SmallVec;

use crate::registry::{Fixity, OperatorInfo};
use crate::syntax::Span;
use crate::values::{Slot, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Root,
    Operator { info: OperatorInfo, fixity: Fixity },
    FunctionCall { name: String },
    Variable { name: String },
    Constant,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub children: SmallVec<[NodeId; 2]>,
    pub parent: Option<NodeId>,
    pub span: Span,
    /// Static type. Leaves get it at creation, the rest from the checker.
    pub ty: ValueType,
    pub slot: Slot,
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, kind: NodeKind, span: Span, slot: Slot) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let ty = slot.value_type();
        self.nodes.push(Node {
            kind,
            children: SmallVec::new(),
            parent: None,
            span,
            ty,
            slot,
        });
        id
    }

    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The root's single child, which holds the expression's value.
    pub fn result(&self) -> Option<NodeId> {
        self.root
            .and_then(|root| self.node(root).children.first().copied())
    }

    /// Children before parents, siblings left to right, root last.
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root else {
            return order;
        };
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            for &child in self.node(id).children.iter().rev() {
                stack.push((child, false));
            }
        }
        order
    }

    /// Renders the tree as an s-expression, e.g. `(+ 1 (* 2 3))`.
    pub fn to_sexpr(&self, source: &str) -> String {
        let mut out = String::new();
        if let Some(result) = self.result() {
            self.write_sexpr(result, source, &mut out);
        }
        out
    }

    fn write_sexpr(&self, id: NodeId, source: &str, out: &mut String) {
        // Explicit stack: deep inputs like `--------x` must not recurse.
        enum Item {
            Node(NodeId),
            Text(&'static str),
        }
        let mut stack = vec![Item::Node(id)];
        while let Some(item) = stack.pop() {
            let id = match item {
                Item::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Item::Node(id) => id,
            };
            let node = self.node(id);
            let head = match &node.kind {
                NodeKind::Root => "root".to_string(),
                NodeKind::Operator { info, fixity } => match fixity {
                    Fixity::Postfix => format!("post{}", info.symbol),
                    _ => info.symbol.to_string(),
                },
                NodeKind::FunctionCall { name } => name.clone(),
                NodeKind::Variable { name } => {
                    out.push_str(name);
                    continue;
                }
                NodeKind::Constant => {
                    let _ = write!(out, "{}", node.span.text(source).unwrap_or("?"));
                    continue;
                }
            };
            let _ = write!(out, "({head}");
            stack.push(Item::Text(")"));
            for &child in node.children.iter().rev() {
                stack.push(Item::Node(child));
                stack.push(Item::Text(" "));
            }
        }
    }
}
