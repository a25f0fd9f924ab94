//! Worklist tree builder.
//!
//! The classified lexeme stream is reduced without recursion. Each queued
//! list is first stripped of grouping: a parenthesised run becomes a
//! `Reference` to a new list, a function name with its argument run becomes
//! a `FunctionCall` holding one new list per argument. The list is then
//! reduced according to how many operators it still holds:
//!
//! - none: the single remaining operand becomes (or aliases) a node,
//! - one: the operator and its operands become a node,
//! - several: each operator that can take its neighbours is cut out into a
//!   new list, highest precedence first, and the list is revisited.
//!
//! A list that finishes maps to its node in `pending`. The queue is worked
//! from the back: a list that changed goes back on top, with the lists it
//! just created above it in creation order, so its dependencies finish
//! before it is seen again. A list whose references are still not finished
//! goes to the bottom.

use std::collections::VecDeque;
use std::mem;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::api::CompileOptions;
use crate::diagnostics::{CompileError, CompileErrorKind};
use crate::lexer::{FunctionCallRef, Lexeme, LexemeKind, ListId, OperatorLexeme};
use crate::registry::{Associativity, Fixity, OperatorForm};
use crate::syntax::Span;
use crate::tree::{NodeId, NodeKind, Tree};
use crate::values::Slot;

/// Builds the tree for a classified lexeme sequence.
pub fn build_tree(
    lexemes: Vec<Lexeme>,
    source: &str,
    options: &CompileOptions,
) -> Result<Tree, CompileError> {
    TreeBuilder::new(source, options.max_worklist_passes).run(lexemes)
}

struct WorkList {
    items: Vec<Lexeme>,
    /// Source covered by the list, for errors about the list as a whole.
    span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The list now maps to a node in `pending`.
    Done,
    /// The list changed and must be revisited.
    Progress,
    /// The list waits on lists that are not finished.
    Waiting,
}

struct TreeBuilder<'s> {
    source: &'s str,
    lists: Vec<WorkList>,
    queue: VecDeque<ListId>,
    /// Lists created while processing the current one.
    fresh: Vec<ListId>,
    pending: HashMap<ListId, NodeId>,
    tree: Tree,
    max_passes: usize,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str, max_passes: usize) -> Self {
        Self {
            source,
            lists: Vec::new(),
            queue: VecDeque::new(),
            fresh: Vec::new(),
            pending: HashMap::new(),
            tree: Tree::new(),
            max_passes,
        }
    }

    fn run(mut self, lexemes: Vec<Lexeme>) -> Result<Tree, CompileError> {
        let span = Span::new(0, self.source.len());
        let top = self.enqueue(lexemes, span.clone());
        self.queue.extend(self.fresh.drain(..));
        let mut passes = 0usize;
        let mut stalled = 0usize;

        while let Some(list) = self.queue.pop_back() {
            passes += 1;
            if passes > self.max_passes {
                return Err(CompileError::new(
                    CompileErrorKind::PassLimitExceeded(self.max_passes),
                    span,
                ));
            }
            let step = self.process(list)?;
            trace!(list = list.index(), ?step, queued = self.queue.len(), "Worklist pass");
            match step {
                Step::Done => stalled = 0,
                Step::Progress => {
                    stalled = 0;
                    self.queue.push_back(list);
                }
                Step::Waiting => {
                    // Every queued list has been seen without any of them moving.
                    stalled += 1;
                    if stalled > self.queue.len() {
                        return Err(CompileError::new(
                            CompileErrorKind::UnresolvedReference,
                            self.lists[list.index()].span.clone(),
                        ));
                    }
                    self.queue.push_front(list);
                }
            }
            self.queue.extend(self.fresh.drain(..).rev());
        }

        let result = self.pending.remove(&top).ok_or_else(|| {
            CompileError::new(CompileErrorKind::UnresolvedReference, span.clone())
        })?;
        if !self.pending.is_empty() {
            return Err(CompileError::new(
                CompileErrorKind::DanglingNodes(self.pending.len()),
                span,
            ));
        }
        let root_span = self.tree.node(result).span.clone();
        let root = self.tree.push(NodeKind::Root, root_span, Slot::default());
        self.tree.attach(root, result);
        self.tree.set_root(root);
        debug!(nodes = self.tree.len(), passes, "Built expression tree");
        Ok(self.tree)
    }

    /// Placeholder standing in for `list`, labelled with the source it covers.
    fn reference(&self, list: ListId, span: Span, pos: usize) -> Lexeme {
        let text = span.text(self.source).unwrap_or("(...)");
        Lexeme::new(text, span, pos, LexemeKind::Reference(list))
    }

    fn enqueue(&mut self, items: Vec<Lexeme>, span: Span) -> ListId {
        let id = ListId(self.lists.len() as u32);
        trace!(list = id.index(), len = items.len(), "Enqueue list");
        self.lists.push(WorkList { items, span });
        self.fresh.push(id);
        id
    }

    fn process(&mut self, id: ListId) -> Result<Step, CompileError> {
        let grouped = self.split_groups(id)?;
        let mut operators = self.lists[id.index()]
            .items
            .iter()
            .enumerate()
            .filter(|(_, lexeme)| lexeme.is_operator())
            .map(|(index, _)| index);
        let step = match (operators.next(), operators.next()) {
            (None, _) => self.reduce_operand(id)?,
            (Some(index), None) => self.reduce_single_operator(id, index)?,
            _ => self.reduce_operators(id)?,
        };
        Ok(match step {
            Step::Waiting if grouped => Step::Progress,
            step => step,
        })
    }

    /// Replaces parenthesised runs and call argument runs with placeholders.
    fn split_groups(&mut self, id: ListId) -> Result<bool, CompileError> {
        let items = mem::take(&mut self.lists[id.index()].items);
        if !items.iter().any(|l| l.is_open_group() || l.is_close_group() || l.is_comma()) {
            self.lists[id.index()].items = items;
            return Ok(false);
        }

        let mut out = Vec::with_capacity(items.len());
        let mut iter = items.into_iter().peekable();
        while let Some(lexeme) = iter.next() {
            if lexeme.is_open_group() {
                let (inner, close) = take_group(&mut iter, &lexeme)?;
                let span = Span::combine(&lexeme.span, &close);
                let child = self.enqueue(inner, span.clone());
                out.push(self.reference(child, span, lexeme.pos));
            } else if matches!(lexeme.kind, LexemeKind::Function)
                && iter.peek().is_some_and(Lexeme::is_open_group)
            {
                let open = iter.next().ok_or_else(|| {
                    CompileError::new(CompileErrorKind::BracketBalance, lexeme.span.clone())
                })?;
                let (inner, close) = take_group(&mut iter, &open)?;
                let arguments = self.split_arguments(inner, &lexeme.text, &open.span)?;
                let span = Span::combine(&lexeme.span, &close);
                let call = FunctionCallRef {
                    name: lexeme.text.clone(),
                    arguments,
                };
                out.push(Lexeme::new(
                    lexeme.text,
                    span,
                    lexeme.pos,
                    LexemeKind::FunctionCall(call),
                ));
            } else if lexeme.is_comma() {
                return Err(CompileError::new(CompileErrorKind::UnexpectedComma, lexeme.span));
            } else if lexeme.is_close_group() {
                return Err(CompileError::new(CompileErrorKind::BracketOrder, lexeme.span));
            } else {
                out.push(lexeme);
            }
        }
        self.lists[id.index()].items = out;
        Ok(true)
    }

    /// Splits call contents at top-level commas and queues one list per argument.
    fn split_arguments(
        &mut self,
        inner: Vec<Lexeme>,
        name: &str,
        open: &Span,
    ) -> Result<Vec<ListId>, CompileError> {
        if inner.is_empty() {
            return Ok(Vec::new());
        }
        let mut arguments = Vec::new();
        let mut current: Vec<Lexeme> = Vec::new();
        let mut depth = 0usize;
        let mut separator = open.clone();
        let empty = |span: &Span| {
            CompileError::new(CompileErrorKind::EmptyArgument(name.to_string()), span.clone())
        };

        for lexeme in inner {
            if lexeme.is_comma() && depth == 0 {
                if current.is_empty() {
                    return Err(empty(&lexeme.span));
                }
                let span = list_span(&current);
                arguments.push(self.enqueue(mem::take(&mut current), span));
                separator = lexeme.span;
                continue;
            }
            if lexeme.is_open_group() {
                depth += 1;
            } else if lexeme.is_close_group() {
                depth = depth.saturating_sub(1);
            }
            current.push(lexeme);
        }
        if current.is_empty() {
            return Err(empty(&separator));
        }
        let span = list_span(&current);
        arguments.push(self.enqueue(current, span));
        Ok(arguments)
    }

    /// True when the lexeme can be linked right now.
    fn is_ready(&self, lexeme: &Lexeme) -> bool {
        match &lexeme.kind {
            LexemeKind::Reference(child) => self.pending.contains_key(child),
            LexemeKind::FunctionCall(call) => {
                call.arguments.iter().all(|arg| self.pending.contains_key(arg))
            }
            _ => true,
        }
    }

    fn reduce_operand(&mut self, id: ListId) -> Result<Step, CompileError> {
        let list = &self.lists[id.index()];
        match list.items.as_slice() {
            [] => {
                return Err(CompileError::new(
                    CompileErrorKind::EmptyExpression,
                    list.span.clone(),
                ));
            }
            [single] => {
                if !self.is_ready(single) {
                    return Ok(Step::Waiting);
                }
            }
            [_, extra, ..] => {
                return Err(unexpected(extra));
            }
        }
        let mut items = mem::take(&mut self.lists[id.index()].items);
        if let Some(lexeme) = items.pop() {
            let node = self.link_operand(lexeme)?;
            self.pending.insert(id, node);
        }
        Ok(Step::Done)
    }

    fn reduce_single_operator(&mut self, id: ListId, index: usize) -> Result<Step, CompileError> {
        let list = &self.lists[id.index()];
        if !list.items.iter().all(|lexeme| self.is_ready(lexeme)) {
            return Ok(Step::Waiting);
        }
        let operator = &list.items[index];
        let Some(op) = operator.operator().copied() else {
            return Err(unexpected(operator));
        };
        let Some(fixity) = select_fixity(&op, &list.items, index) else {
            return Err(CompileError::new(
                CompileErrorKind::MissingOperand(operator.text.clone()),
                operator.span.clone(),
            ));
        };
        let (start, end) = operand_range(index, fixity);
        if start > 0 {
            return Err(unexpected(&list.items[start - 1]));
        }
        if let Some(extra) = list.items.get(end + 1) {
            return Err(unexpected(extra));
        }

        let items = mem::take(&mut self.lists[id.index()].items);
        let node = self.link_operator(items, op, fixity)?;
        self.pending.insert(id, node);
        Ok(Step::Done)
    }

    /// Cuts every operator that can take its neighbours out into a new list.
    fn reduce_operators(&mut self, id: ListId) -> Result<Step, CompileError> {
        let mut items = mem::take(&mut self.lists[id.index()].items);

        let mut order: Vec<(u8, Associativity, usize)> = items
            .iter()
            .filter(|lexeme| lexeme.is_operator())
            .filter_map(|lexeme| {
                let op = lexeme.operator()?;
                Some((op.precedence, op.associativity, lexeme.pos))
            })
            .collect();
        order.sort_by(|a, b| {
            b.0.cmp(&a.0).then_with(|| match a.1 {
                Associativity::LeftToRight => a.2.cmp(&b.2),
                Associativity::RightToLeft => b.2.cmp(&a.2),
            })
        });

        let mut excised = 0usize;
        let mut deferred: Option<usize> = None;
        // Precedence of the first deferred operator. Looser binary operators
        // wait for the next pass so they cannot take its operand.
        let mut blocked: Option<u8> = None;
        for (_, _, pos) in order {
            let Some(index) = items
                .iter()
                .position(|lexeme| lexeme.pos == pos && lexeme.is_operator())
            else {
                continue;
            };
            let Some(op) = items[index].operator().copied() else {
                continue;
            };
            let Some(fixity) = select_fixity(&op, &items, index) else {
                trace!(op = %items[index].text, "Defer operator");
                deferred.get_or_insert(index);
                blocked.get_or_insert(op.precedence);
                continue;
            };
            if fixity == Fixity::Binary && blocked.is_some_and(|p| op.precedence < p) {
                continue;
            }
            let (start, end) = operand_range(index, fixity);
            let run: Vec<Lexeme> = items.drain(start..=end).collect();
            let span = list_span(&run);
            trace!(op = op.info.symbol, ?fixity, "Excise operator");
            let child = self.enqueue(run, span.clone());
            items.insert(start, self.reference(child, span, pos));
            excised += 1;
        }

        if excised == 0 {
            let culprit = deferred.and_then(|i| items.get(i)).or_else(|| items.first());
            let err = match culprit {
                Some(lexeme) => CompileError::new(
                    CompileErrorKind::UnresolvedOperator(lexeme.text.clone()),
                    lexeme.span.clone(),
                ),
                None => CompileError::new(
                    CompileErrorKind::EmptyExpression,
                    self.lists[id.index()].span.clone(),
                ),
            };
            return Err(err);
        }
        self.lists[id.index()].items = items;
        Ok(Step::Progress)
    }

    /// Builds the node for an operator and its adjacent operands.
    fn link_operator(
        &mut self,
        items: Vec<Lexeme>,
        op: OperatorLexeme,
        fixity: Fixity,
    ) -> Result<NodeId, CompileError> {
        let mut children: SmallVec<[NodeId; 2]> = SmallVec::new();
        let mut span: Option<Span> = None;
        for lexeme in items {
            let lexeme_span = lexeme.span.clone();
            if !lexeme.is_operator() {
                children.push(self.link_operand(lexeme)?);
            }
            span = Some(match span {
                Some(span) => Span::combine(&span, &lexeme_span),
                None => lexeme_span,
            });
        }
        let node = self.tree.push(
            NodeKind::Operator {
                info: op.info,
                fixity,
            },
            span.unwrap_or_default(),
            Slot::default(),
        );
        for child in children {
            self.tree.attach(node, child);
        }
        Ok(node)
    }

    /// Turns an operand lexeme into a node, consuming finished lists it refers to.
    fn link_operand(&mut self, lexeme: Lexeme) -> Result<NodeId, CompileError> {
        match lexeme.kind {
            LexemeKind::Constant(value) => Ok(self.tree.push(
                NodeKind::Constant,
                lexeme.span,
                Slot::Owned(value),
            )),
            LexemeKind::Variable(var) => Ok(self.tree.push(
                NodeKind::Variable { name: lexeme.text },
                lexeme.span,
                Slot::Aliased(var),
            )),
            LexemeKind::Reference(child) => self.take_pending(child, &lexeme.span),
            LexemeKind::FunctionCall(call) => {
                let mut children = Vec::with_capacity(call.arguments.len());
                for arg in &call.arguments {
                    children.push(self.take_pending(*arg, &lexeme.span)?);
                }
                let node = self.tree.push(
                    NodeKind::FunctionCall { name: call.name },
                    lexeme.span,
                    Slot::default(),
                );
                for child in children {
                    self.tree.attach(node, child);
                }
                Ok(node)
            }
            _ => Err(CompileError::new(
                CompileErrorKind::UnexpectedToken(lexeme.text),
                lexeme.span,
            )),
        }
    }

    fn take_pending(&mut self, list: ListId, span: &Span) -> Result<NodeId, CompileError> {
        self.pending.remove(&list).ok_or_else(|| {
            CompileError::new(CompileErrorKind::UnresolvedReference, span.clone())
        })
    }
}

/// Moves lexemes up to the `)` matching `open` out of `iter`.
fn take_group(
    iter: &mut impl Iterator<Item = Lexeme>,
    open: &Lexeme,
) -> Result<(Vec<Lexeme>, Span), CompileError> {
    let mut inner = Vec::new();
    let mut depth = 1usize;
    for lexeme in iter.by_ref() {
        if lexeme.is_open_group() {
            depth += 1;
        } else if lexeme.is_close_group() {
            depth -= 1;
            if depth == 0 {
                return Ok((inner, lexeme.span));
            }
        }
        inner.push(lexeme);
    }
    Err(CompileError::new(CompileErrorKind::BracketBalance, open.span.clone()))
}

/// Picks the form an operator takes given which neighbours hold values.
///
/// Binary wins when both sides are evaluable and the operator allows it.
/// Otherwise a unary form applies only if its side is evaluable, which is
/// what defers the inner `-` of `1 - -1` until its operand is known.
fn select_fixity(op: &OperatorLexeme, items: &[Lexeme], index: usize) -> Option<Fixity> {
    let left = index > 0 && items[index - 1].is_evaluable();
    let right = items.get(index + 1).is_some_and(Lexeme::is_evaluable);
    if op.form.contains(OperatorForm::BINARY) && left && right {
        Some(Fixity::Binary)
    } else if op.form.contains(OperatorForm::PREFIX) && right {
        Some(Fixity::Prefix)
    } else if op.form.contains(OperatorForm::POSTFIX) && left {
        Some(Fixity::Postfix)
    } else {
        None
    }
}

/// Inclusive index range of an operator and the operands its form takes.
fn operand_range(index: usize, fixity: Fixity) -> (usize, usize) {
    match fixity {
        Fixity::Binary => (index - 1, index + 1),
        Fixity::Prefix => (index, index + 1),
        Fixity::Postfix => (index - 1, index),
    }
}

fn list_span(items: &[Lexeme]) -> Span {
    match (items.first(), items.last()) {
        (Some(first), Some(last)) => Span::combine(&first.span, &last.span),
        _ => Span::default(),
    }
}

fn unexpected(lexeme: &Lexeme) -> CompileError {
    CompileError::new(
        CompileErrorKind::UnexpectedToken(lexeme.text.clone()),
        lexeme.span.clone(),
    )
}
