use crate::ast::{Expr, Expression, NodeKind};
use crate::error::EvalError;
use crate::stack;
use log::debug;

/// Node kinds a tree may contain and still be evaluated. Anything not listed
/// here is rejected, wherever it appears in the tree.
///
/// `Assign` is accepted although evaluation gives it no meaning: `x = 1`
/// passes the walk and then fails as an invalid expression. `Keyword` binds
/// only for functions with named parameters (`round(1.5, ndigits=0)`).
pub(crate) const ALLOWED_NODES: &[NodeKind] = &[
    NodeKind::Expression,
    NodeKind::Assign,
    NodeKind::BinOp,
    NodeKind::UnaryOp,
    NodeKind::Call,
    NodeKind::Keyword,
    NodeKind::Name,
    NodeKind::Constant,
    NodeKind::List,
    NodeKind::Tuple,
    NodeKind::Add,
    NodeKind::Sub,
    NodeKind::Mult,
    NodeKind::Div,
    NodeKind::Mod,
    NodeKind::FloorDiv,
    NodeKind::Pow,
    NodeKind::USub,
    NodeKind::UAdd,
];

fn ensure(kind: NodeKind) -> Result<(), EvalError> {
    if ALLOWED_NODES.contains(&kind) {
        Ok(())
    } else {
        debug!("rejecting expression element {}", kind);
        Err(EvalError::Unsupported(kind))
    }
}

/// Depth-first walk over every node, failing on the first one whose kind is
/// not allowed.
pub(crate) fn validate(root: &Expression) -> Result<(), EvalError> {
    ensure(root.kind())?;
    match root {
        Expression::Body(body) => walk(body),
        Expression::Assign { value, .. } => walk(value),
    }
}

fn walk(node: &Expr) -> Result<(), EvalError> {
    stack::guarded(|| walk_node(node))
}

fn walk_node(node: &Expr) -> Result<(), EvalError> {
    ensure(node.kind())?;
    match node {
        Expr::Constant(_) | Expr::Str(_) | Expr::Name(_) => Ok(()),
        Expr::BinOp { .. } => {
            // Same order as the recursive walk: leftmost operand first, then
            // each operator and its right operand.
            let (first, links) = node.left_spine();
            walk(first)?;
            for (op, right) in links {
                ensure(op.kind())?;
                walk(right)?;
            }
            Ok(())
        }
        Expr::UnaryOp { op, operand } => {
            ensure(op.kind())?;
            walk(operand)
        }
        Expr::BoolOp { op, values } => {
            ensure(op.kind())?;
            values.iter().try_for_each(walk)
        }
        Expr::Compare {
            left,
            ops,
            comparators,
        } => {
            walk(left)?;
            for op in ops {
                ensure(op.kind())?;
            }
            comparators.iter().try_for_each(walk)
        }
        Expr::IfExp { test, body, orelse } => {
            walk(test)?;
            walk(body)?;
            walk(orelse)
        }
        Expr::Lambda { body, .. } => walk(body),
        Expr::Call {
            func,
            args,
            keywords,
        } => {
            walk(func)?;
            args.iter().try_for_each(walk)?;
            for kw in keywords {
                ensure(NodeKind::Keyword)?;
                walk(&kw.value)?;
            }
            Ok(())
        }
        Expr::Attribute { value, .. } => walk(value),
        Expr::Subscript { value, index } => {
            walk(value)?;
            walk(index)
        }
        Expr::Slice { lower, upper, step } => {
            for part in [lower, upper, step].into_iter().flatten() {
                walk(part)?;
            }
            Ok(())
        }
        Expr::List(items) | Expr::Tuple(items) | Expr::Set(items) => {
            items.iter().try_for_each(walk)
        }
        Expr::Dict { keys, values } => {
            keys.iter().try_for_each(walk)?;
            values.iter().try_for_each(walk)
        }
        Expr::Comprehension {
            element,
            value,
            generators,
            ..
        } => {
            walk(element)?;
            if let Some(v) = value {
                walk(v)?;
            }
            for g in generators {
                ensure(NodeKind::Comprehension)?;
                walk(&g.target)?;
                walk(&g.iter)?;
                g.ifs.iter().try_for_each(walk)?;
            }
            Ok(())
        }
        Expr::Starred(inner) => walk(inner),
        Expr::NamedExpr { value, .. } => walk(value),
    }
}
