use std::fmt;

/// Root of a parsed input. The grammar accepts a single expression, or a
/// `name = expression` assignment which parses but never evaluates.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expression {
    Body(Expr),
    Assign { target: String, value: Expr },
}

/// Syntax tree nodes. The grammar is a general expression grammar, wider than
/// what the evaluator supports; the validator narrows it down.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Expr {
    /// Numeric literal (`1`, `2.5e3`, `0x1f`, `3j`)
    Constant(Number),
    /// String literal (`'a'`, `"b"`)
    Str(String),
    /// Bare identifier
    Name(String),
    BinOp {
        left: Box<Expr>,
        op: BinOperator,
        right: Box<Expr>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    /// `a and b and c`, `a or b`
    BoolOp { op: BoolOperator, values: Vec<Expr> },
    /// Chained comparison `a < b <= c`
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOperator>,
        comparators: Vec<Expr>,
    },
    /// `body if test else orelse`
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    Lambda { params: Vec<String>, body: Box<Expr> },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    Attribute { value: Box<Expr>, attr: String },
    Subscript { value: Box<Expr>, index: Box<Expr> },
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Set(Vec<Expr>),
    Dict { keys: Vec<Expr>, values: Vec<Expr> },
    Comprehension {
        kind: ComprehensionKind,
        element: Box<Expr>,
        /// Value expression of a dict comprehension.
        value: Option<Box<Expr>>,
        generators: Vec<Generator>,
    },
    /// `*items` in a call or display
    Starred(Box<Expr>),
    /// `(name := value)`
    NamedExpr { target: String, value: Box<Expr> },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Number {
    Real(f64),
    Imaginary(f64),
}

/// `name=value` call argument; `name` is `None` for `**mapping`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Keyword {
    pub(crate) name: Option<String>,
    pub(crate) value: Expr,
}

/// One `for target in iter if cond` clause of a comprehension.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Generator {
    pub(crate) target: Expr,
    pub(crate) iter: Expr,
    pub(crate) ifs: Vec<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinOperator {
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    FloorDiv,
    Pow,
    MatMult,
    LShift,
    RShift,
    BitAnd,
    BitOr,
    BitXor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnaryOperator {
    /// `-x`
    USub,
    /// `+x`
    UAdd,
    /// `~x`
    Invert,
    /// `not x`
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BoolOperator {
    And,
    Or,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CmpOperator {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    In,
    NotIn,
    Is,
    IsNot,
}

/// Tag for every kind of node the parser can produce, operators included.
/// The display name is what rejection messages show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Expression,
    Assign,
    Constant,
    Str,
    Name,
    BinOp,
    UnaryOp,
    BoolOp,
    Compare,
    IfExp,
    Lambda,
    Call,
    Keyword,
    Attribute,
    Subscript,
    Slice,
    List,
    Tuple,
    Set,
    Dict,
    ListComp,
    SetComp,
    DictComp,
    GeneratorExp,
    Comprehension,
    Starred,
    NamedExpr,
    Add,
    Sub,
    Mult,
    Div,
    Mod,
    FloorDiv,
    Pow,
    MatMult,
    LShift,
    RShift,
    BitAnd,
    BitOr,
    BitXor,
    USub,
    UAdd,
    Invert,
    Not,
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    In,
    NotIn,
    Is,
    IsNot,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Expression {
    pub(crate) fn kind(&self) -> NodeKind {
        match self {
            Expression::Body(_) => NodeKind::Expression,
            Expression::Assign { .. } => NodeKind::Assign,
        }
    }
}

impl Expr {
    pub(crate) fn kind(&self) -> NodeKind {
        match self {
            Expr::Constant(_) => NodeKind::Constant,
            Expr::Str(_) => NodeKind::Str,
            Expr::Name(_) => NodeKind::Name,
            Expr::BinOp { .. } => NodeKind::BinOp,
            Expr::UnaryOp { .. } => NodeKind::UnaryOp,
            Expr::BoolOp { .. } => NodeKind::BoolOp,
            Expr::Compare { .. } => NodeKind::Compare,
            Expr::IfExp { .. } => NodeKind::IfExp,
            Expr::Lambda { .. } => NodeKind::Lambda,
            Expr::Call { .. } => NodeKind::Call,
            Expr::Attribute { .. } => NodeKind::Attribute,
            Expr::Subscript { .. } => NodeKind::Subscript,
            Expr::Slice { .. } => NodeKind::Slice,
            Expr::List(_) => NodeKind::List,
            Expr::Tuple(_) => NodeKind::Tuple,
            Expr::Set(_) => NodeKind::Set,
            Expr::Dict { .. } => NodeKind::Dict,
            Expr::Comprehension { kind, .. } => match kind {
                ComprehensionKind::List => NodeKind::ListComp,
                ComprehensionKind::Set => NodeKind::SetComp,
                ComprehensionKind::Dict => NodeKind::DictComp,
                ComprehensionKind::Generator => NodeKind::GeneratorExp,
            },
            Expr::Starred(_) => NodeKind::Starred,
            Expr::NamedExpr { .. } => NodeKind::NamedExpr,
        }
    }

    /// Split a left-deep operator chain `((a op1 b) op2 c) ...` into its
    /// leftmost operand and the `(op, right)` links in evaluation order.
    ///
    /// Chains are not bounded by the nesting limit, so walks over them use
    /// this instead of recursing once per link.
    pub(crate) fn left_spine(&self) -> (&Expr, Vec<(BinOperator, &Expr)>) {
        let mut links = Vec::new();
        let mut node = self;
        while let Expr::BinOp { left, op, right } = node {
            links.push((*op, right.as_ref()));
            node = &**left;
        }
        links.reverse();
        (node, links)
    }
}

impl Drop for Expr {
    // Unlink a left-deep chain one node at a time; the default drop would
    // recurse once per link.
    fn drop(&mut self) {
        let Expr::BinOp { left, .. } = self else {
            return;
        };
        let mut next = std::mem::replace(&mut **left, HOLE);
        while let Expr::BinOp { left, .. } = &mut next {
            let inner = std::mem::replace(&mut **left, HOLE);
            next = inner;
        }
    }
}

/// Childless stand-in left behind while a chain is taken apart.
const HOLE: Expr = Expr::Constant(Number::Real(0.0));

impl BinOperator {
    pub(crate) fn kind(self) -> NodeKind {
        match self {
            BinOperator::Add => NodeKind::Add,
            BinOperator::Sub => NodeKind::Sub,
            BinOperator::Mult => NodeKind::Mult,
            BinOperator::Div => NodeKind::Div,
            BinOperator::Mod => NodeKind::Mod,
            BinOperator::FloorDiv => NodeKind::FloorDiv,
            BinOperator::Pow => NodeKind::Pow,
            BinOperator::MatMult => NodeKind::MatMult,
            BinOperator::LShift => NodeKind::LShift,
            BinOperator::RShift => NodeKind::RShift,
            BinOperator::BitAnd => NodeKind::BitAnd,
            BinOperator::BitOr => NodeKind::BitOr,
            BinOperator::BitXor => NodeKind::BitXor,
        }
    }
}

impl UnaryOperator {
    pub(crate) fn kind(self) -> NodeKind {
        match self {
            UnaryOperator::USub => NodeKind::USub,
            UnaryOperator::UAdd => NodeKind::UAdd,
            UnaryOperator::Invert => NodeKind::Invert,
            UnaryOperator::Not => NodeKind::Not,
        }
    }
}

impl BoolOperator {
    pub(crate) fn kind(self) -> NodeKind {
        match self {
            BoolOperator::And => NodeKind::And,
            BoolOperator::Or => NodeKind::Or,
        }
    }
}

impl CmpOperator {
    pub(crate) fn kind(self) -> NodeKind {
        match self {
            CmpOperator::Eq => NodeKind::Eq,
            CmpOperator::NotEq => NodeKind::NotEq,
            CmpOperator::Lt => NodeKind::Lt,
            CmpOperator::LtE => NodeKind::LtE,
            CmpOperator::Gt => NodeKind::Gt,
            CmpOperator::GtE => NodeKind::GtE,
            CmpOperator::In => NodeKind::In,
            CmpOperator::NotIn => NodeKind::NotIn,
            CmpOperator::Is => NodeKind::Is,
            CmpOperator::IsNot => NodeKind::IsNot,
        }
    }
}
