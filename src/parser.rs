use crate::ast::{
    BinOperator, BoolOperator, CmpOperator, ComprehensionKind, Expr, Expression, Generator,
    Keyword, Number, UnaryOperator,
};
use crate::error::EvalError;
use crate::lexer::{Lexer, Token};
use crate::stack;

/// Bound on nesting (brackets and call arguments, unary operators, exponents,
/// call trailers).
/// Deeper input is reported as a syntax error. Left-associative operator
/// chains are flat in this sense and are not counted.
const MAX_DEPTH: usize = 200;

pub(crate) struct Parser<'a> {
    lex: Lexer<'a>,
    look: Token,
    look_pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(s: &'a str) -> Result<Self, EvalError> {
        let mut lex = Lexer::new(s);
        let look = lex.next_token()?;
        let look_pos = lex.token_start();
        Ok(Self {
            lex,
            look,
            look_pos,
            depth: 0,
        })
    }
    fn bump(&mut self) -> Result<(), EvalError> {
        self.look = self.lex.next_token()?;
        self.look_pos = self.lex.token_start();
        Ok(())
    }
    fn at(&self, t: &Token) -> bool {
        std::mem::discriminant(&self.look) == std::mem::discriminant(t)
    }
    fn eat(&mut self, t: &Token) -> Result<bool, EvalError> {
        if self.at(t) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
    fn expect(&mut self, t: &Token) -> Result<(), EvalError> {
        if self.at(t) {
            self.bump()
        } else {
            Err(self.unexpected(&format!("expected {}", t.describe())))
        }
    }
    fn unexpected(&self, what: &str) -> EvalError {
        EvalError::syntax(
            format!("{}, found {}", what, self.look.describe()),
            self.look_pos,
        )
    }
    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::syntax(
                "expression nested too deeply",
                self.look_pos,
            ));
        }
        Ok(())
    }
    fn ascend(&mut self, levels: usize) {
        self.depth -= levels;
    }
    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, EvalError>,
    ) -> Result<T, EvalError> {
        self.descend()?;
        let out = stack::guarded(|| f(self));
        self.ascend(1);
        out
    }
    fn ident(&mut self) -> Result<String, EvalError> {
        match self.look.clone() {
            Token::Ident(name) => {
                self.bump()?;
                Ok(name)
            }
            _ => Err(self.unexpected("expected a name")),
        }
    }

    /// Parse the whole input as one expression (or `name = expression`).
    pub(crate) fn parse(mut self) -> Result<Expression, EvalError> {
        let body = self.testlist()?;
        let root = if self.at(&Token::Assign) {
            let target = match &body {
                Expr::Name(name) => name.clone(),
                _ => return Err(self.unexpected("cannot assign to expression")),
            };
            self.bump()?;
            let value = self.testlist()?;
            Expression::Assign { target, value }
        } else {
            Expression::Body(body)
        };
        if !self.at(&Token::Eof) {
            return Err(self.unexpected("expected end of input"));
        }
        Ok(root)
    }

    /// `test (',' test)* [',']`; a comma makes a tuple.
    fn testlist(&mut self) -> Result<Expr, EvalError> {
        let first = self.test_or_star()?;
        if !self.at(&Token::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&Token::Comma)? {
            if self.ends_sequence() {
                break;
            }
            items.push(self.test_or_star()?);
        }
        Ok(Expr::Tuple(items))
    }

    fn ends_sequence(&self) -> bool {
        matches!(
            self.look,
            Token::Eof
                | Token::RParen
                | Token::RBracket
                | Token::RBrace
                | Token::Assign
                | Token::In
        )
    }

    fn test_or_star(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::Star)? {
            let inner = self.nested(Self::bitor)?;
            return Ok(Expr::Starred(Box::new(inner)));
        }
        self.named_test()
    }

    /// `name := test` or `test`
    fn named_test(&mut self) -> Result<Expr, EvalError> {
        let expr = self.test()?;
        if self.at(&Token::Walrus) {
            let target = match &expr {
                Expr::Name(name) => name.clone(),
                _ => return Err(self.unexpected("cannot use assignment expression here")),
            };
            self.bump()?;
            let value = self.test()?;
            return Ok(Expr::NamedExpr {
                target,
                value: Box::new(value),
            });
        }
        Ok(expr)
    }

    /// `lambda` | `or_test ['if' or_test 'else' test]`
    fn test(&mut self) -> Result<Expr, EvalError> {
        self.nested(Self::test_inner)
    }

    fn test_inner(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::Lambda)? {
            let mut params = Vec::new();
            if !self.at(&Token::Colon) {
                loop {
                    params.push(self.ident()?);
                    if !self.eat(&Token::Comma)? {
                        break;
                    }
                }
            }
            self.expect(&Token::Colon)?;
            let body = self.test()?;
            return Ok(Expr::Lambda {
                params,
                body: Box::new(body),
            });
        }
        let body = self.or_test()?;
        if self.eat(&Token::If)? {
            let test = self.or_test()?;
            self.expect(&Token::Else)?;
            let orelse = self.test()?;
            return Ok(Expr::IfExp {
                test: Box::new(test),
                body: Box::new(body),
                orelse: Box::new(orelse),
            });
        }
        Ok(body)
    }

    fn or_test(&mut self) -> Result<Expr, EvalError> {
        let first = self.and_test()?;
        if !self.at(&Token::Or) {
            return Ok(first);
        }
        let mut values = vec![first];
        while self.eat(&Token::Or)? {
            values.push(self.and_test()?);
        }
        Ok(Expr::BoolOp {
            op: BoolOperator::Or,
            values,
        })
    }

    fn and_test(&mut self) -> Result<Expr, EvalError> {
        let first = self.not_test()?;
        if !self.at(&Token::And) {
            return Ok(first);
        }
        let mut values = vec![first];
        while self.eat(&Token::And)? {
            values.push(self.not_test()?);
        }
        Ok(Expr::BoolOp {
            op: BoolOperator::And,
            values,
        })
    }

    fn not_test(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::Not)? {
            let operand = self.nested(Self::not_test)?;
            return Ok(Expr::UnaryOp {
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            });
        }
        self.comparison()
    }

    fn comp_op(&mut self) -> Result<Option<CmpOperator>, EvalError> {
        let op = match self.look {
            Token::Lt => CmpOperator::Lt,
            Token::Le => CmpOperator::LtE,
            Token::Gt => CmpOperator::Gt,
            Token::Ge => CmpOperator::GtE,
            Token::EqEq => CmpOperator::Eq,
            Token::NotEq => CmpOperator::NotEq,
            Token::In => CmpOperator::In,
            Token::Not => {
                self.bump()?;
                if !self.at(&Token::In) {
                    return Err(self.unexpected("expected 'in' after 'not'"));
                }
                CmpOperator::NotIn
            }
            Token::Is => {
                self.bump()?;
                if self.eat(&Token::Not)? {
                    return Ok(Some(CmpOperator::IsNot));
                }
                return Ok(Some(CmpOperator::Is));
            }
            _ => return Ok(None),
        };
        self.bump()?;
        Ok(Some(op))
    }

    fn comparison(&mut self) -> Result<Expr, EvalError> {
        let left = self.bitor()?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(op) = self.comp_op()? {
            ops.push(op);
            comparators.push(self.bitor()?);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        Ok(Expr::Compare {
            left: Box::new(left),
            ops,
            comparators,
        })
    }

    /// Left-associative binary level. The chain builds a left-deep tree of any
    /// length; later passes walk it with [`Expr::left_spine`].
    fn binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<Expr, EvalError>,
        op_for: fn(&Token) -> Option<BinOperator>,
    ) -> Result<Expr, EvalError> {
        let mut node = next(self)?;
        while let Some(op) = op_for(&self.look) {
            self.bump()?;
            let rhs = next(self)?;
            node = Expr::BinOp {
                left: Box::new(node),
                op,
                right: Box::new(rhs),
            };
        }
        Ok(node)
    }

    fn bitor(&mut self) -> Result<Expr, EvalError> {
        self.binary_level(Self::bitxor, |t| match t {
            Token::Pipe => Some(BinOperator::BitOr),
            _ => None,
        })
    }

    fn bitxor(&mut self) -> Result<Expr, EvalError> {
        self.binary_level(Self::bitand, |t| match t {
            Token::Caret => Some(BinOperator::BitXor),
            _ => None,
        })
    }

    fn bitand(&mut self) -> Result<Expr, EvalError> {
        self.binary_level(Self::shift, |t| match t {
            Token::Amp => Some(BinOperator::BitAnd),
            _ => None,
        })
    }

    fn shift(&mut self) -> Result<Expr, EvalError> {
        self.binary_level(Self::additive, |t| match t {
            Token::Shl => Some(BinOperator::LShift),
            Token::Shr => Some(BinOperator::RShift),
            _ => None,
        })
    }

    fn additive(&mut self) -> Result<Expr, EvalError> {
        self.binary_level(Self::multiplicative, |t| match t {
            Token::Plus => Some(BinOperator::Add),
            Token::Minus => Some(BinOperator::Sub),
            _ => None,
        })
    }

    fn multiplicative(&mut self) -> Result<Expr, EvalError> {
        self.binary_level(Self::unary, |t| match t {
            Token::Star => Some(BinOperator::Mult),
            Token::Slash => Some(BinOperator::Div),
            Token::DoubleSlash => Some(BinOperator::FloorDiv),
            Token::Percent => Some(BinOperator::Mod),
            Token::At => Some(BinOperator::MatMult),
            _ => None,
        })
    }

    /// Prefix `-`, `+`, `~`. Binds looser than `**`: `-2 ** 2 == -(2 ** 2)`.
    fn unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.look {
            Token::Minus => UnaryOperator::USub,
            Token::Plus => UnaryOperator::UAdd,
            Token::Tilde => UnaryOperator::Invert,
            _ => return self.power(),
        };
        self.bump()?;
        let operand = self.nested(Self::unary)?;
        Ok(Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    /// `primary ['**' unary]`, right-associative.
    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.primary()?;
        if !self.eat(&Token::DoubleStar)? {
            return Ok(base);
        }
        let exponent = self.nested(Self::unary)?;
        Ok(Expr::BinOp {
            left: Box::new(base),
            op: BinOperator::Pow,
            right: Box::new(exponent),
        })
    }

    /// Atom followed by call, subscript and attribute trailers.
    fn primary(&mut self) -> Result<Expr, EvalError> {
        let mut node = self.atom()?;
        let mut links = 0;
        let out = loop {
            let step = match self.look {
                Token::LParen => self.call_trailer(node),
                Token::LBracket => self.subscript_trailer(node),
                Token::Dot => self.attribute_trailer(node),
                _ => break Ok(node),
            };
            let next = match step {
                Ok(n) => n,
                Err(e) => break Err(e),
            };
            links += 1;
            if let Err(e) = self.descend() {
                break Err(e);
            }
            node = next;
        };
        self.ascend(links);
        out
    }

    fn call_trailer(&mut self, func: Expr) -> Result<Expr, EvalError> {
        self.bump()?;
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        while !self.at(&Token::RParen) {
            if self.eat(&Token::DoubleStar)? {
                let value = self.test()?;
                keywords.push(Keyword { name: None, value });
            } else {
                let arg = self.test_or_star()?;
                if self.at(&Token::Assign) {
                    let name = match &arg {
                        Expr::Name(name) => name.clone(),
                        _ => return Err(self.unexpected("expected a parameter name before '='")),
                    };
                    self.bump()?;
                    let value = self.test()?;
                    keywords.push(Keyword {
                        name: Some(name),
                        value,
                    });
                } else if self.at(&Token::For) && args.is_empty() && keywords.is_empty() {
                    let generators = self.generators()?;
                    args.push(Expr::Comprehension {
                        kind: ComprehensionKind::Generator,
                        element: Box::new(arg),
                        value: None,
                        generators,
                    });
                } else {
                    args.push(arg);
                }
            }
            if !self.eat(&Token::Comma)? {
                break;
            }
        }
        self.expect(&Token::RParen)?;
        Ok(Expr::Call {
            func: Box::new(func),
            args,
            keywords,
        })
    }

    fn subscript_trailer(&mut self, value: Expr) -> Result<Expr, EvalError> {
        self.bump()?;
        let first = self.slice_item()?;
        let index = if self.at(&Token::Comma) {
            let mut items = vec![first];
            while self.eat(&Token::Comma)? {
                if self.at(&Token::RBracket) {
                    break;
                }
                items.push(self.slice_item()?);
            }
            Expr::Tuple(items)
        } else {
            first
        };
        self.expect(&Token::RBracket)?;
        Ok(Expr::Subscript {
            value: Box::new(value),
            index: Box::new(index),
        })
    }

    /// `test` or `[lower]:[upper][:[step]]`
    fn slice_item(&mut self) -> Result<Expr, EvalError> {
        let lower = if self.at(&Token::Colon) {
            None
        } else {
            let e = self.test()?;
            if !self.at(&Token::Colon) {
                return Ok(e);
            }
            Some(Box::new(e))
        };
        self.expect(&Token::Colon)?;
        let upper = self.optional_slice_part()?;
        let step = if self.eat(&Token::Colon)? {
            self.optional_slice_part()?
        } else {
            None
        };
        Ok(Expr::Slice { lower, upper, step })
    }

    fn optional_slice_part(&mut self) -> Result<Option<Box<Expr>>, EvalError> {
        if matches!(self.look, Token::Colon | Token::Comma | Token::RBracket) {
            return Ok(None);
        }
        Ok(Some(Box::new(self.test()?)))
    }

    fn attribute_trailer(&mut self, value: Expr) -> Result<Expr, EvalError> {
        self.bump()?;
        let attr = self.ident()?;
        Ok(Expr::Attribute {
            value: Box::new(value),
            attr,
        })
    }

    /// One or more `for target in iter [if cond]*` clauses.
    fn generators(&mut self) -> Result<Vec<Generator>, EvalError> {
        let mut out = Vec::new();
        while self.eat(&Token::For)? {
            let target = self.target_list()?;
            self.expect(&Token::In)?;
            let iter = self.or_test()?;
            let mut ifs = Vec::new();
            while self.eat(&Token::If)? {
                ifs.push(self.or_test()?);
            }
            out.push(Generator { target, iter, ifs });
        }
        Ok(out)
    }

    fn target_list(&mut self) -> Result<Expr, EvalError> {
        let first = self.test_or_star_target()?;
        if !self.at(&Token::Comma) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&Token::Comma)? {
            if self.ends_sequence() {
                break;
            }
            items.push(self.test_or_star_target()?);
        }
        Ok(Expr::Tuple(items))
    }

    fn test_or_star_target(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::Star)? {
            return Ok(Expr::Starred(Box::new(self.nested(Self::bitor)?)));
        }
        self.bitor()
    }

    fn atom(&mut self) -> Result<Expr, EvalError> {
        match self.look.clone() {
            Token::Num(v) => {
                self.bump()?;
                Ok(Expr::Constant(Number::Real(v)))
            }
            Token::Imag(v) => {
                self.bump()?;
                Ok(Expr::Constant(Number::Imaginary(v)))
            }
            Token::Str(s) => {
                self.bump()?;
                // Adjacent literals concatenate.
                let mut s = s;
                while let Token::Str(next) = self.look.clone() {
                    self.bump()?;
                    s.push_str(&next);
                }
                Ok(Expr::Str(s))
            }
            Token::Ident(name) => {
                self.bump()?;
                Ok(Expr::Name(name))
            }
            Token::LParen => self.enclosed(Self::paren_body),
            Token::LBracket => self.enclosed(Self::bracket_body),
            Token::LBrace => self.enclosed(Self::brace_body),
            _ => Err(self.unexpected("expected an expression")),
        }
    }

    /// Consume the opening delimiter and parse the contents. Every body goes
    /// through `test` or a starred item, which count the level.
    fn enclosed(&mut self, body: fn(&mut Self) -> Result<Expr, EvalError>) -> Result<Expr, EvalError> {
        self.bump()?;
        body(self)
    }

    fn paren_body(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::RParen)? {
            return Ok(Expr::Tuple(Vec::new()));
        }
        let first = self.test_or_star()?;
        let out = if self.at(&Token::For) {
            let generators = self.generators()?;
            Expr::Comprehension {
                kind: ComprehensionKind::Generator,
                element: Box::new(first),
                value: None,
                generators,
            }
        } else if self.at(&Token::Comma) {
            let mut items = vec![first];
            while self.eat(&Token::Comma)? {
                if self.at(&Token::RParen) {
                    break;
                }
                items.push(self.test_or_star()?);
            }
            Expr::Tuple(items)
        } else {
            first
        };
        self.expect(&Token::RParen)?;
        Ok(out)
    }

    fn bracket_body(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::RBracket)? {
            return Ok(Expr::List(Vec::new()));
        }
        let first = self.test_or_star()?;
        let out = if self.at(&Token::For) {
            let generators = self.generators()?;
            Expr::Comprehension {
                kind: ComprehensionKind::List,
                element: Box::new(first),
                value: None,
                generators,
            }
        } else {
            let mut items = vec![first];
            while self.eat(&Token::Comma)? {
                if self.at(&Token::RBracket) {
                    break;
                }
                items.push(self.test_or_star()?);
            }
            Expr::List(items)
        };
        self.expect(&Token::RBracket)?;
        Ok(out)
    }

    fn brace_body(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::RBrace)? {
            return Ok(Expr::Dict {
                keys: Vec::new(),
                values: Vec::new(),
            });
        }
        let first = self.test_or_star()?;
        let out = if self.eat(&Token::Colon)? {
            let first_value = self.test()?;
            if self.at(&Token::For) {
                let generators = self.generators()?;
                Expr::Comprehension {
                    kind: ComprehensionKind::Dict,
                    element: Box::new(first),
                    value: Some(Box::new(first_value)),
                    generators,
                }
            } else {
                let mut keys = vec![first];
                let mut values = vec![first_value];
                while self.eat(&Token::Comma)? {
                    if self.at(&Token::RBrace) {
                        break;
                    }
                    keys.push(self.test()?);
                    self.expect(&Token::Colon)?;
                    values.push(self.test()?);
                }
                Expr::Dict { keys, values }
            }
        } else if self.at(&Token::For) {
            let generators = self.generators()?;
            Expr::Comprehension {
                kind: ComprehensionKind::Set,
                element: Box::new(first),
                value: None,
                generators,
            }
        } else {
            let mut items = vec![first];
            while self.eat(&Token::Comma)? {
                if self.at(&Token::RBrace) {
                    break;
                }
                items.push(self.test_or_star()?);
            }
            Expr::Set(items)
        };
        self.expect(&Token::RBrace)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Expr {
        match Parser::new(src).unwrap().parse().unwrap() {
            Expression::Body(e) => e,
            other => panic!("unexpected root: {:?}", other),
        }
    }

    fn num(v: f64) -> Box<Expr> {
        Box::new(Expr::Constant(Number::Real(v)))
    }

    #[test]
    fn mul_binds_tighter_than_add() {
        assert_eq!(
            parse("1 + 2 * 3"),
            Expr::BinOp {
                left: num(1.0),
                op: BinOperator::Add,
                right: Box::new(Expr::BinOp {
                    left: num(2.0),
                    op: BinOperator::Mult,
                    right: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn power_is_right_associative_and_binds_over_unary_minus() {
        assert_eq!(
            parse("-2 ** 3 ** 2"),
            Expr::UnaryOp {
                op: UnaryOperator::USub,
                operand: Box::new(Expr::BinOp {
                    left: num(2.0),
                    op: BinOperator::Pow,
                    right: Box::new(Expr::BinOp {
                        left: num(3.0),
                        op: BinOperator::Pow,
                        right: num(2.0),
                    }),
                }),
            }
        );
    }

    #[test]
    fn exponent_may_carry_its_own_sign() {
        assert_eq!(
            parse("2 ** -1"),
            Expr::BinOp {
                left: num(2.0),
                op: BinOperator::Pow,
                right: Box::new(Expr::UnaryOp {
                    op: UnaryOperator::USub,
                    operand: num(1.0),
                }),
            }
        );
    }

    #[test]
    fn call_with_keyword_argument() {
        match &parse("round(2.5, ndigits=1)") {
            Expr::Call { func, args, keywords } => {
                assert_eq!(**func, Expr::Name("round".into()));
                assert_eq!(args.len(), 1);
                assert_eq!(keywords.len(), 1);
                assert_eq!(keywords[0].name.as_deref(), Some("ndigits"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn displays_and_comprehensions() {
        assert!(matches!(&parse("()"), Expr::Tuple(v) if v.is_empty()));
        assert!(matches!(&parse("(1,)"), Expr::Tuple(v) if v.len() == 1));
        assert!(matches!(&parse("1, 2"), Expr::Tuple(v) if v.len() == 2));
        assert!(matches!(&parse("[1, 2,]"), Expr::List(v) if v.len() == 2));
        assert!(matches!(&parse("{1, 2}"), Expr::Set(v) if v.len() == 2));
        assert!(matches!(parse("{}"), Expr::Dict { .. }));
        assert!(matches!(parse("{1: 2}"), Expr::Dict { .. }));
        assert!(matches!(
            parse("[x for x in range(3) if x]"),
            Expr::Comprehension { kind: ComprehensionKind::List, .. }
        ));
        assert!(matches!(
            parse("sum(x for x in y)"),
            Expr::Call { .. }
        ));
        assert!(matches!(
            parse("{k: v for k, v in items}"),
            Expr::Comprehension { kind: ComprehensionKind::Dict, .. }
        ));
    }

    #[test]
    fn comparisons_chain() {
        match &parse("1 < 2 <= 3 not in x is not y") {
            Expr::Compare { ops, comparators, .. } => {
                assert_eq!(
                    *ops,
                    vec![CmpOperator::Lt, CmpOperator::LtE, CmpOperator::NotIn, CmpOperator::IsNot]
                );
                assert_eq!(comparators.len(), 4);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn trailers() {
        assert!(matches!(parse("os.system"), Expr::Attribute { .. }));
        assert!(matches!(parse("x[1:2]"), Expr::Subscript { .. }));
        assert!(matches!(parse("f(1)(2)"), Expr::Call { .. }));
    }

    #[test]
    fn lambda_and_conditional() {
        assert!(matches!(parse("lambda: 1"), Expr::Lambda { .. }));
        assert!(matches!(parse("lambda a, b: a"), Expr::Lambda { .. }));
        assert!(matches!(parse("1 if x else 2"), Expr::IfExp { .. }));
        assert!(matches!(parse("(y := 2)"), Expr::NamedExpr { .. }));
    }

    #[test]
    fn assignment_root() {
        let root = Parser::new("x = 1 + 2").unwrap().parse().unwrap();
        assert!(matches!(root, Expression::Assign { ref target, .. } if target == "x"));
    }

    #[test]
    fn syntax_errors_report_position() {
        let err = Parser::new("1 + ").unwrap().parse().unwrap_err();
        assert_eq!(
            err,
            EvalError::Syntax {
                message: "expected an expression, found end of input".into(),
                position: 4,
            }
        );
        let err = Parser::new("(1 + 2").unwrap().parse().unwrap_err();
        assert!(matches!(err, EvalError::Syntax { position: 6, .. }));
        let err = Parser::new("1 2").unwrap().parse().unwrap_err();
        assert!(matches!(err, EvalError::Syntax { position: 2, .. }));
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let src = format!("{}1{}", "(".repeat(500), ")".repeat(500));
        let err = Parser::new(&src).unwrap().parse().unwrap_err();
        assert!(matches!(err, EvalError::Syntax { ref message, .. } if message == "expression nested too deeply"));
    }

    #[test]
    fn long_flat_chains_are_not_nesting() {
        for sep in [" + ", " * ", " - ", " // "] {
            let src = vec!["1"; 5000].join(sep);
            assert!(Parser::new(&src).unwrap().parse().is_ok(), "{}", sep);
        }
    }

    #[test]
    fn nesting_under_the_limit_fits_a_small_stack() {
        let inputs = [
            format!("{}1{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1)),
            format!("{}1{}", "sqrt(".repeat(MAX_DEPTH / 2 - 1), ")".repeat(MAX_DEPTH / 2 - 1)),
            format!("{}1", "-".repeat(MAX_DEPTH - 1)),
            vec!["2"; MAX_DEPTH / 2].join(" ** "),
        ];
        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || {
                inputs
                    .iter()
                    .map(|src| Parser::new(src).unwrap().parse().is_ok())
                    .collect::<Vec<_>>()
            })
            .unwrap();
        assert_eq!(handle.join().unwrap(), vec![true; 4]);
    }
}
