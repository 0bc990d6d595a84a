use crate::error::EvalError;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Ident(String),
    Num(f64),
    Imag(f64),
    Str(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    At,
    Caret,
    Amp,
    Pipe,
    Tilde,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    Assign,
    Walrus,
    Colon,
    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    And,
    Or,
    Not,
    If,
    Else,
    For,
    In,
    Is,
    Lambda,
    Eof,
}

impl Token {
    /// Short rendering for syntax error messages.
    pub(crate) fn describe(&self) -> String {
        let s = match self {
            Token::Ident(name) => return format!("name '{}'", name),
            Token::Num(_) | Token::Imag(_) => "number",
            Token::Str(_) => "string",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::DoubleStar => "'**'",
            Token::Slash => "'/'",
            Token::DoubleSlash => "'//'",
            Token::Percent => "'%'",
            Token::At => "'@'",
            Token::Caret => "'^'",
            Token::Amp => "'&'",
            Token::Pipe => "'|'",
            Token::Tilde => "'~'",
            Token::Shl => "'<<'",
            Token::Shr => "'>>'",
            Token::Lt => "'<'",
            Token::Le => "'<='",
            Token::Gt => "'>'",
            Token::Ge => "'>='",
            Token::EqEq => "'=='",
            Token::NotEq => "'!='",
            Token::Assign => "'='",
            Token::Walrus => "':='",
            Token::Colon => "':'",
            Token::Comma => "','",
            Token::Dot => "'.'",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::LBrace => "'{'",
            Token::RBrace => "'}'",
            Token::And => "'and'",
            Token::Or => "'or'",
            Token::Not => "'not'",
            Token::If => "'if'",
            Token::Else => "'else'",
            Token::For => "'for'",
            Token::In => "'in'",
            Token::Is => "'is'",
            Token::Lambda => "'lambda'",
            Token::Eof => "end of input",
        };
        s.to_string()
    }
}

pub(crate) struct Lexer<'a> {
    src: &'a [u8],
    i: usize,
    start: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(s: &'a str) -> Self {
        Self {
            src: s.as_bytes(),
            i: 0,
            start: 0,
        }
    }
    /// Byte offset where the most recently returned token begins.
    pub(crate) fn token_start(&self) -> usize {
        self.start
    }
    fn peek(&self) -> Option<u8> {
        self.src.get(self.i).copied()
    }
    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.get(self.i + ahead).copied()
    }
    fn bump(&mut self) -> Option<u8> {
        let ch = self.src.get(self.i).copied();
        if ch.is_some() {
            self.i += 1;
        }
        ch
    }
    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.i += 1;
            } else {
                break;
            }
        }
    }
    /// Consume `first` and, if the next byte is `second`, that too.
    fn one_or_two(&mut self, second: u8, single: Token, double: Token) -> Token {
        self.bump();
        if self.peek() == Some(second) {
            self.bump();
            double
        } else {
            single
        }
    }
    fn error(&self, message: impl Into<String>) -> EvalError {
        EvalError::syntax(message, self.start)
    }
    pub(crate) fn next_token(&mut self) -> Result<Token, EvalError> {
        self.skip_ws();
        self.start = self.i;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };
        let tok = match c {
            b'(' => {
                self.bump();
                Token::LParen
            }
            b')' => {
                self.bump();
                Token::RParen
            }
            b'[' => {
                self.bump();
                Token::LBracket
            }
            b']' => {
                self.bump();
                Token::RBracket
            }
            b'{' => {
                self.bump();
                Token::LBrace
            }
            b'}' => {
                self.bump();
                Token::RBrace
            }
            b',' => {
                self.bump();
                Token::Comma
            }
            b'+' => {
                self.bump();
                Token::Plus
            }
            b'-' => {
                self.bump();
                Token::Minus
            }
            b'%' => {
                self.bump();
                Token::Percent
            }
            b'@' => {
                self.bump();
                Token::At
            }
            b'^' => {
                self.bump();
                Token::Caret
            }
            b'&' => {
                self.bump();
                Token::Amp
            }
            b'|' => {
                self.bump();
                Token::Pipe
            }
            b'~' => {
                self.bump();
                Token::Tilde
            }
            b'*' => self.one_or_two(b'*', Token::Star, Token::DoubleStar),
            b'/' => self.one_or_two(b'/', Token::Slash, Token::DoubleSlash),
            b'=' => self.one_or_two(b'=', Token::Assign, Token::EqEq),
            b':' => self.one_or_two(b'=', Token::Colon, Token::Walrus),
            b'<' => {
                self.bump();
                match self.peek() {
                    Some(b'=') => {
                        self.bump();
                        Token::Le
                    }
                    Some(b'<') => {
                        self.bump();
                        Token::Shl
                    }
                    _ => Token::Lt,
                }
            }
            b'>' => {
                self.bump();
                match self.peek() {
                    Some(b'=') => {
                        self.bump();
                        Token::Ge
                    }
                    Some(b'>') => {
                        self.bump();
                        Token::Shr
                    }
                    _ => Token::Gt,
                }
            }
            b'!' => {
                self.bump();
                if self.peek() == Some(b'=') {
                    self.bump();
                    Token::NotEq
                } else {
                    return Err(self.error("invalid character '!'"));
                }
            }
            b'.' if matches!(self.peek_at(1), Some(d) if d.is_ascii_digit()) => {
                return self.lex_number();
            }
            b'.' => {
                self.bump();
                Token::Dot
            }
            b'\'' | b'"' => return self.lex_string(c),
            c if c.is_ascii_digit() => return self.lex_number(),
            c if c.is_ascii_alphabetic() || c == b'_' => return Ok(self.lex_ident()),
            _ => return Err(self.error("invalid character")),
        };
        Ok(tok)
    }

    /// Digits of the given radix with single `_` separators between them.
    fn take_digits(&mut self, radix: u32, out: &mut String) {
        while let Some(c) = self.peek() {
            if (c as char).is_digit(radix) {
                out.push(c as char);
                self.i += 1;
            } else if c == b'_'
                && !out.is_empty()
                && matches!(self.peek_at(1), Some(d) if (d as char).is_digit(radix))
            {
                self.i += 1;
            } else {
                break;
            }
        }
    }

    fn lex_number(&mut self) -> Result<Token, EvalError> {
        if self.peek() == Some(b'0') {
            let radix = match self.peek_at(1) {
                Some(b'x' | b'X') => Some(16),
                Some(b'o' | b'O') => Some(8),
                Some(b'b' | b'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.i += 2;
                if self.peek() == Some(b'_') {
                    self.i += 1;
                }
                let mut digits = String::new();
                self.take_digits(radix, &mut digits);
                if digits.is_empty() || self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
                    return Err(self.error("invalid integer literal"));
                }
                let v = digits.chars().fold(0.0f64, |acc, d| {
                    acc * radix as f64 + d.to_digit(radix).unwrap_or(0) as f64
                });
                return Ok(Token::Num(v));
            }
        }

        let mut text = String::new();
        self.take_digits(10, &mut text);
        let int_len = text.len();
        let mut is_int = true;
        if self.peek() == Some(b'.') {
            is_int = false;
            self.bump();
            text.push('.');
            self.take_digits(10, &mut text);
        }
        // Scientific notation exponent part; only consumed when digits follow.
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let signed = matches!(self.peek_at(1), Some(b'+' | b'-'));
            let first = if signed { self.peek_at(2) } else { self.peek_at(1) };
            if first.is_some_and(|d| d.is_ascii_digit()) {
                is_int = false;
                text.push('e');
                self.bump();
                if signed {
                    text.push(self.bump().map(char::from).unwrap_or('+'));
                }
                let mut exp = String::new();
                self.take_digits(10, &mut exp);
                text.push_str(&exp);
            }
        }
        let imaginary = matches!(self.peek(), Some(b'j' | b'J'));
        if imaginary {
            self.bump();
        }
        if self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            return Err(self.error("invalid decimal literal"));
        }
        if is_int && !imaginary && int_len > 1 && text.starts_with('0') && text.bytes().any(|b| b != b'0') {
            return Err(self.error("leading zeros in decimal integer literals are not permitted"));
        }
        let v: f64 = text
            .parse()
            .map_err(|_| self.error(format!("invalid number '{}'", text)))?;
        Ok(if imaginary { Token::Imag(v) } else { Token::Num(v) })
    }

    fn lex_string(&mut self, quote: u8) -> Result<Token, EvalError> {
        self.bump();
        let mut out = Vec::new();
        loop {
            match self.bump() {
                None | Some(b'\n') => return Err(self.error("unterminated string literal")),
                Some(b'\\') => match self.bump() {
                    Some(b'n') => out.push(b'\n'),
                    Some(b't') => out.push(b'\t'),
                    Some(b'r') => out.push(b'\r'),
                    Some(b'0') => out.push(0),
                    Some(c @ (b'\\' | b'\'' | b'"')) => out.push(c),
                    Some(c) => {
                        out.push(b'\\');
                        out.push(c);
                    }
                    None => return Err(self.error("unterminated string literal")),
                },
                Some(c) if c == quote => break,
                Some(c) => out.push(c),
            }
        }
        Ok(Token::Str(String::from_utf8_lossy(&out).into_owned()))
    }

    fn lex_ident(&mut self) -> Token {
        let start = self.i;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.i += 1;
            } else {
                break;
            }
        }
        // The scanned range is ASCII only.
        let s = String::from_utf8_lossy(&self.src[start..self.i]);
        match s.as_ref() {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "if" => Token::If,
            "else" => Token::Else,
            "for" => Token::For,
            "in" => Token::In,
            "is" => Token::Is,
            "lambda" => Token::Lambda,
            // Booleans are numbers in arithmetic.
            "True" => Token::Num(1.0),
            "False" => Token::Num(0.0),
            _ => Token::Ident(s.into_owned()),
        }
    }
}
