//! Kotlin type expression syntax.
//!
//! Parses the type strings of a manifest (`List<out T>?`,
//! `suspend String.(id: Int) -> Unit`, `((A) -> B)?`) into a [`TypeExpr`]
//! tree. Names are not resolved here.

use std::fmt;

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Named(NamedType),
    Function(FunctionTypeExpr),
}

/// A (possibly qualified) class or type parameter name with arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    /// Name as written, dotted when qualified (`kotlin.collections.List`).
    pub name: String,
    pub arguments: Vec<TypeArg>,
    pub nullable: bool,
}

/// A function type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionTypeExpr {
    pub receiver: Option<Box<TypeExpr>>,
    pub parameters: Vec<TypeExpr>,
    pub returns: Box<TypeExpr>,
    pub suspend: bool,
    pub nullable: bool,
}

/// Use-site projection of a generic argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    None,
    Out,
    In,
}

/// A generic argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArg {
    Star,
    Type { projection: Projection, ty: TypeExpr },
}

impl TypeExpr {
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Named(n) => n.nullable,
            Self::Function(f) => f.nullable,
        }
    }

    fn set_nullable(&mut self) {
        match self {
            Self::Named(n) => n.nullable = true,
            Self::Function(f) => f.nullable = true,
        }
    }

    /// Every name referenced by this expression, outermost first.
    pub fn names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Named(n) => {
                out.push(&n.name);
                for arg in &n.arguments {
                    if let TypeArg::Type { ty, .. } = arg {
                        ty.collect_names(out);
                    }
                }
            }
            Self::Function(f) => {
                if let Some(receiver) = &f.receiver {
                    receiver.collect_names(out);
                }
                for p in &f.parameters {
                    p.collect_names(out);
                }
                f.returns.collect_names(out);
            }
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => {
                f.write_str(&n.name)?;
                if !n.arguments.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in n.arguments.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        match arg {
                            TypeArg::Star => f.write_str("*")?,
                            TypeArg::Type { projection, ty } => {
                                match projection {
                                    Projection::None => {}
                                    Projection::Out => f.write_str("out ")?,
                                    Projection::In => f.write_str("in ")?,
                                }
                                write!(f, "{ty}")?;
                            }
                        }
                    }
                    f.write_str(">")?;
                }
                if n.nullable {
                    f.write_str("?")?;
                }
                Ok(())
            }
            Self::Function(func) => {
                if func.nullable {
                    f.write_str("(")?;
                }
                if func.suspend {
                    f.write_str("suspend ")?;
                }
                if let Some(receiver) = &func.receiver {
                    write!(f, "{receiver}.")?;
                }
                f.write_str("(")?;
                for (i, p) in func.parameters.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> {}", func.returns)?;
                if func.nullable {
                    f.write_str(")?")?;
                }
                Ok(())
            }
        }
    }
}

/// A syntax error with its byte offset in the parsed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for SyntaxError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Dot,
    Comma,
    Colon,
    Lt,
    Gt,
    LParen,
    RParen,
    Arrow,
    Question,
    Star,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("'{s}'"),
            Token::Dot => "'.'".into(),
            Token::Comma => "','".into(),
            Token::Colon => "':'".into(),
            Token::Lt => "'<'".into(),
            Token::Gt => "'>'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Arrow => "'->'".into(),
            Token::Question => "'?'".into(),
            Token::Star => "'*'".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '.' => Token::Dot,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '<' => Token::Lt,
            '>' => Token::Gt,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '?' => Token::Question,
            '*' => Token::Star,
            '-' => match chars.next() {
                Some((_, '>')) => Token::Arrow,
                _ => {
                    return Err(SyntaxError {
                        message: "expected '->'".into(),
                        offset: pos,
                    });
                }
            },
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_alphanumeric() || next == '_' {
                        ident.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                Token::Ident(ident)
            }
            other => {
                return Err(SyntaxError {
                    message: format!("unexpected character '{other}'"),
                    offset: pos,
                });
            }
        };
        tokens.push((token, pos));
    }

    Ok(tokens)
}

/// Deepest type nesting the parser accepts.
pub const MAX_DEPTH: usize = 64;

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(_, o)| *o)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, expected: &str) -> SyntaxError {
        let found = match self.peek() {
            Some(t) => t.describe(),
            None => "end of input".into(),
        };
        SyntaxError {
            message: format!("expected {expected}, found {found}"),
            offset: self.offset(),
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), SyntaxError> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(self.error(&token.describe()))
        }
    }

    fn ident(&mut self) -> Result<String, SyntaxError> {
        match self.peek() {
            Some(Token::Ident(_)) => match self.bump() {
                Some(Token::Ident(name)) => Ok(name),
                _ => Err(self.error("a name")),
            },
            _ => Err(self.error("a name")),
        }
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Ident(s)) if s == keyword)
    }

    fn parse_type(&mut self) -> Result<TypeExpr, SyntaxError> {
        if self.depth >= MAX_DEPTH {
            return Err(SyntaxError {
                message: format!("type nested deeper than {MAX_DEPTH} levels"),
                offset: self.offset(),
            });
        }
        self.depth += 1;
        let ty = self.parse_type_inner();
        self.depth -= 1;
        ty
    }

    fn parse_type_inner(&mut self) -> Result<TypeExpr, SyntaxError> {
        if self.is_keyword("suspend")
            && matches!(self.peek_at(1), Some(Token::LParen) | Some(Token::Ident(_)))
        {
            self.pos += 1;
            let receiver = if self.peek() == Some(&Token::LParen) {
                None
            } else {
                Some(self.parse_receiver()?)
            };
            return self.parse_function_rest(receiver, true);
        }

        if self.peek() == Some(&Token::LParen) {
            return self.parse_parenthesized();
        }

        let named = self.parse_named()?;
        if self.peek() == Some(&Token::Dot) && self.peek_at(1) == Some(&Token::LParen) {
            self.pos += 1;
            return self.parse_function_rest(Some(Box::new(named)), false);
        }
        Ok(named)
    }

    /// A receiver type followed by `.`, as in `String.(Int) -> Unit`.
    fn parse_receiver(&mut self) -> Result<Box<TypeExpr>, SyntaxError> {
        let receiver = self.parse_named()?;
        self.expect(Token::Dot)?;
        Ok(Box::new(receiver))
    }

    /// Either a function parameter list or a grouping such as `((A) -> B)?`.
    fn parse_parenthesized(&mut self) -> Result<TypeExpr, SyntaxError> {
        let mut items = self.parse_parameter_list()?;

        if self.peek() == Some(&Token::Arrow) {
            return self.parse_function_tail(None, items, false);
        }

        if items.len() != 1 {
            return Err(self.error("'->'"));
        }
        let mut grouped = items.remove(0);
        if self.eat(&Token::Question) {
            grouped.set_nullable();
        }
        while self.eat(&Token::Question) {}
        Ok(grouped)
    }

    fn parse_parameter_list(&mut self) -> Result<Vec<TypeExpr>, SyntaxError> {
        self.expect(Token::LParen)?;
        let mut params = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(params);
        }
        loop {
            // Optional parameter name: `(id: String) -> Unit`
            if matches!(self.peek(), Some(Token::Ident(_))) && self.peek_at(1) == Some(&Token::Colon) {
                self.pos += 2;
            }
            params.push(self.parse_type()?);
            if self.eat(&Token::Comma) {
                continue;
            }
            self.expect(Token::RParen)?;
            return Ok(params);
        }
    }

    fn parse_function_rest(
        &mut self,
        receiver: Option<Box<TypeExpr>>,
        suspend: bool,
    ) -> Result<TypeExpr, SyntaxError> {
        let parameters = self.parse_parameter_list()?;
        self.parse_function_tail(receiver, parameters, suspend)
    }

    fn parse_function_tail(
        &mut self,
        receiver: Option<Box<TypeExpr>>,
        parameters: Vec<TypeExpr>,
        suspend: bool,
    ) -> Result<TypeExpr, SyntaxError> {
        self.expect(Token::Arrow)?;
        let returns = Box::new(self.parse_type()?);
        Ok(TypeExpr::Function(FunctionTypeExpr {
            receiver,
            parameters,
            returns,
            suspend,
            nullable: false,
        }))
    }

    fn parse_named(&mut self) -> Result<TypeExpr, SyntaxError> {
        let mut name = self.ident()?;
        while self.peek() == Some(&Token::Dot) && matches!(self.peek_at(1), Some(Token::Ident(_))) {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.ident()?);
        }

        let mut arguments = Vec::new();
        if self.eat(&Token::Lt) {
            loop {
                arguments.push(self.parse_argument()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(Token::Gt)?;
                break;
            }
        }

        let nullable = self.eat(&Token::Question);
        Ok(TypeExpr::Named(NamedType {
            name,
            arguments,
            nullable,
        }))
    }

    fn parse_argument(&mut self) -> Result<TypeArg, SyntaxError> {
        if self.eat(&Token::Star) {
            return Ok(TypeArg::Star);
        }
        let projection = match self.peek() {
            Some(Token::Ident(s)) if s == "out" => Projection::Out,
            Some(Token::Ident(s)) if s == "in" => Projection::In,
            _ => Projection::None,
        };
        if projection != Projection::None {
            let keyword = if projection == Projection::Out { "out" } else { "in" };
            self.pos += 1;
            if !matches!(self.peek(), Some(Token::Ident(_)) | Some(Token::LParen)) {
                return Err(self.error(&format!("a type after '{keyword}'")));
            }
        }
        let ty = self.parse_type()?;
        Ok(TypeArg::Type { projection, ty })
    }
}

/// Parse a Kotlin type expression.
pub fn parse_type(input: &str) -> Result<TypeExpr, SyntaxError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
        depth: 0,
    };
    let ty = parser.parse_type()?;
    if parser.peek().is_some() {
        return Err(parser.error("end of type"));
    }
    Ok(ty)
}
