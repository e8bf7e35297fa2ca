use std::mem;

use ordered_float::OrderedFloat;

use crate::ast::*;
use crate::scanner::{Keyword, Location, Scanner, Symbol, SyntaxError, Token, TokenKind, TokenTag};

// Expression parsing climbs down from here; see binary_op_at for which
// operators live on which level (7 and 8 are vacant).
const TOP_PRECEDENCE: u8 = 8;

/// Recursive-descent parser with exactly two tokens of lookahead. Yields one
/// statement per call; the first grammar violation aborts the whole parse.
pub struct Parser<'src> {
    scanner: Scanner<'src>,
    current: Token,
    next: Token,
}

impl<'src> Parser<'src> {
    pub fn new(mut scanner: Scanner<'src>) -> Result<Parser<'src>, SyntaxError> {
        let current = scanner.next_token()?;
        let next = scanner.next_token()?;
        Ok(Parser {
            scanner,
            current,
            next,
        })
    }

    /// Parses the next top-level statement, or `None` once input is
    /// exhausted.
    pub fn parse_statement(&mut self) -> Result<Option<Stmt>, SyntaxError> {
        if self.current.kind == TokenKind::Eof {
            return Ok(None);
        }

        // `name = value` is an assignment exactly when the second lookahead
        // token is `=`; no backtracking needed to tell it from an
        // expression statement.
        if self.next.kind == TokenKind::Symbol(Symbol::Equal) {
            return self.assignment().map(Some);
        }

        let statement = match self.current.kind {
            TokenKind::Keyword(Keyword::If) => self.if_statement(false)?,
            TokenKind::Keyword(Keyword::For) => self.for_statement()?,
            TokenKind::Keyword(Keyword::While) => self.while_statement()?,
            TokenKind::Keyword(Keyword::Def) => self.function_definition()?,
            TokenKind::Keyword(Keyword::Return) => self.return_statement()?,
            TokenKind::Keyword(Keyword::Break) => self.break_statement()?,
            _ => self.expression_statement()?,
        };
        Ok(Some(statement))
    }

    fn advance(&mut self) -> Result<Token, SyntaxError> {
        let next = self.scanner.next_token()?;
        let current = mem::replace(&mut self.next, next);
        Ok(mem::replace(&mut self.current, current))
    }

    fn consume(&mut self, expected: TokenTag) -> Result<Token, SyntaxError> {
        if self.current.kind.tag() == expected {
            self.advance()
        } else {
            Err(SyntaxError::new(
                format!("expected {}, got {}", expected, self.current.kind.tag()),
                self.current.loc.clone(),
            ))
        }
    }

    fn consume_symbol(&mut self, symbol: Symbol) -> Result<Token, SyntaxError> {
        self.consume(TokenTag::Symbol(symbol))
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<Token, SyntaxError> {
        self.consume(TokenTag::Keyword(keyword))
    }

    fn consume_identifier(&mut self) -> Result<(String, Location), SyntaxError> {
        let token = self.consume(TokenTag::Identifier)?;
        match token.kind {
            TokenKind::Identifier(name) => Ok((name, token.loc)),
            _ => unreachable!("consume(Identifier) returned a non-identifier"),
        }
    }

    fn check_symbol(&self, symbol: Symbol) -> bool {
        self.current.kind == TokenKind::Symbol(symbol)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(keyword)
    }

    /// Statements up to the END or ELSE that closes the enclosing
    /// construct; the caller consumes that terminator itself.
    fn block(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.current.loc.clone();
        let mut statements = Vec::new();
        while !self.check_keyword(Keyword::End) && !self.check_keyword(Keyword::Else) {
            match self.parse_statement()? {
                Some(statement) => statements.push(statement),
                None => {
                    return Err(SyntaxError::new(
                        "expected a statement",
                        self.current.loc.clone(),
                    ));
                }
            }
        }
        Ok(Stmt {
            loc,
            kind: StmtKind::Block(statements),
        })
    }

    fn assignment(&mut self) -> Result<Stmt, SyntaxError> {
        let (name, loc) = self.consume_identifier()?;
        self.consume_symbol(Symbol::Equal)?;
        let value = self.expression()?;
        Ok(Stmt {
            loc,
            kind: StmtKind::Assignment { name, value },
        })
    }

    // An ELSE IF arm parses as a nested If that leaves the single END IF
    // for the outermost If of the chain to consume.
    fn if_statement(&mut self, is_elif: bool) -> Result<Stmt, SyntaxError> {
        let loc = self.current.loc.clone();
        if is_elif {
            self.consume_keyword(Keyword::Else)?;
        }
        self.consume_keyword(Keyword::If)?;
        let condition = self.expression()?;
        self.consume_keyword(Keyword::Then)?;
        let then = self.block()?;

        let mut or_else = None;
        if self.check_keyword(Keyword::Else) {
            if self.next.kind == TokenKind::Keyword(Keyword::If) {
                or_else = Some(self.if_statement(true)?);
            } else {
                self.consume_keyword(Keyword::Else)?;
                or_else = Some(self.block()?);
            }
        }

        if !is_elif {
            self.consume_keyword(Keyword::End)?;
            self.consume_keyword(Keyword::If)?;
        }

        Ok(Stmt {
            loc,
            kind: StmtKind::If {
                condition,
                then: Box::new(then),
                or_else: or_else.map(Box::new),
            },
        })
    }

    fn for_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.current.loc.clone();
        self.consume_keyword(Keyword::For)?;
        let (name, _) = self.consume_identifier()?;
        self.consume_symbol(Symbol::Equal)?;
        let start = self.expression()?;
        self.consume_keyword(Keyword::To)?;
        let end = self.expression()?;
        self.consume_keyword(Keyword::Then)?;
        let body = self.block()?;
        self.consume_keyword(Keyword::End)?;
        self.consume_keyword(Keyword::For)?;
        Ok(Stmt {
            loc,
            kind: StmtKind::ForRange {
                name,
                start,
                end,
                body: Box::new(body),
            },
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.current.loc.clone();
        self.consume_keyword(Keyword::While)?;
        let condition = self.expression()?;
        self.consume_keyword(Keyword::Then)?;
        let body = self.block()?;
        self.consume_keyword(Keyword::End)?;
        self.consume_keyword(Keyword::While)?;
        Ok(Stmt {
            loc,
            kind: StmtKind::While {
                condition,
                body: Box::new(body),
            },
        })
    }

    fn function_definition(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.current.loc.clone();
        self.consume_keyword(Keyword::Def)?;
        let (name, _) = self.consume_identifier()?;
        self.consume_symbol(Symbol::LeftParen)?;
        let mut parameters = Vec::new();
        if !self.check_symbol(Symbol::RightParen) {
            parameters.push(self.consume_identifier()?.0);
            while self.check_symbol(Symbol::Comma) {
                self.advance()?;
                parameters.push(self.consume_identifier()?.0);
            }
        }
        self.consume_symbol(Symbol::RightParen)?;
        self.consume_keyword(Keyword::Then)?;
        let body = self.block()?;
        self.consume_keyword(Keyword::End)?;
        self.consume_keyword(Keyword::Def)?;
        Ok(Stmt {
            loc,
            kind: StmtKind::FunctionDef {
                name,
                parameters,
                body: Box::new(body),
            },
        })
    }

    fn return_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.current.loc.clone();
        self.consume_keyword(Keyword::Return)?;
        let value = self.expression()?;
        Ok(Stmt {
            loc,
            kind: StmtKind::Return(value),
        })
    }

    fn break_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.current.loc.clone();
        self.consume_keyword(Keyword::Break)?;
        Ok(Stmt {
            loc,
            kind: StmtKind::Break,
        })
    }

    fn expression_statement(&mut self) -> Result<Stmt, SyntaxError> {
        let loc = self.current.loc.clone();
        let expr = self.expression()?;
        Ok(Stmt {
            loc,
            kind: StmtKind::Expression(expr),
        })
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        self.parse_precedence(TOP_PRECEDENCE)
    }

    /// Precedence climbing: each level parses the tighter level first, then
    /// folds its own operators in left-associatively.
    fn parse_precedence(&mut self, level: u8) -> Result<Expr, SyntaxError> {
        let mut node = if level == 1 {
            self.unary()?
        } else {
            self.parse_precedence(level - 1)?
        };
        while let Some(op) = self.binary_op_at(level) {
            let loc = self.current.loc.clone();
            self.advance()?;
            let right = self.parse_precedence(level - 1)?;
            node = Expr {
                loc,
                kind: ExprKind::Binary {
                    left: Box::new(node),
                    op,
                    right: Box::new(right),
                },
            };
        }
        Ok(node)
    }

    fn binary_op_at(&self, level: u8) -> Option<BinaryOp> {
        let TokenKind::Symbol(symbol) = self.current.kind else {
            return None;
        };
        let op = match (level, symbol) {
            (2, Symbol::Star) => BinaryOp::Multiply,
            (2, Symbol::Slash) => BinaryOp::Divide,
            (3, Symbol::Plus) => BinaryOp::Add,
            (3, Symbol::Minus) => BinaryOp::Subtract,
            (4, Symbol::EqualEqual) => BinaryOp::Equal,
            (4, Symbol::BangEqual) => BinaryOp::NotEqual,
            (4, Symbol::Less) => BinaryOp::Less,
            (4, Symbol::LessEqual) => BinaryOp::LessEqual,
            (4, Symbol::Greater) => BinaryOp::Greater,
            (4, Symbol::GreaterEqual) => BinaryOp::GreaterEqual,
            (5, Symbol::AmpAmp) => BinaryOp::And,
            (6, Symbol::PipePipe) => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        let op = match self.current.kind {
            TokenKind::Symbol(Symbol::Minus) => Some(UnaryOp::Negative),
            TokenKind::Symbol(Symbol::Bang) => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            let loc = self.current.loc.clone();
            self.advance()?;
            let operand = self.unary()?;
            return Ok(Expr {
                loc,
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
            });
        }

        if self.check_symbol(Symbol::LeftParen) {
            self.advance()?;
            let inner = self.expression()?;
            if !self.check_symbol(Symbol::RightParen) {
                return Err(SyntaxError::new(
                    "expected a right parenthesis",
                    self.current.loc.clone(),
                ));
            }
            self.advance()?;
            return Ok(inner);
        }

        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, SyntaxError> {
        match self.current.kind {
            TokenKind::Number(_)
            | TokenKind::Str(_)
            | TokenKind::Boolean(_)
            | TokenKind::Identifier(_) => {}
            _ => {
                return Err(SyntaxError::new(
                    format!("unexpected {}", self.current.kind.tag()),
                    self.current.loc.clone(),
                ));
            }
        }
        let token = self.advance()?;
        let kind = match token.kind {
            TokenKind::Number(number) => ExprKind::Number(OrderedFloat(number)),
            TokenKind::Str(text) => ExprKind::Str(text),
            TokenKind::Boolean(value) => ExprKind::Boolean(value),
            TokenKind::Identifier(name) => {
                // An identifier followed by `(` is a call.
                if self.check_symbol(Symbol::LeftParen) {
                    return self.call_expression(name, token.loc);
                }
                ExprKind::Identifier(name)
            }
            _ => unreachable!("atom() admitted a non-atom token"),
        };
        Ok(Expr {
            loc: token.loc,
            kind,
        })
    }

    fn call_expression(&mut self, name: String, loc: Location) -> Result<Expr, SyntaxError> {
        self.consume_symbol(Symbol::LeftParen)?;
        let mut arguments = Vec::new();
        // Arguments run until the closing paren; a comma after an argument
        // is consumed when present, which also tolerates a trailing comma.
        while !self.check_symbol(Symbol::RightParen) {
            arguments.push(self.expression()?);
            if self.check_symbol(Symbol::Comma) {
                self.advance()?;
            }
        }
        self.consume_symbol(Symbol::RightParen)?;
        Ok(Expr {
            loc,
            kind: ExprKind::Call { name, arguments },
        })
    }
}
