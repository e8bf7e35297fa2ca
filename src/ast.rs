use std::fmt::{self, Display, Formatter};

use ordered_float::OrderedFloat;

use crate::scanner::Location;

/// A statement with the location it started at. Locations are carried for
/// diagnostics only; execution never consults them.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub loc: Location,
    pub kind: StmtKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Block(Vec<Stmt>),
    Assignment {
        name: String,
        value: Expr,
    },
    If {
        condition: Expr,
        then: Box<Stmt>,
        or_else: Option<Box<Stmt>>,
    },
    ForRange {
        name: String,
        start: Expr,
        end: Expr,
        body: Box<Stmt>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Break,
    Expression(Expr),
    FunctionDef {
        name: String,
        parameters: Vec<String>,
        body: Box<Stmt>,
    },
    Return(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub loc: Location,
    pub kind: ExprKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Number(OrderedFloat<f64>),
    /// Raw literal text; interpolation happens at evaluation time.
    Str(String),
    Boolean(bool),
    Identifier(String),
    Call {
        name: String,
        arguments: Vec<Expr>,
    },
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(OrderedFloat(n)) => write!(f, "{}", n),
            ExprKind::Str(s) => f.write_str(s),
            ExprKind::Boolean(b) => write!(f, "{}", b),
            ExprKind::Identifier(name) => write!(f, "(ident {})", name),
            ExprKind::Unary { op, operand } => write!(f, "({} {})", op, operand),
            ExprKind::Binary { left, op, right } => write!(f, "({} {} {})", op, left, right),
            ExprKind::Call { name, arguments } => {
                write!(f, "(call {}", name)?;
                for argument in arguments {
                    write!(f, " {}", argument)?;
                }
                f.write_str(")")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Add => f.write_str("+"),
            BinaryOp::Subtract => f.write_str("-"),
            BinaryOp::Multiply => f.write_str("*"),
            BinaryOp::Divide => f.write_str("/"),
            BinaryOp::Less => f.write_str("<"),
            BinaryOp::LessEqual => f.write_str("<="),
            BinaryOp::Greater => f.write_str(">"),
            BinaryOp::GreaterEqual => f.write_str(">="),
            BinaryOp::Equal => f.write_str("=="),
            BinaryOp::NotEqual => f.write_str("!="),
            BinaryOp::And => f.write_str("&&"),
            BinaryOp::Or => f.write_str("||"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negative,
    Not,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Negative => f.write_str("-"),
            UnaryOp::Not => f.write_str("!"),
        }
    }
}
