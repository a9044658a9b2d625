//! Normalized syntax shared by every front end.
//!
//! Parsers disagree on node shapes (Flow's pre-0.33 `defaults` arrays versus
//! `AssignmentPattern`, `ExportDeclaration` versus `ExportNamedDeclaration`,
//! tree-sitter's concrete syntax...). Each front end lowers into these types so
//! the outline builder only ever sees one shape per construct.

use crate::outline::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Function(Function),
    Class(Class),
    Variables(Variables),
    Expression { expr: Expr, span: Span },
    TypeAlias { name: String, span: Span },
    Export { declaration: Box<Stmt>, default: bool, span: Span },
    Other,
}

/// Function declarations, function expressions and arrows alike.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Param>,
    /// Statements of a block body; empty for expression-bodied arrows.
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A parameter pattern. Default values are not represented.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Name(String),
    Object(Vec<Param>),
    Array(Vec<Param>),
    Rest(Box<Param>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Option<String>,
    pub members: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field { name: String, value: Option<Expr>, span: Span },
    Method { name: String, params: Vec<Param>, span: Span },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn from_keyword(keyword: &str) -> Option<VarKind> {
        match keyword {
            "var" => Some(VarKind::Var),
            "let" => Some(VarKind::Let),
            "const" => Some(VarKind::Const),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variables {
    pub kind: VarKind,
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    /// `None` when the binding is a destructuring pattern.
    pub name: Option<String>,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Function(Function),
    Call { callee: Box<Expr>, arguments: Vec<Expr> },
    Assign { target: Box<Expr>, value: Box<Expr>, span: Span },
    Member { object: Box<Expr>, property: Option<String> },
    Ident(String),
    Str(String),
    Object(Vec<Property>),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// `None` for computed keys.
    pub name: Option<String>,
    pub value: Expr,
    pub shorthand: bool,
    pub span: Span,
}

impl Expr {
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Expr::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            _ => None,
        }
    }
}
