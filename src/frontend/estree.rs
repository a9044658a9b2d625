//! ESTree JSON front end.
//!
//! Accepts the AST printed by `flow ast` (and compatible parsers). Node tags
//! outside the closed set below deserialize to [`Node::Other`] and are ignored.
//!
//! Known version differences:
//! - Flow before 0.33 keeps parameter defaults in a parallel `defaults` array;
//!   later versions wrap the parameter in an `AssignmentPattern`.
//! - Old Flow emits `ExportDeclaration { default }` where ESTree has
//!   `ExportNamedDeclaration` / `ExportDefaultDeclaration`.
//! - Class fields are `ClassProperty` or `PropertyDefinition`, rest
//!   parameters a function-level `rest` field or `RestElement`.

use crate::error::OutlineError;
use crate::outline::Position;
use crate::syntax::{
    Class, Declarator, Expr, Function, Member, Param, Program, Property, Span, Stmt, VarKind, Variables,
};
use serde::de::Error as _;
use serde::Deserialize;
use tracing::trace;

#[derive(Debug, Clone, Copy, Deserialize)]
struct Loc {
    start: LocPos,
    end: LocPos,
}

/// ESTree positions have 1-based lines and 0-based columns.
#[derive(Debug, Clone, Copy, Deserialize)]
struct LocPos {
    line: usize,
    column: usize,
}

impl From<Loc> for Span {
    fn from(loc: Loc) -> Self {
        Span::new(loc.start.into(), loc.end.into())
    }
}

impl From<LocPos> for Position {
    fn from(pos: LocPos) -> Self {
        Position::new(pos.line.saturating_sub(1), pos.column)
    }
}

#[derive(Debug, Deserialize)]
struct FunctionNode {
    loc: Loc,
    #[serde(default)]
    id: Option<Box<Node>>,
    #[serde(default)]
    params: Vec<Node>,
    #[serde(default)]
    rest: Option<Box<Node>>,
    #[serde(default)]
    body: Option<Box<Node>>,
}

#[derive(Debug, Deserialize)]
struct ClassNode {
    loc: Loc,
    #[serde(default)]
    id: Option<Box<Node>>,
    body: Box<Node>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Node {
    Program {
        #[serde(default)]
        body: Vec<Node>,
    },
    FunctionDeclaration(FunctionNode),
    FunctionExpression(FunctionNode),
    ArrowFunctionExpression(FunctionNode),
    ClassDeclaration(ClassNode),
    ClassBody {
        #[serde(default)]
        body: Vec<Node>,
    },
    #[serde(alias = "PropertyDefinition")]
    ClassProperty {
        loc: Loc,
        key: Box<Node>,
        #[serde(default)]
        value: Option<Box<Node>>,
        #[serde(default)]
        computed: bool,
    },
    MethodDefinition {
        loc: Loc,
        key: Box<Node>,
        value: Box<Node>,
        #[serde(default)]
        computed: bool,
    },
    ExportDeclaration {
        loc: Loc,
        #[serde(default)]
        declaration: Option<Box<Node>>,
        #[serde(default)]
        default: bool,
    },
    ExportNamedDeclaration {
        loc: Loc,
        #[serde(default)]
        declaration: Option<Box<Node>>,
    },
    ExportDefaultDeclaration {
        loc: Loc,
        declaration: Box<Node>,
    },
    ExpressionStatement {
        loc: Loc,
        expression: Box<Node>,
    },
    VariableDeclaration {
        loc: Loc,
        kind: String,
        #[serde(default)]
        declarations: Vec<Node>,
    },
    VariableDeclarator {
        loc: Loc,
        id: Box<Node>,
        #[serde(default)]
        init: Option<Box<Node>>,
    },
    #[serde(alias = "TSTypeAliasDeclaration")]
    TypeAlias {
        loc: Loc,
        id: Box<Node>,
    },
    BlockStatement {
        #[serde(default)]
        body: Vec<Node>,
    },
    CallExpression {
        callee: Box<Node>,
        #[serde(default)]
        arguments: Vec<Node>,
    },
    AssignmentExpression {
        loc: Loc,
        left: Box<Node>,
        right: Box<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        #[serde(default)]
        computed: bool,
    },
    Identifier {
        name: String,
    },
    #[serde(alias = "StringLiteral")]
    Literal {
        #[serde(default)]
        value: serde_json::Value,
    },
    TemplateLiteral {
        #[serde(default)]
        quasis: Vec<Node>,
        #[serde(default)]
        expressions: Vec<Node>,
    },
    TemplateElement {
        value: TemplateValue,
    },
    ObjectExpression {
        #[serde(default)]
        properties: Vec<Node>,
    },
    #[serde(alias = "ObjectProperty")]
    Property {
        loc: Loc,
        key: Box<Node>,
        value: Box<Node>,
        #[serde(default)]
        shorthand: bool,
        #[serde(default)]
        computed: bool,
    },
    ObjectPattern {
        #[serde(default)]
        properties: Vec<Node>,
    },
    ArrayPattern {
        #[serde(default)]
        elements: Vec<Option<Node>>,
    },
    AssignmentPattern {
        left: Box<Node>,
    },
    #[serde(alias = "RestProperty")]
    RestElement {
        argument: Box<Node>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TemplateValue {
    #[serde(default)]
    cooked: Option<String>,
    #[serde(default)]
    raw: Option<String>,
}

/// JSON nesting (objects plus arrays) accepted before deserializing. Decoding,
/// lowering and building all recurse per level, so deeper input is refused.
pub const MAX_NESTING: usize = 512;

/// Parse an ESTree `Program` from JSON and lower it.
pub fn parse_program(json: &str) -> Result<Program, OutlineError> {
    check_nesting(json)?;
    let mut deserializer = serde_json::Deserializer::from_str(json);
    // Real-world ASTs nest far deeper than serde_json's default limit of 128.
    deserializer.disable_recursion_limit();
    let root = Node::deserialize(&mut deserializer).map_err(OutlineError::Ast)?;
    deserializer.end().map_err(OutlineError::Ast)?;

    match root {
        Node::Program { body } => Ok(Program { body: lower_statements(&body) }),
        _ => Err(OutlineError::ParseError(
            "ESTree root node is not a Program".to_string(),
        )),
    }
}

/// Reject input nested deeper than [`MAX_NESTING`] without recursing.
fn check_nesting(json: &str) -> Result<(), OutlineError> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return Err(OutlineError::Ast(serde_json::Error::custom(format!(
                        "nesting exceeds {} levels",
                        MAX_NESTING
                    ))));
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    Ok(())
}

fn lower_statements(nodes: &[Node]) -> Vec<Stmt> {
    nodes.iter().map(lower_statement).collect()
}

fn lower_statement(node: &Node) -> Stmt {
    match node {
        Node::FunctionDeclaration(function) => Stmt::Function(lower_function(function)),
        Node::ClassDeclaration(class) => Stmt::Class(lower_class(class)),
        Node::VariableDeclaration { loc, kind, declarations } => match VarKind::from_keyword(kind) {
            Some(kind) => Stmt::Variables(Variables {
                kind,
                declarators: declarations.iter().filter_map(lower_declarator).collect(),
                span: (*loc).into(),
            }),
            None => Stmt::Other,
        },
        Node::ExpressionStatement { loc, expression } => Stmt::Expression {
            expr: lower_expr(expression),
            span: (*loc).into(),
        },
        Node::TypeAlias { loc, id } => match identifier(id) {
            Some(name) => Stmt::TypeAlias { name, span: (*loc).into() },
            None => Stmt::Other,
        },
        Node::ExportDeclaration { loc, declaration: Some(declaration), default } => {
            export(declaration, *default, *loc)
        }
        Node::ExportNamedDeclaration { loc, declaration: Some(declaration) } => {
            export(declaration, false, *loc)
        }
        Node::ExportDefaultDeclaration { loc, declaration } => export(declaration, true, *loc),
        _ => Stmt::Other,
    }
}

fn export(declaration: &Node, default: bool, loc: Loc) -> Stmt {
    // `export default function () {}` carries a FunctionExpression in some parsers.
    let declaration = match declaration {
        Node::FunctionExpression(function) | Node::ArrowFunctionExpression(function) => {
            Stmt::Function(lower_function(function))
        }
        other => lower_statement(other),
    };
    Stmt::Export {
        declaration: Box::new(declaration),
        default,
        span: loc.into(),
    }
}

fn lower_function(function: &FunctionNode) -> Function {
    let mut params: Vec<Param> = function.params.iter().filter_map(lower_param).collect();
    if let Some(rest) = function.rest.as_deref().and_then(lower_param) {
        params.push(Param::Rest(Box::new(rest)));
    }
    let body = match function.body.as_deref() {
        Some(Node::BlockStatement { body }) => lower_statements(body),
        _ => Vec::new(),
    };
    Function {
        name: function.id.as_deref().and_then(identifier),
        params,
        body,
        span: function.loc.into(),
    }
}

fn lower_param(node: &Node) -> Option<Param> {
    match node {
        Node::Identifier { name } => Some(Param::Name(name.clone())),
        Node::AssignmentPattern { left } => lower_param(left),
        Node::ObjectPattern { properties } => Some(Param::Object(
            properties.iter().filter_map(lower_param).collect(),
        )),
        // Inside an object pattern the bound pattern is the property value.
        Node::Property { value, .. } => lower_param(value),
        Node::ArrayPattern { elements } => Some(Param::Array(
            elements.iter().flatten().filter_map(lower_param).collect(),
        )),
        Node::RestElement { argument } => Some(Param::Rest(Box::new(lower_param(argument)?))),
        _ => {
            trace!("skipping unrecognized parameter pattern");
            None
        }
    }
}

fn lower_class(class: &ClassNode) -> Class {
    let members = match class.body.as_ref() {
        Node::ClassBody { body } => body.iter().filter_map(lower_member).collect(),
        _ => Vec::new(),
    };
    Class {
        name: class.id.as_deref().and_then(identifier),
        members,
        span: class.loc.into(),
    }
}

fn lower_member(node: &Node) -> Option<Member> {
    match node {
        Node::ClassProperty { loc, key, value, computed: false } => Some(Member::Field {
            name: property_key(key)?,
            value: value.as_deref().map(lower_expr),
            span: (*loc).into(),
        }),
        Node::MethodDefinition { loc, key, value, computed: false } => {
            let params = match value.as_ref() {
                Node::FunctionExpression(function) => lower_function(function).params,
                _ => Vec::new(),
            };
            Some(Member::Method {
                name: property_key(key)?,
                params,
                span: (*loc).into(),
            })
        }
        _ => None,
    }
}

fn lower_declarator(node: &Node) -> Option<Declarator> {
    match node {
        Node::VariableDeclarator { loc, id, init } => Some(Declarator {
            name: identifier(id),
            init: init.as_deref().map(lower_expr),
            span: (*loc).into(),
        }),
        _ => None,
    }
}

fn lower_expr(node: &Node) -> Expr {
    match node {
        Node::FunctionExpression(function) | Node::ArrowFunctionExpression(function) => {
            Expr::Function(lower_function(function))
        }
        Node::CallExpression { callee, arguments } => Expr::Call {
            callee: Box::new(lower_expr(callee)),
            arguments: arguments.iter().map(lower_expr).collect(),
        },
        Node::AssignmentExpression { loc, left, right } => Expr::Assign {
            target: Box::new(lower_expr(left)),
            value: Box::new(lower_expr(right)),
            span: (*loc).into(),
        },
        Node::MemberExpression { object, property, computed } => Expr::Member {
            object: Box::new(lower_expr(object)),
            property: if *computed { None } else { identifier(property) },
        },
        Node::Identifier { name } => Expr::Ident(name.clone()),
        Node::Literal { value: serde_json::Value::String(value) } => Expr::Str(value.clone()),
        Node::TemplateLiteral { quasis, expressions } if expressions.is_empty() => {
            match quasis.as_slice() {
                [Node::TemplateElement { value }] => value
                    .cooked
                    .clone()
                    .or_else(|| value.raw.clone())
                    .map(Expr::Str)
                    .unwrap_or(Expr::Other),
                _ => Expr::Other,
            }
        }
        Node::ObjectExpression { properties } => {
            Expr::Object(properties.iter().filter_map(lower_property).collect())
        }
        _ => Expr::Other,
    }
}

fn lower_property(node: &Node) -> Option<Property> {
    match node {
        Node::Property { loc, key, value, shorthand, computed } => Some(Property {
            name: if *computed { None } else { property_key(key) },
            value: lower_expr(value),
            shorthand: *shorthand,
            span: (*loc).into(),
        }),
        _ => None,
    }
}

fn identifier(node: &Node) -> Option<String> {
    match node {
        Node::Identifier { name } => Some(name.clone()),
        _ => None,
    }
}

/// Keys may be identifiers or string literals: `{foo: 1}` and `{'foo': 1}`.
fn property_key(node: &Node) -> Option<String> {
    match node {
        Node::Identifier { name } => Some(name.clone()),
        Node::Literal { value: serde_json::Value::String(value) } => Some(value.clone()),
        _ => None,
    }
}
