//! Folds a normalized [`Program`] into outline trees.

use crate::outline::{
    class_name, keyword, method, param, plain, string, type_name, whitespace, OutlineNode, Token,
};
use crate::syntax::{Class, Declarator, Expr, Member, Param, Program, Property, Span, Stmt, VarKind, Variables};
use tracing::trace;

/// Callees that open a suite; only these are recognized at the top level.
const SUITE_CALLEES: &[&str] = &["describe", "fdescribe", "ddescribe", "xdescribe"];

/// Callees that declare a single case inside a suite.
const CASE_CALLEES: &[&str] = &["it", "fit", "iit", "pit", "xit", "test", "xtest"];

/// Build the outline of a program, top-level constructs in source order.
pub fn build_outline(program: &Program) -> Vec<OutlineNode> {
    program.body.iter().flat_map(statement_outline).collect()
}

fn statement_outline(stmt: &Stmt) -> Vec<OutlineNode> {
    match stmt {
        Stmt::Function(function) => vec![function_outline(
            function.name.as_deref(),
            &function.params,
            function.span,
        )],
        Stmt::Class(class) => vec![class_outline(class)],
        Stmt::Variables(variables) => variables_outline(variables),
        Stmt::Expression { expr, span } => expression_outline(expr, *span).into_iter().collect(),
        Stmt::TypeAlias { name, span } => vec![node(
            vec![keyword("type"), whitespace(" "), type_name(name)],
            Some(name.as_str()),
            *span,
            Vec::new(),
        )],
        Stmt::Export { declaration, default, span } => export_outline(declaration, *default, *span),
        Stmt::Other => Vec::new(),
    }
}

fn export_outline(declaration: &Stmt, default: bool, span: Span) -> Vec<OutlineNode> {
    let mut nodes = statement_outline(declaration);
    for node in &mut nodes {
        let mut tokens = vec![keyword("export"), whitespace(" ")];
        if default {
            tokens.push(keyword("default"));
            tokens.push(whitespace(" "));
        }
        tokens.append(&mut node.tokenized_text);
        node.tokenized_text = tokens;
    }
    stretch(&mut nodes, span);
    nodes
}

fn function_outline(name: Option<&str>, params: &[Param], span: Span) -> OutlineNode {
    let mut tokens = vec![keyword("function")];
    if let Some(name) = name {
        tokens.push(whitespace(" "));
        tokens.push(method(name));
    }
    tokens.extend(parenthesized(params));
    node(tokens, name, span, Vec::new())
}

fn class_outline(class: &Class) -> OutlineNode {
    let mut tokens = vec![keyword("class")];
    if let Some(name) = &class.name {
        tokens.push(whitespace(" "));
        tokens.push(class_name(name));
    }
    let children = class.members.iter().map(member_outline).collect();
    node(tokens, class.name.as_deref(), class.span, children)
}

fn member_outline(member: &Member) -> OutlineNode {
    match member {
        Member::Field { name, value, span } => {
            let mut tokens = vec![method(name), plain("=")];
            if let Some(function) = value.as_ref().and_then(Expr::as_function) {
                tokens.extend(parenthesized(&function.params));
            }
            node(tokens, Some(name.as_str()), *span, Vec::new())
        }
        Member::Method { name, params, span } => {
            let mut tokens = vec![method(name)];
            tokens.extend(parenthesized(params));
            node(tokens, Some(name.as_str()), *span, Vec::new())
        }
    }
}

fn variables_outline(variables: &Variables) -> Vec<OutlineNode> {
    let mut nodes: Vec<OutlineNode> = variables
        .declarators
        .iter()
        .filter_map(|declarator| declarator_outline(variables.kind, declarator))
        .collect();
    stretch(&mut nodes, variables.span);
    nodes
}

fn declarator_outline(kind: VarKind, declarator: &Declarator) -> Option<OutlineNode> {
    let Some(name) = declarator.name.as_deref() else {
        trace!("skipping destructuring declarator");
        return None;
    };
    if let Some(function) = declarator.init.as_ref().and_then(Expr::as_function) {
        return Some(function_outline(Some(name), &function.params, declarator.span));
    }
    Some(node(
        vec![keyword(kind.keyword()), whitespace(" "), param(name)],
        Some(name),
        declarator.span,
        Vec::new(),
    ))
}

fn expression_outline(expr: &Expr, span: Span) -> Option<OutlineNode> {
    match expr {
        Expr::Call { .. } => spec_outline(expr, span, true),
        Expr::Assign { target, value, span } => module_exports_outline(target, value, *span),
        _ => {
            trace!("skipping top-level expression");
            None
        }
    }
}

/// Outline a `describe(...)`/`it(...)` call. At the top level only suites count.
fn spec_outline(expr: &Expr, span: Span, suites_only: bool) -> Option<OutlineNode> {
    let Expr::Call { callee, arguments } = expr else {
        return None;
    };
    let name = callee.as_ident()?;
    let is_suite = SUITE_CALLEES.contains(&name);
    if !is_suite && (suites_only || !CASE_CALLEES.contains(&name)) {
        trace!(callee = name, "skipping call that is not a suite or case");
        return None;
    }
    let description = match arguments.first()? {
        Expr::Str(value) => value.as_str(),
        _ => return None,
    };
    let body = arguments.get(1)?.as_function()?;

    let children = if is_suite {
        body.body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Expression { expr, span } => spec_outline(expr, *span, false),
                _ => None,
            })
            .collect()
    } else {
        Vec::new()
    };

    Some(node(
        vec![method(name), whitespace(" "), string(description)],
        Some(description),
        span,
        children,
    ))
}

fn module_exports_outline(target: &Expr, value: &Expr, span: Span) -> Option<OutlineNode> {
    if !is_module_exports(target) {
        return None;
    }
    let Expr::Object(properties) = value else {
        return None;
    };
    let children = properties.iter().filter_map(export_property_outline).collect();
    Some(node(vec![plain("module.exports")], None, span, children))
}

fn is_module_exports(target: &Expr) -> bool {
    match target {
        Expr::Member { object, property: Some(property) } => {
            object.as_ident() == Some("module") && property == "exports"
        }
        _ => false,
    }
}

fn export_property_outline(property: &Property) -> Option<OutlineNode> {
    let name = property.name.as_deref()?;
    let tokens = if property.shorthand {
        vec![string(name)]
    } else if let Some(function) = property.value.as_function() {
        let mut tokens = vec![method(name)];
        tokens.extend(parenthesized(&function.params));
        tokens
    } else {
        vec![string(name), plain(":")]
    };
    Some(node(tokens, Some(name), property.span, Vec::new()))
}

fn parenthesized(params: &[Param]) -> Vec<Token> {
    let mut tokens = vec![plain("(")];
    tokens.extend(params_tokens(params));
    tokens.push(plain(")"));
    tokens
}

fn params_tokens(params: &[Param]) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (i, p) in params.iter().enumerate() {
        if i > 0 {
            tokens.push(plain(","));
            tokens.push(whitespace(" "));
        }
        tokens.extend(pattern_tokens(p));
    }
    tokens
}

fn pattern_tokens(pattern: &Param) -> Vec<Token> {
    match pattern {
        Param::Name(name) => vec![param(name)],
        Param::Object(properties) => {
            let mut tokens = vec![plain("{")];
            tokens.extend(params_tokens(properties));
            tokens.push(plain("}"));
            tokens
        }
        Param::Array(elements) => {
            let mut tokens = vec![plain("[")];
            tokens.extend(params_tokens(elements));
            tokens.push(plain("]"));
            tokens
        }
        Param::Rest(inner) => {
            let mut tokens = vec![plain("...")];
            tokens.extend(pattern_tokens(inner));
            tokens
        }
    }
}

/// Give a statement's nodes its full extent: the first starts where the
/// statement starts and the last ends where it ends.
fn stretch(nodes: &mut [OutlineNode], span: Span) {
    if let Some(first) = nodes.first_mut() {
        first.start_position = span.start;
    }
    if let Some(last) = nodes.last_mut() {
        last.end_position = span.end;
    }
}

fn node(tokens: Vec<Token>, name: Option<&str>, span: Span, children: Vec<OutlineNode>) -> OutlineNode {
    OutlineNode {
        tokenized_text: tokens,
        representative_name: name.map(str::to_string),
        start_position: span.start,
        end_position: span.end,
        children,
    }
}
