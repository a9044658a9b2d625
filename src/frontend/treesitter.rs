//! Source front end: lowers a tree-sitter JavaScript/TypeScript tree.
//!
//! tree-sitter is error tolerant, so `ERROR` nodes and anything else outside
//! the recognized kinds simply lower to `Other`.

use crate::outline::Position;
use crate::syntax::{
    Class, Declarator, Expr, Function, Member, Param, Program, Property, Span, Stmt, VarKind, Variables,
};
use tree_sitter::{Node, Tree};

/// Lower a parsed tree into the normalized program.
pub fn lower(tree: &Tree, source: &str) -> Program {
    let lowerer = Lowerer { source };
    Program {
        body: lowerer.statements(tree.root_node()),
    }
}

struct Lowerer<'a> {
    source: &'a str,
}

fn span(node: Node) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span::new(
        Position::new(start.row, start.column),
        Position::new(end.row, end.column),
    )
}

/// Named children, minus comments (which tree-sitter attaches anywhere).
fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn has_child_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == kind);
    found
}

impl<'a> Lowerer<'a> {
    fn text(&self, node: Node) -> &'a str {
        &self.source[node.byte_range()]
    }

    fn statements(&self, block: Node) -> Vec<Stmt> {
        named_children(block)
            .into_iter()
            .map(|child| self.statement(child))
            .collect()
    }

    fn statement(&self, node: Node) -> Stmt {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                Stmt::Function(self.function(node))
            }
            "class_declaration" | "abstract_class_declaration" => Stmt::Class(self.class(node)),
            "lexical_declaration" | "variable_declaration" => self.variables(node),
            "expression_statement" => match named_children(node).first() {
                Some(expr) => Stmt::Expression {
                    expr: self.expr(*expr),
                    span: span(node),
                },
                None => Stmt::Other,
            },
            "type_alias_declaration" => match node.child_by_field_name("name") {
                Some(name) => Stmt::TypeAlias {
                    name: self.text(name).to_string(),
                    span: span(node),
                },
                None => Stmt::Other,
            },
            "export_statement" => self.export(node),
            _ => Stmt::Other,
        }
    }

    fn export(&self, node: Node) -> Stmt {
        let declaration = if let Some(declaration) = node.child_by_field_name("declaration") {
            self.statement(declaration)
        } else if let Some(value) = node.child_by_field_name("value") {
            match value.kind() {
                "function_expression" | "function" | "arrow_function" | "generator_function" => {
                    Stmt::Function(self.function(value))
                }
                "class" => Stmt::Class(self.class(value)),
                _ => Stmt::Other,
            }
        } else {
            Stmt::Other
        };
        Stmt::Export {
            declaration: Box::new(declaration),
            default: has_child_kind(node, "default"),
            span: span(node),
        }
    }

    fn function(&self, node: Node) -> Function {
        let params = if let Some(params) = node.child_by_field_name("parameters") {
            self.params(params)
        } else if let Some(param) = node.child_by_field_name("parameter") {
            // `x => ...` has a single bare parameter
            self.param(param).into_iter().collect()
        } else {
            Vec::new()
        };
        let body = match node.child_by_field_name("body") {
            Some(body) if body.kind() == "statement_block" => self.statements(body),
            _ => Vec::new(),
        };
        Function {
            name: node
                .child_by_field_name("name")
                .map(|n| self.text(n).to_string()),
            params,
            body,
            span: span(node),
        }
    }

    fn params(&self, params: Node) -> Vec<Param> {
        named_children(params)
            .into_iter()
            .filter_map(|p| self.param(p))
            .collect()
    }

    fn param(&self, node: Node) -> Option<Param> {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => {
                Some(Param::Name(self.text(node).to_string()))
            }
            "assignment_pattern" | "object_assignment_pattern" => {
                self.param(node.child_by_field_name("left")?)
            }
            "pair_pattern" => self.param(node.child_by_field_name("value")?),
            "required_parameter" | "optional_parameter" => {
                self.param(node.child_by_field_name("pattern")?)
            }
            "object_pattern" => Some(Param::Object(self.params(node))),
            "array_pattern" => Some(Param::Array(self.params(node))),
            "rest_pattern" => {
                let inner = named_children(node).into_iter().next()?;
                Some(Param::Rest(Box::new(self.param(inner)?)))
            }
            _ => None,
        }
    }

    fn class(&self, node: Node) -> Class {
        let members = match node.child_by_field_name("body") {
            Some(body) => named_children(body)
                .into_iter()
                .filter_map(|member| self.member(member))
                .collect(),
            None => Vec::new(),
        };
        Class {
            name: node
                .child_by_field_name("name")
                .map(|n| self.text(n).to_string()),
            members,
            span: span(node),
        }
    }

    fn member(&self, node: Node) -> Option<Member> {
        match node.kind() {
            "method_definition" | "method_signature" | "abstract_method_signature" => {
                let name = self.key(node.child_by_field_name("name")?)?;
                let params = node
                    .child_by_field_name("parameters")
                    .map(|p| self.params(p))
                    .unwrap_or_default();
                Some(Member::Method { name, params, span: span(node) })
            }
            "field_definition" | "public_field_definition" => {
                // javascript names the key `property`, typescript `name`
                let key = node
                    .child_by_field_name("property")
                    .or_else(|| node.child_by_field_name("name"))?;
                Some(Member::Field {
                    name: self.key(key)?,
                    value: node.child_by_field_name("value").map(|v| self.expr(v)),
                    span: span(node),
                })
            }
            _ => None,
        }
    }

    /// Name of a property or member key; computed keys have none.
    fn key(&self, node: Node) -> Option<String> {
        match node.kind() {
            "property_identifier" | "private_property_identifier" | "identifier" | "number" => {
                Some(self.text(node).to_string())
            }
            "string" => Some(unquote(self.text(node)).to_string()),
            _ => None,
        }
    }

    fn variables(&self, node: Node) -> Stmt {
        let keyword = if node.kind() == "variable_declaration" {
            "var"
        } else {
            match node.child_by_field_name("kind").or_else(|| node.child(0)) {
                Some(kind) => self.text(kind),
                None => return Stmt::Other,
            }
        };
        let Some(kind) = VarKind::from_keyword(keyword) else {
            return Stmt::Other;
        };
        let declarators = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "variable_declarator")
            .map(|declarator| self.declarator(declarator))
            .collect();
        Stmt::Variables(Variables {
            kind,
            declarators,
            span: span(node),
        })
    }

    fn declarator(&self, node: Node) -> Declarator {
        let name = node
            .child_by_field_name("name")
            .filter(|n| n.kind() == "identifier")
            .map(|n| self.text(n).to_string());
        Declarator {
            name,
            init: node.child_by_field_name("value").map(|v| self.expr(v)),
            span: span(node),
        }
    }

    fn expr(&self, node: Node) -> Expr {
        match node.kind() {
            "function_expression" | "function" | "arrow_function" | "generator_function" => {
                Expr::Function(self.function(node))
            }
            "call_expression" => {
                let Some(callee) = node.child_by_field_name("function") else {
                    return Expr::Other;
                };
                let arguments = node
                    .child_by_field_name("arguments")
                    .map(|args| {
                        named_children(args)
                            .into_iter()
                            .map(|arg| self.expr(arg))
                            .collect()
                    })
                    .unwrap_or_default();
                Expr::Call {
                    callee: Box::new(self.expr(callee)),
                    arguments,
                }
            }
            "assignment_expression" => {
                match (node.child_by_field_name("left"), node.child_by_field_name("right")) {
                    (Some(left), Some(right)) => Expr::Assign {
                        target: Box::new(self.expr(left)),
                        value: Box::new(self.expr(right)),
                        span: span(node),
                    },
                    _ => Expr::Other,
                }
            }
            "member_expression" => match node.child_by_field_name("object") {
                Some(object) => Expr::Member {
                    object: Box::new(self.expr(object)),
                    property: node
                        .child_by_field_name("property")
                        .filter(|p| p.kind() == "property_identifier")
                        .map(|p| self.text(p).to_string()),
                },
                None => Expr::Other,
            },
            "identifier" => Expr::Ident(self.text(node).to_string()),
            "string" => Expr::Str(unquote(self.text(node)).to_string()),
            "template_string" if !has_child_kind(node, "template_substitution") => {
                Expr::Str(unquote(self.text(node)).to_string())
            }
            "object" => Expr::Object(
                named_children(node)
                    .into_iter()
                    .filter_map(|p| self.property(p))
                    .collect(),
            ),
            "parenthesized_expression" => match named_children(node).first() {
                Some(inner) => self.expr(*inner),
                None => Expr::Other,
            },
            _ => Expr::Other,
        }
    }

    fn property(&self, node: Node) -> Option<Property> {
        match node.kind() {
            "pair" => {
                let key = node.child_by_field_name("key")?;
                let value = node.child_by_field_name("value")?;
                Some(Property {
                    name: self.key(key),
                    value: self.expr(value),
                    shorthand: false,
                    span: span(node),
                })
            }
            "method_definition" => Some(Property {
                name: self.key(node.child_by_field_name("name")?),
                value: Expr::Function(self.function(node)),
                shorthand: false,
                span: span(node),
            }),
            "shorthand_property_identifier" => {
                let name = self.text(node).to_string();
                Some(Property {
                    name: Some(name.clone()),
                    value: Expr::Ident(name),
                    shorthand: true,
                    span: span(node),
                })
            }
            _ => None,
        }
    }
}

/// Strip the surrounding quotes (or backticks) of a string literal.
fn unquote(text: &str) -> &str {
    if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        text
    }
}
