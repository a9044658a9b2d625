use crate::error::OutlineError;
use serde::{Deserialize, Serialize};

/// A 0-indexed source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Keyword,
    ClassName,
    Method,
    Param,
    String,
    Type,
    Whitespace,
    Plain,
}

/// One syntax-highlighted fragment of an outline label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Token { value: value.into(), kind }
    }
}

pub fn keyword(value: impl Into<String>) -> Token {
    Token::new(TokenKind::Keyword, value)
}

pub fn class_name(value: impl Into<String>) -> Token {
    Token::new(TokenKind::ClassName, value)
}

pub fn method(value: impl Into<String>) -> Token {
    Token::new(TokenKind::Method, value)
}

pub fn param(value: impl Into<String>) -> Token {
    Token::new(TokenKind::Param, value)
}

pub fn string(value: impl Into<String>) -> Token {
    Token::new(TokenKind::String, value)
}

pub fn type_name(value: impl Into<String>) -> Token {
    Token::new(TokenKind::Type, value)
}

pub fn whitespace(value: impl Into<String>) -> Token {
    Token::new(TokenKind::Whitespace, value)
}

pub fn plain(value: impl Into<String>) -> Token {
    Token::new(TokenKind::Plain, value)
}

/// A named construct in the outline, with its nested constructs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    pub tokenized_text: Vec<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representative_name: Option<String>,
    pub start_position: Position,
    pub end_position: Position,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// The label text with highlighting stripped, e.g. `function foo(a, b)`.
    pub fn signature(&self) -> String {
        self.tokenized_text.iter().map(|t| t.value.as_str()).collect()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::count).sum::<usize>()
    }

    /// Depth of this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::depth).max().unwrap_or(0)
    }
}

/// Check that every node's range is well formed, that children sit inside
/// their parent and that siblings are ordered without overlapping.
pub fn verify_ranges(nodes: &[OutlineNode]) -> Result<(), OutlineError> {
    verify_siblings(nodes, None)
}

fn verify_siblings(
    nodes: &[OutlineNode],
    parent: Option<&OutlineNode>,
) -> Result<(), OutlineError> {
    let mut previous_end: Option<Position> = None;
    for node in nodes {
        let label = node.signature();
        if node.start_position > node.end_position {
            return Err(OutlineError::RangeViolation(format!(
                "'{}' starts after it ends",
                label
            )));
        }
        if let Some(parent) = parent {
            if node.start_position < parent.start_position || node.end_position > parent.end_position {
                return Err(OutlineError::RangeViolation(format!(
                    "'{}' is not contained in '{}'",
                    label,
                    parent.signature()
                )));
            }
        }
        if let Some(end) = previous_end {
            if node.start_position < end {
                return Err(OutlineError::RangeViolation(format!(
                    "'{}' overlaps its previous sibling",
                    label
                )));
            }
        }
        previous_end = Some(node.end_position);
        verify_siblings(&node.children, Some(node))?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, start: (usize, usize), end: (usize, usize)) -> OutlineNode {
        OutlineNode {
            tokenized_text: vec![method(name)],
            representative_name: Some(name.to_string()),
            start_position: Position::new(start.0, start.1),
            end_position: Position::new(end.0, end.1),
            children: vec![],
        }
    }

    #[test]
    fn signature_concatenates_token_values() {
        let node = OutlineNode {
            tokenized_text: vec![keyword("function"), whitespace(" "), method("foo"), plain("("), param("a"), plain(")")],
            representative_name: Some("foo".to_string()),
            start_position: Position::new(0, 0),
            end_position: Position::new(0, 18),
            children: vec![],
        };
        assert_eq!(node.signature(), "function foo(a)");
    }

    #[test]
    fn serializes_in_camel_case_and_kebab_kinds() {
        let mut node = leaf("Foo", (1, 0), (3, 1));
        node.tokenized_text = vec![class_name("Foo")];
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["representativeName"], "Foo");
        assert_eq!(json["startPosition"]["line"], 1);
        assert_eq!(json["endPosition"]["column"], 1);
        assert_eq!(json["tokenizedText"][0]["kind"], "class-name");
    }

    #[test]
    fn absent_name_is_omitted() {
        let mut node = leaf("x", (0, 0), (0, 1));
        node.representative_name = None;
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("representativeName"));
    }

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(Position::new(1, 50) < Position::new(2, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
    }

    #[test]
    fn count_and_depth() {
        let mut parent = leaf("p", (0, 0), (10, 0));
        let mut child = leaf("c", (1, 0), (5, 0));
        child.children.push(leaf("g", (2, 0), (3, 0)));
        parent.children.push(child);
        parent.children.push(leaf("d", (6, 0), (7, 0)));
        assert_eq!(parent.count(), 4);
        assert_eq!(parent.depth(), 3);
    }

    #[test]
    fn verify_accepts_nested_ordered_ranges() {
        let mut parent = leaf("p", (0, 0), (10, 1));
        parent.children.push(leaf("a", (1, 2), (3, 3)));
        parent.children.push(leaf("b", (4, 2), (4, 9)));
        assert!(verify_ranges(&[parent, leaf("q", (11, 0), (12, 1))]).is_ok());
    }

    #[test]
    fn verify_rejects_escaping_child() {
        let mut parent = leaf("p", (0, 0), (2, 1));
        parent.children.push(leaf("a", (1, 0), (3, 0)));
        let err = verify_ranges(&[parent]).unwrap_err();
        assert!(err.to_string().contains("not contained"));
    }

    #[test]
    fn verify_rejects_overlapping_siblings() {
        let err = verify_ranges(&[leaf("a", (0, 0), (2, 0)), leaf("b", (1, 0), (3, 0))]).unwrap_err();
        assert!(err.to_string().contains("overlaps"));
    }

    #[test]
    fn verify_rejects_inverted_range() {
        let err = verify_ranges(&[leaf("a", (4, 0), (2, 0))]).unwrap_err();
        assert!(err.to_string().contains("starts after"));
    }
}
