use crate::error::OutlineError;
use crate::outline::OutlineNode;
use regex::{Regex, RegexBuilder};

/// Build the regex used by [`filter_outline`].
pub fn compile(pattern: &str, ignore_case: bool) -> Result<Regex, OutlineError> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|e| OutlineError::ParseError(format!("Invalid regex pattern: {}", e)))
}

/// Keep the nodes matching `regex` (by representative name or signature) along
/// with the ancestors leading to them. A matching node keeps its whole subtree.
pub fn filter_outline(nodes: &[OutlineNode], regex: &Regex) -> Vec<OutlineNode> {
    nodes.iter().filter_map(|node| filter_node(node, regex)).collect()
}

fn filter_node(node: &OutlineNode, regex: &Regex) -> Option<OutlineNode> {
    if matches(node, regex) {
        return Some(node.clone());
    }

    let children = filter_outline(&node.children, regex);
    if children.is_empty() {
        return None;
    }

    Some(OutlineNode {
        children,
        ..node.clone()
    })
}

fn matches(node: &OutlineNode, regex: &Regex) -> bool {
    node.representative_name
        .as_deref()
        .is_some_and(|name| regex.is_match(name))
        || regex.is_match(&node.signature())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{class_name, keyword, method, plain, whitespace, Position};

    fn named(tokens: Vec<crate::outline::Token>, name: &str, children: Vec<OutlineNode>) -> OutlineNode {
        OutlineNode {
            tokenized_text: tokens,
            representative_name: Some(name.to_string()),
            start_position: Position::new(0, 0),
            end_position: Position::new(0, 0),
            children,
        }
    }

    fn sample() -> Vec<OutlineNode> {
        let bar = named(vec![method("bar"), plain("("), plain(")")], "bar", vec![]);
        let baz = named(vec![method("baz"), plain("("), plain(")")], "baz", vec![]);
        let foo = named(
            vec![keyword("class"), whitespace(" "), class_name("Foo")],
            "Foo",
            vec![bar, baz],
        );
        let other = named(vec![keyword("class"), whitespace(" "), class_name("Other")], "Other", vec![]);
        vec![foo, other]
    }

    #[test]
    fn keeps_ancestors_of_matching_children() {
        let regex = compile("^baz$", false).unwrap();
        let filtered = filter_outline(&sample(), &regex);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].representative_name.as_deref(), Some("Foo"));
        assert_eq!(filtered[0].children.len(), 1);
        assert_eq!(filtered[0].children[0].representative_name.as_deref(), Some("baz"));
    }

    #[test]
    fn matching_node_keeps_its_subtree() {
        let regex = compile("Foo", false).unwrap();
        let filtered = filter_outline(&sample(), &regex);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].children.len(), 2);
    }

    #[test]
    fn matches_signature_text() {
        let regex = compile(r"^class Oth", false).unwrap();
        let filtered = filter_outline(&sample(), &regex);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].representative_name.as_deref(), Some("Other"));
    }

    #[test]
    fn ignore_case() {
        let regex = compile("BAR", true).unwrap();
        assert_eq!(filter_outline(&sample(), &regex).len(), 1);
        let strict = compile("BAR", false).unwrap();
        assert!(filter_outline(&sample(), &strict).is_empty());
    }

    #[test]
    fn invalid_pattern_is_a_parse_error() {
        let err = compile("(unclosed", false).unwrap_err();
        assert!(err.to_string().contains("Invalid regex pattern"));
    }
}
