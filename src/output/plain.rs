use crate::outline::OutlineNode;
use crate::FileOutline;
use crate::OutlineError;

/// Format outlines as an indented tree, one node per line with 1-based lines.
pub fn format_output(files: &[FileOutline]) -> Result<String, OutlineError> {
    let mut output = String::new();

    for file in files {
        if file.outline.is_empty() {
            continue;
        }

        output.push_str(&file.path);
        output.push('\n');
        for node in &file.outline {
            format_node(node, 1, &mut output);
        }
    }

    Ok(output)
}

fn format_node(node: &OutlineNode, depth: usize, output: &mut String) {
    output.push_str(&format!(
        "{:indent$}{} [{}:{}]\n",
        "",
        node.signature(),
        node.start_position.line + 1,
        node.end_position.line + 1,
        indent = depth * 2
    ));
    for child in &node.children {
        format_node(child, depth + 1, output);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{class_name, keyword, method, plain, whitespace, Position};

    fn make_node(tokens: Vec<crate::outline::Token>, start: usize, end: usize) -> OutlineNode {
        OutlineNode {
            tokenized_text: tokens,
            representative_name: None,
            start_position: Position::new(start, 0),
            end_position: Position::new(end, 1),
            children: vec![],
        }
    }

    #[test]
    fn format_nested_tree() {
        let mut class = make_node(vec![keyword("class"), whitespace(" "), class_name("Foo")], 10, 20);
        class.children.push(make_node(vec![method("bar"), plain("("), plain(")")], 13, 15));
        let files = vec![FileOutline {
            path: "src/foo.js".to_string(),
            lines: 21,
            bytes: 300,
            outline: vec![class],
        }];
        let result = format_output(&files).unwrap();
        assert_eq!(result, "src/foo.js\n  class Foo [11:21]\n    bar() [14:16]\n");
    }

    #[test]
    fn format_output_skips_empty_files() {
        let files = vec![FileOutline {
            path: "empty.js".to_string(),
            lines: 0,
            bytes: 0,
            outline: vec![],
        }];
        let result = format_output(&files).unwrap();
        assert!(result.is_empty());
    }
}
