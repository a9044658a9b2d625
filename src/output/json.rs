use crate::error::OutlineError;
use crate::outline::OutlineNode;
use crate::FileOutline;
use serde::Serialize;

#[derive(Serialize)]
struct JsonOutput<'a> {
    files: Vec<FileOutput<'a>>,
}

#[derive(Serialize)]
struct FileOutput<'a> {
    path: &'a str,
    outline: &'a [OutlineNode],
}

/// Format outlines as JSON
pub fn format_output(files: &[FileOutline]) -> Result<String, OutlineError> {
    let output = JsonOutput {
        files: files
            .iter()
            .map(|file| FileOutput {
                path: &file.path,
                outline: &file.outline,
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{keyword, type_name, whitespace, Position};

    #[test]
    fn emits_camel_case_outline_per_file() {
        let node = OutlineNode {
            tokenized_text: vec![keyword("type"), whitespace(" "), type_name("Foo")],
            representative_name: Some("Foo".to_string()),
            start_position: Position::new(12, 0),
            end_position: Position::new(12, 18),
            children: vec![],
        };
        let files = vec![FileOutline {
            path: "types.ts".to_string(),
            lines: 13,
            bytes: 40,
            outline: vec![node],
        }];
        let text = format_output(&files).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["files"][0]["path"], "types.ts");
        let first = &value["files"][0]["outline"][0];
        assert_eq!(first["representativeName"], "Foo");
        assert_eq!(first["tokenizedText"][2]["kind"], "type");
        assert_eq!(first["endPosition"]["column"], 18);
    }
}
